//! Publishes a compiled commit for a released action and moves its tags.

use action_compile_publish::cli;
use action_compile_publish::cli::OutputManager;
use std::io::Write;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::init();

    match cli::run().await {
        Ok(exit_code) => {
            let _ = std::io::stdout().flush();
            process::exit(exit_code);
        }
        Err(e) => {
            // Never quiet for fatal errors
            let output = OutputManager::new(false);
            output.error(&format!("Fatal error: {e}"));

            let suggestions = e.recovery_suggestions();
            if !suggestions.is_empty() {
                output.println("\n💡 Recovery suggestions:");
                for suggestion in suggestions {
                    output.indent(&suggestion);
                }
            }

            let _ = std::io::stdout().flush();
            process::exit(1);
        }
    }
}
