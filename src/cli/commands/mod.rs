//! Command execution: validate arguments, pick a host and run the publish
//! workflow.

use crate::cli::{Args, OutputManager};
use crate::context::RunContext;
use crate::error::Result;
use crate::github::{DryRunHost, GitHost};
use crate::publish::{PublishOptions, PublishOutcome, Publisher};

/// Execute the publish run described by `args`
pub async fn execute_command(args: Args) -> Result<i32> {
    args.validate()?;

    let output = OutputManager::new(args.quiet);
    let ctx = args.run_context()?;
    let options = args.publish_options();

    log::info!(
        "Publishing {} for {} (draft: {}) on top of {}",
        ctx.release.tag_name,
        ctx.repo,
        ctx.release.is_draft,
        ctx.sha
    );

    let outcome = if args.dry_run {
        output.warn("Dry run: nothing will be changed on GitHub");
        execute_publish(&DryRunHost::new(), &ctx, &options, &output).await?
    } else {
        let client = args.github_client()?;
        execute_publish(&client, &ctx, &options, &output).await?
    };

    print_summary(&outcome, &output);
    output.success("All done!");
    Ok(0)
}

async fn execute_publish<H: GitHost>(
    host: &H,
    ctx: &RunContext,
    options: &PublishOptions,
    output: &OutputManager,
) -> Result<PublishOutcome> {
    Publisher::new(host, ctx, output).publish(options).await
}

fn print_summary(outcome: &PublishOutcome, output: &OutputManager) {
    output.println("");
    output.indent(&format!("Tree:   {}", outcome.tree_sha));
    output.indent(&format!("Commit: {}", outcome.commit.sha));
    output.indent(&format!(
        "Tag:    {} ({})",
        outcome.exact.ref_name, outcome.exact.action
    ));
    if let Some(alias) = &outcome.alias {
        output.indent(&format!("Major:  {} ({})", alias.ref_name, alias.action));
    }
}
