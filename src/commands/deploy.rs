// ABOUTME: Deploy command implementation.
// ABOUTME: Builds the target from configuration and runs the deployment engine.

use stackswap::config::Config;
use stackswap::control_plane::AwsCli;
use stackswap::deploy::{DeployOptions, DeployStrategy, deploy as run_deployment};
use stackswap::error::Result;
use stackswap::output::Output;

/// Arguments of the deploy subcommand.
pub struct DeployArgs {
    pub component: String,
    pub environment: Option<String>,
    pub strategy: Option<DeployStrategy>,
    pub dry_run: bool,
    pub keep_previous: bool,
}

/// Deploy one component.
pub async fn deploy(config: &Config, args: DeployArgs, mut output: Output) -> Result<()> {
    output.start_timer();

    let mut target = config.target(&args.component, args.environment.as_deref())?;
    if let Some(strategy) = args.strategy {
        target = target.with_strategy(strategy);
    }
    if args.keep_previous {
        target = target.keep_previous();
    }
    let template = config.load_template(&args.component)?;

    output.progress(&format!(
        "Deploying {} to {} (stack {}, strategy {}){}",
        target.component,
        target.environment,
        target.stack_name,
        target.strategy,
        if args.dry_run { " [dry run]" } else { "" }
    ));

    let control_plane = AwsCli::new(config.aws.clone());
    let options = DeployOptions {
        dry_run: args.dry_run,
        timing: config.timing.clone(),
    };

    let report = run_deployment(&control_plane, target, template, &options).await?;
    output.report(&report);
    Ok(())
}
