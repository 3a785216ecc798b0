// ABOUTME: Drives one deployment run from slot resolution to the finished report.
// ABOUTME: Sequences the type-state transitions according to the chosen action.

use crate::config::TimingConfig;
use crate::control_plane::ControlPlane;

use super::Deployment;
use super::error::DeployError;
use super::report::DeploymentReport;
use super::strategy::Action;
use super::target::DeploymentTarget;
use super::template::Template;

/// Per-run switches that are not part of the target.
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Stop after the decision; make no mutating call.
    pub dry_run: bool,
    pub timing: TimingConfig,
}

/// Deploy `target` with `template`.
///
/// The template size is checked before the control plane is contacted.
/// Failures leave every stack as it is.
pub async fn deploy<C: ControlPlane + ?Sized>(
    control_plane: &C,
    target: DeploymentTarget,
    template: impl Into<String>,
    options: &DeployOptions,
) -> Result<DeploymentReport, DeployError> {
    let template = Template::new(template)?;

    let deployment = Deployment::resolve(target, template, options.timing.clone(), control_plane)
        .await?
        .detect(control_plane)
        .await?;

    if options.dry_run {
        return Ok(deployment.dry_run());
    }

    let action = deployment.state().action();
    let completed = match action {
        Action::Create => deployment.create_stack(control_plane).await?.complete(),
        Action::Noop => deployment.skip()?,
        Action::Update => deployment.update_in_place(control_plane).await?,
        Action::Replace => {
            deployment.grace_pause().await;
            deployment
                .create_stack(control_plane)
                .await?
                .verify_cluster(control_plane)
                .await?
                .warm_up(control_plane)
                .await?
                .transfer(control_plane)
                .await?
                .retire(control_plane)
                .await?
        }
    };

    let report = completed.finish();
    tracing::info!(
        action = %report.action,
        serving = %report.serving_stack,
        warnings = report.warnings.len(),
        "deployment finished"
    );
    Ok(report)
}
