// ABOUTME: Summary of a finished deployment run.
// ABOUTME: Serializable so the CLI can print it as text or JSON.

use serde::Serialize;

use crate::diagnostics::Warning;
use crate::types::StackName;

use super::change::ChangeSet;
use super::strategy::{Action, DeployStrategy};
use super::warmup::WarmUp;

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentReport {
    pub component: String,
    pub environment: String,
    pub strategy: DeployStrategy,
    pub action: Action,
    /// Nothing was changed; the other fields describe what would have happened.
    pub dry_run: bool,
    pub existing_stack: Option<StackName>,
    /// The stack serving the component once the run is done.
    pub serving_stack: StackName,
    /// Legacy stack deleted after the transfer.
    pub retired_stack: Option<StackName>,
    /// Legacy stack kept after the transfer.
    pub retained_stack: Option<StackName>,
    pub change: Option<ChangeSet>,
    pub warm_up: Option<WarmUp>,
    pub drained_members: usize,
    pub skipped_members: usize,
    pub warnings: Vec<Warning>,
}

impl DeploymentReport {
    /// One-line human summary.
    pub fn summary(&self) -> String {
        let prefix = if self.dry_run { "[dry run] " } else { "" };
        match self.action {
            Action::Create => format!("{prefix}created {}", self.serving_stack),
            Action::Noop => format!("{prefix}{} is up to date", self.serving_stack),
            Action::Update => format!("{prefix}updated {} in place", self.serving_stack),
            Action::Replace => {
                let from = self
                    .existing_stack
                    .as_ref()
                    .map(StackName::as_str)
                    .unwrap_or("none");
                format!("{prefix}replaced {from} with {}", self.serving_stack)
            }
        }
    }
}
