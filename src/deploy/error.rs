// ABOUTME: Error types for deployment operations.
// ABOUTME: Covers configuration, ambiguous state, readiness and cross-stack failures.

use crate::control_plane::{ClusterError, ScalingError, StackError, StackStatus};

use super::slot::SlotError;

/// Errors that can occur while resolving, deciding or migrating a deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The rendered template exceeds the control plane's inline body limit.
    #[error("template is {size} bytes, above the {limit} byte limit")]
    TemplateTooLarge { size: usize, limit: usize },

    /// Slot resolution failed.
    #[error(transparent)]
    Slot(#[from] SlotError),

    /// The live stack is in a status that needs an operator.
    #[error("stack {stack} is in {status}; repair or delete it manually before deploying")]
    StackInFailedState { stack: String, status: StackStatus },

    /// A transition that needs a live stack was called on a first deployment.
    #[error("no existing stack to {0}")]
    NoExistingStack(&'static str),

    /// The new stack reports a different cluster than the one it replaces.
    #[error(
        "{new_stack} uses cluster {new_cluster} but {existing_stack} uses {existing_cluster}; \
         both stacks were left in place"
    )]
    ClusterMismatch {
        existing_stack: String,
        existing_cluster: String,
        new_stack: String,
        new_cluster: String,
    },

    /// The new pool never reached the required healthy capacity.
    #[error("{pool} has {healthy} of {target} healthy instances after waiting")]
    CapacityNotReady {
        pool: String,
        target: u32,
        healthy: u32,
    },

    /// A legacy member kept tasks past its drain budget.
    #[error("container instance {member} still runs {remaining} task(s) after draining")]
    DrainTimeout { member: String, remaining: u32 },

    /// A stack operation settled in a failure status.
    #[error("stack {stack} finished in {status}")]
    StackOperationFailed { stack: String, status: StackStatus },

    /// A stack operation did not settle within its poll budget.
    #[error("stack {stack} did not settle in time (last status {status})")]
    StackWaitTimeout { stack: String, status: String },

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error(transparent)]
    Scaling(#[from] ScalingError),

    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    /// Bad or incomplete configuration; fix the config and re-run.
    Configuration,
    /// External state the engine cannot reason about; needs manual cleanup.
    AmbiguousState,
    /// Capacity or draining did not become ready within budget.
    Readiness,
    /// New and old stacks disagree on a shared resource.
    CrossStackInvariant,
    /// A control plane call failed.
    ControlPlane,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::TemplateTooLarge { .. }
            | DeployError::NoExistingStack(_)
            | DeployError::Slot(SlotError::InvalidName { .. })
            | DeployError::Stack(StackError::MissingOutput { .. })
            | DeployError::Stack(StackError::AmbiguousOutput { .. }) => {
                DeployErrorKind::Configuration
            }
            DeployError::Slot(SlotError::Ambiguous { .. })
            | DeployError::StackInFailedState { .. } => DeployErrorKind::AmbiguousState,
            DeployError::CapacityNotReady { .. }
            | DeployError::DrainTimeout { .. }
            | DeployError::StackOperationFailed { .. }
            | DeployError::StackWaitTimeout { .. } => DeployErrorKind::Readiness,
            DeployError::ClusterMismatch { .. } => DeployErrorKind::CrossStackInvariant,
            DeployError::Stack(_) | DeployError::Scaling(_) | DeployError::Cluster(_) => {
                DeployErrorKind::ControlPlane
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_output_is_a_configuration_error() {
        let err = DeployError::from(StackError::MissingOutput {
            stack: "prod-web-B".to_string(),
            key: "ClusterName".to_string(),
        });
        assert_eq!(err.kind(), DeployErrorKind::Configuration);
    }

    #[test]
    fn failed_stack_status_needs_an_operator() {
        let err = DeployError::StackInFailedState {
            stack: "prod-web-B".to_string(),
            status: StackStatus::UpdateRollbackComplete,
        };
        assert_eq!(err.kind(), DeployErrorKind::AmbiguousState);
        assert!(err.to_string().contains("UPDATE_ROLLBACK_COMPLETE"));
    }

    #[test]
    fn api_failures_are_control_plane_errors() {
        let err = DeployError::from(ScalingError::ControlPlane("throttled".to_string()));
        assert_eq!(err.kind(), DeployErrorKind::ControlPlane);
    }
}
