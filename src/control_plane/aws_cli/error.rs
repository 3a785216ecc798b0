// ABOUTME: Error types for the aws command-line client with SNAFU pattern.
// ABOUTME: Maps process failures onto the control plane trait errors.

use snafu::Snafu;

use crate::control_plane::{ClusterError, ScalingError, StackError};

/// Failure running an `aws` command or reading its output.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum AwsCliError {
    #[snafu(display("failed to run {binary} {operation}: {source}"))]
    Spawn {
        binary: String,
        operation: String,
        source: std::io::Error,
    },

    #[snafu(display("{operation} failed (exit code {code:?}): {stderr}"))]
    Failed {
        operation: String,
        code: Option<i32>,
        stderr: String,
    },

    #[snafu(display("unexpected output from {operation}: {source}"))]
    Parse {
        operation: String,
        source: serde_json::Error,
    },

    #[snafu(display("could not encode arguments for {operation}: {source}"))]
    Encode {
        operation: String,
        source: serde_json::Error,
    },
}

impl AwsCliError {
    /// The command reported that the named resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, AwsCliError::Failed { stderr, .. } if stderr.contains("does not exist"))
    }

    pub(crate) fn into_stack_error(self, name: &str) -> StackError {
        if self.is_not_found() {
            StackError::NotFound(name.to_string())
        } else {
            StackError::ControlPlane(self.to_string())
        }
    }
}

impl From<AwsCliError> for StackError {
    fn from(err: AwsCliError) -> Self {
        StackError::ControlPlane(err.to_string())
    }
}

impl From<AwsCliError> for ScalingError {
    fn from(err: AwsCliError) -> Self {
        ScalingError::ControlPlane(err.to_string())
    }
}

impl From<AwsCliError> for ClusterError {
    fn from(err: AwsCliError) -> Self {
        ClusterError::ControlPlane(err.to_string())
    }
}
