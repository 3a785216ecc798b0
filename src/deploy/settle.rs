// ABOUTME: Waits for a stack create, update or delete to settle.
// ABOUTME: A settled failure status is fatal; the stack is left as it is.

use crate::control_plane::{StackError, StackOps, StackStatus};
use crate::types::StackName;

use super::error::DeployError;
use super::poll::{Condition, Poller};

/// The stack operation being waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StackOperation {
    Create,
    Update,
    Delete,
}

impl StackOperation {
    fn succeeded(&self, status: &StackStatus) -> bool {
        matches!(
            (self, status),
            (StackOperation::Create, StackStatus::CreateComplete)
                | (StackOperation::Update, StackStatus::UpdateComplete)
                | (StackOperation::Delete, StackStatus::DeleteComplete)
        )
    }
}

struct Settled<'a, S: ?Sized> {
    stacks: &'a S,
    name: &'a StackName,
    operation: StackOperation,
    status: Option<StackStatus>,
}

impl<S: StackOps + ?Sized> Condition for Settled<'_, S> {
    type Error = StackError;

    async fn check(&mut self) -> Result<bool, StackError> {
        let status = match self.stacks.describe_stack(self.name).await {
            Ok(description) => description.status,
            Err(StackError::NotFound(_)) if self.operation == StackOperation::Delete => {
                StackStatus::DeleteComplete
            }
            Err(e) => return Err(e),
        };
        tracing::debug!(stack = %self.name, %status, "stack status");
        let settled = !status.is_in_progress();
        self.status = Some(status);
        Ok(settled)
    }
}

/// Poll until `name` leaves its in-progress status, then require success.
pub(crate) async fn wait_for_stack<S: StackOps + ?Sized>(
    stacks: &S,
    name: &StackName,
    operation: StackOperation,
    poller: &Poller,
) -> Result<(), DeployError> {
    let mut condition = Settled {
        stacks,
        name,
        operation,
        status: None,
    };
    let settled = poller
        .until(&format!("stack {name} to settle"), &mut condition)
        .await?;

    match condition.status {
        Some(status) if settled && operation.succeeded(&status) => {
            tracing::info!(stack = %name, %status, "stack settled");
            Ok(())
        }
        Some(status) if settled => Err(DeployError::StackOperationFailed {
            stack: name.to_string(),
            status,
        }),
        status => Err(DeployError::StackWaitTimeout {
            stack: name.to_string(),
            status: status.map(|s| s.to_string()).unwrap_or_else(|| "unknown".to_string()),
        }),
    }
}
