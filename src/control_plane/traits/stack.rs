// ABOUTME: Stack operations trait for the infrastructure control plane.
// ABOUTME: Create, update, delete and describe template-driven stacks.

use super::shared_types::{Capability, StackDescription, StackOutputs};
use crate::deploy::ChangeSet;
use crate::types::StackName;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Stack lifecycle operations.
#[async_trait]
pub trait StackOps: Send + Sync {
    /// Start creating a stack. Returns once the request is accepted.
    async fn create_stack(&self, request: &StackRequest) -> Result<(), StackError>;

    /// Start an in-place update of an existing stack.
    async fn update_stack(&self, request: &StackRequest) -> Result<(), StackError>;

    /// Start deleting a stack.
    async fn delete_stack(&self, name: &StackName) -> Result<(), StackError>;

    /// Current status, outputs, parameters and tags of a stack.
    async fn describe_stack(&self, name: &StackName) -> Result<StackDescription, StackError>;

    /// The template body the stack was last deployed with.
    async fn get_template(&self, name: &StackName) -> Result<String, StackError>;

    /// Outputs of every live stack, keyed by stack name.
    async fn list_all_outputs(&self) -> Result<BTreeMap<String, StackOutputs>, StackError>;

    /// Classify how the desired configuration differs from what `existing` runs.
    async fn is_changed(
        &self,
        existing: &StackName,
        template: &str,
        inputs: &BTreeMap<String, String>,
        tags: &BTreeMap<String, String>,
    ) -> Result<ChangeSet, StackError> {
        let deployed = self.describe_stack(existing).await?;
        let deployed_template = self.get_template(existing).await?;
        Ok(ChangeSet::between(
            &deployed_template,
            &deployed.parameters,
            &deployed.tags,
            template,
            inputs,
            tags,
        ))
    }

    /// Look up a single output value of a stack.
    async fn get_output(&self, name: &StackName, key: &str) -> Result<String, StackError> {
        let description = self.describe_stack(name).await?;
        description.outputs.get(name, key).map(str::to_string)
    }
}

/// Everything needed to create or update a stack.
#[derive(Debug, Clone)]
pub struct StackRequest {
    pub name: StackName,
    /// Rendered template body.
    pub template: String,
    pub parameters: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
    pub capabilities: Vec<Capability>,
    /// Topics notified of stack events.
    pub notification_arns: Vec<String>,
    /// Keep failed resources for inspection. Ignored on update.
    pub disable_rollback: bool,
    pub stack_policy: Option<String>,
    /// Temporary policy applied for the duration of an update. Ignored on create.
    pub stack_policy_during_update: Option<String>,
}

/// Errors from stack operations.
#[derive(Debug, thiserror::Error)]
pub enum StackError {
    #[error("stack not found: {0}")]
    NotFound(String),

    #[error("stack {stack} has no output named {key}")]
    MissingOutput { stack: String, key: String },

    #[error("stack {stack} has more than one output named {key}")]
    AmbiguousOutput { stack: String, key: String },

    #[error("control plane error: {0}")]
    ControlPlane(String),
}
