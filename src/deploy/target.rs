// ABOUTME: The per-run description of what is being deployed and where.
// ABOUTME: Built once from configuration; only strategy and retention may be overridden.

use std::collections::BTreeMap;

use crate::control_plane::{Capability, StackRequest};
use crate::types::StackName;

use super::strategy::DeployStrategy;
use super::template::Template;

/// Output key naming the auto scaling group when a component doesn't override it.
pub const DEFAULT_AUTO_SCALING_GROUP_OUTPUT: &str = "AutoScalingGroupName";
/// Output key naming the cluster when a component doesn't override it.
pub const DEFAULT_CLUSTER_OUTPUT: &str = "ClusterName";

/// A component deployed into an environment.
#[derive(Debug, Clone)]
pub struct DeploymentTarget {
    pub component: String,
    pub environment: String,
    /// Base stack name; slots append `-B` or `-G`.
    pub stack_name: StackName,
    /// Template parameter values.
    pub inputs: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
    pub capabilities: Vec<Capability>,
    pub notification_arns: Vec<String>,
    pub strategy: DeployStrategy,
    pub settings: TargetSettings,
}

/// Optional per-component behaviour with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSettings {
    pub auto_scaling_group_output: String,
    pub cluster_output: String,
    /// Keep the replaced stack instead of deleting it.
    pub keep_previous_stack: bool,
    /// Inputs that only resize pools and can be applied in place.
    pub size_parameters: Vec<String>,
    pub disable_rollback: bool,
    /// Stack policy document body.
    pub stack_policy: Option<String>,
    /// Policy document body applied only while an update runs.
    pub stack_policy_during_update: Option<String>,
}

impl Default for TargetSettings {
    fn default() -> Self {
        Self {
            auto_scaling_group_output: DEFAULT_AUTO_SCALING_GROUP_OUTPUT.to_string(),
            cluster_output: DEFAULT_CLUSTER_OUTPUT.to_string(),
            keep_previous_stack: false,
            size_parameters: Vec::new(),
            disable_rollback: true,
            stack_policy: None,
            stack_policy_during_update: None,
        }
    }
}

impl DeploymentTarget {
    /// Override the configured strategy (explicit command-line choice).
    pub fn with_strategy(mut self, strategy: DeployStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Keep the replaced stack regardless of configuration.
    pub fn keep_previous(mut self) -> Self {
        self.settings.keep_previous_stack = true;
        self
    }

    /// Request that creates or updates `name` to this target's desired state.
    pub(crate) fn stack_request(&self, name: &StackName, template: &Template) -> StackRequest {
        StackRequest {
            name: name.clone(),
            template: template.body().to_string(),
            parameters: self.inputs.clone(),
            tags: self.tags.clone(),
            capabilities: self.capabilities.clone(),
            notification_arns: self.notification_arns.clone(),
            disable_rollback: self.settings.disable_rollback,
            stack_policy: self.settings.stack_policy.clone(),
            stack_policy_during_update: self.settings.stack_policy_during_update.clone(),
        }
    }
}
