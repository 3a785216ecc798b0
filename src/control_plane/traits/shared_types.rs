// ABOUTME: Shared types used across control plane trait definitions.
// ABOUTME: Stack descriptions, pool facts, cluster members and service status records.

use super::stack::StackError;
use crate::types::{InstanceId, MemberArn, PoolName, StackName};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// IAM capabilities a template may require the caller to acknowledge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    #[serde(rename = "CAPABILITY_IAM")]
    Iam,
    #[serde(rename = "CAPABILITY_NAMED_IAM")]
    NamedIam,
    #[serde(rename = "CAPABILITY_AUTO_EXPAND")]
    AutoExpand,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Iam => "CAPABILITY_IAM",
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
            Capability::AutoExpand => "CAPABILITY_AUTO_EXPAND",
        }
    }
}

/// Lifecycle status reported for a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackStatus {
    CreateInProgress,
    CreateComplete,
    CreateFailed,
    RollbackInProgress,
    RollbackComplete,
    RollbackFailed,
    UpdateInProgress,
    UpdateCompleteCleanupInProgress,
    UpdateComplete,
    UpdateFailed,
    UpdateRollbackInProgress,
    UpdateRollbackFailed,
    UpdateRollbackCompleteCleanupInProgress,
    UpdateRollbackComplete,
    DeleteInProgress,
    DeleteComplete,
    DeleteFailed,
    /// Any status this crate does not model explicitly (imports, reviews, ...).
    Other(String),
}

const STATUS_NAMES: &[(&str, StackStatus)] = &[
    ("CREATE_IN_PROGRESS", StackStatus::CreateInProgress),
    ("CREATE_COMPLETE", StackStatus::CreateComplete),
    ("CREATE_FAILED", StackStatus::CreateFailed),
    ("ROLLBACK_IN_PROGRESS", StackStatus::RollbackInProgress),
    ("ROLLBACK_COMPLETE", StackStatus::RollbackComplete),
    ("ROLLBACK_FAILED", StackStatus::RollbackFailed),
    ("UPDATE_IN_PROGRESS", StackStatus::UpdateInProgress),
    (
        "UPDATE_COMPLETE_CLEANUP_IN_PROGRESS",
        StackStatus::UpdateCompleteCleanupInProgress,
    ),
    ("UPDATE_COMPLETE", StackStatus::UpdateComplete),
    ("UPDATE_FAILED", StackStatus::UpdateFailed),
    ("UPDATE_ROLLBACK_IN_PROGRESS", StackStatus::UpdateRollbackInProgress),
    ("UPDATE_ROLLBACK_FAILED", StackStatus::UpdateRollbackFailed),
    (
        "UPDATE_ROLLBACK_COMPLETE_CLEANUP_IN_PROGRESS",
        StackStatus::UpdateRollbackCompleteCleanupInProgress,
    ),
    ("UPDATE_ROLLBACK_COMPLETE", StackStatus::UpdateRollbackComplete),
    ("DELETE_IN_PROGRESS", StackStatus::DeleteInProgress),
    ("DELETE_COMPLETE", StackStatus::DeleteComplete),
    ("DELETE_FAILED", StackStatus::DeleteFailed),
];

impl StackStatus {
    pub fn parse(value: &str) -> Self {
        STATUS_NAMES
            .iter()
            .find(|(name, _)| *name == value)
            .map(|(_, status)| status.clone())
            .unwrap_or_else(|| StackStatus::Other(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        match self {
            StackStatus::Other(s) => s,
            known => STATUS_NAMES
                .iter()
                .find(|(_, status)| status == known)
                .map(|(name, _)| *name)
                .unwrap_or("UNKNOWN"),
        }
    }

    /// The control plane is still working on the stack.
    pub fn is_in_progress(&self) -> bool {
        self.as_str().ends_with("_IN_PROGRESS")
    }

    /// Statuses a deployment refuses to build on until an operator fixes the stack.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(
            self,
            StackStatus::CreateFailed
                | StackStatus::UpdateFailed
                | StackStatus::DeleteFailed
                | StackStatus::UpdateRollbackComplete
        )
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single declared output of a stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutput {
    pub key: String,
    pub value: String,
}

/// The outputs of one stack, in the order the control plane reported them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackOutputs(Vec<StackOutput>);

impl StackOutputs {
    pub fn new(outputs: Vec<StackOutput>) -> Self {
        Self(outputs)
    }

    /// Value of `key`. Missing or duplicated keys are errors.
    pub fn get(&self, stack: &StackName, key: &str) -> Result<&str, StackError> {
        let mut matches = self.0.iter().filter(|o| o.key == key);
        let found = matches.next().ok_or_else(|| StackError::MissingOutput {
            stack: stack.to_string(),
            key: key.to_string(),
        })?;
        if matches.next().is_some() {
            return Err(StackError::AmbiguousOutput {
                stack: stack.to_string(),
                key: key.to_string(),
            });
        }
        Ok(&found.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StackOutput> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for StackOutputs {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| StackOutput { key, value })
                .collect(),
        )
    }
}

/// What the control plane knows about a deployed stack.
#[derive(Debug, Clone)]
pub struct StackDescription {
    pub name: StackName,
    pub status: StackStatus,
    pub outputs: StackOutputs,
    /// Parameter values the stack was last deployed with.
    pub parameters: BTreeMap<String, String>,
    pub tags: BTreeMap<String, String>,
}

/// Capacity facts of an auto scaling group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePool {
    pub name: PoolName,
    pub desired_capacity: u32,
    pub min_size: u32,
    pub max_size: u32,
    pub instances: Vec<InstanceId>,
}

/// Registration status of a cluster member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberStatus {
    Active,
    Draining,
    Inactive,
    Other(String),
}

impl MemberStatus {
    pub fn parse(value: &str) -> Self {
        match value {
            "ACTIVE" => MemberStatus::Active,
            "DRAINING" => MemberStatus::Draining,
            "INACTIVE" => MemberStatus::Inactive,
            other => MemberStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberStatus::Active => f.write_str("ACTIVE"),
            MemberStatus::Draining => f.write_str("DRAINING"),
            MemberStatus::Inactive => f.write_str("INACTIVE"),
            MemberStatus::Other(s) => f.write_str(s),
        }
    }
}

/// A container host registered with a cluster.
#[derive(Debug, Clone)]
pub struct ClusterMember {
    pub arn: MemberArn,
    pub instance_id: InstanceId,
    pub status: MemberStatus,
    pub attributes: BTreeMap<String, String>,
    pub running_tasks: u32,
}

/// One custom attribute to set on a cluster member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeUpdate {
    pub member: MemberArn,
    pub key: String,
    pub value: String,
}

/// Most recent event the scheduler recorded for a service.
#[derive(Debug, Clone)]
pub struct ServiceEvent {
    pub created_at: DateTime<Utc>,
    pub message: String,
}

/// Scheduler view of a long-running service.
#[derive(Debug, Clone)]
pub struct ServiceStatus {
    pub name: String,
    pub running_count: u32,
    pub desired_count: u32,
    pub last_event: Option<ServiceEvent>,
}

impl ServiceStatus {
    pub fn is_steady(&self) -> bool {
        self.running_count == self.desired_count
    }
}
