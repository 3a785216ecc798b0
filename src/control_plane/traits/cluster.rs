// ABOUTME: Cluster membership operations trait for the container scheduler.
// ABOUTME: List members, tag them, drain them and inspect tasks and services.

use super::shared_types::{AttributeUpdate, ClusterMember, ServiceStatus};
use crate::types::{ClusterName, MemberArn, TaskArn};
use async_trait::async_trait;
use nonempty::NonEmpty;

/// Container cluster operations.
#[async_trait]
pub trait ClusterOps: Send + Sync {
    /// Every container instance registered with the cluster.
    async fn list_members(&self, cluster: &ClusterName) -> Result<Vec<ClusterMember>, ClusterError>;

    /// Set custom attributes on members.
    async fn set_attributes(
        &self,
        cluster: &ClusterName,
        updates: &NonEmpty<AttributeUpdate>,
    ) -> Result<(), ClusterError>;

    /// Put members into DRAINING so the scheduler moves their tasks elsewhere.
    async fn drain(
        &self,
        cluster: &ClusterName,
        members: &NonEmpty<MemberArn>,
    ) -> Result<(), ClusterError>;

    /// Tasks currently placed on a member.
    async fn tasks_on(
        &self,
        cluster: &ClusterName,
        member: &MemberArn,
    ) -> Result<Vec<TaskArn>, ClusterError>;

    /// Scheduler-managed services in the cluster.
    async fn list_services(&self, cluster: &ClusterName) -> Result<Vec<ServiceStatus>, ClusterError>;
}

/// Errors from cluster operations.
#[derive(Debug, thiserror::Error)]
pub enum ClusterError {
    #[error("cluster not found: {0}")]
    NotFound(String),

    #[error("control plane error: {0}")]
    ControlPlane(String),
}
