// ABOUTME: Workload transfer off the legacy instance pool, one member at a time.
// ABOUTME: Marks legacy members pre-drain, then drains each and waits for its tasks to leave.

use nonempty::NonEmpty;
use serde::Serialize;

use crate::control_plane::{AttributeUpdate, ClusterError, ClusterOps, MemberStatus};
use crate::diagnostics::{Diagnostics, Warning};
use crate::types::{ClusterName, InstanceId, MemberArn};

use super::error::DeployError;
use super::poll::{Condition, Poller};

/// Attribute placement constraints can use to steer new work away from legacy members.
pub const PRE_DRAIN_ATTRIBUTE: &str = "custom.state";
pub const PRE_DRAIN_VALUE: &str = "pre-drain";

/// Adaptive drain budget rule: every strict decrease in a member's task count
/// between consecutive observations earns `extension` more attempts.
#[derive(Debug, Clone)]
pub struct DrainProgress {
    extension: u32,
    last: Option<u32>,
}

impl DrainProgress {
    pub fn new(extension: u32) -> Self {
        Self {
            extension,
            last: None,
        }
    }

    /// Record a task count and return the attempts it earns.
    pub fn observe(&mut self, tasks: u32) -> u32 {
        let earned = match self.last {
            Some(previous) if tasks < previous => self.extension,
            _ => 0,
        };
        self.last = Some(tasks);
        earned
    }

    /// Most recently observed task count.
    pub fn last(&self) -> Option<u32> {
        self.last
    }
}

struct TasksDrained<'a, C: ?Sized> {
    cluster_ops: &'a C,
    cluster: &'a ClusterName,
    member: &'a MemberArn,
    progress: DrainProgress,
    earned: u32,
}

impl<C: ClusterOps + ?Sized> Condition for TasksDrained<'_, C> {
    type Error = ClusterError;

    async fn check(&mut self) -> Result<bool, ClusterError> {
        let tasks = self.cluster_ops.tasks_on(self.cluster, self.member).await?;
        let count = u32::try_from(tasks.len()).unwrap_or(u32::MAX);
        self.earned = self.progress.observe(count);
        tracing::info!(member = %self.member, tasks = count, "waiting for tasks to drain");
        Ok(count == 0)
    }

    fn extend_budget(&mut self) -> u32 {
        std::mem::take(&mut self.earned)
    }
}

/// What the transfer did to the legacy members.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    /// Members tagged pre-drain.
    pub marked: usize,
    /// Members drained to zero tasks.
    pub drained: Vec<MemberArn>,
    /// Members left alone because they were not ACTIVE.
    pub skipped: Vec<MemberArn>,
}

/// Drain every legacy member of `cluster` whose instance belongs to `legacy_instances`.
///
/// Members are drained sequentially; the first member that still has tasks
/// after its (possibly extended) budget aborts the transfer.
pub async fn transfer_workloads<C: ClusterOps + ?Sized>(
    cluster_ops: &C,
    cluster: &ClusterName,
    legacy_instances: &[InstanceId],
    poller: &Poller,
    extension: u32,
    diagnostics: &mut Diagnostics,
) -> Result<TransferSummary, DeployError> {
    let legacy: Vec<_> = cluster_ops
        .list_members(cluster)
        .await?
        .into_iter()
        .filter(|m| legacy_instances.contains(&m.instance_id))
        .collect();

    let mut summary = TransferSummary::default();

    let updates: Vec<AttributeUpdate> = legacy
        .iter()
        .map(|m| AttributeUpdate {
            member: m.arn.clone(),
            key: PRE_DRAIN_ATTRIBUTE.to_string(),
            value: PRE_DRAIN_VALUE.to_string(),
        })
        .collect();

    let Some(updates) = NonEmpty::from_vec(updates) else {
        diagnostics.warn(Warning::nothing_to_drain(format!(
            "no members of cluster {cluster} belong to the legacy pool"
        )));
        return Ok(summary);
    };

    tracing::info!(%cluster, members = updates.len(), "marking legacy members {PRE_DRAIN_VALUE}");
    cluster_ops.set_attributes(cluster, &updates).await?;
    summary.marked = updates.len();

    for member in &legacy {
        if member.status != MemberStatus::Active {
            diagnostics.warn(Warning::member_skipped(format!(
                "skipping {} ({}): status is {}",
                member.arn, member.instance_id, member.status
            )));
            summary.skipped.push(member.arn.clone());
            continue;
        }

        tracing::info!(member = %member.arn, instance = %member.instance_id, "draining");
        cluster_ops
            .drain(cluster, &NonEmpty::new(member.arn.clone()))
            .await?;

        let mut condition = TasksDrained {
            cluster_ops,
            cluster,
            member: &member.arn,
            progress: DrainProgress::new(extension),
            earned: 0,
        };
        let drained = poller
            .until(&format!("{} to drain", member.arn), &mut condition)
            .await?;

        if !drained {
            return Err(DeployError::DrainTimeout {
                member: member.arn.to_string(),
                remaining: condition.progress.last().unwrap_or_default(),
            });
        }
        summary.drained.push(member.arn.clone());
    }

    Ok(summary)
}
