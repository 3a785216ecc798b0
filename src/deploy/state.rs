// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state carries the facts established by the transitions before it.

use crate::types::{ClusterName, PoolName, StackName};

use super::change::ChangeSet;
use super::drain::TransferSummary;
use super::strategy::Action;
use super::warmup::WarmUp;

/// Slots resolved, nothing inspected yet.
/// Available actions: `detect()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolved;

/// Deployed and desired configuration compared, action chosen.
/// Available actions: `grace_pause()`, `create_stack()`, `update_in_place()`,
/// `skip()`, `dry_run()`
#[derive(Debug, Clone)]
pub struct Detected {
    pub(crate) action: Action,
    pub(crate) change: Option<ChangeSet>,
}

impl Detected {
    pub fn action(&self) -> Action {
        self.action
    }

    /// `None` on a first deployment, where there is nothing to compare with.
    pub fn change(&self) -> Option<&ChangeSet> {
        self.change.as_ref()
    }
}

/// New stack created and settled.
/// Available actions: `complete()` (first deployment), `verify_cluster()`
#[derive(Debug, Clone)]
pub struct StackCreated {
    pub(crate) change: Option<ChangeSet>,
}

/// Both stacks report the same cluster.
/// Available actions: `warm_up()`
#[derive(Debug, Clone)]
pub struct ClusterVerified {
    pub(crate) change: Option<ChangeSet>,
    pub(crate) cluster: ClusterName,
}

/// The new pool serves at least the old pool's capacity.
/// Available actions: `transfer()`
#[derive(Debug, Clone)]
pub struct WarmedUp {
    pub(crate) change: Option<ChangeSet>,
    pub(crate) cluster: ClusterName,
    pub(crate) legacy_pool: PoolName,
    pub(crate) warm_up: WarmUp,
}

/// Every legacy member has been drained.
/// Available actions: `retire()`
#[derive(Debug, Clone)]
pub struct Transferred {
    pub(crate) change: Option<ChangeSet>,
    pub(crate) warm_up: WarmUp,
    pub(crate) transfer: TransferSummary,
}

/// Deployment finished.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) action: Action,
    pub(crate) change: Option<ChangeSet>,
    pub(crate) serving: StackName,
    pub(crate) retired: Option<StackName>,
    pub(crate) retained: Option<StackName>,
    pub(crate) warm_up: Option<WarmUp>,
    pub(crate) transfer: Option<TransferSummary>,
}

impl Completed {
    pub(crate) fn new(action: Action, change: Option<ChangeSet>, serving: StackName) -> Self {
        Completed {
            action,
            change,
            serving,
            retired: None,
            retained: None,
            warm_up: None,
            transfer: None,
        }
    }
}
