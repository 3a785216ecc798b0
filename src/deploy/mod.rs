// ABOUTME: Blue/green deployment engine using the type state pattern.
// ABOUTME: Exports the run driver, state markers and the building blocks it sequences.

mod change;
mod deployment;
mod drain;
mod error;
mod poll;
mod report;
mod run;
mod settle;
mod slot;
mod state;
mod strategy;
mod target;
mod template;
mod transitions;
mod warmup;

pub use change::ChangeSet;
pub use deployment::Deployment;
pub use drain::{
    DrainProgress, PRE_DRAIN_ATTRIBUTE, PRE_DRAIN_VALUE, TransferSummary, transfer_workloads,
};
pub use error::{DeployError, DeployErrorKind};
pub use poll::{Condition, FnCondition, Poller};
pub use report::DeploymentReport;
pub use run::{DeployOptions, deploy};
pub use slot::{SlotError, SlotResolution, resolve_slots};
pub use state::{
    ClusterVerified, Completed, Detected, Resolved, StackCreated, Transferred, WarmedUp,
};
pub use strategy::{Action, DeployStrategy};
pub use target::{
    DEFAULT_AUTO_SCALING_GROUP_OUTPUT, DEFAULT_CLUSTER_OUTPUT, DeploymentTarget, TargetSettings,
};
pub use template::{MAX_TEMPLATE_BYTES, Template};
pub use warmup::{WarmUp, target_capacity, warm_up};
