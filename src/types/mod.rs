// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to keep instance, member, task, pool and cluster IDs apart.

mod id;
mod stack_name;

pub use id::{ClusterName, Id, InstanceId, MemberArn, PoolName, ResourceKind, TaskArn};
pub use stack_name::{MAX_STACK_NAME_LEN, Slot, StackName, StackNameError};
