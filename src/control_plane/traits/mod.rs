// ABOUTME: Composable capability traits for the infrastructure control plane.
// ABOUTME: Defines StackOps, ScalingOps, ClusterOps and the ControlPlane umbrella trait.

mod cluster;
mod scaling;
mod shared_types;
mod stack;

pub use cluster::{ClusterError, ClusterOps};
pub use scaling::{ScalingError, ScalingOps};
pub use shared_types::*;
pub use stack::{StackError, StackOps, StackRequest};

/// Everything a deployment run needs from the control plane.
///
/// Implemented automatically for any type providing all capabilities.
pub trait ControlPlane: StackOps + ScalingOps + ClusterOps {}

impl<T: StackOps + ScalingOps + ClusterOps> ControlPlane for T {}
