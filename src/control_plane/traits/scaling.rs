// ABOUTME: Auto scaling operations trait for the infrastructure control plane.
// ABOUTME: Describe pools, raise desired capacity and count healthy instances.

use super::shared_types::ResourcePool;
use crate::types::PoolName;
use async_trait::async_trait;

/// Auto scaling group operations.
#[async_trait]
pub trait ScalingOps: Send + Sync {
    /// Describe the named pools. Unknown names are omitted from the result.
    async fn describe_pools(&self, names: &[PoolName]) -> Result<Vec<ResourcePool>, ScalingError>;

    /// Set the desired capacity of a pool.
    async fn set_desired_capacity(&self, name: &PoolName, capacity: u32)
    -> Result<(), ScalingError>;

    /// Number of in-service instances that pass their health checks.
    async fn healthy_count(&self, name: &PoolName) -> Result<u32, ScalingError>;

    /// Describe a single pool, failing when it does not exist.
    async fn describe_pool(&self, name: &PoolName) -> Result<ResourcePool, ScalingError> {
        self.describe_pools(std::slice::from_ref(name))
            .await?
            .into_iter()
            .find(|pool| &pool.name == name)
            .ok_or_else(|| ScalingError::NotFound(name.to_string()))
    }
}

/// Errors from auto scaling operations.
#[derive(Debug, thiserror::Error)]
pub enum ScalingError {
    #[error("auto scaling group not found: {0}")]
    NotFound(String),

    #[error("control plane error: {0}")]
    ControlPlane(String),
}
