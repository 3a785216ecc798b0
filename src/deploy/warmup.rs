// ABOUTME: Capacity warm-up of the new instance pool before workloads move.
// ABOUTME: Raises desired capacity to the old pool's demand and waits for healthy instances.

use serde::Serialize;

use crate::control_plane::{ResourcePool, ScalingError, ScalingOps};
use crate::types::PoolName;

use super::error::DeployError;
use super::poll::{Condition, Poller};

/// Capacity the new pool must reach: the old pool's desired capacity clamped
/// into the new pool's size bounds.
pub fn target_capacity(existing: &ResourcePool, new: &ResourcePool) -> u32 {
    existing
        .desired_capacity
        .max(new.min_size)
        .min(new.max_size)
}

/// Outcome of a successful warm-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WarmUp {
    pub target: u32,
    /// Desired capacity before it was raised, if it was.
    pub raised_from: Option<u32>,
}

struct HealthyCapacity<'a, S: ?Sized> {
    scaling: &'a S,
    pool: &'a PoolName,
    target: u32,
    healthy: u32,
}

impl<S: ScalingOps + ?Sized> Condition for HealthyCapacity<'_, S> {
    type Error = ScalingError;

    async fn check(&mut self) -> Result<bool, ScalingError> {
        self.healthy = self.scaling.healthy_count(self.pool).await?;
        tracing::info!(
            pool = %self.pool,
            healthy = self.healthy,
            target = self.target,
            "waiting for healthy capacity"
        );
        Ok(self.healthy >= self.target)
    }
}

/// Bring `new_pool` up to the capacity `existing_pool` is serving with.
///
/// Capacity is only ever raised here. Running out of attempts is fatal and
/// leaves the new pool as it is.
pub async fn warm_up<S: ScalingOps + ?Sized>(
    scaling: &S,
    existing_pool: &PoolName,
    new_pool: &PoolName,
    poller: &Poller,
) -> Result<WarmUp, DeployError> {
    let existing = scaling.describe_pool(existing_pool).await?;
    let new = scaling.describe_pool(new_pool).await?;
    let target = target_capacity(&existing, &new);

    let raised_from = if new.desired_capacity < target {
        tracing::info!(
            pool = %new_pool,
            from = new.desired_capacity,
            to = target,
            "raising desired capacity"
        );
        scaling.set_desired_capacity(new_pool, target).await?;
        Some(new.desired_capacity)
    } else {
        None
    };

    let mut condition = HealthyCapacity {
        scaling,
        pool: new_pool,
        target,
        healthy: 0,
    };
    let ready = poller
        .until(
            &format!("{target} healthy instance(s) in {new_pool}"),
            &mut condition,
        )
        .await?;

    if !ready {
        return Err(DeployError::CapacityNotReady {
            pool: new_pool.to_string(),
            target,
            healthy: condition.healthy,
        });
    }

    Ok(WarmUp {
        target,
        raised_from,
    })
}
