// ABOUTME: Read-only snapshot of a component's stacks, pools and services.
// ABOUTME: Backs the status command; never makes a mutating call.

use serde::Serialize;
use std::collections::BTreeSet;

use crate::control_plane::{ControlPlane, ScalingError};
use crate::deploy::{DeployError, DeploymentTarget, resolve_slots};
use crate::types::{ClusterName, PoolName, Slot, StackName};

#[derive(Debug, Clone, Serialize)]
pub struct ComponentStatus {
    pub component: String,
    pub environment: String,
    pub slots: Vec<SlotStatus>,
    /// Slot the next replacement would use; `None` when the state is ambiguous.
    pub next_slot: Option<StackName>,
    pub services: Vec<ServiceSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotStatus {
    pub stack: StackName,
    pub status: String,
    pub cluster: Option<String>,
    pub pool: Option<PoolSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolSummary {
    pub name: String,
    pub desired: u32,
    pub min: u32,
    pub max: u32,
    pub healthy: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceSummary {
    pub cluster: String,
    pub name: String,
    pub running: u32,
    pub desired: u32,
    /// Running count has reached the desired count.
    pub steady: bool,
    pub last_event: Option<String>,
}

/// Collect the live state of every slot of `target`.
pub async fn component_status<C: ControlPlane + ?Sized>(
    control_plane: &C,
    target: &DeploymentTarget,
) -> Result<ComponentStatus, DeployError> {
    let known = control_plane.list_all_outputs().await?;
    let base = &target.stack_name;

    let mut slots = Vec::new();
    let mut clusters = BTreeSet::new();
    for slot in Slot::ALL {
        let Ok(name) = base.slot(slot) else {
            continue;
        };
        if !known.contains_key(name.as_str()) {
            continue;
        }

        let description = control_plane.describe_stack(&name).await?;
        let cluster = description
            .outputs
            .get(&name, &target.settings.cluster_output)
            .ok()
            .map(str::to_string);
        let pool = match description
            .outputs
            .get(&name, &target.settings.auto_scaling_group_output)
        {
            Ok(pool) => pool_summary(control_plane, &PoolName::new(pool)).await?,
            Err(_) => None,
        };

        if let Some(cluster) = &cluster {
            clusters.insert(cluster.clone());
        }
        slots.push(SlotStatus {
            stack: name,
            status: description.status.to_string(),
            cluster,
            pool,
        });
    }

    let next_slot = resolve_slots(base, known.keys().map(String::as_str))
        .ok()
        .map(|resolution| resolution.new);

    let mut services = Vec::new();
    for cluster in clusters {
        let name = ClusterName::new(cluster.as_str());
        for service in control_plane.list_services(&name).await? {
            services.push(ServiceSummary {
                steady: service.is_steady(),
                cluster: cluster.clone(),
                name: service.name,
                running: service.running_count,
                desired: service.desired_count,
                last_event: service.last_event.map(|e| e.message),
            });
        }
    }

    Ok(ComponentStatus {
        component: target.component.clone(),
        environment: target.environment.clone(),
        slots,
        next_slot,
        services,
    })
}

async fn pool_summary<C: ControlPlane + ?Sized>(
    control_plane: &C,
    name: &PoolName,
) -> Result<Option<PoolSummary>, DeployError> {
    let pool = match control_plane.describe_pool(name).await {
        Ok(pool) => pool,
        Err(ScalingError::NotFound(_)) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let healthy = control_plane.healthy_count(name).await?;
    Ok(Some(PoolSummary {
        name: pool.name.to_string(),
        desired: pool.desired_capacity,
        min: pool.min_size,
        max: pool.max_size,
        healthy,
    }))
}
