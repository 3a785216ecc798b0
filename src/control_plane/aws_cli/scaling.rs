// ABOUTME: ScalingOps implementation on top of `aws autoscaling`.
// ABOUTME: Healthy capacity counts in-service instances that pass health checks.

use async_trait::async_trait;

use super::responses::DescribeAutoScalingGroups;
use super::{AwsCli, flag};
use crate::control_plane::{ResourcePool, ScalingError, ScalingOps};
use crate::types::PoolName;

const SERVICE: &str = "autoscaling";

impl AwsCli {
    async fn describe_groups(
        &self,
        names: &[PoolName],
    ) -> Result<DescribeAutoScalingGroups, ScalingError> {
        let mut args = vec!["--auto-scaling-group-names".to_string()];
        args.extend(names.iter().map(|n| n.to_string()));
        Ok(self
            .json(SERVICE, "describe-auto-scaling-groups", &args)
            .await?)
    }
}

#[async_trait]
impl ScalingOps for AwsCli {
    async fn describe_pools(&self, names: &[PoolName]) -> Result<Vec<ResourcePool>, ScalingError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let response = self.describe_groups(names).await?;
        Ok(response
            .auto_scaling_groups
            .into_iter()
            .map(|group| group.into_pool())
            .collect())
    }

    async fn set_desired_capacity(
        &self,
        name: &PoolName,
        capacity: u32,
    ) -> Result<(), ScalingError> {
        let mut args = flag("--auto-scaling-group-name", name.as_str()).to_vec();
        args.extend(flag("--desired-capacity", capacity.to_string()));
        self.run(SERVICE, "set-desired-capacity", &args).await?;
        Ok(())
    }

    async fn healthy_count(&self, name: &PoolName) -> Result<u32, ScalingError> {
        let response = self.describe_groups(std::slice::from_ref(name)).await?;
        response
            .auto_scaling_groups
            .iter()
            .find(|group| group.auto_scaling_group_name == name.as_str())
            .map(|group| group.healthy_count())
            .ok_or_else(|| ScalingError::NotFound(name.to_string()))
    }
}
