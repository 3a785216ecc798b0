// ABOUTME: ClusterOps implementation on top of `aws ecs`.
// ABOUTME: Batches requests to stay within the per-call limits of each operation.

use async_trait::async_trait;
use nonempty::NonEmpty;
use serde_json::json;

use super::responses::{
    DescribeContainerInstances, DescribeServices, ListContainerInstances, ListServices, ListTasks,
};
use super::{AwsCli, flag};
use crate::control_plane::{
    AttributeUpdate, ClusterError, ClusterMember, ClusterOps, ServiceStatus,
};
use crate::types::{ClusterName, MemberArn, TaskArn};

const SERVICE: &str = "ecs";

/// Container instances per describe call.
const DESCRIBE_INSTANCES_BATCH: usize = 100;
/// Attributes per put-attributes call.
const ATTRIBUTES_BATCH: usize = 10;
/// Container instances per state update call.
const DRAIN_BATCH: usize = 10;
/// Services per describe call.
const DESCRIBE_SERVICES_BATCH: usize = 10;

fn cluster_args(cluster: &ClusterName) -> Vec<String> {
    flag("--cluster", cluster.as_str()).to_vec()
}

#[async_trait]
impl ClusterOps for AwsCli {
    async fn list_members(&self, cluster: &ClusterName) -> Result<Vec<ClusterMember>, ClusterError> {
        let listed: ListContainerInstances = self
            .json(SERVICE, "list-container-instances", &cluster_args(cluster))
            .await?;

        let mut members = Vec::with_capacity(listed.container_instance_arns.len());
        for batch in listed.container_instance_arns.chunks(DESCRIBE_INSTANCES_BATCH) {
            let mut args = cluster_args(cluster);
            args.push("--container-instances".to_string());
            args.extend(batch.iter().cloned());
            let described: DescribeContainerInstances = self
                .json(SERVICE, "describe-container-instances", &args)
                .await?;
            members.extend(
                described
                    .container_instances
                    .into_iter()
                    .map(|instance| instance.into_member()),
            );
        }
        Ok(members)
    }

    async fn set_attributes(
        &self,
        cluster: &ClusterName,
        updates: &NonEmpty<AttributeUpdate>,
    ) -> Result<(), ClusterError> {
        let updates: Vec<_> = updates.iter().collect();
        for batch in updates.chunks(ATTRIBUTES_BATCH) {
            let attributes: Vec<_> = batch
                .iter()
                .map(|u| {
                    json!({
                        "name": u.key,
                        "value": u.value,
                        "targetType": "container-instance",
                        "targetId": u.member.as_str(),
                    })
                })
                .collect();
            let mut args = cluster_args(cluster);
            args.extend(flag("--attributes", json!(attributes).to_string()));
            self.run(SERVICE, "put-attributes", &args).await?;
        }
        Ok(())
    }

    async fn drain(
        &self,
        cluster: &ClusterName,
        members: &NonEmpty<MemberArn>,
    ) -> Result<(), ClusterError> {
        let members: Vec<_> = members.iter().collect();
        for batch in members.chunks(DRAIN_BATCH) {
            let mut args = cluster_args(cluster);
            args.push("--container-instances".to_string());
            args.extend(batch.iter().map(|m| m.to_string()));
            args.extend(flag("--status", "DRAINING"));
            self.run(SERVICE, "update-container-instances-state", &args)
                .await?;
        }
        Ok(())
    }

    async fn tasks_on(
        &self,
        cluster: &ClusterName,
        member: &MemberArn,
    ) -> Result<Vec<TaskArn>, ClusterError> {
        let mut args = cluster_args(cluster);
        args.extend(flag("--container-instance", member.as_str()));
        let listed: ListTasks = self.json(SERVICE, "list-tasks", &args).await?;
        Ok(listed.task_arns.into_iter().map(TaskArn::new).collect())
    }

    async fn list_services(&self, cluster: &ClusterName) -> Result<Vec<ServiceStatus>, ClusterError> {
        let listed: ListServices = self
            .json(SERVICE, "list-services", &cluster_args(cluster))
            .await?;

        let mut services = Vec::with_capacity(listed.service_arns.len());
        for batch in listed.service_arns.chunks(DESCRIBE_SERVICES_BATCH) {
            let mut args = cluster_args(cluster);
            args.push("--services".to_string());
            args.extend(batch.iter().cloned());
            let described: DescribeServices =
                self.json(SERVICE, "describe-services", &args).await?;
            services.extend(
                described
                    .services
                    .into_iter()
                    .map(|service| service.into_status()),
            );
        }
        Ok(services)
    }
}
