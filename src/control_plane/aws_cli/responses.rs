// ABOUTME: JSON records returned by the aws command-line tool.
// ABOUTME: Parsed at the boundary and converted into the control plane's typed records.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::control_plane::{
    ClusterMember, MemberStatus, ResourcePool, ServiceEvent, ServiceStatus, StackDescription,
    StackOutputs, StackStatus,
};
use crate::types::{InstanceId, MemberArn, PoolName, StackName};

// =============================================================================
// CloudFormation
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DescribeStacks {
    #[serde(default)]
    pub stacks: Vec<Stack>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Stack {
    pub stack_name: String,
    pub stack_status: String,
    #[serde(default)]
    pub outputs: Vec<Output>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Output {
    pub output_key: String,
    pub output_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Parameter {
    pub parameter_key: String,
    #[serde(default)]
    pub parameter_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct Tag {
    pub key: String,
    pub value: String,
}

impl Stack {
    pub fn outputs(&self) -> StackOutputs {
        self.outputs
            .iter()
            .map(|o| (o.output_key.clone(), o.output_value.clone()))
            .collect()
    }

    /// Stacks whose names are not valid stack names (never deployed by
    /// this tool) yield `None`.
    pub fn into_description(self) -> Option<StackDescription> {
        let name = StackName::new(&self.stack_name).ok()?;
        Some(StackDescription {
            status: StackStatus::parse(&self.stack_status),
            outputs: self.outputs(),
            parameters: self
                .parameters
                .into_iter()
                .map(|p| (p.parameter_key, p.parameter_value))
                .collect(),
            tags: self.tags.into_iter().map(|t| (t.key, t.value)).collect(),
            name,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GetTemplate {
    pub template_body: Value,
}

impl GetTemplate {
    /// YAML templates come back as a string, JSON templates as a document.
    pub fn into_body(self) -> String {
        match self.template_body {
            Value::String(body) => body,
            document => document.to_string(),
        }
    }
}

// =============================================================================
// Auto Scaling
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct DescribeAutoScalingGroups {
    #[serde(default)]
    pub auto_scaling_groups: Vec<AutoScalingGroup>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct AutoScalingGroup {
    pub auto_scaling_group_name: String,
    pub min_size: u32,
    pub max_size: u32,
    pub desired_capacity: u32,
    #[serde(default)]
    pub instances: Vec<GroupInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct GroupInstance {
    pub instance_id: String,
    pub lifecycle_state: String,
    pub health_status: String,
}

impl GroupInstance {
    pub fn is_healthy(&self) -> bool {
        self.lifecycle_state == "InService" && self.health_status == "Healthy"
    }
}

impl AutoScalingGroup {
    pub fn healthy_count(&self) -> u32 {
        let healthy = self.instances.iter().filter(|i| i.is_healthy()).count();
        u32::try_from(healthy).unwrap_or(u32::MAX)
    }

    pub fn into_pool(self) -> ResourcePool {
        ResourcePool {
            name: PoolName::new(self.auto_scaling_group_name),
            desired_capacity: self.desired_capacity,
            min_size: self.min_size,
            max_size: self.max_size,
            instances: self
                .instances
                .into_iter()
                .map(|i| InstanceId::new(i.instance_id))
                .collect(),
        }
    }
}

// =============================================================================
// ECS
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListContainerInstances {
    #[serde(default)]
    pub container_instance_arns: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DescribeContainerInstances {
    #[serde(default)]
    pub container_instances: Vec<ContainerInstance>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContainerInstance {
    pub container_instance_arn: String,
    #[serde(default)]
    pub ec2_instance_id: String,
    pub status: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub running_tasks_count: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: Option<String>,
}

impl ContainerInstance {
    pub fn into_member(self) -> ClusterMember {
        ClusterMember {
            arn: MemberArn::new(self.container_instance_arn),
            instance_id: InstanceId::new(self.ec2_instance_id),
            status: MemberStatus::parse(&self.status),
            attributes: self
                .attributes
                .into_iter()
                .map(|a| (a.name, a.value.unwrap_or_default()))
                .collect::<BTreeMap<_, _>>(),
            running_tasks: self.running_tasks_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListTasks {
    #[serde(default)]
    pub task_arns: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListServices {
    #[serde(default)]
    pub service_arns: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DescribeServices {
    #[serde(default)]
    pub services: Vec<Service>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Service {
    pub service_name: String,
    pub running_count: u32,
    pub desired_count: u32,
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Event {
    pub created_at: DateTime<Utc>,
    pub message: String,
}

impl Service {
    pub fn into_status(self) -> ServiceStatus {
        let last_event = self
            .events
            .into_iter()
            .max_by_key(|e| e.created_at)
            .map(|e| ServiceEvent {
                created_at: e.created_at,
                message: e.message,
            });
        ServiceStatus {
            name: self.service_name,
            running_count: self.running_count,
            desired_count: self.desired_count,
            last_event,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_description_collects_outputs_parameters_and_tags() {
        let json = r#"{
            "Stacks": [{
                "StackName": "prod-web-B",
                "StackStatus": "UPDATE_COMPLETE",
                "Outputs": [{"OutputKey": "ClusterName", "OutputValue": "prod"}],
                "Parameters": [{"ParameterKey": "MinSize", "ParameterValue": "2"}],
                "Tags": [{"Key": "team", "Value": "platform"}]
            }]
        }"#;
        let parsed: DescribeStacks = serde_json::from_str(json).unwrap();
        let stack = parsed.stacks.into_iter().next().unwrap();
        let description = stack.into_description().unwrap();

        assert_eq!(description.status, StackStatus::UpdateComplete);
        assert_eq!(
            description.outputs.get(&description.name, "ClusterName").unwrap(),
            "prod"
        );
        assert_eq!(description.parameters["MinSize"], "2");
        assert_eq!(description.tags["team"], "platform");
    }

    #[test]
    fn json_template_bodies_are_reserialized() {
        let parsed: GetTemplate =
            serde_json::from_str(r#"{"TemplateBody": {"Resources": {}}}"#).unwrap();
        assert_eq!(parsed.into_body(), r#"{"Resources":{}}"#);

        let parsed: GetTemplate =
            serde_json::from_str(r#"{"TemplateBody": "Resources: {}\n"}"#).unwrap();
        assert_eq!(parsed.into_body(), "Resources: {}\n");
    }

    #[test]
    fn only_in_service_healthy_instances_count() {
        let json = r#"{
            "AutoScalingGroups": [{
                "AutoScalingGroupName": "web-G",
                "MinSize": 1, "MaxSize": 10, "DesiredCapacity": 3,
                "Instances": [
                    {"InstanceId": "i-1", "LifecycleState": "InService", "HealthStatus": "Healthy"},
                    {"InstanceId": "i-2", "LifecycleState": "Pending", "HealthStatus": "Healthy"},
                    {"InstanceId": "i-3", "LifecycleState": "InService", "HealthStatus": "Unhealthy"}
                ]
            }]
        }"#;
        let parsed: DescribeAutoScalingGroups = serde_json::from_str(json).unwrap();
        let group = parsed.auto_scaling_groups.into_iter().next().unwrap();
        assert_eq!(group.healthy_count(), 1);
        assert_eq!(group.into_pool().instances.len(), 3);
    }

    #[test]
    fn service_keeps_newest_event() {
        let json = r#"{
            "services": [{
                "serviceName": "api",
                "runningCount": 2,
                "desiredCount": 3,
                "events": [
                    {"createdAt": "2024-05-01T10:05:00+00:00", "message": "newest"},
                    {"createdAt": "2024-05-01T10:00:00+00:00", "message": "older"}
                ]
            }]
        }"#;
        let parsed: DescribeServices = serde_json::from_str(json).unwrap();
        let status = parsed.services.into_iter().next().unwrap().into_status();
        assert!(!status.is_steady());
        assert_eq!(status.last_event.unwrap().message, "newest");
    }
}
