// ABOUTME: Shared deployment targets and control plane scenarios for tests.
// ABOUTME: Builds a prod/web component with live blue slot ready to be replaced.

use std::collections::BTreeMap;

use stackswap::config::TimingConfig;
use stackswap::control_plane::{MemberStatus, StackStatus};
use stackswap::deploy::{DeployOptions, DeployStrategy, DeploymentTarget, TargetSettings};
use stackswap::types::StackName;

use super::fake_control_plane::{FakeControlPlane, FakeStack};

pub const TEMPLATE_V1: &str = "Resources:\n  Group:\n    Type: AWS::AutoScaling::AutoScalingGroup\n";
pub const TEMPLATE_V2: &str = "Resources:\n  Group:\n    Type: AWS::AutoScaling::AutoScalingGroup\n  Extra:\n    Type: AWS::SNS::Topic\n";

pub const CLUSTER: &str = "prod";
pub const BLUE: &str = "prod-web-B";
pub const GREEN: &str = "prod-web-G";

pub fn name(value: &str) -> StackName {
    StackName::new(value).unwrap()
}

/// The web component in prod with `ImageId=ami-1` and a `team` tag.
pub fn target() -> DeploymentTarget {
    DeploymentTarget {
        component: "web".to_string(),
        environment: "prod".to_string(),
        stack_name: name("prod-web"),
        inputs: BTreeMap::from([
            ("ImageId".to_string(), "ami-1".to_string()),
            ("MinSize".to_string(), "1".to_string()),
        ]),
        tags: BTreeMap::from([("team".to_string(), "web".to_string())]),
        capabilities: Vec::new(),
        notification_arns: Vec::new(),
        strategy: DeployStrategy::ReplaceWhenNecessary,
        settings: TargetSettings {
            size_parameters: vec!["MinSize".to_string(), "MaxSize".to_string()],
            ..TargetSettings::default()
        },
    }
}

/// Options that never sleep.
pub fn options() -> DeployOptions {
    DeployOptions {
        dry_run: false,
        timing: TimingConfig::immediate(),
    }
}

pub fn dry_run() -> DeployOptions {
    DeployOptions {
        dry_run: true,
        ..options()
    }
}

/// A stack deployed exactly as `target()` describes it with `TEMPLATE_V1`.
pub fn deployed_stack(pool: &str) -> FakeStack {
    FakeStack::new(StackStatus::CreateComplete)
        .template(TEMPLATE_V1)
        .parameter("ImageId", "ami-1")
        .parameter("MinSize", "1")
        .tag("team", "web")
        .output("ClusterName", CLUSTER)
        .output("AutoScalingGroupName", pool)
}

/// Blue is live and unchanged; green is prepared to join the same cluster.
///
/// The blue pool has two instances: `arn-1` is active and runs tasks that
/// drain over three polls, `arn-2` is already draining. `arn-3` belongs to
/// some other pool.
pub fn replace_scenario() -> FakeControlPlane {
    FakeControlPlane::new()
        .with_stack(BLUE, deployed_stack("asg-B"))
        .prepare_stack(
            GREEN,
            FakeStack::new(StackStatus::CreateComplete)
                .output("ClusterName", CLUSTER)
                .output("AutoScalingGroupName", "asg-G"),
        )
        .with_pool("asg-B", 2, 1, 4, &["i-1", "i-2"])
        .with_pool("asg-G", 1, 1, 4, &[])
        .with_member(CLUSTER, "arn-1", "i-1", MemberStatus::Active)
        .with_member(CLUSTER, "arn-2", "i-2", MemberStatus::Draining)
        .with_member(CLUSTER, "arn-3", "i-9", MemberStatus::Active)
        .script_tasks("arn-1", &[2, 1, 0])
}
