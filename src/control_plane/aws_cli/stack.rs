// ABOUTME: StackOps implementation on top of `aws cloudformation`.
// ABOUTME: Template and policy bodies are passed inline; parameters and tags as JSON.

use async_trait::async_trait;
use serde_json::json;
use snafu::ResultExt;
use std::collections::BTreeMap;

use super::error::{AwsCliError, EncodeSnafu};
use super::responses::{DescribeStacks, GetTemplate};
use super::{AwsCli, flag};
use crate::control_plane::{
    StackDescription, StackError, StackOps, StackOutputs, StackRequest, StackStatus,
};
use crate::types::StackName;

const SERVICE: &str = "cloudformation";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Create,
    Update,
}

fn encode(operation: &str, value: &serde_json::Value) -> Result<String, AwsCliError> {
    serde_json::to_string(value).context(EncodeSnafu { operation })
}

fn request_args(request: &StackRequest, mode: Mode) -> Result<Vec<String>, AwsCliError> {
    let operation = match mode {
        Mode::Create => "create-stack",
        Mode::Update => "update-stack",
    };

    let mut args = Vec::new();
    args.extend(flag("--stack-name", request.name.as_str()));
    args.extend(flag("--template-body", request.template.as_str()));

    if !request.parameters.is_empty() {
        let parameters: Vec<_> = request
            .parameters
            .iter()
            .map(|(k, v)| json!({ "ParameterKey": k, "ParameterValue": v }))
            .collect();
        args.extend(flag("--parameters", encode(operation, &json!(parameters))?));
    }

    if !request.tags.is_empty() {
        let tags: Vec<_> = request
            .tags
            .iter()
            .map(|(k, v)| json!({ "Key": k, "Value": v }))
            .collect();
        args.extend(flag("--tags", encode(operation, &json!(tags))?));
    }

    if !request.capabilities.is_empty() {
        args.push("--capabilities".to_string());
        args.extend(request.capabilities.iter().map(|c| c.as_str().to_string()));
    }

    if !request.notification_arns.is_empty() {
        args.push("--notification-arns".to_string());
        args.extend(request.notification_arns.iter().cloned());
    }

    if let Some(policy) = &request.stack_policy {
        args.extend(flag("--stack-policy-body", policy.as_str()));
    }

    match mode {
        Mode::Create => {
            if request.disable_rollback {
                args.push("--disable-rollback".to_string());
            }
        }
        Mode::Update => {
            if let Some(policy) = &request.stack_policy_during_update {
                args.extend(flag("--stack-policy-during-update-body", policy.as_str()));
            }
        }
    }

    Ok(args)
}

#[async_trait]
impl StackOps for AwsCli {
    async fn create_stack(&self, request: &StackRequest) -> Result<(), StackError> {
        let args = request_args(request, Mode::Create)?;
        self.run(SERVICE, "create-stack", &args).await?;
        Ok(())
    }

    async fn update_stack(&self, request: &StackRequest) -> Result<(), StackError> {
        let args = request_args(request, Mode::Update)?;
        self.run(SERVICE, "update-stack", &args)
            .await
            .map_err(|e| e.into_stack_error(request.name.as_str()))?;
        Ok(())
    }

    async fn delete_stack(&self, name: &StackName) -> Result<(), StackError> {
        self.run(SERVICE, "delete-stack", &flag("--stack-name", name.as_str()))
            .await?;
        Ok(())
    }

    async fn describe_stack(&self, name: &StackName) -> Result<StackDescription, StackError> {
        let response: DescribeStacks = self
            .json(SERVICE, "describe-stacks", &flag("--stack-name", name.as_str()))
            .await
            .map_err(|e| e.into_stack_error(name.as_str()))?;

        response
            .stacks
            .into_iter()
            .filter_map(|stack| stack.into_description())
            .find(|description| &description.name == name)
            .ok_or_else(|| StackError::NotFound(name.to_string()))
    }

    async fn get_template(&self, name: &StackName) -> Result<String, StackError> {
        let mut args = flag("--stack-name", name.as_str()).to_vec();
        args.extend(flag("--template-stage", "Original"));
        let response: GetTemplate = self
            .json(SERVICE, "get-template", &args)
            .await
            .map_err(|e| e.into_stack_error(name.as_str()))?;
        Ok(response.into_body())
    }

    async fn list_all_outputs(&self) -> Result<BTreeMap<String, StackOutputs>, StackError> {
        let response: DescribeStacks = self.json(SERVICE, "describe-stacks", &[]).await?;
        Ok(response
            .stacks
            .into_iter()
            .filter(|stack| StackStatus::parse(&stack.stack_status) != StackStatus::DeleteComplete)
            .map(|stack| {
                let outputs = stack.outputs();
                (stack.stack_name, outputs)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control_plane::Capability;

    fn request() -> StackRequest {
        StackRequest {
            name: StackName::new("prod-web-G").unwrap(),
            template: "Resources: {}".to_string(),
            parameters: BTreeMap::from([("MinSize".to_string(), "2".to_string())]),
            tags: BTreeMap::from([("team".to_string(), "platform".to_string())]),
            capabilities: vec![Capability::Iam],
            notification_arns: vec!["arn:sns:events".to_string()],
            disable_rollback: true,
            stack_policy: Some("{}".to_string()),
            stack_policy_during_update: Some("{\"Statement\":[]}".to_string()),
        }
    }

    fn value_after<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
        args.iter()
            .position(|a| a == name)
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    #[test]
    fn create_passes_rollback_and_policy_but_not_update_policy() {
        let args = request_args(&request(), Mode::Create).unwrap();
        assert!(args.contains(&"--disable-rollback".to_string()));
        assert_eq!(value_after(&args, "--stack-policy-body"), Some("{}"));
        assert_eq!(value_after(&args, "--stack-policy-during-update-body"), None);
        assert_eq!(value_after(&args, "--capabilities"), Some("CAPABILITY_IAM"));
    }

    #[test]
    fn update_passes_during_update_policy_but_not_rollback() {
        let args = request_args(&request(), Mode::Update).unwrap();
        assert!(!args.contains(&"--disable-rollback".to_string()));
        assert!(value_after(&args, "--stack-policy-during-update-body").is_some());
    }

    #[test]
    fn parameters_and_tags_are_json_encoded() {
        let args = request_args(&request(), Mode::Create).unwrap();
        let parameters: serde_json::Value =
            serde_json::from_str(value_after(&args, "--parameters").unwrap()).unwrap();
        assert_eq!(parameters[0]["ParameterKey"], "MinSize");
        assert_eq!(parameters[0]["ParameterValue"], "2");

        let tags: serde_json::Value =
            serde_json::from_str(value_after(&args, "--tags").unwrap()).unwrap();
        assert_eq!(tags[0]["Key"], "team");
    }
}
