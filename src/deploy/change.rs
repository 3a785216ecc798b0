// ABOUTME: Change detection between the desired and the deployed stack configuration.
// ABOUTME: Classifies template, input and tag differences without touching any resource.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// What differs between the desired configuration and the live stack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChangeSet {
    pub template_changed: bool,
    /// Input keys whose desired value differs from the deployed one.
    pub changed_inputs: BTreeSet<String>,
    pub tags_changed: bool,
    /// Parameters set on the deployed stack that the desired inputs omit.
    /// They keep their deployed value and never count as a change.
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    pub deployed_only_inputs: BTreeSet<String>,
}

impl ChangeSet {
    /// Compare deployed template/parameters/tags with desired ones.
    ///
    /// Parameters present only on the deployed stack are template defaults the
    /// desired configuration leaves alone, so they never count as changed.
    pub fn between(
        deployed_template: &str,
        deployed_inputs: &BTreeMap<String, String>,
        deployed_tags: &BTreeMap<String, String>,
        template: &str,
        inputs: &BTreeMap<String, String>,
        tags: &BTreeMap<String, String>,
    ) -> Self {
        let changed_inputs = inputs
            .iter()
            .filter(|(key, value)| deployed_inputs.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();
        let deployed_only_inputs = deployed_inputs
            .keys()
            .filter(|key| !inputs.contains_key(*key))
            .cloned()
            .collect();

        ChangeSet {
            template_changed: !templates_equivalent(deployed_template, template),
            changed_inputs,
            tags_changed: deployed_tags != tags,
            deployed_only_inputs,
        }
    }

    pub fn inputs_changed(&self) -> bool {
        !self.changed_inputs.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.template_changed && !self.inputs_changed() && !self.tags_changed
    }

    /// True when every changed input is one of `size_parameters`.
    pub fn only_resizes(&self, size_parameters: &[String]) -> bool {
        self.changed_inputs
            .iter()
            .all(|key| size_parameters.iter().any(|p| p == key))
    }
}

/// Templates are equivalent when they parse to the same document, or, when
/// either fails to parse, when their trimmed text is identical.
fn templates_equivalent(deployed: &str, desired: &str) -> bool {
    match (
        serde_yaml::from_str::<serde_yaml::Value>(deployed),
        serde_yaml::from_str::<serde_yaml::Value>(desired),
    ) {
        (Ok(a), Ok(b)) => a == b,
        _ => deployed.trim() == desired.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const TEMPLATE: &str = "Resources:\n  Group:\n    Type: AWS::AutoScaling::AutoScalingGroup\n";

    #[test]
    fn identical_configuration_is_empty() {
        let inputs = map(&[("ImageId", "ami-1")]);
        let tags = map(&[("team", "web")]);
        let change = ChangeSet::between(TEMPLATE, &inputs, &tags, TEMPLATE, &inputs, &tags);
        assert!(change.is_empty());
    }

    #[test]
    fn formatting_only_template_edits_are_not_changes() {
        let json = r#"{"Resources": {"Group": {"Type": "AWS::AutoScaling::AutoScalingGroup"}}}"#;
        let empty = BTreeMap::new();
        let change = ChangeSet::between(TEMPLATE, &empty, &empty, json, &empty, &empty);
        assert!(!change.template_changed);
    }

    #[test]
    fn unparseable_templates_fall_back_to_text() {
        let empty = BTreeMap::new();
        let change = ChangeSet::between("{ broken", &empty, &empty, "{ broken\n", &empty, &empty);
        assert!(!change.template_changed);
        let change = ChangeSet::between("{ broken", &empty, &empty, "{ other", &empty, &empty);
        assert!(change.template_changed);
    }

    #[test]
    fn changed_and_new_inputs_are_reported() {
        let deployed = map(&[("ImageId", "ami-1"), ("MinSize", "2"), ("Default", "x")]);
        let desired = map(&[("ImageId", "ami-2"), ("MinSize", "2"), ("KeyName", "ops")]);
        let empty = BTreeMap::new();

        let change = ChangeSet::between(TEMPLATE, &deployed, &empty, TEMPLATE, &desired, &empty);

        let keys: Vec<&str> = change.changed_inputs.iter().map(String::as_str).collect();
        assert_eq!(keys, ["ImageId", "KeyName"]);
        assert!(!change.template_changed);
        assert_eq!(change.deployed_only_inputs, BTreeSet::from(["Default".to_string()]));
        assert!(!change.tags_changed);
    }

    #[test]
    fn removed_input_keeps_deployed_value() {
        let deployed = map(&[("ImageId", "ami-1"), ("MinSize", "1")]);
        let desired = map(&[("MinSize", "1")]);
        let empty = BTreeMap::new();

        let change = ChangeSet::between(TEMPLATE, &deployed, &empty, TEMPLATE, &desired, &empty);

        assert!(change.is_empty());
        assert_eq!(change.deployed_only_inputs, BTreeSet::from(["ImageId".to_string()]));
    }

    #[test]
    fn classification_is_idempotent() {
        let deployed = map(&[("MinSize", "2")]);
        let desired = map(&[("MinSize", "3")]);
        let tags = map(&[("team", "web")]);
        let first = ChangeSet::between(TEMPLATE, &deployed, &tags, TEMPLATE, &desired, &tags);
        let second = ChangeSet::between(TEMPLATE, &deployed, &tags, TEMPLATE, &desired, &tags);
        assert_eq!(first, second);
    }

    #[test]
    fn only_resizes_checks_every_key() {
        let change = ChangeSet {
            changed_inputs: ["MinSize", "MaxSize"].map(String::from).into(),
            ..Default::default()
        };
        let sizes = vec!["MinSize".to_string(), "MaxSize".to_string()];
        assert!(change.only_resizes(&sizes));
        assert!(!change.only_resizes(&sizes[..1]));
    }
}
