// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Validates stack names while the configuration is parsed.

use serde::Deserialize;

use crate::types::StackName;

pub fn deserialize_stack_name_option<'de, D>(deserializer: D) -> Result<Option<StackName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|s| StackName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}
