// ABOUTME: Template input value types with environment variable interpolation.
// ABOUTME: Handles literal scalars and references to environment variables.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Text(String),
    Number(serde_yaml::Number),
    Bool(bool),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl InputValue {
    pub fn resolve(&self) -> Result<String> {
        match self {
            InputValue::Text(s) => Ok(s.clone()),
            InputValue::Number(n) => Ok(n.to_string()),
            InputValue::Bool(b) => Ok(b.to_string()),
            InputValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| Error::MissingEnvVar(var.clone())),
            },
        }
    }
}

pub fn resolve_inputs(map: &BTreeMap<String, InputValue>) -> Result<BTreeMap<String, String>> {
    map.iter()
        .map(|(k, v)| v.resolve().map(|resolved| (k.clone(), resolved)))
        .collect()
}
