// ABOUTME: Configuration types and parsing for stackswap.yml.
// ABOUTME: Handles YAML parsing, input interpolation, and environment merging.

mod deserialize;
mod input_value;
mod timing;

pub use input_value::{InputValue, resolve_inputs};
pub use timing::{PollConfig, TimingConfig};

use crate::control_plane::{AwsSettings, Capability};
use crate::deploy::{
    DEFAULT_AUTO_SCALING_GROUP_OUTPUT, DEFAULT_CLUSTER_OUTPUT, DeployStrategy, DeploymentTarget,
    TargetSettings,
};
use crate::error::{Error, Result};
use crate::types::StackName;
use deserialize::deserialize_stack_name_option;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "stackswap.yml";
pub const CONFIG_FILENAME_ALT: &str = "stackswap.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".stackswap/config.yml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Environment used when none is named on the command line.
    #[serde(default = "default_environment")]
    pub environment: String,

    #[serde(default)]
    pub aws: AwsSettings,

    #[serde(default)]
    pub timing: TimingConfig,

    pub components: BTreeMap<String, ComponentConfig>,

    #[serde(default)]
    pub environments: BTreeMap<String, EnvironmentOverrides>,

    /// Directory relative paths (templates, policies) are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentConfig {
    /// Path to the stack template.
    pub template: PathBuf,

    /// Base stack name; defaults to `<environment>-<component>`.
    #[serde(default, deserialize_with = "deserialize_stack_name_option")]
    pub stack_name: Option<StackName>,

    #[serde(default)]
    pub strategy: DeployStrategy,

    #[serde(default)]
    pub inputs: BTreeMap<String, InputValue>,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub capabilities: Vec<Capability>,

    #[serde(default)]
    pub notification_arns: Vec<String>,

    #[serde(default)]
    pub settings: ComponentSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComponentSettings {
    #[serde(default = "default_auto_scaling_group_output")]
    pub auto_scaling_group_output: String,

    #[serde(default = "default_cluster_output")]
    pub cluster_output: String,

    #[serde(default)]
    pub keep_previous_stack: bool,

    #[serde(default)]
    pub size_parameters: Vec<String>,

    #[serde(default = "default_disable_rollback")]
    pub disable_rollback: bool,

    #[serde(default)]
    pub stack_policy: Option<PathBuf>,

    #[serde(default)]
    pub stack_policy_during_update: Option<PathBuf>,
}

impl Default for ComponentSettings {
    fn default() -> Self {
        ComponentSettings {
            auto_scaling_group_output: default_auto_scaling_group_output(),
            cluster_output: default_cluster_output(),
            keep_previous_stack: false,
            size_parameters: Vec::new(),
            disable_rollback: default_disable_rollback(),
            stack_policy: None,
            stack_policy_during_update: None,
        }
    }
}

/// Per-environment values merged over every component.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EnvironmentOverrides {
    #[serde(default)]
    pub inputs: BTreeMap<String, InputValue>,

    #[serde(default)]
    pub tags: BTreeMap<String, String>,

    #[serde(default)]
    pub notification_arns: Option<Vec<String>>,
}

fn default_environment() -> String {
    "default".to_string()
}

fn default_auto_scaling_group_output() -> String {
    DEFAULT_AUTO_SCALING_GROUP_OUTPUT.to_string()
}

fn default_cluster_output() -> String {
    DEFAULT_CLUSTER_OUTPUT.to_string()
}

fn default_disable_rollback() -> bool {
    true
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Find the first config file in `dir` and load it. Relative paths in it
    /// resolve against the directory holding the file, as with [`Config::load`].
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Reject configurations that would only fail later, mid-deployment.
    fn validate(&self) -> Result<()> {
        if self.components.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one component is required".to_string(),
            ));
        }

        for (name, component) in &self.components {
            if component.stack_name.is_none() {
                base_stack_name(&self.environment, name)?;
            }
            if component.settings.auto_scaling_group_output.is_empty()
                || component.settings.cluster_output.is_empty()
            {
                return Err(Error::InvalidConfig(format!(
                    "component {name}: output keys cannot be empty"
                )));
            }
        }

        Ok(())
    }

    pub fn component(&self, name: &str) -> Result<&ComponentConfig> {
        self.components
            .get(name)
            .ok_or_else(|| Error::UnknownComponent(name.to_string()))
    }

    /// Resolve a path from the configuration against the config's directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Read the template body of a component.
    pub fn load_template(&self, component: &str) -> Result<String> {
        let path = self.resolve_path(&self.component(component)?.template);
        Ok(std::fs::read_to_string(path)?)
    }

    /// Build the deployment target for `component` in `environment`
    /// (the configured default when `None`).
    pub fn target(&self, component: &str, environment: Option<&str>) -> Result<DeploymentTarget> {
        let config = self.component(component)?;
        let environment = environment.unwrap_or(&self.environment);

        let overrides = match self.environments.get(environment) {
            Some(overrides) => overrides.clone(),
            None if environment == self.environment => EnvironmentOverrides::default(),
            None => return Err(Error::UnknownEnvironment(environment.to_string())),
        };

        let stack_name = match &config.stack_name {
            Some(name) => name.clone(),
            None => base_stack_name(environment, component)?,
        };

        // Deep merge inputs and tags, environment wins
        let mut inputs = config.inputs.clone();
        inputs.extend(overrides.inputs);
        let mut tags = config.tags.clone();
        tags.extend(overrides.tags);

        let settings = &config.settings;
        Ok(DeploymentTarget {
            component: component.to_string(),
            environment: environment.to_string(),
            stack_name,
            inputs: resolve_inputs(&inputs)?,
            tags,
            capabilities: config.capabilities.clone(),
            notification_arns: overrides
                .notification_arns
                .unwrap_or_else(|| config.notification_arns.clone()),
            strategy: config.strategy,
            settings: TargetSettings {
                auto_scaling_group_output: settings.auto_scaling_group_output.clone(),
                cluster_output: settings.cluster_output.clone(),
                keep_previous_stack: settings.keep_previous_stack,
                size_parameters: settings.size_parameters.clone(),
                disable_rollback: settings.disable_rollback,
                stack_policy: self.read_policy(settings.stack_policy.as_deref())?,
                stack_policy_during_update: self
                    .read_policy(settings.stack_policy_during_update.as_deref())?,
            },
        })
    }

    fn read_policy(&self, path: Option<&Path>) -> Result<Option<String>> {
        path.map(|p| std::fs::read_to_string(self.resolve_path(p)))
            .transpose()
            .map_err(Error::from)
    }
}

fn base_stack_name(environment: &str, component: &str) -> Result<StackName> {
    StackName::new(&format!("{environment}-{component}")).map_err(|e| {
        Error::InvalidConfig(format!(
            "component {component} in {environment}: {e}; set stack_name explicitly"
        ))
    })
}
