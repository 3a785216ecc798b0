// ABOUTME: Control plane implementation that drives the aws command-line tool.
// ABOUTME: Runs `aws <service> <operation> --output json` and parses the response.

mod cluster;
mod error;
mod responses;
mod scaling;
mod stack;

pub use error::AwsCliError;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use snafu::{ResultExt, ensure};
use std::process::Stdio;
use tokio::process::Command;

use error::{FailedSnafu, ParseSnafu, SpawnSnafu};

/// How to invoke the aws command-line tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AwsSettings {
    /// Named profile (`--profile`); the tool's default chain when unset.
    #[serde(default)]
    pub profile: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    /// Executable to run.
    #[serde(default = "default_binary")]
    pub binary: String,
}

fn default_binary() -> String {
    "aws".to_string()
}

impl Default for AwsSettings {
    fn default() -> Self {
        AwsSettings {
            profile: None,
            region: None,
            binary: default_binary(),
        }
    }
}

/// Control plane backed by the aws command-line tool.
#[derive(Debug, Clone)]
pub struct AwsCli {
    settings: AwsSettings,
}

impl AwsCli {
    pub fn new(settings: AwsSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &AwsSettings {
        &self.settings
    }

    /// Run one operation and return its standard output.
    async fn run(
        &self,
        service: &str,
        operation: &str,
        args: &[String],
    ) -> Result<Vec<u8>, AwsCliError> {
        let name = format!("{service} {operation}");
        let mut command = Command::new(&self.settings.binary);
        command
            .arg(service)
            .arg(operation)
            .args(args)
            .args(["--output", "json"]);
        if let Some(profile) = &self.settings.profile {
            command.args(["--profile", profile.as_str()]);
        }
        if let Some(region) = &self.settings.region {
            command.args(["--region", region.as_str()]);
        }

        tracing::debug!(operation = %name, "running {}", self.settings.binary);

        let output = command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context(SpawnSnafu {
                binary: self.settings.binary.clone(),
                operation: name.clone(),
            })?;

        ensure!(
            output.status.success(),
            FailedSnafu {
                operation: name,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
        );

        Ok(output.stdout)
    }

    /// Run one operation and parse its JSON response.
    async fn json<T: DeserializeOwned>(
        &self,
        service: &str,
        operation: &str,
        args: &[String],
    ) -> Result<T, AwsCliError> {
        let stdout = self.run(service, operation, args).await?;
        serde_json::from_slice(&stdout).context(ParseSnafu {
            operation: format!("{service} {operation}"),
        })
    }
}

/// `--flag value` as owned arguments.
fn flag(name: &str, value: impl Into<String>) -> [String; 2] {
    [name.to_string(), value.into()]
}
