// ABOUTME: Deployment strategy selection and the update-versus-replace decision table.
// ABOUTME: Maps a ChangeSet to the action a deployment run will take.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::change::ChangeSet;

/// How a component's stack is rolled forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
pub enum DeployStrategy {
    /// Update in place when only sizes or tags change, replace otherwise.
    #[default]
    #[serde(rename = "ecs-replace-when-necessary")]
    #[value(name = "ecs-replace-when-necessary")]
    ReplaceWhenNecessary,

    /// Always build a fresh sibling stack and migrate onto it.
    #[serde(rename = "ecs-replace-always")]
    #[value(name = "ecs-replace-always")]
    ReplaceAlways,
}

impl fmt::Display for DeployStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployStrategy::ReplaceWhenNecessary => f.write_str("ecs-replace-when-necessary"),
            DeployStrategy::ReplaceAlways => f.write_str("ecs-replace-always"),
        }
    }
}

/// What a deployment run does to the component's stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    /// No stack exists yet: create the first one.
    Create,
    /// Nothing differs from the live stack.
    Noop,
    /// Update the live stack in place.
    Update,
    /// Create a sibling stack, migrate workloads, retire the live stack.
    Replace,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Create => "create",
            Action::Noop => "no-op",
            Action::Update => "update in place",
            Action::Replace => "replace",
        };
        f.write_str(name)
    }
}

impl DeployStrategy {
    /// Decide the action for a live stack given what changed.
    pub fn decide(&self, change: &ChangeSet, size_parameters: &[String]) -> Action {
        match self {
            DeployStrategy::ReplaceAlways => Action::Replace,
            DeployStrategy::ReplaceWhenNecessary => {
                if change.template_changed {
                    Action::Replace
                } else if change.inputs_changed() {
                    if change.only_resizes(size_parameters) {
                        Action::Update
                    } else {
                        Action::Replace
                    }
                } else if change.tags_changed {
                    Action::Update
                } else {
                    Action::Noop
                }
            }
        }
    }
}
