// ABOUTME: Validated stack names and blue/green slot suffixes.
// ABOUTME: Enforces the control plane's naming rules before any API call is made.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Longest stack name the control plane accepts.
pub const MAX_STACK_NAME_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackNameError {
    #[error("stack name cannot be empty")]
    Empty,

    #[error("stack name exceeds maximum length of {MAX_STACK_NAME_LEN} characters")]
    TooLong,

    #[error("stack name must start with a letter")]
    StartsWithNonLetter,

    #[error("invalid character in stack name: '{0}'")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StackName(String);

impl StackName {
    pub fn new(value: &str) -> Result<Self, StackNameError> {
        let first = value.chars().next().ok_or(StackNameError::Empty)?;

        if value.len() > MAX_STACK_NAME_LEN {
            return Err(StackNameError::TooLong);
        }

        if !first.is_ascii_alphabetic() {
            return Err(StackNameError::StartsWithNonLetter);
        }

        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_alphanumeric() && *c != '-')
        {
            return Err(StackNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the given slot derived from this base name.
    pub fn slot(&self, slot: Slot) -> Result<StackName, StackNameError> {
        StackName::new(&format!("{}{}", self.0, slot.suffix()))
    }
}

impl fmt::Display for StackName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for StackName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One of the stack identities a component can be deployed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// Unsuffixed name left by a first deployment made before blue/green naming.
    Legacy,
    Blue,
    Green,
}

impl Slot {
    pub const ALL: [Slot; 3] = [Slot::Legacy, Slot::Blue, Slot::Green];

    pub fn suffix(&self) -> &'static str {
        match self {
            Slot::Legacy => "",
            Slot::Blue => "-B",
            Slot::Green => "-G",
        }
    }

    /// The slot a replacement deploys into when this slot is live.
    pub fn successor(&self) -> Slot {
        match self {
            Slot::Legacy | Slot::Green => Slot::Blue,
            Slot::Blue => Slot::Green,
        }
    }
}
