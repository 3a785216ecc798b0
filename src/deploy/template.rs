// ABOUTME: Rendered stack template with the inline body size limit enforced.
// ABOUTME: Oversized templates are rejected before any control plane call.

use super::error::DeployError;

/// Largest template body the control plane accepts inline.
pub const MAX_TEMPLATE_BYTES: usize = 51_200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    body: String,
}

impl Template {
    pub fn new(body: impl Into<String>) -> Result<Self, DeployError> {
        let body = body.into();
        if body.len() > MAX_TEMPLATE_BYTES {
            return Err(DeployError::TemplateTooLarge {
                size: body.len(),
                limit: MAX_TEMPLATE_BYTES,
            });
        }
        Ok(Self { body })
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}
