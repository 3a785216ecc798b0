// ABOUTME: Diagnostics accumulator for non-fatal warnings during deployment.
// ABOUTME: Collects warnings that shouldn't fail a deployment but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during deployment operations.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Check if any warnings were collected.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during deployment.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// A legacy member was not ACTIVE and was left alone.
    pub fn member_skipped(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::MemberSkipped,
            message: message.into(),
        }
    }

    /// The replaced stack was kept on request.
    pub fn previous_retained(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::PreviousStackRetained,
            message: message.into(),
        }
    }

    /// The deployed stack has parameters the configuration no longer sets.
    pub fn unmanaged_inputs(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::UnmanagedInputs,
            message: message.into(),
        }
    }

    /// The legacy pool had no members registered with the cluster.
    pub fn nothing_to_drain(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::NothingToDrain,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum WarningKind {
    /// Legacy member skipped by the drain loop (already draining or inactive).
    MemberSkipped,
    /// Previous stack kept running after a replace.
    PreviousStackRetained,
    /// No legacy cluster members were found for the old pool.
    NothingToDrain,
    /// Deployed parameters missing from the configured inputs were left as they are.
    UnmanagedInputs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::member_skipped("arn:member/1 is DRAINING"));
        diag.warn(Warning::previous_retained("kept prod-web-B"));

        assert!(diag.has_warnings());
        assert_eq!(diag.into_warnings().len(), 2);
    }

    #[test]
    fn warning_constructors_set_correct_kind() {
        assert_eq!(
            Warning::member_skipped("test").kind,
            WarningKind::MemberSkipped
        );
        assert_eq!(
            Warning::previous_retained("test").kind,
            WarningKind::PreviousStackRetained
        );
        assert_eq!(
            Warning::nothing_to_drain("test").kind,
            WarningKind::NothingToDrain
        );
        assert_eq!(
            Warning::unmanaged_inputs("test").kind,
            WarningKind::UnmanagedInputs
        );
    }
}
