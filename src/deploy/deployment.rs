// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::config::TimingConfig;
use crate::diagnostics::Diagnostics;
use crate::types::StackName;

use super::slot::SlotResolution;
use super::target::DeploymentTarget;
use super::template::Template;

/// A deployment run, parameterized by its current state.
///
/// The state type parameter `S` carries what earlier transitions
/// established (the chosen action, the shared cluster, the warm-up
/// outcome), so a step can only be taken once the facts it relies on exist.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) target: DeploymentTarget,
    pub(crate) template: Template,
    pub(crate) slots: SlotResolution,
    pub(crate) timing: TimingConfig,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) state: S,
}

impl<S> Deployment<S> {
    pub fn target(&self) -> &DeploymentTarget {
        &self.target
    }

    /// The stack being replaced or updated (None on first deploy).
    pub fn existing_stack(&self) -> Option<&StackName> {
        self.slots.existing.as_ref()
    }

    /// The slot a replacement stack is created in.
    pub fn new_stack(&self) -> &StackName {
        &self.slots.new
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    /// Internal helper to move to the next state, keeping the run context.
    pub(crate) fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            target: self.target,
            template: self.template,
            slots: self.slots,
            timing: self.timing,
            diagnostics: self.diagnostics,
            state,
        }
    }
}
