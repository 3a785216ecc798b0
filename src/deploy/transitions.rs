// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::config::TimingConfig;
use crate::control_plane::{ClusterOps, ScalingOps, StackOps};
use crate::diagnostics::{Diagnostics, Warning};
use crate::types::{ClusterName, PoolName, StackName};

use super::Deployment;
use super::drain::transfer_workloads;
use super::error::DeployError;
use super::report::DeploymentReport;
use super::settle::{StackOperation, wait_for_stack};
use super::slot::resolve_slots;
use super::state::{
    ClusterVerified, Completed, Detected, Resolved, StackCreated, Transferred, WarmedUp,
};
use super::strategy::Action;
use super::target::DeploymentTarget;
use super::template::Template;
use super::warmup::warm_up;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Deployment<S> {
    /// The live stack, for transitions that only make sense when one exists.
    fn require_existing(&self, operation: &'static str) -> Result<StackName, DeployError> {
        self.slots
            .existing
            .clone()
            .ok_or(DeployError::NoExistingStack(operation))
    }

    /// Read the same output from the existing and the new stack.
    async fn output_pair<St: StackOps + ?Sized>(
        &self,
        stacks: &St,
        key: &str,
    ) -> Result<(String, String), DeployError> {
        let existing = self.require_existing("compare outputs with")?;
        let old = stacks.get_output(&existing, key).await?;
        let new = stacks.get_output(&self.slots.new, key).await?;
        Ok((old, new))
    }
}

// =============================================================================
// RESOLVE
// =============================================================================

impl Deployment<Resolved> {
    /// Observe the live stacks once and pick the existing and new slots.
    pub async fn resolve<St: StackOps + ?Sized>(
        target: DeploymentTarget,
        template: Template,
        timing: TimingConfig,
        stacks: &St,
    ) -> Result<Self, DeployError> {
        let known = stacks.list_all_outputs().await?;
        let slots = resolve_slots(&target.stack_name, known.keys().map(String::as_str))?;

        tracing::info!(
            component = %target.component,
            environment = %target.environment,
            existing = slots.existing.as_ref().map(StackName::as_str).unwrap_or("none"),
            new = %slots.new,
            "slots resolved"
        );

        Ok(Deployment {
            target,
            template,
            slots,
            timing,
            diagnostics: Diagnostics::default(),
            state: Resolved,
        })
    }

    /// Compare the desired configuration with the existing stack and choose
    /// what to do. A first deployment always creates.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::StackInFailedState` if the existing stack needs
    /// an operator before it can be deployed over.
    pub async fn detect<St: StackOps + ?Sized>(
        mut self,
        stacks: &St,
    ) -> Result<Deployment<Detected>, DeployError> {
        let Some(existing) = self.slots.existing.clone() else {
            tracing::info!(new = %self.slots.new, "no existing stack, first deployment");
            return Ok(self.transition(Detected {
                action: Action::Create,
                change: None,
            }));
        };

        let description = stacks.describe_stack(&existing).await?;
        if description.status.is_terminal_failure() {
            return Err(DeployError::StackInFailedState {
                stack: existing.to_string(),
                status: description.status,
            });
        }

        let change = stacks
            .is_changed(
                &existing,
                self.template.body(),
                &self.target.inputs,
                &self.target.tags,
            )
            .await?;
        let action = self
            .target
            .strategy
            .decide(&change, &self.target.settings.size_parameters);

        tracing::info!(
            stack = %existing,
            strategy = %self.target.strategy,
            %action,
            template_changed = change.template_changed,
            changed_inputs = ?change.changed_inputs,
            tags_changed = change.tags_changed,
            "deployment decided"
        );
        if !change.deployed_only_inputs.is_empty() {
            let keys: Vec<&str> = change
                .deployed_only_inputs
                .iter()
                .map(String::as_str)
                .collect();
            self.diagnostics.warn(Warning::unmanaged_inputs(format!(
                "{existing} has parameters not set in the configuration, keeping deployed values: {}",
                keys.join(", ")
            )));
        }

        Ok(self.transition(Detected {
            action,
            change: Some(change),
        }))
    }
}

// =============================================================================
// DETECT -> CREATE | UPDATE | NOOP
// =============================================================================

impl Deployment<Detected> {
    /// Give the operator a window to interrupt a replace.
    pub async fn grace_pause(&self) {
        let grace = self.timing.replace_grace;
        if self.state.action != Action::Replace || grace.is_zero() {
            return;
        }
        tracing::warn!(
            existing = self.slots.existing.as_ref().map(StackName::as_str).unwrap_or("none"),
            new = %self.slots.new,
            "replacing stack in {grace:?}; interrupt now to cancel"
        );
        tokio::time::sleep(grace).await;
    }

    /// Create the stack in the new slot and wait for it to settle.
    #[must_use = "deployment state must be used"]
    pub async fn create_stack<St: StackOps + ?Sized>(
        self,
        stacks: &St,
    ) -> Result<Deployment<StackCreated>, DeployError> {
        let request = self.target.stack_request(&self.slots.new, &self.template);
        tracing::info!(stack = %self.slots.new, "creating stack");
        stacks.create_stack(&request).await?;
        wait_for_stack(
            stacks,
            &self.slots.new,
            StackOperation::Create,
            &self.timing.stack.poller(),
        )
        .await?;

        let change = self.state.change.clone();
        Ok(self.transition(StackCreated { change }))
    }

    /// Update the existing stack in place; no slot change, nothing migrates.
    #[must_use = "deployment state must be used"]
    pub async fn update_in_place<St: StackOps + ?Sized>(
        self,
        stacks: &St,
    ) -> Result<Deployment<Completed>, DeployError> {
        let existing = self.require_existing("update")?;
        let request = self.target.stack_request(&existing, &self.template);
        tracing::info!(stack = %existing, "updating stack in place");
        stacks.update_stack(&request).await?;
        wait_for_stack(
            stacks,
            &existing,
            StackOperation::Update,
            &self.timing.stack.poller(),
        )
        .await?;

        let change = self.state.change.clone();
        Ok(self.transition(Completed::new(Action::Update, change, existing)))
    }

    /// Nothing changed; finish without touching the stack.
    pub fn skip(self) -> Result<Deployment<Completed>, DeployError> {
        let existing = self.require_existing("leave unchanged")?;
        tracing::info!(stack = %existing, "stack is up to date");
        let change = self.state.change.clone();
        Ok(self.transition(Completed::new(Action::Noop, change, existing)))
    }

    /// Report what would happen without making any change.
    pub fn dry_run(self) -> DeploymentReport {
        let serving = match (self.state.action, &self.slots.existing) {
            (Action::Update | Action::Noop, Some(existing)) => existing.clone(),
            _ => self.slots.new.clone(),
        };
        tracing::info!(
            strategy = %self.target.strategy,
            action = %self.state.action,
            "dry run, no changes made"
        );
        let state = Completed::new(self.state.action, self.state.change.clone(), serving);
        let mut report = self.transition(state).finish();
        report.dry_run = true;
        report
    }
}

// =============================================================================
// StackCreated -> Completed | ClusterVerified
// =============================================================================

impl Deployment<StackCreated> {
    /// Finish a first deployment: there is nothing to migrate from.
    pub fn complete(self) -> Deployment<Completed> {
        let serving = self.slots.new.clone();
        let change = self.state.change.clone();
        self.transition(Completed::new(Action::Create, change, serving))
    }

    /// Require the new stack to join the cluster the existing stack uses.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::ClusterMismatch` if the outputs differ. Neither
    /// stack is deleted.
    #[must_use = "deployment state must be used"]
    pub async fn verify_cluster<St: StackOps + ?Sized>(
        self,
        stacks: &St,
    ) -> Result<Deployment<ClusterVerified>, DeployError> {
        let key = self.target.settings.cluster_output.clone();
        let (existing_cluster, new_cluster) = self.output_pair(stacks, &key).await?;

        if existing_cluster != new_cluster {
            return Err(DeployError::ClusterMismatch {
                existing_stack: self.require_existing("verify")?.to_string(),
                existing_cluster,
                new_stack: self.slots.new.to_string(),
                new_cluster,
            });
        }

        tracing::info!(cluster = %new_cluster, "both stacks share the cluster");
        let change = self.state.change.clone();
        Ok(self.transition(ClusterVerified {
            change,
            cluster: ClusterName::new(new_cluster),
        }))
    }
}

// =============================================================================
// ClusterVerified -> WarmedUp
// =============================================================================

impl Deployment<ClusterVerified> {
    /// Bring the new pool up to the capacity the legacy pool is serving.
    #[must_use = "deployment state must be used"]
    pub async fn warm_up<C: StackOps + ScalingOps + ?Sized>(
        self,
        control_plane: &C,
    ) -> Result<Deployment<WarmedUp>, DeployError> {
        let key = self.target.settings.auto_scaling_group_output.clone();
        let (legacy, new) = self.output_pair(control_plane, &key).await?;
        let legacy_pool = PoolName::new(legacy);
        let new_pool = PoolName::new(new);

        let outcome = warm_up(
            control_plane,
            &legacy_pool,
            &new_pool,
            &self.timing.capacity.poller(),
        )
        .await?;

        let ClusterVerified { change, cluster } = self.state.clone();
        Ok(self.transition(WarmedUp {
            change,
            cluster,
            legacy_pool,
            warm_up: outcome,
        }))
    }
}

// =============================================================================
// WarmedUp -> Transferred
// =============================================================================

impl Deployment<WarmedUp> {
    /// Drain every legacy member so the scheduler moves its work to the new pool.
    #[must_use = "deployment state must be used"]
    pub async fn transfer<C: ScalingOps + ClusterOps + ?Sized>(
        mut self,
        control_plane: &C,
    ) -> Result<Deployment<Transferred>, DeployError> {
        let legacy = control_plane.describe_pool(&self.state.legacy_pool).await?;
        let poller = self.timing.drain.poller();

        let transfer = transfer_workloads(
            control_plane,
            &self.state.cluster,
            &legacy.instances,
            &poller,
            self.timing.drain_extension,
            &mut self.diagnostics,
        )
        .await?;

        tracing::info!(
            pool = %self.state.legacy_pool,
            drained = transfer.drained.len(),
            skipped = transfer.skipped.len(),
            "workloads transferred"
        );

        let WarmedUp { change, warm_up, .. } = self.state.clone();
        Ok(self.transition(Transferred {
            change,
            warm_up,
            transfer,
        }))
    }
}

// =============================================================================
// Transferred -> Completed
// =============================================================================

impl Deployment<Transferred> {
    /// Delete the legacy stack, or keep it when retention was requested.
    #[must_use = "deployment state must be used"]
    pub async fn retire<St: StackOps + ?Sized>(
        mut self,
        stacks: &St,
    ) -> Result<Deployment<Completed>, DeployError> {
        let existing = self.require_existing("retire")?;
        let Transferred {
            change,
            warm_up,
            transfer,
        } = self.state.clone();

        let mut completed = Completed::new(Action::Replace, change, self.slots.new.clone());
        completed.warm_up = Some(warm_up);
        completed.transfer = Some(transfer);

        if self.target.settings.keep_previous_stack {
            self.diagnostics.warn(Warning::previous_retained(format!(
                "{existing} was kept; delete it once it is no longer needed"
            )));
            completed.retained = Some(existing);
        } else {
            tracing::info!(stack = %existing, "deleting legacy stack");
            stacks.delete_stack(&existing).await?;
            wait_for_stack(
                stacks,
                &existing,
                StackOperation::Delete,
                &self.timing.stack.poller(),
            )
            .await?;
            completed.retired = Some(existing);
        }

        Ok(self.transition(completed))
    }
}

// =============================================================================
// Completed
// =============================================================================

impl Deployment<Completed> {
    /// The stack that now serves the component.
    pub fn serving_stack(&self) -> &StackName {
        &self.state.serving
    }

    /// Finish the run and summarize it.
    pub fn finish(self) -> DeploymentReport {
        let Completed {
            action,
            change,
            serving,
            retired,
            retained,
            warm_up,
            transfer,
        } = self.state;
        let (drained_members, skipped_members) = transfer
            .map(|t| (t.drained.len(), t.skipped.len()))
            .unwrap_or_default();

        DeploymentReport {
            component: self.target.component,
            environment: self.target.environment,
            strategy: self.target.strategy,
            action,
            dry_run: false,
            existing_stack: self.slots.existing,
            serving_stack: serving,
            retired_stack: retired,
            retained_stack: retained,
            change,
            warm_up,
            drained_members,
            skipped_members,
            warnings: self.diagnostics.into_warnings(),
        }
    }
}
