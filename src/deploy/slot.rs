// ABOUTME: Blue/green slot resolution for a component's stacks.
// ABOUTME: Picks the live stack and the alternate name its replacement will use.

use crate::types::{Slot, StackName, StackNameError};

/// The live stack (if any) and the name a new stack must take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotResolution {
    pub existing: Option<StackName>,
    pub new: StackName,
}

/// Errors from slot resolution.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SlotError {
    /// More than one candidate slot is live.
    #[error(
        "found {} stacks for {base} ({}); expected at most one, remove the stale stack manually",
        .existing.len(),
        join_names(.existing)
    )]
    Ambiguous {
        base: StackName,
        existing: Vec<StackName>,
    },

    #[error("cannot derive slot name from {base}: {source}")]
    InvalidName {
        base: StackName,
        source: StackNameError,
    },
}

fn join_names(names: &[StackName]) -> String {
    names
        .iter()
        .map(StackName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolve which slot is live and which slot the next stack goes into.
///
/// `known` is the set of stack names observed once at the start of the run.
pub fn resolve_slots<'a, I>(base: &StackName, known: I) -> Result<SlotResolution, SlotError>
where
    I: IntoIterator<Item = &'a str>,
{
    let invalid = |source| SlotError::InvalidName {
        base: base.clone(),
        source,
    };

    let candidates = Slot::ALL
        .iter()
        .map(|slot| base.slot(*slot).map(|name| (*slot, name)))
        .collect::<Result<Vec<_>, _>>()
        .map_err(invalid)?;

    let known: Vec<&str> = known.into_iter().collect();
    let mut live: Vec<(Slot, StackName)> = candidates
        .into_iter()
        .filter(|(_, name)| known.contains(&name.as_str()))
        .collect();

    match live.len() {
        0 => Ok(SlotResolution {
            existing: None,
            new: base.slot(Slot::Blue).map_err(invalid)?,
        }),
        1 => {
            let (slot, existing) = live.remove(0);
            let new = base.slot(slot.successor()).map_err(invalid)?;
            Ok(SlotResolution {
                existing: Some(existing),
                new,
            })
        }
        _ => Err(SlotError::Ambiguous {
            base: base.clone(),
            existing: live.into_iter().map(|(_, name)| name).collect(),
        }),
    }
}
