//! Reconciliation planning for the survey aggregate.
//!
//! Given the IDs of the currently stored questions and the builder's ordered
//! question list, decide which stored documents are overwritten, which inputs
//! become new documents, and which stored documents are deleted. The plan is
//! pure; adapters execute it inside their own atomic primitive.
//!
//! Rules:
//! - an input whose ID is in the stored set overwrites that document;
//! - an input with no ID, an unknown ID, or an ID already claimed by an
//!   earlier input becomes a new document;
//! - every stored ID not claimed by an input is deleted.
//!
//! Ordering is not derived here. Each input's `order` is persisted as given.

use std::collections::HashSet;

use crate::entities::QuestionInput;

/// What to do with one input question, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileStep {
    /// Overwrite the stored document with this ID.
    Overwrite(String),
    /// Create a new document with a freshly allocated ID.
    Insert,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// One step per input, same order as the inputs.
    pub steps: Vec<ReconcileStep>,
    /// Stored IDs that no input kept, in stored order.
    pub deletions: Vec<String>,
}

impl ReconcilePlan {
    #[must_use]
    pub fn insert_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| matches!(step, ReconcileStep::Insert))
            .count()
    }

    #[must_use]
    pub fn overwrite_count(&self) -> usize {
        self.steps.len() - self.insert_count()
    }
}

/// Plan how `inputs` replace the stored question set `stored_ids`.
#[must_use]
pub fn plan_reconciliation<'a, I>(stored_ids: I, inputs: &[QuestionInput]) -> ReconcilePlan
where
    I: IntoIterator<Item = &'a str>,
{
    let stored: Vec<&str> = stored_ids.into_iter().collect();
    let stored_set: HashSet<&str> = stored.iter().copied().collect();
    let mut kept: HashSet<&str> = HashSet::with_capacity(inputs.len());

    let steps = inputs
        .iter()
        .map(|input| match input.id.as_deref() {
            Some(id) if stored_set.contains(id) && kept.insert(id) => {
                ReconcileStep::Overwrite(id.to_string())
            }
            _ => ReconcileStep::Insert,
        })
        .collect();

    let deletions = stored
        .into_iter()
        .filter(|id| !kept.contains(id))
        .map(String::from)
        .collect();

    ReconcilePlan { steps, deletions }
}
