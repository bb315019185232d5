//! Dialogue aggregate: one in-progress instance of a flow.
//!
//! # Invariants
//!
//! - `step` always indexes a valid position in the flow's field table.
//! - The draft holds exactly the fields of the steps already completed,
//!   in step order.
//! - Recording the final field consumes the dialogue and yields the
//!   completed draft; there is no "go back" operation.

use super::draft::{Draft, FieldValue};
use super::flow::{FieldSpec, FlowKind};

/// One running multi-step conversation for a single chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialogue {
    flow: FlowKind,
    step: usize,
    draft: Draft,
}

/// Outcome of recording one field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepResult {
    /// More fields remain; prompt for the next one.
    Advanced {
        dialogue: Dialogue,
        prompt: &'static str,
    },
    /// The final field arrived; the draft is ready to submit.
    Completed { flow: FlowKind, draft: Draft },
}

impl Dialogue {
    /// Starts a dialogue at the flow's first step with an empty draft.
    pub fn new(flow: FlowKind) -> Self {
        Self {
            flow,
            step: 0,
            draft: Draft::new(),
        }
    }

    pub fn flow(&self) -> FlowKind {
        self.flow
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// The field the dialogue is currently waiting on.
    pub fn current_field(&self) -> &'static FieldSpec {
        &self.flow.fields()[self.step]
    }

    /// Records the current step's value and advances, or completes the
    /// dialogue if this was the final step.
    pub fn record(mut self, value: FieldValue) -> StepResult {
        let fields = self.flow.fields();
        self.draft.push(fields[self.step].name, value);

        if self.step + 1 < fields.len() {
            self.step += 1;
            let prompt = fields[self.step].prompt;
            StepResult::Advanced {
                dialogue: self,
                prompt,
            }
        } else {
            StepResult::Completed {
                flow: self.flow,
                draft: self.draft,
            }
        }
    }
}
