//! State machine: step navigation and the completion gate
//!
//! Navigation never fails on incomplete data. Leaving a step whose data
//! is insufficient produces a warning the caller can surface; the hard
//! check happens only when the workflow is marked complete.

use crate::step_validator::{StepValidation, StepValidator};
use bowtie_types::*;

/// Result of a forward move
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StepAdvance {
    /// The step the session is on after the move
    pub step: Step,
    /// Whether the step changed
    pub moved: bool,
    /// Soft validation failure for the step just left
    pub warning: Option<StepValidation>,
}

/// Manages step transitions and completion bookkeeping
#[derive(Clone, Debug)]
pub struct StepMachine {
    validator: StepValidator,
}

impl StepMachine {
    pub fn new() -> Self {
        Self {
            validator: StepValidator::new(),
        }
    }

    /// Jump to a step by number. Completed steps are left as they are.
    pub fn go_to_step(&self, state: &mut WorkflowState, step_number: i64) -> WorkflowResult<Step> {
        let step = Step::from_number(step_number)
            .ok_or_else(|| WorkflowError::InvalidStep(step_number.to_string()))?;
        state.current_step = step;
        Ok(step)
    }

    /// Move forward one step, marking the step being left as completed.
    ///
    /// On the last step this is a no-op.
    pub fn next_step(&self, state: &mut WorkflowState, items: &SelectedItems) -> StepAdvance {
        let leaving = state.current_step;
        let Some(next) = leaving.next() else {
            return StepAdvance {
                step: leaving,
                moved: false,
                warning: None,
            };
        };

        let validation = self.validator.validate(leaving, state, items);
        let warning = if validation.is_valid() {
            None
        } else {
            tracing::warn!(
                step = leaving.number(),
                message = %validation.message,
                "Leaving step with incomplete data"
            );
            Some(validation)
        };

        state.mark_step_completed(leaving);
        state.current_step = next;

        StepAdvance {
            step: next,
            moved: true,
            warning,
        }
    }

    /// Move back one step. Completed steps are left as they are.
    pub fn previous_step(&self, state: &mut WorkflowState) -> Step {
        if let Some(previous) = state.current_step.previous() {
            state.current_step = previous;
        }
        state.current_step
    }

    /// Check the completion gate: on the last step with all earlier steps done
    pub fn check_ready(&self, state: &WorkflowState) -> WorkflowResult<()> {
        let required = (STEP_COUNT - 1) as usize;
        if state.current_step.is_last() && state.completed_count() >= required {
            Ok(())
        } else {
            Err(WorkflowError::NotReady {
                current_step: state.current_step.number(),
                completed: state.completed_count(),
            })
        }
    }

    /// Mark the workflow complete and store its pathways.
    ///
    /// The caller runs the conversion between `check_ready` and this call
    /// so a failed conversion leaves the state untouched.
    pub fn complete(&self, state: &mut WorkflowState, pathways: Vec<PathwayRow>) {
        state.mark_step_completed(Step::LAST);
        state.workflow_complete = true;
        state.converted_pathways = Some(pathways);
    }

    pub fn validator(&self) -> &StepValidator {
        &self.validator
    }
}

impl Default for StepMachine {
    fn default() -> Self {
        Self::new()
    }
}
