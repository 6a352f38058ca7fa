//! Step validator: checks whether a step's collected data is sufficient
//!
//! Pure functions over the session state. Results are advisory during
//! navigation; the hard gate lives in the completion check.

use bowtie_types::{SelectedItems, Step, WorkflowResult, WorkflowState};
use serde::Serialize;

/// Outcome of validating one step
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StepValidation {
    pub step: Step,
    pub valid: bool,
    pub message: String,
}

impl StepValidation {
    fn ok(step: Step, message: impl Into<String>) -> Self {
        Self {
            step,
            valid: true,
            message: message.into(),
        }
    }

    fn failed(step: Step, message: impl Into<String>) -> Self {
        Self {
            step,
            valid: false,
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }
}

/// Validates per-step completion criteria
#[derive(Clone, Debug, Default)]
pub struct StepValidator;

impl StepValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a single step against the current state and items
    pub fn validate(
        &self,
        step: Step,
        state: &WorkflowState,
        items: &SelectedItems,
    ) -> StepValidation {
        match step {
            Step::ProjectSetup => {
                if state.project_name.trim().is_empty() {
                    StepValidation::failed(step, "Please enter a project name")
                } else {
                    StepValidation::ok(step, "Project setup complete")
                }
            }
            Step::CentralProblem => {
                if state.central_problem.trim().is_empty() {
                    StepValidation::failed(step, "Please define the central problem")
                } else {
                    StepValidation::ok(step, "Central problem defined")
                }
            }
            Step::ThreatsAndCauses
            | Step::PreventiveControls
            | Step::Consequences
            | Step::ProtectiveControls => {
                let empty: Vec<_> = step
                    .categories()
                    .iter()
                    .filter(|c| items.get(**c).is_empty())
                    .map(|c| c.snapshot_key())
                    .collect();
                if empty.is_empty() {
                    StepValidation::ok(step, format!("{} collected", step.title()))
                } else {
                    StepValidation::failed(
                        step,
                        format!("Please add at least one item to: {}", empty.join(", ")),
                    )
                }
            }
            Step::ReviewAndValidate | Step::Finalize => {
                StepValidation::ok(step, "Ready for review")
            }
        }
    }

    /// Validate a step given by its raw number
    pub fn validate_number(
        &self,
        step_number: i64,
        state: &WorkflowState,
        items: &SelectedItems,
    ) -> WorkflowResult<StepValidation> {
        let step = Step::from_number(step_number)
            .ok_or_else(|| bowtie_types::WorkflowError::InvalidStep(step_number.to_string()))?;
        Ok(self.validate(step, state, items))
    }

    /// Validate every step in order
    pub fn validate_all(&self, state: &WorkflowState, items: &SelectedItems) -> Vec<StepValidation> {
        Step::ALL
            .iter()
            .map(|step| self.validate(*step, state, items))
            .collect()
    }
}
