//! The guided steps of a bowtie session

use crate::{Category, WorkflowError};
use serde::{Deserialize, Serialize};

/// Number of guided steps
pub const STEP_COUNT: u8 = 8;

/// A guided workflow step. Persisted as its 1-based number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    ProjectSetup,
    CentralProblem,
    ThreatsAndCauses,
    PreventiveControls,
    Consequences,
    ProtectiveControls,
    ReviewAndValidate,
    Finalize,
}

impl Step {
    pub const ALL: [Step; STEP_COUNT as usize] = [
        Step::ProjectSetup,
        Step::CentralProblem,
        Step::ThreatsAndCauses,
        Step::PreventiveControls,
        Step::Consequences,
        Step::ProtectiveControls,
        Step::ReviewAndValidate,
        Step::Finalize,
    ];

    pub const FIRST: Step = Step::ProjectSetup;
    pub const LAST: Step = Step::Finalize;

    /// Look up a step by its 1-based number
    pub fn from_number(n: i64) -> Option<Step> {
        if n < 1 || n > STEP_COUNT as i64 {
            return None;
        }
        Some(Self::ALL[(n - 1) as usize])
    }

    /// 1-based step number
    pub fn number(self) -> u8 {
        self as u8 + 1
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::ProjectSetup => "Project Setup",
            Step::CentralProblem => "Central Problem",
            Step::ThreatsAndCauses => "Threats & Causes",
            Step::PreventiveControls => "Preventive Controls",
            Step::Consequences => "Consequences",
            Step::ProtectiveControls => "Protective Controls",
            Step::ReviewAndValidate => "Review & Validate",
            Step::Finalize => "Finalize",
        }
    }

    pub fn next(self) -> Option<Step> {
        Self::from_number(self.number() as i64 + 1)
    }

    pub fn previous(self) -> Option<Step> {
        Self::from_number(self.number() as i64 - 1)
    }

    pub fn is_last(self) -> bool {
        self == Self::LAST
    }

    /// Item categories collected during this step
    pub fn categories(self) -> &'static [Category] {
        match self {
            Step::ThreatsAndCauses => &[Category::Activities, Category::Pressures],
            Step::PreventiveControls => &[Category::PreventiveControls],
            Step::Consequences => &[Category::Consequences],
            Step::ProtectiveControls => &[Category::ProtectiveControls],
            _ => &[],
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step.number()
    }
}

impl TryFrom<u8> for Step {
    type Error = WorkflowError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Step::from_number(n as i64).ok_or_else(|| WorkflowError::InvalidStep(n.to_string()))
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.number(), self.title())
    }
}
