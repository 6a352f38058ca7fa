//! Element categories collected by the guided workflow

use crate::Step;
use serde::{Deserialize, Serialize};

/// The five kinds of bowtie elements a session collects
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Activities,
    Pressures,
    PreventiveControls,
    Consequences,
    ProtectiveControls,
}

impl Category {
    /// All categories in bowtie order (left wing to right wing)
    pub const ALL: [Category; 5] = [
        Category::Activities,
        Category::Pressures,
        Category::PreventiveControls,
        Category::Consequences,
        Category::ProtectiveControls,
    ];

    /// Prefix used when generating item identifiers
    pub fn prefix(&self) -> &'static str {
        match self {
            Category::Activities => "ACT",
            Category::Pressures => "PRS",
            Category::PreventiveControls => "PCT",
            Category::Consequences => "CON",
            Category::ProtectiveControls => "MIT",
        }
    }

    /// Key used for this category in the persisted snapshot
    pub fn snapshot_key(&self) -> &'static str {
        match self {
            Category::Activities => "activities",
            Category::Pressures => "pressures",
            Category::PreventiveControls => "preventiveControls",
            Category::Consequences => "consequences",
            Category::ProtectiveControls => "protectiveControls",
        }
    }

    /// The guided step in which this category is collected
    pub fn step(&self) -> Step {
        match self {
            Category::Activities | Category::Pressures => Step::ThreatsAndCauses,
            Category::PreventiveControls => Step::PreventiveControls,
            Category::Consequences => Step::Consequences,
            Category::ProtectiveControls => Step::ProtectiveControls,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.snapshot_key())
    }
}
