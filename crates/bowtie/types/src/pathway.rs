//! Pathway rows: scored scenarios through the bowtie
//!
//! Column names match the dataset consumed by the diagram renderer,
//! the risk matrix and the probabilistic-network builder.

use serde::{Deserialize, Serialize};

/// Lowest score a likelihood or severity may take
pub const MIN_SCORE: u8 = 1;
/// Highest score a likelihood or severity may take
pub const MAX_SCORE: u8 = 5;

/// Risk level derived from `likelihood * severity`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Upper bound (inclusive) of the Low band
    pub const LOW_MAX: u32 = 6;
    /// Upper bound (inclusive) of the Medium band
    pub const MEDIUM_MAX: u32 = 15;

    pub fn from_score(score: u32) -> Self {
        if score <= Self::LOW_MAX {
            RiskLevel::Low
        } else if score <= Self::MEDIUM_MAX {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn from_scores(likelihood: u8, severity: u8) -> Self {
        Self::from_score(likelihood as u32 * severity as u32)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One fully specified scenario through the bowtie
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathwayRow {
    #[serde(rename = "Activity")]
    pub activity: String,
    #[serde(rename = "Pressure")]
    pub pressure: String,
    #[serde(rename = "Preventive_Control")]
    pub preventive_control: String,
    #[serde(rename = "Escalation_Factor")]
    pub escalation_factor: String,
    #[serde(rename = "Central_Problem")]
    pub central_problem: String,
    #[serde(rename = "Protective_Mitigation")]
    pub protective_mitigation: String,
    #[serde(rename = "Consequence")]
    pub consequence: String,
    #[serde(rename = "Likelihood")]
    pub likelihood: u8,
    #[serde(rename = "Severity")]
    pub severity: u8,
    #[serde(rename = "Risk_Level")]
    pub risk_level: RiskLevel,
}

impl PathwayRow {
    /// Column names in dataset order
    pub const COLUMNS: [&'static str; 10] = [
        "Activity",
        "Pressure",
        "Preventive_Control",
        "Escalation_Factor",
        "Central_Problem",
        "Protective_Mitigation",
        "Consequence",
        "Likelihood",
        "Severity",
        "Risk_Level",
    ];

    pub fn risk_score(&self) -> u32 {
        self.likelihood as u32 * self.severity as u32
    }

    /// Scores are in range and the risk level matches them
    pub fn is_consistent(&self) -> bool {
        (MIN_SCORE..=MAX_SCORE).contains(&self.likelihood)
            && (MIN_SCORE..=MAX_SCORE).contains(&self.severity)
            && self.risk_level == RiskLevel::from_score(self.risk_score())
    }
}
