//! Engine configuration
//!
//! Every field has a default, so partial configuration files are accepted.

use serde::{Deserialize, Serialize};

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub debounce: DebounceConfig,
    #[serde(default)]
    pub conversion: ConversionConfig,
}

/// Debounced field-commit timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// How long an edit must sit untouched before it is committed
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,
    /// Minimum time between two sweeps of the pending queue
    #[serde(default = "default_sweep_interval_ms")]
    pub sweep_interval_ms: u64,
}

impl DebounceConfig {
    pub fn settle(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.settle_ms as i64)
    }

    pub fn sweep_interval(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.sweep_interval_ms as i64)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            settle_ms: default_settle_ms(),
            sweep_interval_ms: default_sweep_interval_ms(),
        }
    }
}

fn default_settle_ms() -> u64 {
    1000
}

fn default_sweep_interval_ms() -> u64 {
    1500
}

/// Pathway conversion settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionConfig {
    /// Maximum number of activity/pressure scenarios kept
    #[serde(default = "default_scenario_cap")]
    pub scenario_cap: usize,
    /// Seed for scenario priorities and score sampling
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Escalation themes assigned round-robin
    #[serde(default = "default_escalation_factors")]
    pub escalation_factors: Vec<String>,
    #[serde(default)]
    pub placeholders: PlaceholderConfig,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            scenario_cap: default_scenario_cap(),
            seed: default_seed(),
            escalation_factors: default_escalation_factors(),
            placeholders: PlaceholderConfig::default(),
        }
    }
}

fn default_scenario_cap() -> usize {
    50
}

fn default_seed() -> u64 {
    42
}

pub(crate) fn default_escalation_factors() -> Vec<String> {
    [
        "Equipment failure",
        "Human error",
        "Extreme weather events",
        "Maintenance backlog",
        "Regulatory non-compliance",
        "Insufficient monitoring",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Names substituted for categories the user left empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderConfig {
    #[serde(default = "default_preventive_control")]
    pub preventive_control: String,
    #[serde(default = "default_consequence")]
    pub consequence: String,
    #[serde(default = "default_protective_control")]
    pub protective_control: String,
    #[serde(default = "default_central_problem")]
    pub central_problem: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            preventive_control: default_preventive_control(),
            consequence: default_consequence(),
            protective_control: default_protective_control(),
            central_problem: default_central_problem(),
        }
    }
}

fn default_preventive_control() -> String {
    "General management control".to_string()
}

fn default_consequence() -> String {
    "General environmental impact".to_string()
}

fn default_protective_control() -> String {
    "General emergency response".to_string()
}

fn default_central_problem() -> String {
    "Unspecified environmental problem".to_string()
}
