//! Persisted snapshot schema
//!
//! Field names follow the saved-session file format so older files keep
//! loading. `currentStep` is kept raw here; range checking belongs to
//! the loader.

use crate::{Item, ItemCollection, SelectedItems};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Top-level keys a snapshot must carry to be loadable
pub const REQUIRED_SNAPSHOT_FIELDS: [&str; 3] = ["currentStep", "selectedItems", "inputs"];

/// Shown when a snapshot carries no usable timestamp
pub const UNKNOWN_DATE: &str = "unknown date";

/// A serialized capture of a whole session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// ISO-8601 save time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    pub current_step: i64,
    #[serde(default)]
    pub completed_steps: Vec<i64>,
    pub selected_items: SnapshotItems,
    pub inputs: SnapshotInputs,
}

impl Snapshot {
    /// Parsed save time, if present and well-formed
    pub fn saved_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// Human-readable save time
    pub fn saved_at_display(&self) -> String {
        match self.saved_at() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => UNKNOWN_DATE.to_string(),
        }
    }
}

/// Items per category. Absent categories load as empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotItems {
    #[serde(default)]
    pub activities: Vec<Item>,
    #[serde(default)]
    pub pressures: Vec<Item>,
    #[serde(default)]
    pub preventive_controls: Vec<Item>,
    #[serde(default)]
    pub consequences: Vec<Item>,
    #[serde(default)]
    pub protective_controls: Vec<Item>,
}

impl From<&SelectedItems> for SnapshotItems {
    fn from(items: &SelectedItems) -> Self {
        Self {
            activities: items.activities.items().to_vec(),
            pressures: items.pressures.items().to_vec(),
            preventive_controls: items.preventive_controls.items().to_vec(),
            consequences: items.consequences.items().to_vec(),
            protective_controls: items.protective_controls.items().to_vec(),
        }
    }
}

impl From<SnapshotItems> for SelectedItems {
    fn from(items: SnapshotItems) -> Self {
        use crate::Category;
        Self {
            activities: ItemCollection::from_items(Category::Activities, items.activities),
            pressures: ItemCollection::from_items(Category::Pressures, items.pressures),
            preventive_controls: ItemCollection::from_items(
                Category::PreventiveControls,
                items.preventive_controls,
            ),
            consequences: ItemCollection::from_items(Category::Consequences, items.consequences),
            protective_controls: ItemCollection::from_items(
                Category::ProtectiveControls,
                items.protective_controls,
            ),
        }
    }
}

impl SnapshotItems {
    pub fn total(&self) -> usize {
        self.activities.len()
            + self.pressures.len()
            + self.preventive_controls.len()
            + self.consequences.len()
            + self.protective_controls.len()
    }
}

/// Free-text inputs. `problemStatement` holds the central problem.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotInputs {
    #[serde(default)]
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
    #[serde(default)]
    pub analysis_scope: String,
    #[serde(default)]
    pub problem_statement: String,
}
