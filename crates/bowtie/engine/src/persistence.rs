//! Snapshot persistence: capture, encode, validate and store sessions
//!
//! Decoding validates in stages (parse, required fields, step range,
//! typed decode) and produces plain values. Nothing here touches a live
//! session, so a rejected snapshot can never leave one half-restored.

use bowtie_types::*;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ── Capture and restore ──────────────────────────────────────────────

/// Capture the persisted view of a session
pub fn capture(state: &WorkflowState, items: &SelectedItems, now: DateTime<Utc>) -> Snapshot {
    Snapshot {
        timestamp: Some(now.to_rfc3339()),
        current_step: state.current_step.number() as i64,
        completed_steps: state
            .completed_steps
            .iter()
            .map(|s| s.number() as i64)
            .collect(),
        selected_items: SnapshotItems::from(items),
        inputs: SnapshotInputs {
            project_name: state.project_name.clone(),
            project_description: state.project_description.clone(),
            analysis_scope: state.analysis_scope.clone(),
            problem_statement: state.central_problem.clone(),
        },
    }
}

/// Validated contents of a snapshot, ready to overwrite a session
#[derive(Clone, Debug)]
pub struct RestoredSession {
    pub current_step: Step,
    pub completed_steps: BTreeSet<Step>,
    /// Completed-step entries that were outside the step range
    pub dropped_steps: Vec<i64>,
    pub items: SelectedItems,
    /// Stored items skipped for empty or duplicate names
    pub dropped_items: usize,
    pub inputs: SnapshotInputs,
    pub saved_at: Option<DateTime<Utc>>,
}

impl RestoredSession {
    /// Convert a decoded snapshot. Fails only if `current_step` is out of range.
    pub fn from_snapshot(snapshot: Snapshot) -> WorkflowResult<Self> {
        let current_step = Step::from_number(snapshot.current_step)
            .ok_or_else(|| WorkflowError::InvalidStep(snapshot.current_step.to_string()))?;
        let saved_at = snapshot.saved_at();

        let mut completed_steps = BTreeSet::new();
        let mut dropped_steps = Vec::new();
        for n in snapshot.completed_steps {
            match Step::from_number(n) {
                Some(step) => {
                    completed_steps.insert(step);
                }
                None => dropped_steps.push(n),
            }
        }

        let stored_items = snapshot.selected_items.total();
        let items = SelectedItems::from(snapshot.selected_items);
        let dropped_items = stored_items - items.total();

        Ok(Self {
            current_step,
            completed_steps,
            dropped_steps,
            items,
            dropped_items,
            inputs: snapshot.inputs,
            saved_at,
        })
    }
}

// ── Codec ────────────────────────────────────────────────────────────

/// Serialize a snapshot to JSON bytes
pub fn encode_snapshot(snapshot: &Snapshot) -> WorkflowResult<Vec<u8>> {
    serde_json::to_vec_pretty(snapshot)
        .map_err(|e| WorkflowError::Corrupt(format!("serialization failed: {}", e)))
}

/// Parse and validate snapshot bytes.
///
/// Checks, in order: the bytes are a JSON object (`Corrupt`), the required
/// top-level fields are present (`MissingFields`), `currentStep` is an
/// integral number in range (`InvalidStep`), and the remaining fields have
/// the right shape (`Corrupt`). Integral floats in `completedSteps` are
/// normalized like `currentStep`; fractional entries are `Corrupt`.
pub fn decode_snapshot(bytes: &[u8]) -> WorkflowResult<Snapshot> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| WorkflowError::Corrupt(format!("not valid JSON: {}", e)))?;
    let Value::Object(mut object) = value else {
        return Err(WorkflowError::Corrupt("snapshot is not a JSON object".into()));
    };

    let missing: Vec<String> = REQUIRED_SNAPSHOT_FIELDS
        .iter()
        .filter(|key| object.get(**key).map_or(true, Value::is_null))
        .map(|key| key.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(WorkflowError::MissingFields(missing));
    }

    let step = parse_step_number(&object["currentStep"])?;
    if Step::from_number(step).is_none() {
        return Err(WorkflowError::InvalidStep(step.to_string()));
    }
    object.insert("currentStep".into(), Value::from(step));

    if let Some(Value::Array(entries)) = object.get_mut("completedSteps") {
        for entry in entries.iter_mut() {
            if let Some(n) = integral(entry) {
                *entry = Value::from(n);
            }
        }
    }

    serde_json::from_value(Value::Object(object))
        .map_err(|e| WorkflowError::Corrupt(format!("unexpected snapshot shape: {}", e)))
}

/// Accept integers and integral floats (`3.0`), reject anything else
fn parse_step_number(value: &Value) -> WorkflowResult<i64> {
    integral(value).ok_or_else(|| WorkflowError::InvalidStep(value.to_string()))
}

fn integral(value: &Value) -> Option<i64> {
    let Value::Number(n) = value else {
        return None;
    };
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    match n.as_f64() {
        Some(f) if f.is_finite() && f.fract() == 0.0 => Some(f as i64),
        _ => None,
    }
}

// ── Stores ───────────────────────────────────────────────────────────

/// Durable home for encoded snapshots
pub trait SnapshotStore {
    /// Replace the stored snapshot with `bytes`
    fn save(&self, bytes: &[u8]) -> WorkflowResult<()>;

    /// Read the stored snapshot in full
    fn load(&self) -> WorkflowResult<Vec<u8>>;
}

/// JSON file store.
///
/// Writes go to a sibling named after the full file name plus `.tmp`, then
/// are renamed into place. A failed rename removes the temp file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, bytes: &[u8]) -> WorkflowResult<()> {
        let tmp_path = self.tmp_path();
        std::fs::write(&tmp_path, bytes)?;
        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "Snapshot written");
        Ok(())
    }

    fn load(&self) -> WorkflowResult<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// In-memory store (for testing)
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Mutex<Option<Vec<u8>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .is_none()
    }
}

impl SnapshotStore for InMemoryStore {
    fn save(&self, bytes: &[u8]) -> WorkflowResult<()> {
        let mut data = self
            .data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *data = Some(bytes.to_vec());
        Ok(())
    }

    fn load(&self) -> WorkflowResult<Vec<u8>> {
        let data = self
            .data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        data.clone().ok_or_else(|| {
            WorkflowError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no snapshot saved",
            ))
        })
    }
}
