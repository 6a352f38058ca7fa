//! Guided workflow session: the entry point of the engine
//!
//! A [`GuidedWorkflow`] owns one user's session. It composes the item
//! store, step machine, debounce queue, persistence codec and conversion
//! engine, and routes every mutation through them so the invariants hold
//! at the session boundary:
//!
//! - item changes drop any cached pathways
//! - free-text edits are debounced and never committed mid-restore
//! - a rejected snapshot leaves the session exactly as it was

use crate::config::WorkflowConfig;
use crate::conversion::{ConversionEngine, ConversionOutcome};
use crate::debounce::DebounceQueue;
use crate::persistence::{self, RestoredSession, SnapshotStore};
use crate::state_machine::{StepAdvance, StepMachine};
use crate::step_validator::StepValidation;
use bowtie_types::*;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// What happened to a free-text edit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldIntake {
    /// Waiting in the debounce queue
    Queued,
    /// Dropped because a restore is in progress
    Suppressed,
}

/// Summary of a successful restore
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RestoreReport {
    pub current_step: Step,
    pub completed_steps: usize,
    pub items: usize,
    pub saved_at: Option<DateTime<Utc>>,
    /// Out-of-range completed-step numbers that were ignored
    pub dropped_steps: Vec<i64>,
    /// Stored items skipped for empty or duplicate names
    pub dropped_items: usize,
    /// Pending edits discarded because the snapshot replaced them
    pub discarded_edits: usize,
}

impl RestoreReport {
    pub fn saved_at_display(&self) -> String {
        self.saved_at
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| UNKNOWN_DATE.to_string())
    }
}

/// Holds the session in the restoring phase until dropped
struct RestoreGuard<'a> {
    phase: &'a mut WorkflowPhase,
}

impl<'a> RestoreGuard<'a> {
    fn enter(phase: &'a mut WorkflowPhase) -> Self {
        *phase = WorkflowPhase::Restoring;
        Self { phase }
    }
}

impl Drop for RestoreGuard<'_> {
    fn drop(&mut self) {
        *self.phase = WorkflowPhase::Idle;
    }
}

/// A guided bowtie-building session
#[derive(Clone, Debug)]
pub struct GuidedWorkflow {
    config: WorkflowConfig,
    /// Shared read-only vocabulary
    vocabulary: Arc<Vocabulary>,
    state: WorkflowState,
    items: SelectedItems,
    phase: WorkflowPhase,
    debounce: DebounceQueue,
    machine: StepMachine,
    converter: ConversionEngine,
}

impl GuidedWorkflow {
    /// Start a fresh session at step 1
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self::with_config(vocabulary, WorkflowConfig::default())
    }

    pub fn with_config(vocabulary: Arc<Vocabulary>, config: WorkflowConfig) -> Self {
        let state = WorkflowState::new();
        tracing::info!(session = %state.session_id.short(), "Guided workflow started");
        Self {
            debounce: DebounceQueue::new(config.debounce.clone()),
            converter: ConversionEngine::new(config.conversion.clone()),
            config,
            vocabulary,
            state,
            items: SelectedItems::new(),
            phase: WorkflowPhase::Idle,
            machine: StepMachine::new(),
        }
    }

    /// Carry this session over to a refreshed vocabulary
    pub fn with_vocabulary(mut self, vocabulary: Arc<Vocabulary>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    pub fn items(&self) -> &SelectedItems {
        &self.items
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn current_step(&self) -> Step {
        self.state.current_step
    }

    pub fn progress_percentage(&self) -> f64 {
        self.state.progress_percentage()
    }

    pub fn is_complete(&self) -> bool {
        self.state.workflow_complete
    }

    // ── Item Store ───────────────────────────────────────────────────

    /// Add an item to a category
    pub fn add_item(&mut self, category: Category, item: Item) -> WorkflowResult<Item> {
        let added = self.items.get_mut(category).add(item)?.clone();
        tracing::debug!(%category, name = %added.name, source = %added.source, "Item added");
        self.items_changed();
        Ok(added)
    }

    /// Add a user-typed item
    pub fn add_custom_item(&mut self, category: Category, name: &str) -> WorkflowResult<Item> {
        self.add_item(category, Item::custom(name))
    }

    /// Add a vocabulary term by id
    pub fn add_from_vocabulary(&mut self, category: Category, term_id: &str) -> WorkflowResult<Item> {
        let term = self.vocabulary.find(category, term_id).ok_or_else(|| {
            WorkflowError::UnknownVocabularyTerm {
                category,
                term_id: term_id.to_string(),
            }
        })?;
        let item = Item::from_vocabulary(term.name.clone(), term.id.clone());
        self.add_item(category, item)
    }

    /// Rename the item at `index`
    pub fn edit_item(&mut self, category: Category, index: usize, name: &str) -> WorkflowResult<Item> {
        let edited = self.items.get_mut(category).edit(index, name)?.clone();
        tracing::debug!(%category, index, name = %edited.name, "Item edited");
        self.items_changed();
        Ok(edited)
    }

    /// Remove the item at `index`
    pub fn remove_item(&mut self, category: Category, index: usize) -> WorkflowResult<Item> {
        let removed = self.items.get_mut(category).remove(index)?;
        tracing::debug!(%category, index, name = %removed.name, "Item removed");
        self.items_changed();
        Ok(removed)
    }

    fn items_changed(&mut self) {
        if self.state.invalidate_pathways() {
            tracing::debug!("Cached pathways invalidated by item change");
        }
    }

    // ── Free-text Fields ─────────────────────────────────────────────

    /// Queue a free-text edit. Suppressed while a restore is running.
    pub fn update_field(
        &mut self,
        key: FieldKey,
        value: impl Into<String>,
        now: DateTime<Utc>,
    ) -> FieldIntake {
        if self.phase == WorkflowPhase::Restoring {
            tracing::warn!(field = %key, "Field update suppressed during restore");
            return FieldIntake::Suppressed;
        }
        self.debounce.enqueue(key, value, now);
        FieldIntake::Queued
    }

    /// Commit settled edits if a sweep is due. Returns how many were committed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> usize {
        if !self.debounce.sweep_due(now) {
            return 0;
        }
        let settled = self.debounce.sweep(now);
        self.commit_fields(settled)
    }

    /// Commit every pending edit immediately
    pub fn flush(&mut self) -> usize {
        let pending = self.debounce.drain_all();
        self.commit_fields(pending)
    }

    /// Number of edits waiting to settle
    pub fn pending_updates(&self) -> usize {
        self.debounce.len()
    }

    /// Value the field will hold once pending edits are committed
    pub fn field_value(&self, key: FieldKey) -> &str {
        self.debounce
            .pending(key)
            .map(|p| p.value.as_str())
            .unwrap_or_else(|| self.state.field(key))
    }

    fn commit_fields(&mut self, updates: Vec<(FieldKey, String)>) -> usize {
        let count = updates.len();
        for (key, value) in updates {
            if key == FieldKey::CentralProblem && self.state.field(key) != value {
                self.state.invalidate_pathways();
            }
            tracing::debug!(field = %key, "Field committed");
            self.state.set_field(key, value);
        }
        count
    }

    // ── Navigation ───────────────────────────────────────────────────

    pub fn go_to_step(&mut self, step_number: i64) -> WorkflowResult<Step> {
        self.machine.go_to_step(&mut self.state, step_number)
    }

    /// Advance one step. Incomplete data produces a warning, never an error.
    pub fn next_step(&mut self) -> StepAdvance {
        self.machine.next_step(&mut self.state, &self.items)
    }

    pub fn previous_step(&mut self) -> Step {
        self.machine.previous_step(&mut self.state)
    }

    pub fn validate_step(&self, step: Step) -> StepValidation {
        self.machine
            .validator()
            .validate(step, &self.state, &self.items)
    }

    pub fn validate_all(&self) -> Vec<StepValidation> {
        self.machine.validator().validate_all(&self.state, &self.items)
    }

    // ── Conversion and Completion ────────────────────────────────────

    /// Flush pending edits, run the conversion and cache its rows
    pub fn convert(&mut self) -> WorkflowResult<Vec<PathwayRow>> {
        self.flush();
        let rows = self
            .converter
            .convert(&self.state.central_problem, &self.items)?;
        self.state.converted_pathways = Some(rows.clone());
        Ok(rows)
    }

    /// Run the conversion without touching the cache. Pending edits are
    /// read as if committed.
    pub fn convert_detailed(&self) -> WorkflowResult<ConversionOutcome> {
        self.converter
            .convert_detailed(self.field_value(FieldKey::CentralProblem), &self.items)
    }

    /// Cached pathways, re-derived when the cache is empty or a pending
    /// central problem edit would change it
    pub fn pathways(&self) -> WorkflowResult<Vec<PathwayRow>> {
        let problem = self.field_value(FieldKey::CentralProblem);
        match &self.state.converted_pathways {
            Some(rows) if problem == self.state.central_problem => Ok(rows.clone()),
            _ => self.converter.convert(problem, &self.items),
        }
    }

    /// Pass the completion gate, convert, and mark the workflow complete.
    ///
    /// Fails with `NotReady` before the last step, or `IncompleteData` if
    /// the conversion preconditions are unmet. Either way nothing changes,
    /// pending edits included. Pending edits are committed on success.
    pub fn mark_complete(&mut self) -> WorkflowResult<Vec<PathwayRow>> {
        self.machine.check_ready(&self.state)?;
        let rows = self
            .converter
            .convert(self.field_value(FieldKey::CentralProblem), &self.items)?;
        self.flush();
        self.machine.complete(&mut self.state, rows.clone());
        tracing::info!(
            session = %self.state.session_id.short(),
            pathways = rows.len(),
            elapsed_secs = self.state.elapsed_secs(),
            "Workflow completed"
        );
        Ok(rows)
    }

    // ── Persistence ──────────────────────────────────────────────────

    /// Capture the committed state without flushing
    pub fn snapshot(&self, now: DateTime<Utc>) -> Snapshot {
        persistence::capture(&self.state, &self.items, now)
    }

    /// Flush pending edits and encode the session
    pub fn save(&mut self) -> WorkflowResult<Vec<u8>> {
        let now = Utc::now();
        let bytes = self.encode(now)?;
        self.mark_saved(now, bytes.len());
        Ok(bytes)
    }

    /// Save into a store. `last_saved` moves only if the write succeeds.
    pub fn save_to(&mut self, store: &dyn SnapshotStore) -> WorkflowResult<()> {
        let now = Utc::now();
        let bytes = self.encode(now)?;
        store.save(&bytes)?;
        self.mark_saved(now, bytes.len());
        Ok(())
    }

    /// Replace the session with a snapshot, or leave it untouched on error
    pub fn load(&mut self, bytes: &[u8]) -> WorkflowResult<RestoreReport> {
        let _guard = RestoreGuard::enter(&mut self.phase);
        Self::apply_snapshot(&mut self.state, &mut self.items, &mut self.debounce, bytes)
    }

    /// Read a snapshot from a store and restore it
    pub fn restore_from(&mut self, store: &dyn SnapshotStore) -> WorkflowResult<RestoreReport> {
        let _guard = RestoreGuard::enter(&mut self.phase);
        let bytes = store.load()?;
        Self::apply_snapshot(&mut self.state, &mut self.items, &mut self.debounce, &bytes)
    }

    fn encode(&mut self, now: DateTime<Utc>) -> WorkflowResult<Vec<u8>> {
        self.flush();
        persistence::encode_snapshot(&self.snapshot(now))
    }

    fn mark_saved(&mut self, now: DateTime<Utc>, bytes: usize) {
        self.state.last_saved = Some(now);
        tracing::info!(
            session = %self.state.session_id.short(),
            step = self.state.current_step.number(),
            items = self.items.total(),
            bytes,
            "Snapshot saved"
        );
    }

    /// Validate fully, then overwrite. Takes fields separately so the
    /// restore guard can hold the phase.
    fn apply_snapshot(
        state: &mut WorkflowState,
        items: &mut SelectedItems,
        debounce: &mut DebounceQueue,
        bytes: &[u8],
    ) -> WorkflowResult<RestoreReport> {
        let snapshot = persistence::decode_snapshot(bytes)?;
        let restored = RestoredSession::from_snapshot(snapshot)?;

        if !restored.dropped_steps.is_empty() {
            tracing::warn!(
                dropped = ?restored.dropped_steps,
                "Ignoring out-of-range completed steps"
            );
        }
        if restored.dropped_items > 0 {
            tracing::warn!(
                dropped = restored.dropped_items,
                "Ignoring stored items with empty or duplicate names"
            );
        }
        let discarded_edits = debounce.clear();
        if discarded_edits > 0 {
            tracing::warn!(discarded = discarded_edits, "Pending edits discarded by restore");
        }

        let RestoredSession {
            current_step,
            completed_steps,
            dropped_steps,
            items: restored_items,
            dropped_items,
            inputs,
            saved_at,
        } = restored;

        state.current_step = current_step;
        state.completed_steps = completed_steps;
        state.project_name = inputs.project_name;
        state.project_description = inputs.project_description;
        state.analysis_scope = inputs.analysis_scope;
        state.central_problem = inputs.problem_statement;
        state.last_saved = saved_at;
        state.workflow_complete = false;
        state.converted_pathways = None;
        *items = restored_items;

        let report = RestoreReport {
            current_step,
            completed_steps: state.completed_count(),
            items: items.total(),
            saved_at,
            dropped_steps,
            dropped_items,
            discarded_edits,
        };
        tracing::info!(
            session = %state.session_id.short(),
            step = current_step.number(),
            items = report.items,
            saved_at = %report.saved_at_display(),
            "Snapshot restored"
        );
        Ok(report)
    }
}
