//! Workflow state: step position, completed steps and project fields
//!
//! The item collections live next to this state in the session; what
//! is tracked here is where the user is and what they have typed.

use crate::{PathwayRow, Step, STEP_COUNT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

// ── Session Identifier ───────────────────────────────────────────────

/// Unique identifier for a workflow session
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn short(&self) -> &str {
        &self.0[..8.min(self.0.len())]
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── Free-text fields ─────────────────────────────────────────────────

/// Free-text project fields edited at typing speed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldKey {
    ProjectName,
    CentralProblem,
    ProjectDescription,
    AnalysisScope,
}

impl FieldKey {
    pub const ALL: [FieldKey; 4] = [
        FieldKey::ProjectName,
        FieldKey::CentralProblem,
        FieldKey::ProjectDescription,
        FieldKey::AnalysisScope,
    ];
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FieldKey::ProjectName => "project_name",
            FieldKey::CentralProblem => "central_problem",
            FieldKey::ProjectDescription => "project_description",
            FieldKey::AnalysisScope => "analysis_scope",
        };
        write!(f, "{}", name)
    }
}

// ── Phase ────────────────────────────────────────────────────────────

/// Whether a snapshot restore is currently overwriting the session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowPhase {
    #[default]
    Idle,
    Restoring,
}

// ── Workflow State ───────────────────────────────────────────────────

/// Navigation and project state of a guided session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowState {
    pub session_id: SessionId,
    pub current_step: Step,
    /// Steps the user has advanced past. Only ever grows.
    pub completed_steps: BTreeSet<Step>,
    pub project_name: String,
    pub central_problem: String,
    #[serde(default)]
    pub project_description: String,
    #[serde(default)]
    pub analysis_scope: String,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_saved: Option<DateTime<Utc>>,
    pub workflow_complete: bool,
    /// Output of the last conversion; cleared whenever the items change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_pathways: Option<Vec<PathwayRow>>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self {
            session_id: SessionId::generate(),
            current_step: Step::FIRST,
            completed_steps: BTreeSet::new(),
            project_name: String::new(),
            central_problem: String::new(),
            project_description: String::new(),
            analysis_scope: String::new(),
            started_at: Utc::now(),
            last_saved: None,
            workflow_complete: false,
            converted_pathways: None,
        }
    }

    pub fn with_project_name(mut self, name: impl Into<String>) -> Self {
        self.project_name = name.into();
        self
    }

    pub fn with_central_problem(mut self, problem: impl Into<String>) -> Self {
        self.central_problem = problem.into();
        self
    }

    /// Completion percentage, always derived from the completed steps
    pub fn progress_percentage(&self) -> f64 {
        if self.workflow_complete {
            return 100.0;
        }
        self.completed_steps.len() as f64 / STEP_COUNT as f64 * 100.0
    }

    pub fn completed_count(&self) -> usize {
        self.completed_steps.len()
    }

    pub fn is_step_completed(&self, step: Step) -> bool {
        self.completed_steps.contains(&step)
    }

    /// Record a step as completed. Returns false if it already was.
    pub fn mark_step_completed(&mut self, step: Step) -> bool {
        self.completed_steps.insert(step)
    }

    pub fn field(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::ProjectName => &self.project_name,
            FieldKey::CentralProblem => &self.central_problem,
            FieldKey::ProjectDescription => &self.project_description,
            FieldKey::AnalysisScope => &self.analysis_scope,
        }
    }

    pub fn set_field(&mut self, key: FieldKey, value: impl Into<String>) {
        let value = value.into();
        match key {
            FieldKey::ProjectName => self.project_name = value,
            FieldKey::CentralProblem => self.central_problem = value,
            FieldKey::ProjectDescription => self.project_description = value,
            FieldKey::AnalysisScope => self.analysis_scope = value,
        }
    }

    /// Drop cached conversion output. Returns true if there was any.
    pub fn invalidate_pathways(&mut self) -> bool {
        self.converted_pathways.take().is_some()
    }

    pub fn elapsed_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = WorkflowState::new();
        assert_eq!(state.current_step, Step::ProjectSetup);
        assert!(state.completed_steps.is_empty());
        assert_eq!(state.progress_percentage(), 0.0);
        assert!(!state.workflow_complete);
        assert!(state.last_saved.is_none());
    }

    #[test]
    fn test_progress_follows_completed_steps() {
        let mut state = WorkflowState::new();
        state.mark_step_completed(Step::ProjectSetup);
        state.mark_step_completed(Step::CentralProblem);
        assert_eq!(state.progress_percentage(), 25.0);

        // Marking twice does not double count
        assert!(!state.mark_step_completed(Step::CentralProblem));
        assert_eq!(state.progress_percentage(), 25.0);
    }

    #[test]
    fn test_complete_reports_full_progress() {
        let mut state = WorkflowState::new();
        state.workflow_complete = true;
        assert_eq!(state.progress_percentage(), 100.0);
    }

    #[test]
    fn test_fields() {
        let mut state = WorkflowState::new().with_project_name("Baltic");
        assert_eq!(state.field(FieldKey::ProjectName), "Baltic");
        state.set_field(FieldKey::AnalysisScope, "Coastal zone");
        assert_eq!(state.analysis_scope, "Coastal zone");
    }

    #[test]
    fn test_invalidate_pathways() {
        let mut state = WorkflowState::new();
        assert!(!state.invalidate_pathways());
        state.converted_pathways = Some(Vec::new());
        assert!(state.invalidate_pathways());
        assert!(state.converted_pathways.is_none());
    }

    #[test]
    fn test_session_id_short() {
        let id = SessionId::generate();
        assert_eq!(id.short().len(), 8);
    }
}
