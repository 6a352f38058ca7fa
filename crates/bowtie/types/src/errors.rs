//! Error types for the guided workflow

use crate::Category;

/// Errors that can occur while collecting, persisting or converting a bowtie.
///
/// Every variant is recoverable; callers map them to user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Duplicate item in {category}: '{name}'")]
    DuplicateItem { category: Category, name: String },

    #[error("Item name in {category} must not be empty")]
    EmptyName { category: Category },

    #[error("Index {index} out of range for {category} (len {len})")]
    IndexOutOfRange {
        category: Category,
        index: usize,
        len: usize,
    },

    /// Holds the offending value as given (a number out of range, or a non-numeric value)
    #[error("Invalid step: {0}")]
    InvalidStep(String),

    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),

    #[error("Snapshot missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Incomplete data, no items collected for: {}", join_categories(.missing))]
    IncompleteData { missing: Vec<Category> },

    #[error("Workflow not ready to complete: at step {current_step} with {completed} completed steps")]
    NotReady { current_step: u8, completed: usize },

    #[error("Unknown vocabulary term in {category}: {term_id}")]
    UnknownVocabularyTerm { category: Category, term_id: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn join_categories(categories: &[Category]) -> String {
    categories
        .iter()
        .map(|c| c.snapshot_key())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type alias for workflow operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;
