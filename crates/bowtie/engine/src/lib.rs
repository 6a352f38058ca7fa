//! Guided bowtie workflow engine
//!
//! Walks a user through building an environmental-risk bowtie in eight
//! steps, collects the items of each category, persists sessions as JSON
//! snapshots, and converts the collected items into a bounded, scored
//! pathway dataset.
//!
//! # Architecture
//!
//! The [`GuidedWorkflow`] session composes specialized components:
//!
//! - [`StepValidator`]: soft per-step data checks
//! - [`StepMachine`]: step navigation and the completion gate
//! - [`DebounceQueue`]: coalesces rapid free-text edits
//! - [`persistence`]: snapshot codec and [`SnapshotStore`] backends
//! - [`ConversionEngine`]: items to pathway rows
//!
//! # Example
//!
//! ```rust
//! use bowtie_engine::GuidedWorkflow;
//! use bowtie_types::*;
//! use std::sync::Arc;
//!
//! let mut workflow = GuidedWorkflow::new(Arc::new(Vocabulary::new()));
//! workflow.update_field(FieldKey::ProjectName, "Baltic Sea", chrono::Utc::now());
//! workflow.flush();
//!
//! workflow.add_custom_item(Category::Activities, "Shipping").unwrap();
//! workflow.add_custom_item(Category::Pressures, "Oil spill").unwrap();
//!
//! let rows = workflow.convert().unwrap();
//! assert_eq!(rows.len(), 1);
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod conversion;
pub mod debounce;
pub mod persistence;
pub mod session;
pub mod state_machine;
pub mod step_validator;

// Re-export main types
pub use config::{ConversionConfig, DebounceConfig, PlaceholderConfig, WorkflowConfig};
pub use conversion::{ConversionEngine, ConversionOutcome, ScenarioScores, ScoredPathway};
pub use debounce::{DebounceQueue, PendingUpdate};
pub use persistence::{
    decode_snapshot, encode_snapshot, InMemoryStore, JsonFileStore, RestoredSession, SnapshotStore,
};
pub use session::{FieldIntake, GuidedWorkflow, RestoreReport};
pub use state_machine::{StepAdvance, StepMachine};
pub use step_validator::{StepValidation, StepValidator};
