//! CLI command implementations

pub mod pathways;
pub mod session;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use bowtie_engine::{GuidedWorkflow, JsonFileStore, RestoreReport};
use bowtie_types::Category;

/// Restore a session from a snapshot file
pub(crate) fn open_session(
    path: &str,
    config: &CliConfig,
) -> CliResult<(GuidedWorkflow, JsonFileStore, RestoreReport)> {
    let store = JsonFileStore::new(path);
    let mut workflow =
        GuidedWorkflow::with_config(config.load_vocabulary()?, config.workflow.clone());
    let report = workflow.restore_from(&store)?;
    Ok((workflow, store, report))
}

/// Parse a category from its snapshot key or a kebab-case alias
pub(crate) fn parse_category(value: &str) -> Result<Category, String> {
    let normalized: String = value
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect();
    Category::ALL
        .into_iter()
        .find(|c| c.snapshot_key().to_lowercase() == normalized)
        .ok_or_else(|| {
            let known: Vec<_> = Category::ALL.iter().map(|c| c.snapshot_key()).collect();
            format!("unknown category '{}' (expected one of: {})", value, known.join(", "))
        })
}

pub(crate) fn invalid(message: impl Into<String>) -> CliError {
    CliError::InvalidArgument(message.into())
}
