//! CLI configuration

use crate::error::{CliError, CliResult};
use crate::output::OutputFormat;
use bowtie_engine::WorkflowConfig;
use bowtie_types::Vocabulary;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Default output format when `--output` is not given
    pub output: Option<OutputFormat>,

    /// JSON vocabulary file used by `add --term`
    pub vocabulary: Option<PathBuf>,

    /// Engine settings
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

impl CliConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> CliResult<Self> {
        let config_path = match path {
            Some(p) => PathBuf::from(p),
            None => Self::default_config_path()?,
        };

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            let config: CliConfig =
                toml::from_str(&contents).map_err(|e| CliError::Config(e.to_string()))?;
            tracing::debug!(path = %config_path.display(), "Configuration loaded");
            Ok(config)
        } else {
            Ok(CliConfig::default())
        }
    }

    /// Load the configured vocabulary, or an empty one
    pub fn load_vocabulary(&self) -> CliResult<Arc<Vocabulary>> {
        match &self.vocabulary {
            Some(path) => Ok(Arc::new(read_vocabulary(path)?)),
            None => Ok(Arc::new(Vocabulary::new())),
        }
    }

    /// Get the default configuration file path
    fn default_config_path() -> CliResult<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| CliError::Config("Cannot find config directory".into()))?;
        Ok(config_dir.join("bowtie").join("config.toml"))
    }
}

fn read_vocabulary(path: &Path) -> CliResult<Vocabulary> {
    let contents = std::fs::read(path)?;
    let vocabulary: Vocabulary = serde_json::from_slice(&contents)?;
    tracing::debug!(path = %path.display(), terms = vocabulary.len(), "Vocabulary loaded");
    Ok(vocabulary)
}
