//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use ownergraph_domain::{GraphOptions, ResolverOptions, MEDIA_TYPE_CODE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Corpus file locations
    #[serde(default)]
    pub data: DataConfig,

    /// Graph construction options
    #[serde(default)]
    pub graph: GraphOptions,

    /// Resolution options
    #[serde(default)]
    pub resolver: ResolverOptions,

    /// Query defaults
    #[serde(default)]
    pub query: QueryConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Corpus file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Entity file (tab-delimited)
    #[serde(default = "default_entities_path")]
    pub entities: PathBuf,

    /// Relation file (tab-delimited)
    #[serde(default = "default_relations_path")]
    pub relations: PathBuf,
}

/// Query defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Type code a queried entity must have unless `--any-type` is given
    #[serde(default = "default_media_type_code")]
    pub media_type_code: i64,

    /// Entity queried when `owners` is run without a name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_target: Option<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// REPL history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the default configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".ownergraph").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. The default path falls back to the
    /// built-in defaults when absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = Self::path()?;
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Apply command-line and environment overrides for the corpus files.
    pub fn override_data(&mut self, entities: Option<PathBuf>, relations: Option<PathBuf>) {
        if let Some(entities) = entities {
            self.data.entities = entities;
        }
        if let Some(relations) = relations {
            self.data.relations = relations;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.resolver.max_depth == Some(0) {
            return Err(CliError::Config(
                "resolver.max_depth must be greater than 0".to_string(),
            ));
        }
        if self.settings.history_size == 0 {
            return Err(CliError::Config(
                "settings.history_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            entities: default_entities_path(),
            relations: default_relations_path(),
        }
    }
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            media_type_code: MEDIA_TYPE_CODE,
            default_target: None,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

fn default_entities_path() -> PathBuf {
    PathBuf::from("data/medias_francais.tsv")
}

fn default_relations_path() -> PathBuf {
    PathBuf::from("data/relations_medias_francais.tsv")
}

fn default_media_type_code() -> i64 {
    MEDIA_TYPE_CODE
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}
