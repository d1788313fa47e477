use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::builders::formatter::CommandFormatter;
use crate::core::error::{GroupsError, Result};

/// Name of the optional settings file looked up from the working directory.
pub const CONFIG_FILE_NAME: &str = ".go-groups.toml";

/// Flags that steer a single pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Pipe rewritten sources through the external style formatter.
    pub apply_external_formatter: bool,
    /// Leave files whose first line is a generated-code marker alone.
    pub skip_generated: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            apply_external_formatter: true,
            skip_generated: true,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FormatterSettings {
    pub enabled: bool,
    pub command: String,
    pub args: Vec<String>,
}

impl Default for FormatterSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "gofmt".to_string(),
            args: Vec::new(),
        }
    }
}

/// Contents of `.go-groups.toml`. Every field is optional.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct GroupsSettings {
    pub skip_generated: bool,
    pub formatter: FormatterSettings,
}

impl Default for GroupsSettings {
    fn default() -> Self {
        Self {
            skip_generated: true,
            formatter: FormatterSettings::default(),
        }
    }
}

impl GroupsSettings {
    /// The pipeline flags these settings describe.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            apply_external_formatter: self.formatter.enabled,
            skip_generated: self.skip_generated,
        }
    }

    /// The formatter command these settings describe.
    pub fn formatter(&self) -> CommandFormatter {
        CommandFormatter::new(self.formatter.command.clone(), self.formatter.args.clone())
    }
}

pub trait ConfigProvider {
    fn load_settings(&self) -> Result<GroupsSettings>;
    fn config_path(&self) -> Option<&Path>;
}

/// Locates and loads the settings file.
pub struct ConfigManager {
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Looks for `.go-groups.toml` in the current directory and its parents.
    pub fn new() -> Result<Self> {
        let current_dir = std::env::current_dir()?;
        Ok(Self {
            config_path: find_config_file(&current_dir),
        })
    }

    /// Uses the settings file at `path`, which must exist.
    pub fn new_at(path: PathBuf) -> Result<Self> {
        if !path.is_file() {
            return Err(GroupsError::Config(format!(
                "{} does not exist",
                path.display()
            )));
        }
        Ok(Self {
            config_path: Some(path),
        })
    }

    /// Starts from `dir` instead of the current directory.
    pub fn discover_from(dir: &Path) -> Self {
        Self {
            config_path: find_config_file(dir),
        }
    }
}

impl ConfigProvider for ConfigManager {
    fn load_settings(&self) -> Result<GroupsSettings> {
        let Some(path) = &self.config_path else {
            return Ok(GroupsSettings::default());
        };
        debug!(path = %path.display(), "loading settings");

        let content = fs::read_to_string(path)
            .map_err(|e| GroupsError::Config(format!("failed to read {}: {e}", path.display())))?;
        toml::from_str(&content)
            .map_err(|e| GroupsError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = Some(start);
    while let Some(current) = dir {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = current.parent();
    }
    None
}
