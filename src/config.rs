use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "infera.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub staging: StagingConfig,
    pub diagram: DiagramConfig,
    pub uploads: UploadConfig,
}

/// Source scanning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Extension (without the dot) of the source files to scan
    pub extension: String,
    /// Visit directory entries in lexicographic order
    pub sort_entries: bool,
}

/// Where and how archives are unpacked
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StagingConfig {
    pub prefix: String,
    /// Parent of staged directories; the system temp dir when unset
    pub temp_root: Option<PathBuf>,
}

/// Diagram settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub module_functions: bool,
    pub module_suffix: String,
}

/// Upload storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    pub directory: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            extension: "py".to_string(),
            sort_entries: true,
        }
    }
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            prefix: "infera_".to_string(),
            temp_root: None,
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            module_functions: true,
            module_suffix: "_module".to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("uploaded_zips"),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults when the file is absent.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        temp_root: Option<PathBuf>,
        uploads_dir: Option<PathBuf>,
        no_sort: bool,
        no_module_functions: bool,
    ) {
        if let Some(root) = temp_root {
            self.staging.temp_root = Some(root);
        }

        if let Some(dir) = uploads_dir {
            self.uploads.directory = dir;
        }

        if no_sort {
            self.analysis.sort_entries = false;
        }

        if no_module_functions {
            self.diagram.module_functions = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let ext = &self.analysis.extension;
        if ext.is_empty() {
            return Err(Error::config_validation("extension must not be empty"));
        }

        if ext.starts_with('.') || ext.contains(|c| c == '/' || c == '\\') {
            return Err(Error::config_validation(format!(
                "extension must be a bare suffix like \"py\", got \"{}\"",
                ext
            )));
        }

        if self.staging.prefix.is_empty() {
            return Err(Error::config_validation("staging prefix must not be empty"));
        }

        if self.diagram.module_suffix.is_empty() {
            return Err(Error::config_validation("module_suffix must not be empty"));
        }

        if self.uploads.directory.as_os_str().is_empty() {
            return Err(Error::config_validation("upload directory must not be empty"));
        }

        Ok(())
    }
}
