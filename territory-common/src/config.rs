//! Configuration loading, root folder resolution and directory layout
//!
//! The injector works inside a root folder holding five fixed
//! directories (names overridable from TOML):
//! - `ce/`: exactly one master map configuration file
//! - `input/`: secondary territory files
//! - `output/`: injected master written here
//! - `backup/`: byte-for-byte copy of the master
//! - `logs/`: session logs
//!
//! Root folder resolution priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`TERRITORY_INJECTOR_ROOT`)
//! 3. TOML config file (`root_folder`)
//! 4. Current directory (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable naming the root folder
pub const ROOT_ENV_VAR: &str = "TERRITORY_INJECTOR_ROOT";

/// Config file looked up in the current directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "territory-injector.toml";

/// Configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Root folder holding the working directories (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// Directory names relative to the root folder
    #[serde(default)]
    pub directories: DirectoryNames,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Directory names, relative to the root folder unless absolute
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DirectoryNames {
    pub master_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl Default for DirectoryNames {
    fn default() -> Self {
        Self {
            master_dir: PathBuf::from("ce"),
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
            backup_dir: PathBuf::from("backup"),
            log_dir: PathBuf::from("logs"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load TOML configuration
///
/// An explicit path must exist. Without one, `territory-injector.toml` in the
/// current directory is used if present, then the per-user config directory;
/// otherwise defaults apply. A file that exists but does not parse is a
/// configuration error.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) => path,
            None => return Ok(TomlConfig::default()),
        },
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        Error::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Parse TOML configuration text
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(DEFAULT_CONFIG_FILE);
    if local.exists() {
        return Some(local);
    }
    dirs::config_dir()
        .map(|d| d.join("territory-injector").join("config.toml"))
        .filter(|p| p.exists())
}

/// Resolves the root folder following the priority order above
pub struct RootFolderResolver<'a> {
    cli_arg: Option<PathBuf>,
    config: &'a TomlConfig,
}

impl<'a> RootFolderResolver<'a> {
    pub fn new(cli_arg: Option<PathBuf>, config: &'a TomlConfig) -> Self {
        Self { cli_arg, config }
    }

    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Some(path) = &self.config.root_folder {
            return path.clone();
        }

        // Priority 4: Current directory
        PathBuf::from(".")
    }
}

/// Fully resolved working directories for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLayout {
    pub root: PathBuf,
    pub master_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub backup_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl DirectoryLayout {
    pub fn new(root: impl Into<PathBuf>, names: &DirectoryNames) -> Self {
        let root = root.into();
        Self {
            master_dir: root.join(&names.master_dir),
            input_dir: root.join(&names.input_dir),
            output_dir: root.join(&names.output_dir),
            backup_dir: root.join(&names.backup_dir),
            log_dir: root.join(&names.log_dir),
            root,
        }
    }

    /// Create every working directory that does not exist yet
    pub fn ensure_directories_exist(&self) -> Result<()> {
        for dir in [
            &self.log_dir,
            &self.input_dir,
            &self.master_dir,
            &self.backup_dir,
            &self.output_dir,
        ] {
            if !dir.exists() {
                std::fs::create_dir_all(dir).map_err(|e| {
                    Error::Config(format!("Failed to create {}: {}", dir.display(), e))
                })?;
                debug!("Created directory: {}", dir.display());
            }
        }
        Ok(())
    }

    /// Locate the master file: exactly one `.xml` file in the master directory
    pub fn discover_master_file(&self) -> Result<PathBuf> {
        let mut candidates = xml_files_in(&self.master_dir)?;
        if candidates.len() != 1 {
            return Err(Error::Config(format!(
                "Place exactly one master .xml file in {} (found {})",
                self.master_dir.display(),
                candidates.len()
            )));
        }
        let master = candidates.remove(0);
        info!("Using master map file: {}", master.display());
        Ok(master)
    }

    /// Every `.xml` file in the input directory, sorted by file name
    pub fn input_files(&self) -> Result<Vec<PathBuf>> {
        xml_files_in(&self.input_dir)
    }
}

/// Non-recursive listing of `.xml` files (case-insensitive extension), sorted
fn xml_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        Error::Config(format!("Cannot read directory {}: {}", dir.display(), e))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_xml = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("xml"))
            .unwrap_or(false);
        if is_xml && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
