//! Configuration loading and path resolution
//!
//! Settings resolve in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::index::LoadOptions;
use crate::schema::SheetScheme;
use crate::{Error, Result};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "QCAT_CONFIG";
/// Environment variable naming the corpus sheet export
pub const INPUT_ENV: &str = "QCAT_INPUT";
/// Environment variable naming the output directory
pub const OUTPUT_DIR_ENV: &str = "QCAT_OUTPUT_DIR";

/// Compiled default output directory
pub const DEFAULT_OUTPUT_DIR: &str = "qcat-output";

/// Contents of a qcat TOML config file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Corpus sheet export (CSV)
    pub input: Option<PathBuf>,
    /// Directory receiving Data/ and Tables/
    pub output_dir: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub corpus: CorpusConfig,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when RUST_LOG is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// How the corpus sheet is read and split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub scheme: SheetScheme,
    /// Leading rows before the data (section row + header row)
    pub header_rows: usize,
    /// Annotators whose rows are left out
    pub excluded_annotators: Vec<String>,
    /// Year-wise tables split papers into before / from this year
    pub split_year: i32,
    /// Rows kept in each confusion table
    pub top_n: usize,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            scheme: SheetScheme::V2,
            header_rows: 2,
            excluded_annotators: vec!["DG".to_string()],
            split_year: 2010,
            top_n: 10,
        }
    }
}

impl CorpusConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            scheme: self.scheme,
            header_rows: self.header_rows,
            excluded_annotators: self.excluded_annotators.clone(),
        }
    }
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }
}

/// Find the config file to use
///
/// Explicit path, then `QCAT_CONFIG`, then the user config directory
/// (`<config dir>/qcat/config.toml`), then `./qcat.toml`.
pub fn locate_config_file(cli_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }

    let user_config = dirs::config_dir().map(|d| d.join("qcat").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    let local = PathBuf::from("qcat.toml");
    if local.exists() {
        return Some(local);
    }

    None
}

/// Load configuration, degrading to defaults when no file is found
///
/// A file that was named explicitly (argument or `QCAT_CONFIG`) must exist.
pub fn load_config(cli_path: Option<&Path>) -> Result<TomlConfig> {
    load_config_with_source(cli_path).map(|(config, _)| config)
}

/// [`load_config`], also returning the file the config was read from
///
/// Binaries call this before their subscriber is installed, so they report
/// the source themselves once logging is up.
pub fn load_config_with_source(cli_path: Option<&Path>) -> Result<(TomlConfig, Option<PathBuf>)> {
    let explicit = cli_path.is_some() || std::env::var(CONFIG_ENV).is_ok();

    match locate_config_file(cli_path) {
        Some(path) if path.exists() => {
            info!("Loading config from {}", path.display());
            let config = TomlConfig::from_file(&path)?;
            Ok((config, Some(path)))
        }
        Some(path) if explicit => Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        ))),
        _ => {
            warn!("No config file found, using defaults");
            Ok((TomlConfig::default(), None))
        }
    }
}

/// Log where the config came from
pub fn log_config_source(source: Option<&Path>) {
    match source {
        Some(path) => info!("Config loaded from {}", path.display()),
        None => warn!("No config file found, using defaults"),
    }
}

/// Resolve a path setting: CLI → environment → TOML
fn resolve_path(cli: Option<&Path>, env_var: &str, toml_value: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli {
        debug!(setting = env_var, "Resolved from command line");
        return Some(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(env_var) {
        debug!(setting = env_var, "Resolved from environment");
        return Some(PathBuf::from(path));
    }
    toml_value.map(|p| {
        debug!(setting = env_var, "Resolved from TOML config");
        p.to_path_buf()
    })
}

/// Corpus sheet export to analyse
pub fn resolve_input(cli: Option<&Path>, config: &TomlConfig) -> Result<PathBuf> {
    resolve_path(cli, INPUT_ENV, config.input.as_deref()).ok_or_else(|| {
        Error::Config(format!(
            "No input sheet configured. Please configure using one of:\n\
             1. Command line: --input <FILE>\n\
             2. Environment: {}=<FILE>\n\
             3. TOML config: input = \"<FILE>\"",
            INPUT_ENV
        ))
    })
}

/// Output directory, falling back to [`DEFAULT_OUTPUT_DIR`]
pub fn resolve_output_dir(cli: Option<&Path>, config: &TomlConfig) -> PathBuf {
    resolve_path(cli, OUTPUT_DIR_ENV, config.output_dir.as_deref())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
}

/// Write a config file atomically (temp file + rename)
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, path)?;
    info!("Config written to {}", path.display());
    Ok(())
}
