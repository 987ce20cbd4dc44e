use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug)]
pub enum ConfigLoadError {
    NotFound,
    NoConfigDir,
    ParseError(String),
    IoError(String),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::NotFound => write!(f, "Config file not found"),
            ConfigLoadError::NoConfigDir => write!(f, "Could not determine config directory"),
            ConfigLoadError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigLoadError::IoError(msg) => write!(f, "IO error reading config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigLoadError {}

fn default_hor_res() -> i16 {
    480
}

fn default_ver_res() -> i16 {
    320
}

fn default_filter() -> String {
    "info".to_string()
}

/// Simulated display the widget library runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_hor_res")]
    pub hor_res: i16,
    #[serde(default = "default_ver_res")]
    pub ver_res: i16,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hor_res: default_hor_res(),
            ver_res: default_ver_res(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptingConfig {
    /// Scripts run before the main script, in order
    #[serde(default)]
    pub preload: Vec<PathBuf>,

    /// Base directory for relative preload paths (default: ~/.local/share/lvlua/scripts)
    #[serde(default)]
    pub script_dir: Option<PathBuf>,
}

impl ScriptingConfig {
    /// Get the script directory path (use provided or default)
    pub fn script_dir(&self) -> PathBuf {
        self.script_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|p| p.data_dir().join("scripts"))
                .unwrap_or_else(|| PathBuf::from(".scripts"))
        })
    }

    /// Preload scripts with relative paths resolved against the script directory
    pub fn preload_paths(&self) -> Vec<PathBuf> {
        let dir = self.script_dir();
        self.preload
            .iter()
            .map(|p| if p.is_absolute() { p.clone() } else { dir.join(p) })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write logs to a file in the data directory
    #[serde(default)]
    pub file: bool,

    /// Filter used when `RUST_LOG` is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            file: false,
            filter: default_filter(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LvluaConfig {
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub scripting: ScriptingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

pub const EXAMPLE_CONFIG: &str = r#"# lvlua configuration

[display]
hor_res = 480
ver_res = 320

[scripting]
# Scripts run before the main script, relative to script_dir
preload = []
# script_dir = "/path/to/scripts"

[logging]
file = false
filter = "info"
"#;

pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "lvlua")
}

impl LvluaConfig {
    pub fn config_path() -> Option<PathBuf> {
        project_dirs().map(|p| p.config_dir().join("config.toml"))
    }

    /// Load from the default location
    pub fn load() -> Result<Self, ConfigLoadError> {
        let path = Self::config_path().ok_or(ConfigLoadError::NoConfigDir)?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigLoadError> {
        if !path.exists() {
            return Err(ConfigLoadError::NotFound);
        }

        let content =
            fs::read_to_string(path).map_err(|e| ConfigLoadError::IoError(e.to_string()))?;
        let config =
            toml::from_str(&content).map_err(|e| ConfigLoadError::ParseError(e.to_string()))?;
        info!(target: "runner", "Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path`, or the default location when `None`; a missing file gives defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let result = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };
        match result {
            Err(ConfigLoadError::NotFound) | Err(ConfigLoadError::NoConfigDir) => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(&self)?;
        fs::write(path, content)?;
        info!(target: "runner", "Saved config to {}", path.display());
        Ok(())
    }
}

/// Write the example config to `path`, refusing to overwrite
pub fn create_example_config(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        return Err(format!("{} already exists", path.display()).into());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, EXAMPLE_CONFIG)?;
    info!(target: "runner", "Created example config at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_parses() {
        let config: LvluaConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config, LvluaConfig::default());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: LvluaConfig = toml::from_str("[display]\nhor_res = 800\n").unwrap();
        assert_eq!(config.display.hor_res, 800);
        assert_eq!(config.display.ver_res, 320);
        assert_eq!(config.logging.filter, "info");
        assert!(config.scripting.preload.is_empty());
    }

    #[test]
    fn test_preload_paths_are_resolved() {
        let config = ScriptingConfig {
            preload: vec![PathBuf::from("theme.lua"), PathBuf::from("/abs/init.lua")],
            script_dir: Some(PathBuf::from("/scripts")),
        };
        assert_eq!(
            config.preload_paths(),
            vec![PathBuf::from("/scripts/theme.lua"), PathBuf::from("/abs/init.lua")]
        );
    }
}
