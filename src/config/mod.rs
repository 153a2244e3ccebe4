use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::prompt::{
    DEFAULT_GREETING, DEFAULT_MODEL, DEFAULT_SYSTEM_INSTRUCTION, DEFAULT_TEMPERATURE,
};
use crate::core::session::{DEFAULT_API_KEY_ENV, SessionConfig, SessionFactory};

const ENV_PREFIX: &str = "GEMCHAT";
const TEMPERATURE_RANGE: std::ops::RangeInclusive<f32> = 0.0..=2.0;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Config file already exists at {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Config directory not found")]
    NoConfigDir,
}

pub fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join("Library/Application Support/gemchat"))
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .map(|c| c.join("gemchat"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .map(|a| a.join("gemchat"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        std::env::var_os("HOME")
            .map(PathBuf::from)
            .map(|h| h.join(".config/gemchat"))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: String,
    pub temperature: f32,
    pub system_instruction: String,
    pub greeting: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Environment variable holding the Gemini API key.
    pub api_key_env: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
            max_output_tokens: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            base_url: None,
        }
    }
}

/// Command-line values that take precedence over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub system_instruction: Option<String>,
}

impl AppConfig {
    /// Loads the user config, falling back to defaults with a warning.
    #[must_use]
    pub fn load() -> Self {
        let result = match Self::get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::build(None),
        };

        result.unwrap_or_else(|e| {
            eprintln!("Warning: {e}");
            Self::default()
        })
    }

    /// Reads `path` (optional on disk) layered under `GEMCHAT_*` variables.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        Self::build(Some(path))
    }

    fn build(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true));

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".to_string()));
        }
        if !TEMPERATURE_RANGE.contains(&self.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature {} is outside {}..={}",
                self.temperature,
                TEMPERATURE_RANGE.start(),
                TEMPERATURE_RANGE.end()
            )));
        }
        if self.max_output_tokens == Some(0) {
            return Err(ConfigError::Invalid(
                "max_output_tokens must be positive".to_string(),
            ));
        }
        if self.api_key_env.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "api_key_env must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) -> ConfigResult<()> {
        if let Some(model) = overrides.model {
            self.model = model;
        }
        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }
        if let Some(system_instruction) = overrides.system_instruction {
            self.system_instruction = system_instruction;
        }
        self.validate()
    }

    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            model: self.model.clone(),
            system_instruction: self.system_instruction.clone(),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        }
    }

    #[must_use]
    pub fn session_factory(&self) -> SessionFactory {
        let factory =
            SessionFactory::new(self.session_config()).with_api_key_env(self.api_key_env.clone());

        match &self.base_url {
            Some(url) => factory.with_base_url(url.clone()),
            None => factory,
        }
    }

    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        get_config_dir().map(|dir| dir.join("config.toml"))
    }

    pub fn init_default() -> ConfigResult<PathBuf> {
        let path = Self::get_config_path().ok_or(ConfigError::NoConfigDir)?;
        Self::write_default(&path)?;
        Ok(path)
    }

    /// Writes the defaults to `path`, refusing to overwrite.
    pub fn write_default(path: &Path) -> ConfigResult<()> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let body = toml::to_string_pretty(&Self::default())?;
        fs::write(
            path,
            format!(
                "# gemchat configuration\n# Any key can be overridden with a {ENV_PREFIX}_<KEY> environment variable.\n\n{body}"
            ),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert!(config.base_url.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.model, AppConfig::default().model);
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "model = \"gemini-2.5-pro\"\ntemperature = 0.2\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "gemini-2.5-pro");
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.greeting, DEFAULT_GREETING);
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "temperature = 3.5\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_max_output_tokens_reaches_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_output_tokens = 1024\n").unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.session_config().max_output_tokens, Some(1024));

        fs::write(&path, "max_output_tokens = 0\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path).unwrap_err(),
            ConfigError::Invalid(_)
        ));
    }

    #[test]
    fn test_write_default_round_trips_and_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        AppConfig::write_default(&path).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# gemchat configuration"));
        assert!(!text.contains("base_url"));

        assert_eq!(AppConfig::load_from(&path).unwrap(), AppConfig::default());

        let err = AppConfig::write_default(&path).unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyExists(_)));
    }

    #[test]
    fn test_overrides_win() {
        let mut config = AppConfig::default();
        config
            .apply(ConfigOverrides {
                model: Some("gemini-2.0-flash".to_string()),
                temperature: Some(1.0),
                system_instruction: None,
            })
            .unwrap();

        let session = config.session_config();
        assert_eq!(session.model, "gemini-2.0-flash");
        assert!((session.temperature - 1.0).abs() < f32::EPSILON);
        assert_eq!(session.system_instruction, DEFAULT_SYSTEM_INSTRUCTION);

        let err = config
            .apply(ConfigOverrides {
                temperature: Some(-0.5),
                ..ConfigOverrides::default()
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
