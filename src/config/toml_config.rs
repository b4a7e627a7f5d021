use crate::utils::error::{BackofficeError, Result};
use crate::utils::logger::LogFormat;
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_positive_number,
    validate_socket_addr, Validate,
};
use crate::view::labels::Locations;
use crate::view::ViewSettings;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_BODY_BYTES: usize = 32 << 20;

/// 應用程式設定，每個區段皆可省略
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub labels: LabelsConfig,
    pub defaults: DefaultsConfig,
    pub logging: LoggingConfig,
    pub locations: Vec<LocationConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub max_body_bytes: usize,
    pub cache_version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cache_version: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON seed `{ "<collection>": [ .. ] }` loaded into the in-memory store.
    pub seed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub currency: String,
    pub location: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let settings = ViewSettings::default();
        Self {
            currency: settings.default_currency,
            location: settings.default_location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationConfig {
    pub slug: String,
    pub name: String,
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// 替換環境變數 (例如 ${SEED_FILE})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| BackofficeError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });
        Ok(result.into_owned())
    }

    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.logging.format).unwrap_or(LogFormat::Compact)
    }

    /// Form defaults and the location directory; no `[[locations]]` keeps the built-in stores.
    pub fn view_settings(&self) -> ViewSettings {
        let mut settings = ViewSettings {
            default_currency: self.defaults.currency.clone(),
            default_location: self.defaults.location.clone(),
            ..ViewSettings::default()
        };
        if !self.locations.is_empty() {
            settings.locations = Locations::new(
                self.locations
                    .iter()
                    .map(|l| (l.slug.clone(), l.name.clone())),
            );
        }
        settings
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_socket_addr("server.bind", &self.server.bind)?;
        validate_positive_number("server.max_body_bytes", self.server.max_body_bytes, 1024)?;
        if let Some(seed) = &self.store.seed {
            validate_path("store.seed", seed)?;
        }
        if let Some(file) = &self.labels.file {
            validate_path("labels.file", file)?;
        }
        validate_non_empty_string("defaults.currency", &self.defaults.currency)?;
        validate_non_empty_string("defaults.location", &self.defaults.location)?;
        validate_one_of(
            "logging.level",
            &self.logging.level,
            &["trace", "debug", "info", "warn", "error"],
        )?;
        validate_one_of("logging.format", &self.logging.format, &["compact", "json"])?;
        for location in &self.locations {
            validate_non_empty_string("locations.slug", &location.slug)?;
            validate_non_empty_string("locations.name", &location.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.server.max_body_bytes, 32 * 1024 * 1024);
        assert_eq!(config.defaults.currency, "PHP");
        assert_eq!(config.log_format(), LogFormat::Compact);
        assert!(config.validate().is_ok());
        assert_eq!(config.view_settings().locations.len(), 4);
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[server]
bind = "0.0.0.0:9000"
cache_version = "v42"

[store]
seed = "./seed.json"

[defaults]
currency = "USD"
location = "downtown"

[logging]
level = "debug"
format = "json"

[[locations]]
slug = "downtown"
name = "Downtown Store"
"#;
        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
        assert_eq!(config.store.seed.as_deref(), Some("./seed.json"));
        assert_eq!(config.log_format(), LogFormat::Json);
        assert!(config.validate().is_ok());

        let settings = config.view_settings();
        assert_eq!(settings.default_currency, "USD");
        assert_eq!(settings.locations.len(), 1);
        assert_eq!(settings.locations.display_name("downtown"), "Downtown Store");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("BACKOFFICE_TEST_SEED", "/data/seed.json");
        let config = AppConfig::from_toml_str("[store]\nseed = \"${BACKOFFICE_TEST_SEED}\"\n").unwrap();
        assert_eq!(config.store.seed.as_deref(), Some("/data/seed.json"));
        std::env::remove_var("BACKOFFICE_TEST_SEED");

        let untouched = AppConfig::from_toml_str("[labels]\nfile = \"${BACKOFFICE_UNSET_VAR}\"\n").unwrap();
        assert_eq!(untouched.labels.file.as_deref(), Some("${BACKOFFICE_UNSET_VAR}"));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let bad_bind = AppConfig::from_toml_str("[server]\nbind = \"localhost\"\n").unwrap();
        assert!(bad_bind.validate().is_err());

        let bad_format = AppConfig::from_toml_str("[logging]\nformat = \"xml\"\n").unwrap();
        assert!(bad_format.validate().is_err());

        let unresolved = AppConfig::from_toml_str("[labels]\nfile = \"${BACKOFFICE_UNSET_VAR}\"\n").unwrap();
        assert!(unresolved.validate().unwrap_err().to_string().contains("labels.file"));

        assert!(AppConfig::from_toml_str("[server\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[defaults]\ncurrency = \"EUR\"\n")
            .unwrap();
        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.defaults.currency, "EUR");
        assert_eq!(config.defaults.location, "ayala-central-bloc");
    }
}
