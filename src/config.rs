use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

use crate::core::jitter::{JitterMode, JitterPolicy};
use crate::core::matcher::DEFAULT_MONTHLY_HOURS;
use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub directory: DirectorySettings,
    /// Without a database, confirmed matches live in process memory
    #[serde(default)]
    pub database: Option<DatabaseSettings>,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CacheSettings {
    /// Redis is optional; the L1 cache works on its own
    pub redis_url: Option<String>,
    pub ttl_secs: Option<u64>,
    pub l1_cache_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u16,
    #[serde(default = "default_max_limit")]
    pub max_limit: u16,
    #[serde(default = "default_monthly_hours")]
    pub estimated_monthly_hours: f64,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            estimated_monthly_hours: default_monthly_hours(),
        }
    }
}

fn default_limit() -> u16 { 20 }
fn default_max_limit() -> u16 { 100 }
fn default_monthly_hours() -> f64 { DEFAULT_MONTHLY_HOURS }

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_jitter_mode")]
    pub jitter: JitterMode,
    #[serde(default)]
    pub seed: u64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            jitter: default_jitter_mode(),
            seed: 0,
        }
    }
}

fn default_jitter_mode() -> JitterMode { JitterMode::Random }

impl ScoringSettings {
    pub fn jitter_policy(&self) -> JitterPolicy {
        JitterPolicy::new(self.jitter, self.seed)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_subject_weight")]
    pub subject: u8,
    #[serde(default = "default_experience_weight")]
    pub experience: u8,
    #[serde(default = "default_experience_threshold")]
    pub experience_threshold: u32,
    #[serde(default = "default_location_weight")]
    pub location: u8,
    #[serde(default = "default_jitter_max")]
    pub jitter_max: u8,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            subject: default_subject_weight(),
            experience: default_experience_weight(),
            experience_threshold: default_experience_threshold(),
            location: default_location_weight(),
            jitter_max: default_jitter_max(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(value: &WeightsConfig) -> Self {
        ScoringWeights {
            subject: value.subject,
            experience: value.experience,
            experience_threshold: value.experience_threshold,
            location: value.location,
            jitter_max: value.jitter_max,
        }
    }
}

fn default_subject_weight() -> u8 { 50 }
fn default_experience_weight() -> u8 { 20 }
fn default_experience_threshold() -> u32 { 50 }
fn default_location_weight() -> u8 { 10 }
fn default_jitter_max() -> u8 { 9 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

/// Output format of the tracing subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
    Text,
}

impl LogFormat {
    /// Unknown values fall back to plain text
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Text,
        }
    }
}

impl LoggingSettings {
    pub fn log_format(&self) -> LogFormat {
        LogFormat::parse(&self.format)
    }
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TUTOR_)
    /// 5. `DATABASE_URL` / `DIRECTORY_API_KEY`
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TUTOR__SERVER__PORT -> server.port
            .add_source(env_source())
            .build()?;

        settings = substitute_env_vars(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_source())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a TOML string, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("TUTOR")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

/// Apply the conventional unprefixed variables used by deploy tooling
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", database_url)?;
    }
    if let Ok(api_key) = env::var("DIRECTORY_API_KEY") {
        builder = builder.set_override("directory.api_key", api_key)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::from(&WeightsConfig::default());
        assert_eq!(weights, ScoringWeights::default());
    }

    #[test]
    fn test_default_logging() {
        let level = default_log_level();
        let format = default_log_format();
        assert_eq!(level, "info");
        assert_eq!(format, "json");
        assert_eq!(LoggingSettings::default().log_format(), LogFormat::Json);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" Pretty "), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Text);
    }

    #[test]
    fn test_minimal_config() {
        let settings = Settings::from_toml_str(
            r#"
            [directory]
            endpoint = "http://directory.local/v1"
            "#,
        )
        .unwrap();

        assert_eq!(settings.server.port, 8080);
        assert!(settings.database.is_none());
        assert!(settings.cache.redis_url.is_none());
        assert_eq!(settings.matching.max_limit, 100);
        assert_eq!(settings.scoring.jitter, JitterMode::Random);
    }

    #[test]
    fn test_scoring_overrides() {
        let settings = Settings::from_toml_str(
            r#"
            [directory]
            endpoint = "http://directory.local/v1"

            [scoring]
            jitter = "seeded"
            seed = 7

            [scoring.weights]
            experience_threshold = 30
            "#,
        )
        .unwrap();

        let weights = settings.scoring_weights();
        assert_eq!(weights.experience_threshold, 30);
        assert_eq!(weights.subject, 50);
        assert_eq!(settings.scoring.jitter_policy(), JitterPolicy::new(JitterMode::Seeded, 7));
    }

    #[test]
    fn test_directory_required() {
        assert!(Settings::from_toml_str("[server]\nport = 9000\n").is_err());
    }
}
