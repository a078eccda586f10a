use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // External tools
    pub synthesizer_bin: String,
    pub encoder_bin: String,
    pub process_timeout_secs: u64,
    // Temporary audio files
    pub temp_dir: PathBuf,
    pub temp_file_prefix: String,
    // HTTP
    pub static_dir: Option<PathBuf>,
    pub body_limit_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key/value source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Config {
            host: var("HOST", "0.0.0.0"),
            port: var("PORT", "3000").parse()?,
            environment: match var("ENVIRONMENT", "development").to_lowercase().as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var("LOG_FORMAT", "pretty").to_lowercase().as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            synthesizer_bin: var("SYNTHESIZER_BIN", "espeak-ng"),
            encoder_bin: var("ENCODER_BIN", "lame"),
            process_timeout_secs: var("PROCESS_TIMEOUT_SECS", "30").parse()?,
            temp_dir: lookup("TEMP_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            temp_file_prefix: var("TEMP_FILE_PREFIX", "tts_gateway_"),
            static_dir: lookup("STATIC_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
            body_limit_bytes: var("BODY_LIMIT_BYTES", "204800").parse()?,
        };

        if config.process_timeout_secs == 0 {
            return Err("PROCESS_TIMEOUT_SECS must be greater than zero".into());
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn process_timeout(&self) -> Duration {
        Duration::from_secs(self.process_timeout_secs)
    }
}
