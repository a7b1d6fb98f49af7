use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    // TTS engine
    pub tts_provider: TtsProvider,
    pub aws_region: String,
    pub openai_api_key: Option<String>,
    pub openai_tts_model: String,
    pub edge_tts_timeout_secs: u64,
    // Artifact store
    pub artifact_dir: PathBuf,
    pub synthesis_max_concurrency: usize,
    pub artifact_retention_minutes: u64,
    pub purge_artifacts_on_start: bool,
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

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Edge,
    Polly,
    OpenAi,
}

impl TtsProvider {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.to_lowercase().as_str() {
            "edge" => Ok(TtsProvider::Edge),
            "polly" => Ok(TtsProvider::Polly),
            "openai" => Ok(TtsProvider::OpenAi),
            other => Err(ConfigError::Invalid {
                name: "TTS_PROVIDER",
                value: other.to_string(),
                reason: "expected one of edge, polly, openai".to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let tts_provider = TtsProvider::parse(&var_or("TTS_PROVIDER", "edge"))?;
        let openai_api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        if tts_provider == TtsProvider::OpenAi && openai_api_key.is_none() {
            return Err(ConfigError::Missing("OPENAI_API_KEY"));
        }

        let synthesis_max_concurrency: usize = parse_var("SYNTHESIS_MAX_CONCURRENCY", "10")?;
        if synthesis_max_concurrency == 0 {
            return Err(ConfigError::Invalid {
                name: "SYNTHESIS_MAX_CONCURRENCY",
                value: "0".to_string(),
                reason: "must be at least 1 (1 runs tasks sequentially)".to_string(),
            });
        }

        let config = Config {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", "8080")?,
            environment: match var_or("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var_or("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            tts_provider,
            aws_region: var_or("AWS_REGION", "eu-west-1"),
            openai_api_key,
            openai_tts_model: var_or("OPENAI_TTS_MODEL", "tts-1"),
            edge_tts_timeout_secs: parse_var("EDGE_TTS_TIMEOUT_SECS", "60")?,
            artifact_dir: PathBuf::from(var_or("ARTIFACT_DIR", "audio_files")),
            synthesis_max_concurrency,
            artifact_retention_minutes: parse_var("ARTIFACT_RETENTION_MINUTES", "60")?,
            purge_artifacts_on_start: var_or("PURGE_ARTIFACTS_ON_START", "true").to_lowercase()
                == "true",
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &'static str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = var_or(name, default);
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        value,
        reason: e.to_string(),
    })
}
