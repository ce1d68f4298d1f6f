use crate::model::ConfigError;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Process-wide configuration, read once from the environment at startup and
/// passed down explicitly. Credential values are never logged.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub serpapi_key: Option<String>,
    pub serper_api_key: Option<String>,
    pub brave_api_key: Option<String>,
    pub bing_api_key: Option<String>,
    /// Applied after every search-provider attempt, success or not.
    pub search_sleep: Duration,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let sleep_raw = env_opt("SEARCH_SLEEP_SEC").unwrap_or_else(|| "0.6".to_string());
        let sleep_sec: f64 = sleep_raw
            .parse()
            .map_err(|_| ConfigError::InvalidSleep(sleep_raw.clone()))?;

        Ok(Self {
            openai_api_key: env_opt("OPENAI_API_KEY"),
            openai_model: env_opt("OPENAI_MODEL").unwrap_or_else(|| "gpt-4o-mini".to_string()),
            serpapi_key: env_opt("SERPAPI_KEY"),
            serper_api_key: env_opt("SERPER_API_KEY"),
            brave_api_key: env_opt("BRAVE_API_KEY"),
            bing_api_key: env_opt("BING_API_KEY"),
            search_sleep: Duration::from_secs_f64(sleep_sec.max(0.0)),
            input_dir: PathBuf::from(
                env_opt("INPUT_DIR").unwrap_or_else(|| "./data/incoming".to_string()),
            ),
            output_dir: PathBuf::from(
                env_opt("OUTPUT_DIR").unwrap_or_else(|| "./data/processed".to_string()),
            ),
        })
    }

    /// Offline fixture: no credentials, zero sleep, cwd dirs.
    #[cfg(test)]
    pub fn offline() -> Self {
        Self {
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            serpapi_key: None,
            serper_api_key: None,
            brave_api_key: None,
            bing_api_key: None,
            search_sleep: Duration::from_millis(0),
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("."),
        }
    }
}
