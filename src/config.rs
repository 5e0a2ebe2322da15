use crate::error::{AppError, Result};
use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Connection settings for the PostgREST endpoint in front of the meter database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_readings_table")]
    pub readings_table: String,
    #[serde(default = "default_predictions_table")]
    pub predictions_table: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_readings_table() -> String {
    "meter_data".into()
}

fn default_predictions_table() -> String {
    "predictions".into()
}

fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_reading_interval_secs")]
    pub reading_interval_secs: u64,
    #[serde(default = "default_prediction_interval_secs")]
    pub prediction_interval_secs: u64,
}

fn default_reading_interval_secs() -> u64 {
    3
}

fn default_prediction_interval_secs() -> u64 {
    60
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            reading_interval_secs: default_reading_interval_secs(),
            prediction_interval_secs: default_prediction_interval_secs(),
        }
    }
}

impl PollingConfig {
    pub fn reading_interval(&self) -> Duration {
        Duration::from_secs(self.reading_interval_secs)
    }

    pub fn prediction_interval(&self) -> Duration {
        Duration::from_secs(self.prediction_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "0.0.0.0".into()
}

fn default_server_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// How timestamps and amounts are rendered for presentation consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Offset from UTC used for date strings and day/month labels
    #[serde(default)]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_currency_symbol() -> String {
    "₹".into()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl DisplayConfig {
    /// Offset used when formatting; falls back to UTC when out of range
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

impl Config {
    /// Load configuration from a YAML file, expanding $(VAR) and ${VAR} from the environment
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let expanded = expand_env_placeholders(content)?;
        let mut config: Config = serde_yaml::from_str(&expanded)?;

        // Credentials may be injected directly without touching the file
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            config.store.url = url;
        }
        if let Ok(key) = std::env::var("SUPABASE_KEY") {
            config.store.api_key = key;
        }

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.store.url.trim().is_empty() {
            return Err(AppError::Config("Store url cannot be empty".to_string()));
        }

        if self.store.api_key.trim().is_empty() {
            return Err(AppError::Config("Store api_key cannot be empty".to_string()));
        }

        if self.store.readings_table.is_empty() || self.store.predictions_table.is_empty() {
            return Err(AppError::Config(
                "Store table names cannot be empty".to_string(),
            ));
        }

        if self.store.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "Store request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.polling.reading_interval_secs == 0 || self.polling.prediction_interval_secs == 0 {
            return Err(AppError::Config(
                "Polling intervals must be greater than 0".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(AppError::Config("Server port cannot be 0".to_string()));
        }

        if self.display.utc_offset_minutes.abs() > 14 * 60 {
            return Err(AppError::Config(format!(
                "Display utc_offset_minutes out of range: {}",
                self.display.utc_offset_minutes
            )));
        }

        Ok(())
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
fn expand_env_placeholders(input: &str) -> Result<String> {
    let mut out = String::with_capacity(input.len());
    let mut it = input.chars().peekable();

    while let Some(c) = it.next() {
        if c != '$' {
            out.push(c);
            continue;
        }

        let close = match it.peek().copied() {
            Some('$') => {
                // "$$" -> "$"
                it.next();
                out.push('$');
                continue;
            }
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                continue;
            }
        };

        it.next();
        let var = read_until(&mut it, close).ok_or_else(|| {
            AppError::Config(format!(
                "unterminated env placeholder: missing '{}'",
                close
            ))
        })?;
        let value = std::env::var(&var)
            .map_err(|_| AppError::Config(format!("missing environment variable: {}", var)))?;
        out.push_str(&value);
    }

    Ok(out)
}

fn read_until<I>(it: &mut std::iter::Peekable<I>, end: char) -> Option<String>
where
    I: Iterator<Item = char>,
{
    let mut buf = String::new();
    for ch in it.by_ref() {
        if ch == end {
            return Some(buf);
        }
        buf.push(ch);
    }
    None
}
