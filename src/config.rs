//! Runtime configuration read from the environment.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
/// Pause inserted after each syntagma in generated speech.
pub const DEFAULT_BREAK_TIME_MS: u32 = 750;
pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:3000";

/// Error raised while reading configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but its value cannot be used
    InvalidValue { variable: String, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { variable, value } => {
                write!(f, "Invalid value for {}: '{}'", variable, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the bilingual text API, without a trailing slash
    pub api_url: String,
    pub timeout: Duration,
    pub break_time_ms: u32,
    pub web_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            break_time_ms: DEFAULT_BREAK_TIME_MS,
            web_addr: DEFAULT_WEB_ADDR.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `BILINGUAL_*` environment variables.
    ///
    /// Unset variables fall back to the defaults; set but malformed numbers
    /// are an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(url) = lookup("BILINGUAL_API_URL") {
            config.api_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(secs) = lookup("BILINGUAL_API_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_number("BILINGUAL_API_TIMEOUT_SECS", &secs)?);
        }
        if let Some(ms) = lookup("BILINGUAL_BREAK_TIME_MS") {
            config.break_time_ms = parse_number("BILINGUAL_BREAK_TIME_MS", &ms)?;
        }
        if let Some(addr) = lookup("BILINGUAL_WEB_ADDR") {
            config.web_addr = addr.trim().to_string();
        }

        Ok(config)
    }
}

fn parse_number<T: std::str::FromStr>(variable: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
        variable: variable.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.break_time_ms, 750);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BILINGUAL_API_URL", "https://reader.example.org/"),
            ("BILINGUAL_API_TIMEOUT_SECS", "30"),
            ("BILINGUAL_BREAK_TIME_MS", " 500 "),
            ("BILINGUAL_WEB_ADDR", "0.0.0.0:8080"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "https://reader.example.org");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.break_time_ms, 500);
        assert_eq!(config.web_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_malformed_number() {
        let result = Config::from_lookup(lookup(&[("BILINGUAL_BREAK_TIME_MS", "soon")]));
        match result {
            Err(ConfigError::InvalidValue { variable, .. }) => {
                assert_eq!(variable, "BILINGUAL_BREAK_TIME_MS")
            }
            _ => panic!("Expected InvalidValue"),
        }
    }
}
