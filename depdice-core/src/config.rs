use std::env;
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct DepdiceConfig {
    pub npm_bin: String,
    pub yarn_bin: String,
    pub command_timeout: Duration,
}

impl DepdiceConfig {
    pub fn from_env() -> Self {
        let npm_bin = read_binary_from_env("DEPDICE_NPM", "npm");
        let yarn_bin = read_binary_from_env("DEPDICE_YARN", "yarn");
        let command_timeout = Duration::from_secs(
            read_timeout_from_env().unwrap_or(DEFAULT_TIMEOUT_SECS),
        );

        DepdiceConfig {
            npm_bin,
            yarn_bin,
            command_timeout,
        }
    }

    pub fn with_timeout_secs(mut self, seconds: u64) -> Self {
        if seconds > 0 {
            self.command_timeout = Duration::from_secs(seconds);
        }
        self
    }
}

impl Default for DepdiceConfig {
    fn default() -> Self {
        DepdiceConfig {
            npm_bin: "npm".to_string(),
            yarn_bin: "yarn".to_string(),
            command_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

fn read_binary_from_env(key: &str, fallback: &str) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn read_timeout_from_env() -> Option<u64> {
    let value = env::var("DEPDICE_TIMEOUT_SECS").ok()?;
    parse_timeout(&value)
}

fn parse_timeout(value: &str) -> Option<u64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    match trimmed.parse::<u64>() {
        Ok(parsed) if parsed > 0 => Some(parsed),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_timeouts_only() {
        assert_eq!(parse_timeout(" 30 "), Some(30));
        assert_eq!(parse_timeout("0"), None);
        assert_eq!(parse_timeout("soon"), None);
        assert_eq!(parse_timeout(""), None);
    }

    #[test]
    fn zero_timeout_override_keeps_existing_value() {
        let config = DepdiceConfig::default().with_timeout_secs(0);
        assert_eq!(config.command_timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let config = DepdiceConfig::default().with_timeout_secs(3);
        assert_eq!(config.command_timeout, Duration::from_secs(3));
    }
}
