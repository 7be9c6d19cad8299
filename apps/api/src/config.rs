use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};

use crate::ranking::FailurePolicy;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub upload_dir: PathBuf,
    pub persist_uploads: bool,
    pub failure_policy: FailurePolicy,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. `from_env` passes the process
    /// environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            upload_dir: lookup("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            persist_uploads: match lookup("PERSIST_UPLOADS") {
                Some(raw) => parse_bool(&raw).context("PERSIST_UPLOADS must be true or false")?,
                None => true,
            },
            failure_policy: match lookup("EXTRACTION_FAILURE_POLICY") {
                Some(raw) => FailurePolicy::from_str(&raw)?,
                None => FailurePolicy::Abort,
            },
            max_upload_bytes: match lookup("MAX_UPLOAD_BYTES") {
                Some(raw) => raw
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                None => DEFAULT_MAX_UPLOAD_BYTES,
            },
        })
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.upload_dir, PathBuf::from("uploads"));
        assert!(config.persist_uploads);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(&[
            ("PORT", "5000"),
            ("UPLOAD_DIR", "/tmp/resumes"),
            ("PERSIST_UPLOADS", "off"),
            ("EXTRACTION_FAILURE_POLICY", "skip"),
            ("MAX_UPLOAD_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/resumes"));
        assert!(!config.persist_uploads);
        assert_eq!(config.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.max_upload_bytes, 1024);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        assert!(config_from(&[("PORT", "http")]).is_err());
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(config_from(&[("EXTRACTION_FAILURE_POLICY", "retry")]).is_err());
    }

    #[test]
    fn test_invalid_bool_is_rejected() {
        assert!(config_from(&[("PERSIST_UPLOADS", "maybe")]).is_err());
    }
}
