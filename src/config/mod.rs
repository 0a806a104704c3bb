#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::core::domain_gate::ALLOWED_DOMAINS_DOC_PATH;
use crate::core::verification_gate::DEFAULT_VERIFY_URL;
use crate::utils::error::{GateError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_url, Validate};
use secrecy::SecretString;
use std::env;
use std::str::FromStr;

pub const DEFAULT_MAX_INSTANCES: usize = 10;
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;

/// Process-wide settings shared by both gates.
#[derive(Debug)]
pub struct GateConfig {
    pub recaptcha_secret: Option<SecretString>,
    pub recaptcha_disabled: bool,
    pub verify_url: String,
    pub verify_timeout_secs: u64,
    pub domains_doc_path: String,
    /// Platform concurrency ceiling. Reported, not enforced, by this crate.
    pub max_instances: usize,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            recaptcha_secret: None,
            recaptcha_disabled: false,
            verify_url: DEFAULT_VERIFY_URL.to_string(),
            verify_timeout_secs: DEFAULT_VERIFY_TIMEOUT_SECS,
            domains_doc_path: ALLOWED_DOMAINS_DOC_PATH.to_string(),
            max_instances: DEFAULT_MAX_INSTANCES,
        }
    }
}

impl GateConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source shaped like the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            recaptcha_secret: lookup("RECAPTCHA_SECRET_KEY")
                .filter(|secret| !secret.is_empty())
                .map(SecretString::from),
            recaptcha_disabled: lookup("RECAPTCHA_DISABLED").as_deref() == Some("true"),
            verify_url: lookup("RECAPTCHA_VERIFY_URL").unwrap_or(defaults.verify_url),
            verify_timeout_secs: parse_var(
                &lookup,
                "VERIFY_TIMEOUT_SECS",
                defaults.verify_timeout_secs,
            )?,
            domains_doc_path: lookup("ALLOWED_DOMAINS_DOC_PATH")
                .unwrap_or(defaults.domains_doc_path),
            max_instances: parse_var(&lookup, "MAX_INSTANCES", defaults.max_instances)?,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| GateError::InvalidConfigValueError {
                field: key.to_string(),
                value: raw.clone(),
                reason: "Value is not a valid number".to_string(),
            }),
    }
}

impl Validate for GateConfig {
    fn validate(&self) -> Result<()> {
        validate_url("verify_url", &self.verify_url)?;
        validate_non_empty_string("domains_doc_path", &self.domains_doc_path)?;
        validate_range("verify_timeout_secs", self.verify_timeout_secs, 1, 300)?;
        validate_range("max_instances", self.max_instances, 1, 1000)?;

        if self.recaptcha_disabled {
            tracing::warn!("⚠️ reCAPTCHA verification is disabled for this process");
        } else if self.recaptcha_secret.is_none() {
            tracing::warn!("⚠️ RECAPTCHA_SECRET_KEY is not set, verification requests will fail");
        }

        tracing::info!("✅ Gate configuration validation passed");
        Ok(())
    }
}
