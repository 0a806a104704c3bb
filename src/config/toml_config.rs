use crate::config::GateConfig;
use crate::utils::error::{GateError, Result};
use regex::Regex;
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;

/// Optional file-based overrides for [`GateConfig`].
///
/// ```toml
/// [recaptcha]
/// secret = "${RECAPTCHA_SECRET_KEY}"
/// verify_url = "https://www.google.com/recaptcha/api/siteverify"
/// timeout_seconds = 5
///
/// [domains]
/// document_path = "config/emailDomains"
///
/// [platform]
/// max_instances = 10
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub recaptcha: RecaptchaSection,
    #[serde(default)]
    pub domains: DomainsSection,
    #[serde(default)]
    pub platform: PlatformSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecaptchaSection {
    pub secret: Option<String>,
    pub disabled: Option<bool>,
    pub verify_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DomainsSection {
    pub document_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlatformSection {
    pub max_instances: Option<usize>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GateError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GateError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the value of the environment variable, leaving
    /// unknown variables untouched.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GateError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlays every value present in the file onto `config`.
    pub fn apply_to(self, config: &mut GateConfig) {
        let RecaptchaSection {
            secret,
            disabled,
            verify_url,
            timeout_seconds,
        } = self.recaptcha;

        // An unresolved `${VAR}` is treated as no secret at all.
        if let Some(secret) = secret.filter(|s| !s.is_empty() && !s.contains("${")) {
            config.recaptcha_secret = Some(SecretString::from(secret));
        }
        if let Some(disabled) = disabled {
            config.recaptcha_disabled = disabled;
        }
        if let Some(verify_url) = verify_url {
            config.verify_url = verify_url;
        }
        if let Some(timeout) = timeout_seconds {
            config.verify_timeout_secs = timeout;
        }
        if let Some(path) = self.domains.document_path {
            config.domains_doc_path = path;
        }
        if let Some(max_instances) = self.platform.max_instances {
            config.max_instances = max_instances;
        }
    }
}
