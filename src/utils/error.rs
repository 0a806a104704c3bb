use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a failure, surfaced to callers alongside the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorKind {
    /// Malformed or missing caller input.
    InvalidArgument,
    /// Missing or invalid server-side configuration. Operator-fixable.
    FailedPrecondition,
    /// Business-rule rejection.
    PermissionDenied,
    /// Transient failure reaching the verification service.
    Unavailable,
    /// Unexpected backend fault.
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid-argument",
            ErrorKind::FailedPrecondition => "failed-precondition",
            ErrorKind::PermissionDenied => "permission-denied",
            ErrorKind::Unavailable => "unavailable",
            ErrorKind::Internal => "internal",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            ErrorKind::InvalidArgument | ErrorKind::FailedPrecondition => 400,
            ErrorKind::PermissionDenied => 403,
            ErrorKind::Unavailable => 503,
            ErrorKind::Internal => 500,
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Email is required for registration.")]
    MissingEmail,

    #[error("Allowed email domains configuration is missing or invalid.")]
    InvalidDomainConfig,

    #[error("Unauthorized email domain \"{domain}\". Please use an allowed campus email.")]
    DomainNotAllowed { domain: String },

    #[error("reCAPTCHA secret is not configured.")]
    MissingSecret,

    #[error("reCAPTCHA token is required.")]
    MissingToken,

    #[error("Failed to verify reCAPTCHA token.")]
    VerificationUnavailable {
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("reCAPTCHA verification failed.")]
    VerificationFailed { error_codes: Vec<String> },

    #[error("Suspicious activity detected. Please try again.")]
    LowScore { score: f64 },

    #[error("reCAPTCHA action mismatch.")]
    ActionMismatch { expected: String, actual: String },

    #[error("Document store error: {message}")]
    StoreError { message: String },

    #[error("Invalid request payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl GateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            GateError::MissingEmail | GateError::MissingToken | GateError::InvalidPayload(_) => {
                ErrorKind::InvalidArgument
            }
            GateError::InvalidDomainConfig
            | GateError::MissingSecret
            | GateError::ConfigError { .. }
            | GateError::InvalidConfigValueError { .. } => ErrorKind::FailedPrecondition,
            GateError::DomainNotAllowed { .. }
            | GateError::VerificationFailed { .. }
            | GateError::LowScore { .. }
            | GateError::ActionMismatch { .. } => ErrorKind::PermissionDenied,
            GateError::VerificationUnavailable { .. } => ErrorKind::Unavailable,
            GateError::StoreError { .. } | GateError::IoError(_) => ErrorKind::Internal,
        }
    }

    /// Operator-facing hint, logged next to configuration failures.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GateError::InvalidDomainConfig => {
                "Make sure the domains document exists and holds a non-empty `domains` array of strings"
            }
            GateError::MissingSecret => "Set RECAPTCHA_SECRET_KEY or RECAPTCHA_DISABLED=true",
            GateError::ConfigError { .. } | GateError::InvalidConfigValueError { .. } => {
                "Check the environment variables and configuration file"
            }
            GateError::VerificationUnavailable { .. } => "The caller may retry later",
            GateError::StoreError { .. } | GateError::IoError(_) => {
                "Check connectivity and permissions of the document store"
            }
            _ => "No operator action required",
        }
    }
}

pub type Result<T> = std::result::Result<T, GateError>;
