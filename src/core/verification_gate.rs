use crate::config::GateConfig;
use crate::domain::model::{GateResponse, VerificationRequest, VerificationResult};
use crate::utils::error::{GateError, Result};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Duration;

/// Scores strictly below this are treated as bot traffic.
pub const SCORE_THRESHOLD: f64 = 0.5;

pub const DEFAULT_VERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";

/// Checks reCAPTCHA tokens against the `siteverify` endpoint.
pub struct VerificationGate {
    client: Client,
    endpoint: String,
    secret: Option<SecretString>,
    disabled: bool,
}

impl VerificationGate {
    pub fn new(
        client: Client,
        endpoint: impl Into<String>,
        secret: Option<SecretString>,
        disabled: bool,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            secret,
            disabled,
        }
    }

    pub fn from_config(config: &GateConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.verify_timeout_secs))
            .build()
            .map_err(|e| GateError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        let secret = config
            .recaptcha_secret
            .as_ref()
            .map(|secret| SecretString::from(secret.expose_secret().to_owned()));

        Ok(Self::new(
            client,
            config.verify_url.clone(),
            secret,
            config.recaptcha_disabled,
        ))
    }

    /// Verifies the raw callable payload `{ token, action? }`.
    pub async fn verify(&self, payload: &Value) -> Result<GateResponse> {
        if self.disabled {
            tracing::warn!("reCAPTCHA verification is disabled, accepting request");
            return Ok(GateResponse::accepted());
        }

        let secret = self.secret.as_ref().ok_or(GateError::MissingSecret)?;
        let request = VerificationRequest::from_payload(payload)?;

        let result = self.siteverify(secret, &request.token).await?;
        evaluate(&request, &result)?;

        tracing::info!(
            "reCAPTCHA token accepted (score: {:?}, action: {:?})",
            result.score,
            result.action
        );
        Ok(GateResponse::accepted())
    }

    async fn siteverify(&self, secret: &SecretString, token: &str) -> Result<VerificationResult> {
        let params = [("secret", secret.expose_secret()), ("response", token)];

        tracing::debug!("Posting token to {}", self.endpoint);
        let response = self
            .client
            .post(&self.endpoint)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("reCAPTCHA request failed: {}", e);
                GateError::VerificationUnavailable { source: Some(e) }
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("reCAPTCHA endpoint returned {}", status);
            return Err(GateError::VerificationUnavailable { source: None });
        }

        response.json::<VerificationResult>().await.map_err(|e| {
            tracing::warn!("reCAPTCHA response could not be decoded: {}", e);
            GateError::VerificationUnavailable { source: Some(e) }
        })
    }
}

/// Applies the success, score and action rules to a decoded response.
pub fn evaluate(request: &VerificationRequest, result: &VerificationResult) -> Result<()> {
    if !result.success {
        tracing::warn!("reCAPTCHA verification failed: {:?}", result.error_codes);
        return Err(GateError::VerificationFailed {
            error_codes: result.error_codes.clone(),
        });
    }

    if let Some(score) = result.score {
        if score < SCORE_THRESHOLD {
            tracing::warn!("reCAPTCHA score {} below threshold", score);
            return Err(GateError::LowScore { score });
        }
    }

    let actual = result.action.as_deref().filter(|action| !action.is_empty());
    if let (Some(expected), Some(actual)) = (request.action.as_deref(), actual) {
        if expected != actual {
            tracing::warn!("reCAPTCHA action mismatch: expected {}, got {}", expected, actual);
            return Err(GateError::ActionMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ErrorKind;
    use serde_json::json;

    fn request(action: Option<&str>) -> VerificationRequest {
        VerificationRequest {
            token: "token".to_string(),
            action: action.map(str::to_string),
        }
    }

    fn result(value: Value) -> VerificationResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_evaluate_rules() {
        let denied = |req: VerificationRequest, body: Value| {
            evaluate(&req, &result(body)).unwrap_err().kind() == ErrorKind::PermissionDenied
        };

        assert!(denied(request(None), json!({"success": false})));
        assert!(denied(request(None), json!({"success": true, "score": 0.3})));
        assert!(denied(
            request(Some("signup")),
            json!({"success": true, "score": 0.9, "action": "login"})
        ));

        assert!(evaluate(&request(Some("signup")), &result(json!({"success": true, "score": 0.9}))).is_ok());
        assert!(evaluate(&request(None), &result(json!({"success": true, "action": "login"}))).is_ok());
        assert!(evaluate(&request(None), &result(json!({"success": true, "score": 0.5}))).is_ok());
        assert!(evaluate(
            &request(Some("signup")),
            &VerificationResult {
                success: true,
                action: Some(String::new()),
                ..VerificationResult::default()
            }
        )
        .is_ok());
    }

    #[test]
    fn test_missing_success_field_is_failure() {
        let err = evaluate(&request(None), &result(json!({"score": 0.9}))).unwrap_err();
        assert!(matches!(err, GateError::VerificationFailed { .. }));
    }

    #[tokio::test]
    async fn test_disabled_gate_accepts_without_token() {
        let gate = VerificationGate::new(Client::new(), "http://127.0.0.1:9", None, true);
        let response = gate.verify(&json!({})).await.unwrap();
        assert!(response.success);
    }

    #[tokio::test]
    async fn test_missing_secret_is_failed_precondition() {
        let gate = VerificationGate::new(Client::new(), "http://127.0.0.1:9", None, false);
        let err = gate.verify(&json!({"token": "abc"})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
    }

    #[tokio::test]
    async fn test_non_string_token_is_invalid_argument() {
        let gate = VerificationGate::new(
            Client::new(),
            "http://127.0.0.1:9",
            Some(SecretString::from("secret".to_string())),
            false,
        );
        let err = gate.verify(&json!({"token": 42})).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }
}
