use crate::core::domain_gate::DomainGate;
use crate::core::verification_gate::VerificationGate;
use crate::domain::model::SignupEvent;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{ErrorKind, GateError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Incoming event, tagged by the trigger that produced it.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "trigger", content = "data", rename_all = "snake_case")]
pub enum GateRequest {
    BeforeUserCreated(SignupEvent),
    VerifyRecaptcha(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub status: ErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub error: ErrorBody,
}

/// Transport-level result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub status: u16,
    pub body: Value,
    #[serde(skip)]
    pub kind: Option<ErrorKind>,
}

impl Outcome {
    fn ok(body: Value) -> Self {
        Self {
            status: 200,
            body,
            kind: None,
        }
    }

    fn from_error(err: &GateError) -> Self {
        let kind = err.kind();
        let payload = ErrorPayload {
            error: ErrorBody {
                status: kind,
                message: err.to_string(),
            },
        };

        Self {
            status: kind.http_status(),
            body: serde_json::to_value(payload).unwrap_or(Value::Null),
            kind: Some(kind),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind.is_none()
    }
}

/// Owns both gates and routes events to them.
pub struct GateService<S: DocumentStore> {
    domain_gate: DomainGate<S>,
    verification_gate: VerificationGate,
}

impl<S: DocumentStore> GateService<S> {
    pub fn new(domain_gate: DomainGate<S>, verification_gate: VerificationGate) -> Self {
        Self {
            domain_gate,
            verification_gate,
        }
    }

    pub fn domain_gate(&self) -> &DomainGate<S> {
        &self.domain_gate
    }

    /// Decodes a raw event and dispatches it.
    pub async fn handle_event(&self, event: Value) -> Outcome {
        match serde_json::from_value::<GateRequest>(event) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::warn!("Rejecting undecodable event: {}", e);
                Outcome::from_error(&GateError::InvalidPayload(e))
            }
        }
    }

    pub async fn handle(&self, request: GateRequest) -> Outcome {
        match self.dispatch(request).await {
            Ok(body) => Outcome::ok(body),
            Err(err) => {
                match err.kind() {
                    ErrorKind::FailedPrecondition | ErrorKind::Internal => tracing::error!(
                        "Gate failed ({}): {} - {}",
                        err.kind(),
                        err,
                        err.recovery_suggestion()
                    ),
                    kind => tracing::info!("Gate rejected request ({}): {}", kind, err),
                }
                Outcome::from_error(&err)
            }
        }
    }

    async fn dispatch(&self, request: GateRequest) -> Result<Value> {
        match request {
            GateRequest::BeforeUserCreated(event) => {
                self.domain_gate.check_signup(&event).await?;
                Ok(Value::Null)
            }
            GateRequest::VerifyRecaptcha(payload) => {
                let response = self.verification_gate.verify(&payload).await?;
                Ok(serde_json::to_value(response)?)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryDocumentStore;
    use crate::core::domain_gate::ALLOWED_DOMAINS_DOC_PATH;
    use serde_json::json;

    fn service(disabled: bool) -> GateService<MemoryDocumentStore> {
        let store = MemoryDocumentStore::new();
        store.insert(
            ALLOWED_DOMAINS_DOC_PATH,
            json!({"domains": ["university.edu"]}),
        );
        GateService::new(
            DomainGate::new(store, ALLOWED_DOMAINS_DOC_PATH),
            VerificationGate::new(reqwest::Client::new(), "http://127.0.0.1:9", None, disabled),
        )
    }

    #[tokio::test]
    async fn test_signup_event_dispatch() {
        let service = service(true);

        let outcome = service
            .handle_event(json!({
                "trigger": "before_user_created",
                "data": {"email": "jane@university.edu", "uid": "u1"}
            }))
            .await;
        assert!(outcome.is_success());
        assert_eq!(outcome.body, Value::Null);

        let outcome = service
            .handle_event(json!({
                "trigger": "before_user_created",
                "data": {"email": "jane@gmail.com"}
            }))
            .await;
        assert_eq!(outcome.status, 403);
        assert_eq!(outcome.kind, Some(ErrorKind::PermissionDenied));
        assert_eq!(outcome.body["error"]["status"], "permission-denied");
        assert_eq!(service.domain_gate().store().reads(), 1);
    }

    #[tokio::test]
    async fn test_verify_event_dispatch() {
        let outcome = service(true)
            .handle_event(json!({"trigger": "verify_recaptcha", "data": {}}))
            .await;
        assert!(outcome.is_success());
        assert_eq!(outcome.body, json!({"success": true}));

        let outcome = service(false)
            .handle_event(json!({"trigger": "verify_recaptcha", "data": {"token": "t"}}))
            .await;
        assert_eq!(outcome.status, 400);
        assert_eq!(outcome.body["error"]["status"], "failed-precondition");
        assert_eq!(
            outcome.body["error"]["message"],
            "reCAPTCHA secret is not configured."
        );
    }

    #[tokio::test]
    async fn test_unknown_trigger_is_invalid_argument() {
        let outcome = service(true)
            .handle_event(json!({"trigger": "delete_everything", "data": {}}))
            .await;
        assert_eq!(outcome.status, 400);
        assert_eq!(outcome.body["error"]["status"], "invalid-argument");
    }
}
