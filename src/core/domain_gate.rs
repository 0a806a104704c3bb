use crate::core::cache::DomainCache;
use crate::domain::model::SignupEvent;
use crate::domain::ports::DocumentStore;
use crate::utils::error::{GateError, Result};

/// Default location of the allow-list document.
pub const ALLOWED_DOMAINS_DOC_PATH: &str = "config/emailDomains";

/// Rejects sign-ups whose email domain is not on the allow-list.
pub struct DomainGate<S: DocumentStore> {
    store: S,
    document_path: String,
    cache: DomainCache,
}

impl<S: DocumentStore> DomainGate<S> {
    pub fn new(store: S, document_path: impl Into<String>) -> Self {
        Self::with_cache(store, document_path, DomainCache::new())
    }

    pub fn with_cache(store: S, document_path: impl Into<String>, cache: DomainCache) -> Self {
        Self {
            store,
            document_path: document_path.into(),
            cache,
        }
    }

    pub fn cache(&self) -> &DomainCache {
        &self.cache
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns `Ok(())` when the sign-up may proceed.
    pub async fn check_signup(&self, event: &SignupEvent) -> Result<()> {
        let email = event
            .email
            .as_deref()
            .filter(|email| !email.is_empty())
            .ok_or(GateError::MissingEmail)?;

        let allowed = self.cache.resolve(&self.store, &self.document_path).await?;

        match email_domain(email) {
            Some(domain) if allowed.contains(&domain) => {
                tracing::info!("Sign-up accepted for domain {}", domain);
                Ok(())
            }
            domain => {
                let domain = domain.unwrap_or_else(|| "unknown".to_string());
                tracing::warn!("Sign-up rejected for domain {}", domain);
                Err(GateError::DomainNotAllowed { domain })
            }
        }
    }
}

/// Lowercased text after the last `@`, or `None` when there is none.
pub fn email_domain(email: &str) -> Option<String> {
    email
        .rsplit_once('@')
        .map(|(_, domain)| domain.to_lowercase())
        .filter(|domain| !domain.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryDocumentStore;
    use crate::utils::error::ErrorKind;
    use serde_json::json;

    fn gate(domains: serde_json::Value) -> DomainGate<MemoryDocumentStore> {
        let store = MemoryDocumentStore::new();
        store.insert(ALLOWED_DOMAINS_DOC_PATH, domains);
        DomainGate::new(store, ALLOWED_DOMAINS_DOC_PATH)
    }

    #[test]
    fn test_email_domain() {
        assert_eq!(email_domain("jane@university.edu").as_deref(), Some("university.edu"));
        assert_eq!(email_domain("Jane@UNIVERSITY.EDU").as_deref(), Some("university.edu"));
        assert_eq!(email_domain("a@b@lab.org").as_deref(), Some("lab.org"));
        assert_eq!(email_domain("no-at-symbol"), None);
        assert_eq!(email_domain("jane@"), None);
        assert_eq!(email_domain("jane@university.edu ").as_deref(), Some("university.edu "));
    }

    #[tokio::test]
    async fn test_case_folded_domain_is_accepted() {
        let gate = gate(json!({"domains": ["university.edu"]}));
        let result = gate
            .check_signup(&SignupEvent::with_email("Jane@UNIVERSITY.EDU"))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_unlisted_domain_is_denied() {
        let gate = gate(json!({"domains": ["university.edu"]}));
        let err = gate
            .check_signup(&SignupEvent::with_email("jane@gmail.com"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(err.to_string().contains("\"gmail.com\""));
    }

    #[tokio::test]
    async fn test_malformed_email_reports_unknown_domain() {
        let gate = gate(json!({"domains": ["university.edu"]}));
        let err = gate
            .check_signup(&SignupEvent::with_email("jane"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(err.to_string().contains("\"unknown\""));
    }

    #[tokio::test]
    async fn test_missing_email_is_invalid_argument() {
        let gate = gate(json!({"domains": ["university.edu"]}));

        let err = gate.check_signup(&SignupEvent::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);

        let err = gate
            .check_signup(&SignupEvent::with_email(""))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(gate.store().reads(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_is_not_stripped_from_email() {
        let gate = gate(json!({"domains": ["university.edu"]}));

        let err = gate
            .check_signup(&SignupEvent::with_email("   "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert!(err.to_string().contains("\"unknown\""));

        let err = gate
            .check_signup(&SignupEvent::with_email("jane@university.edu "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn test_bad_document_fails_closed() {
        let gate = gate(json!({"domains": "university.edu"}));
        let err = gate
            .check_signup(&SignupEvent::with_email("jane@university.edu"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
    }

    #[tokio::test]
    async fn test_repeated_checks_share_one_read() {
        let gate = gate(json!({"domains": ["university.edu"]}));
        for email in ["a@university.edu", "b@university.edu", "c@other.org"] {
            let _ = gate.check_signup(&SignupEvent::with_email(email)).await;
        }
        assert_eq!(gate.store().reads(), 1);
    }
}
