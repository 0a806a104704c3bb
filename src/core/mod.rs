pub mod cache;
pub mod domain_gate;
pub mod handler;
pub mod verification_gate;

pub use crate::domain::model::{AllowedDomains, GateResponse, SignupEvent, VerificationRequest, VerificationResult};
pub use crate::domain::ports::{Clock, DocumentStore, SystemClock};
pub use crate::utils::error::Result;
