pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

#[cfg(feature = "lambda")]
pub use adapters::S3DocumentStore;
#[cfg(feature = "lambda")]
pub use config::lambda::LambdaConfig;

pub use adapters::{LocalDocumentStore, MemoryDocumentStore};
pub use config::GateConfig;
pub use core::{
    cache::DomainCache,
    domain_gate::DomainGate,
    handler::{GateRequest, GateService, Outcome},
    verification_gate::VerificationGate,
};
pub use domain::model::{GateResponse, SignupEvent};
pub use utils::error::{ErrorKind, GateError, Result};
