use anyhow::Context;
use clap::Parser;
use serde_json::{json, Value};
use signup_guard::config::cli::Command;
use signup_guard::utils::{logger, validation::Validate};
use signup_guard::{
    CliConfig, DomainGate, ErrorKind, GateRequest, GateService, LocalDocumentStore,
    SignupEvent, VerificationGate,
};
use std::io::Read;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::info!("Starting signup-guard CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    cli.validate().context("invalid command-line arguments")?;
    let config = cli.gate_config().context("failed to load configuration")?;
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(exit_code(e.kind()));
    }

    let store = LocalDocumentStore::new(&cli.documents_dir);
    let service = GateService::new(
        DomainGate::new(store, config.domains_doc_path.clone()),
        VerificationGate::from_config(&config)?,
    );

    let outcome = match cli.command {
        Command::CheckEmail { email } => {
            service
                .handle(GateRequest::BeforeUserCreated(SignupEvent::with_email(email)))
                .await
        }
        Command::Verify { token, action } => {
            service
                .handle(GateRequest::VerifyRecaptcha(
                    json!({ "token": token, "action": action }),
                ))
                .await
        }
        Command::Event { path } => {
            let event = read_event(path.as_deref())?;
            service.handle_event(event).await
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if let Some(kind) = outcome.kind {
        std::process::exit(exit_code(kind));
    }

    Ok(())
}

fn read_event(path: Option<&str>) -> anyhow::Result<Value> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read event file {}", path))?,
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read event from stdin")?;
            raw
        }
    };
    serde_json::from_str(&raw).context("event is not valid JSON")
}

/// 1 for rejected input, 2 for a retryable failure, 3 for broken configuration.
fn exit_code(kind: ErrorKind) -> i32 {
    match kind {
        ErrorKind::InvalidArgument | ErrorKind::PermissionDenied => 1,
        ErrorKind::Unavailable => 2,
        ErrorKind::FailedPrecondition | ErrorKind::Internal => 3,
    }
}
