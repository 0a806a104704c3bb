use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::Client as S3Client;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde_json::Value;
use signup_guard::utils::{logger, validation::Validate};
use signup_guard::{
    DomainGate, GateService, LambdaConfig, Outcome, S3DocumentStore, VerificationGate,
};

async fn function_handler(
    service: &GateService<S3DocumentStore>,
    event: LambdaEvent<Value>,
) -> Result<Outcome, Error> {
    tracing::info!(request_id = %event.context.request_id, "Handling gate event");

    let outcome = service.handle_event(event.payload).await;

    tracing::info!(status = outcome.status, "Gate event handled");
    Ok(outcome)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    let lambda_config = LambdaConfig::from_env()?;
    if let Err(e) = lambda_config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        return Err(e.into());
    }
    tracing::info!(
        "Starting signup-guard (max instances: {})",
        lambda_config.gate.max_instances
    );

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let s3_config = aws_sdk_s3::config::Builder::from(&config)
        .region(Region::new(lambda_config.s3_region.clone()))
        .build();
    let store = S3DocumentStore::new(
        S3Client::from_conf(s3_config),
        lambda_config.domains_bucket.clone(),
        lambda_config.domains_prefix.clone(),
    );

    // Built once per instance so the allow-list cache outlives single invocations.
    let service = GateService::new(
        DomainGate::new(store, lambda_config.gate.domains_doc_path.clone()),
        VerificationGate::from_config(&lambda_config.gate)?,
    );
    let service = &service;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        function_handler(service, event).await
    }))
    .await
}
