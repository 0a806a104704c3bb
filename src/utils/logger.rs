use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins when set; otherwise only this crate's events are shown.
fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Human-readable output on stderr so stdout stays free for the outcome JSON.
pub fn init_cli_logger(verbose: bool) {
    let default = if verbose { "signup_guard=debug,info" } else { "signup_guard=info" };

    tracing_subscriber::registry()
        .with(env_filter(default))
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();
}

/// One JSON object per line; the Lambda log stream adds its own timestamps.
pub fn init_lambda_logger() {
    tracing_subscriber::registry()
        .with(env_filter("signup_guard=info"))
        .with(fmt::layer().with_target(false).without_time().json())
        .init();
}
