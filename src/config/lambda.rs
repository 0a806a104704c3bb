use crate::config::GateConfig;
use crate::utils::error::{GateError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use std::env;

/// Lambda settings: the shared gate configuration plus where the
/// allow-list document lives in S3.
#[derive(Debug)]
pub struct LambdaConfig {
    pub gate: GateConfig,
    pub domains_bucket: String,
    pub domains_prefix: String,
    pub s3_region: String,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            gate: GateConfig::from_env()?,
            domains_bucket: env::var("DOMAINS_BUCKET").map_err(|_| GateError::ConfigError {
                message: "DOMAINS_BUCKET environment variable is required".to_string(),
            })?,
            domains_prefix: env::var("DOMAINS_PREFIX").unwrap_or_default(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .unwrap_or_else(|_| "ap-southeast-2".to_string()),
        })
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        self.gate.validate()?;
        validate_s3_bucket_name("domains_bucket", &self.domains_bucket)?;
        validate_aws_region("s3_region", &self.s3_region)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}

fn validate_s3_bucket_name(field_name: &str, bucket_name: &str) -> Result<()> {
    let invalid = |reason: &str| GateError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: bucket_name.to_string(),
        reason: reason.to_string(),
    };

    if bucket_name.len() < 3 || bucket_name.len() > 63 {
        return Err(invalid("S3 bucket name must be between 3 and 63 characters"));
    }

    if !bucket_name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(invalid(
            "S3 bucket name can only contain lowercase letters, numbers, hyphens, and dots",
        ));
    }

    if bucket_name.starts_with('-') || bucket_name.ends_with('-') {
        return Err(invalid("S3 bucket name cannot start or end with a hyphen"));
    }

    Ok(())
}

fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(GateError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: region.to_string(),
            reason: "AWS region can only contain lowercase letters, numbers, and hyphens"
                .to_string(),
        });
    }

    Ok(())
}
