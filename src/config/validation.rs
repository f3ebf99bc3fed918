use super::models::Config;
use thiserror::Error;

/// One year
pub const MAX_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("retry_attempts must be at least 1")]
    ZeroRetryAttempts,

    #[error("min_delay ({min}ms) is greater than max_delay ({max}ms)")]
    InvalidDelayWindow { min: u64, max: u64 },

    #[error("Invalid api.base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Endpoint api.{field} is empty")]
    EmptyEndpoint { field: &'static str },

    #[error("schedule.interval_secs must be positive")]
    ZeroInterval,

    #[error("schedule.interval_secs ({secs}) exceeds the maximum of {max}")]
    IntervalTooLong { secs: u64, max: u64 },
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_limits(config)?;
    validate_api(config)?;
    validate_schedule(config)?;
    Ok(())
}

fn validate_limits(config: &Config) -> Result<(), ValidationError> {
    if config.concurrency == 0 {
        return Err(ValidationError::ZeroConcurrency);
    }

    if config.retry_attempts == 0 {
        return Err(ValidationError::ZeroRetryAttempts);
    }

    if config.min_delay > config.max_delay {
        return Err(ValidationError::InvalidDelayWindow {
            min: config.min_delay,
            max: config.max_delay,
        });
    }

    Ok(())
}

fn validate_api(config: &Config) -> Result<(), ValidationError> {
    let api = &config.api;

    reqwest::Url::parse(&api.base_url).map_err(|e| ValidationError::InvalidBaseUrl {
        url: api.base_url.clone(),
        reason: e.to_string(),
    })?;

    let endpoints = [
        ("auth_endpoint", &api.auth_endpoint),
        ("quest_list_endpoint", &api.quest_list_endpoint),
        ("complete_task_endpoint", &api.complete_task_endpoint),
        ("claim_task_endpoint", &api.claim_task_endpoint),
    ];

    for (field, path) in endpoints {
        if path.trim().is_empty() {
            return Err(ValidationError::EmptyEndpoint { field });
        }
    }

    Ok(())
}

fn validate_schedule(config: &Config) -> Result<(), ValidationError> {
    if config.schedule.interval_secs == 0 {
        return Err(ValidationError::ZeroInterval);
    }

    if config.schedule.interval_secs > MAX_INTERVAL_SECS {
        return Err(ValidationError::IntervalTooLong {
            secs: config.schedule.interval_secs,
            max: MAX_INTERVAL_SECS,
        });
    }

    Ok(())
}
