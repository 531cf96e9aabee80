//! # Config
//!
//! The Powertools environment variable contract

use std::env;
use tracing::warn;

pub const SERVICE_NAME_ENV: &str = "POWERTOOLS_SERVICE_NAME";
pub const METRICS_NAMESPACE_ENV: &str = "POWERTOOLS_METRICS_NAMESPACE";
pub const TRACE_DISABLED_ENV: &str = "POWERTOOLS_TRACE_DISABLED";
pub const TRACE_MIDDLEWARES_ENV: &str = "POWERTOOLS_TRACE_MIDDLEWARES";
pub const LOGGER_LOG_EVENT_ENV: &str = "POWERTOOLS_LOGGER_LOG_EVENT";
pub const LOGGER_SAMPLE_RATE_ENV: &str = "POWERTOOLS_LOGGER_SAMPLE_RATE";
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Settings read from the Lambda environment
///
/// Only the service name, namespace and function name drive the metrics collector, the rest are
/// parsed for applications wiring up their own tracing and logging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PowertoolsEnv {
    /// Added as the `service` dimension
    pub service_name: Option<String>,
    pub metrics_namespace: Option<String>,
    pub trace_disabled: bool,
    pub trace_middlewares: Vec<String>,
    pub logger_log_event: bool,
    /// Debug sampling rate between 0.0 and 1.0
    pub logger_sample_rate: Option<f64>,
    pub log_level: Option<String>,
    pub function_name: Option<String>,
}

impl PowertoolsEnv {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Create configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        // blank values count as unset
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let logger_sample_rate = var(LOGGER_SAMPLE_RATE_ENV).and_then(|raw| match raw.parse::<f64>() {
            Ok(rate) if (0.0..=1.0).contains(&rate) => Some(rate),
            _ => {
                warn!("Ignoring {LOGGER_SAMPLE_RATE_ENV}={raw}, expected a number between 0 and 1");
                None
            }
        });

        Self {
            service_name: var(SERVICE_NAME_ENV),
            metrics_namespace: var(METRICS_NAMESPACE_ENV),
            trace_disabled: var(TRACE_DISABLED_ENV).is_some_and(|v| parse_bool(&v)),
            trace_middlewares: var(TRACE_MIDDLEWARES_ENV)
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|m| !m.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            logger_log_event: var(LOGGER_LOG_EVENT_ENV).is_some_and(|v| parse_bool(&v)),
            logger_sample_rate,
            log_level: var(LOG_LEVEL_ENV).map(|v| v.to_lowercase()),
            function_name: var(FUNCTION_NAME_ENV),
        }
    }
}

fn parse_bool(value: &str) -> bool {
    value.eq_ignore_ascii_case("true") || value == "1"
}
