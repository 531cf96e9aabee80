use super::collector::{self, Collector, Output};
use super::config::PowertoolsEnv;
use super::error::{MetricsError, Result};
use super::metric_set::MAX_DIMENSIONS;
use std::io::Write;

/// Builder for the Embedded Cloudwatch Metrics Collector
///
/// # Example
/// ```
///  let metrics = powertools_metrics_emf::Builder::from_env()
///      .cloudwatch_namespace("MyApplication")
///      .init()
///      .unwrap();
/// ```
pub struct Builder {
    cloudwatch_namespace: Option<String>,
    env_namespace: Option<String>,
    service: Option<String>,
    default_dimensions: Vec<(String, String)>,
    timestamp: Option<u64>,
    writer: Option<Output>,
    raise_on_empty_metrics: bool,
    #[cfg(feature = "lambda")]
    function_name: Option<String>,
    #[cfg(feature = "lambda")]
    lambda_cold_start: Option<&'static str>,
    #[cfg(feature = "lambda")]
    lambda_request_id: Option<&'static str>,
    #[cfg(feature = "lambda")]
    lambda_xray_trace_id: Option<&'static str>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Builder {
            cloudwatch_namespace: None,
            env_namespace: None,
            service: None,
            default_dimensions: Vec::new(),
            timestamp: None,
            writer: None,
            raise_on_empty_metrics: false,
            #[cfg(feature = "lambda")]
            function_name: None,
            #[cfg(feature = "lambda")]
            lambda_cold_start: None,
            #[cfg(feature = "lambda")]
            lambda_request_id: None,
            #[cfg(feature = "lambda")]
            lambda_xray_trace_id: None,
        }
    }

    /// Seeds namespace, service and function name from the process environment
    /// * `POWERTOOLS_METRICS_NAMESPACE` wins over [cloudwatch_namespace](Builder::cloudwatch_namespace),
    ///   so a deployment can re-point the namespace without a code change
    /// * Explicit [service](Builder::service) and [with_function_name](Builder::with_function_name)
    ///   calls made afterwards take precedence
    pub fn from_env() -> Self {
        Self::from_powertools_env(&PowertoolsEnv::from_env())
    }

    pub fn from_powertools_env(env: &PowertoolsEnv) -> Self {
        #[allow(unused_mut)]
        let mut builder = Self {
            env_namespace: env.metrics_namespace.clone(),
            service: env.service_name.clone(),
            ..Self::new()
        };
        #[cfg(feature = "lambda")]
        {
            builder.function_name = env.function_name.clone();
        }
        builder
    }

    /// Sets the CloudWatch namespace for all metrics
    /// * A namespace from the environment takes precedence, see [from_env](Builder::from_env)
    /// * If never set, flushing fails validation until [Collector::add_namespace] is called
    pub fn cloudwatch_namespace(self, namespace: impl Into<String>) -> Self {
        Self {
            cloudwatch_namespace: Some(namespace.into()),
            ..self
        }
    }

    /// Sets the service name, emitted as a `service` dimension with every metric
    pub fn service(self, service: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            ..self
        }
    }

    /// Adds a static dimension (name, value), that will be sent with each document.
    /// * This method can be called multiple times with distinct names
    /// * Default dimensions count towards the limit of 9 dimensions
    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_dimensions.push((name.into(), value.into()));
        self
    }

    /// Uses a fixed timestamp (milliseconds since the epoch) instead of the current time
    pub fn with_timestamp(mut self, timestamp: u64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Writes documents somewhere other than stdout
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Fail the end of invocation flush when no metrics were added, otherwise only a warning is logged
    pub fn raise_on_empty_metrics(mut self, raise: bool) -> Self {
        self.raise_on_empty_metrics = raise;
        self
    }

    /// Overrides the `function_name` dimension of the cold start metric
    #[cfg(feature = "lambda")]
    pub fn with_function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    /// Emits a cold start metric with the given name once to mark a cold start
    #[cfg(feature = "lambda")]
    pub fn lambda_cold_start_metric(mut self, name: &'static str) -> Self {
        self.lambda_cold_start = Some(name);
        self
    }

    /// Decorates every document with request_id from the lambda request context as metadata
    /// with the given name
    #[cfg(feature = "lambda")]
    pub fn with_lambda_request_id(mut self, name: &'static str) -> Self {
        self.lambda_request_id = Some(name);
        self
    }

    /// Decorates every document with xray_trace_id from the lambda request context as metadata
    /// with the given name
    #[cfg(feature = "lambda")]
    pub fn with_lambda_xray_trace_id(mut self, name: &'static str) -> Self {
        self.lambda_xray_trace_id = Some(name);
        self
    }

    /// Private helper for consuming the builder into collector configuration
    fn config(self) -> Result<(collector::Config, Output)> {
        let mut default_dimensions = self.default_dimensions;
        if let Some(service) = &self.service {
            if !default_dimensions.iter().any(|(name, _)| name == "service") {
                default_dimensions.push(("service".to_string(), service.clone()));
            }
        }

        if default_dimensions.len() > MAX_DIMENSIONS {
            return Err(MetricsError::SchemaValidation(format!(
                "at most {MAX_DIMENSIONS} default dimensions are allowed, got {}",
                default_dimensions.len()
            )));
        }

        let config = collector::Config {
            cloudwatch_namespace: self.env_namespace.or(self.cloudwatch_namespace),
            default_dimensions,
            service: self.service,
            timestamp: self.timestamp,
            raise_on_empty_metrics: self.raise_on_empty_metrics,
            #[cfg(feature = "lambda")]
            function_name: self.function_name,
            #[cfg(feature = "lambda")]
            lambda_cold_start: self.lambda_cold_start,
            #[cfg(feature = "lambda")]
            lambda_request_id: self.lambda_request_id,
            #[cfg(feature = "lambda")]
            lambda_xray_trace_id: self.lambda_xray_trace_id,
        };
        let output = self.writer.unwrap_or_else(|| Box::new(std::io::stdout()));

        Ok((config, output))
    }

    /// Build a standalone collector without installing it as the metrics recorder
    pub fn build(self) -> Result<Collector> {
        let (config, output) = self.config()?;
        Ok(Collector::new(config, output))
    }

    /// Intialize the process wide collector including the call to metrics::set_global_recorder
    pub fn init(self) -> Result<&'static Collector> {
        let collector: &'static Collector = Box::leak(Box::new(self.build()?));
        metrics::set_global_recorder(collector::Recorder::from(collector)).map_err(|_| MetricsError::RecorderInstall)?;
        Ok(collector)
    }
}
