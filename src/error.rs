/// Errors raised while collecting, validating or emitting metrics
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// The metric document would not pass the CloudWatch EMF schema
    #[error("Invalid format: {0}")]
    SchemaValidation(String),

    #[error("Invalid metric unit: {0}")]
    MetricUnit(String),

    #[error("Invalid metric value: {0}")]
    MetricValue(String),

    #[error("Namespace '{0}' already set - only one namespace is allowed across metrics")]
    UniqueNamespace(String),

    #[error("Failed to install metrics recorder, one is already installed")]
    RecorderInstall,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<std::convert::Infallible> for MetricsError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

pub type Result<T> = std::result::Result<T, MetricsError>;
