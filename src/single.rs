//! # Single Metric
//!
//! A one-off metric with its own dimension set, written independently of the collector's batch

use super::collector::Collector;
use super::error::Result;
use super::metric_set::MetricSet;
use super::unit::MetricUnit;
use serde_json::value::Value;
use tracing::{debug, error};

/// Guard returned by [Collector::single_metric]
///
/// Neither the collector's dimensions nor its default dimensions apply. The metric is written
/// when [close](SingleMetric::close) is called or when the guard is dropped.
///
/// # Example
/// ```
/// use powertools_metrics_emf::MetricUnit;
///
/// let metrics = powertools_metrics_emf::Builder::new()
///     .cloudwatch_namespace("ServerlessAirline")
///     .build()
///     .unwrap();
///
/// let mut metric = metrics.single_metric("ColdStart", MetricUnit::Count, 1).unwrap();
/// metric.add_dimension("function_context", "$LATEST");
/// metric.close().unwrap();
/// ```
pub struct SingleMetric<'a> {
    collector: &'a Collector,
    set: MetricSet,
    closed: bool,
}

impl<'a> SingleMetric<'a> {
    pub(crate) fn new(
        collector: &'a Collector,
        namespace: Option<String>,
        name: String,
        unit: MetricUnit,
        value: f64,
    ) -> Result<Self> {
        let mut set = MetricSet::with_namespace(namespace);
        set.add_metric(name, unit, value)?;
        Ok(Self {
            collector,
            set,
            closed: false,
        })
    }

    pub fn add_dimension(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.set.add_dimension(name.into(), value.into());
        self
    }

    pub fn add_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.set.add_metadata(key.into(), value.into());
        self
    }

    /// Publish under a different namespace than the collector's
    pub fn namespace(&mut self, name: impl Into<String>) -> &mut Self {
        self.set.replace_namespace(name.into());
        self
    }

    /// Validate and write the metric, surfacing any error
    pub fn close(mut self) -> Result<()> {
        self.closed = true;
        debug!("Publishing single metric");
        self.collector.write_document(&self.set, &[])
    }
}

impl Drop for SingleMetric<'_> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        if let Err(e) = self.collector.write_document(&self.set, &[]) {
            error!("Failed to publish single metric: {e}");
        }
    }
}
