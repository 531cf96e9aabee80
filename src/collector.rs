//! # Collector
//!
//! Metrics aggregator + emitter returned from powertools_metrics_emf::Builder

use super::error::{MetricsError, Result};
use super::metric_set::{self, MetricSet, MAX_METRICS, MAX_VALUES_PER_METRIC};
use super::single::SingleMetric;
use super::unit::MetricUnit;
use metrics::SharedString;
use serde_json::value::Value;
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, error};

/// Destination for serialized metric documents
pub type Output = Box<dyn Write + Send>;

/// Configuration via Builder
pub struct Config {
    pub cloudwatch_namespace: Option<String>,
    pub default_dimensions: Vec<(String, String)>,
    pub service: Option<String>,
    pub timestamp: Option<u64>,
    pub raise_on_empty_metrics: bool,
    #[cfg(feature = "lambda")]
    pub function_name: Option<String>,
    #[cfg(feature = "lambda")]
    pub lambda_cold_start: Option<&'static str>,
    #[cfg(feature = "lambda")]
    pub lambda_request_id: Option<&'static str>,
    #[cfg(feature = "lambda")]
    pub lambda_xray_trace_id: Option<&'static str>,
}

/// Collector state used to accumulate metrics and register recorder handles
/// This lives within a mutex
struct CollectorState {
    set: MetricSet,
    /// Units from describe_xxx, keyed by metric name
    units: HashMap<String, MetricUnit>,
    /// Gauges keep their current value across registrations
    gauges: HashMap<String, Arc<GaugeHandle>>,
}

/// Embedded CloudWatch Metrics aggregator + emitter
///
/// Use [Builder](super::Builder) to construct
///
/// # Example
/// ```
/// use powertools_metrics_emf::MetricUnit;
///
/// let metrics = powertools_metrics_emf::Builder::new()
///     .cloudwatch_namespace("ServerlessAirline")
///     .with_dimension("environment", "prod")
///     .build()
///     .unwrap();
///
/// metrics.add_metric("SuccessfulBooking", MetricUnit::Count, 1).unwrap();
/// metrics.add_metadata("booking_id", "7051cd10");
/// metrics.flush().unwrap();
/// ```
pub struct Collector {
    state: Mutex<CollectorState>,
    output: Mutex<Output>,
    #[cfg(feature = "lambda")]
    cold_start: std::sync::atomic::AtomicBool,
    pub config: Config,
}

impl Collector {
    pub fn new(config: Config, output: Output) -> Self {
        Self {
            state: Mutex::new(CollectorState {
                set: MetricSet::with_namespace(config.cloudwatch_namespace.clone()),
                units: HashMap::new(),
                gauges: HashMap::new(),
            }),
            output: Mutex::new(output),
            #[cfg(feature = "lambda")]
            cold_start: std::sync::atomic::AtomicBool::new(true),
            config,
        }
    }

    fn state(&self) -> MutexGuard<'_, CollectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Compute the timestamp unless it was set via [Builder::with_timestamp](super::Builder::with_timestamp)
    fn timestamp(&self) -> u64 {
        match self.config.timestamp {
            Some(t) => t,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default(),
        }
    }

    /// Adds a data point to the current batch
    ///
    /// * `unit` may be a [MetricUnit], a [metrics::Unit] or a CloudWatch unit string
    /// * When `name` would be the 100th distinct metric, or its 101st value, the existing batch is
    ///   flushed first and the new value starts a fresh batch. Dimensions, metadata and namespace
    ///   carry over to the fresh batch.
    pub fn add_metric<U>(&self, name: impl Into<String>, unit: U, value: impl Into<f64>) -> Result<()>
    where
        U: TryInto<MetricUnit>,
        MetricsError: From<U::Error>,
    {
        let unit = unit.try_into()?;
        let mut state = self.state();
        self.add_metric_locked(&mut state, name.into(), unit, value.into())
    }

    fn add_metric_locked(&self, state: &mut CollectorState, name: String, unit: MetricUnit, value: f64) -> Result<()> {
        metric_set::check_value(&name, value)?;

        if state.set.is_full_for(&name) {
            debug!(
                "Exceeded maximum of {MAX_METRICS} metrics or {MAX_VALUES_PER_METRIC} values - publishing existing metric set"
            );
            self.write_document(&state.set, &self.config.default_dimensions)?;
            state.set.clear_values();
        }

        debug!("Adding metric: {name} with {value} {unit}");
        state.set.add_metric(name, unit, value)
    }

    /// Adds a dimension applied to every metric in the batch
    /// * Adding the same name twice overwrites the previous value
    /// * More than 9 dimensions fail validation when flushing
    pub fn add_dimension(&self, name: impl Into<String>, value: impl Into<String>) -> &Self {
        let (name, value) = (name.into(), value.into());
        debug!("Adding dimension: {name}:{value}");
        self.state().set.add_dimension(name, value);
        self
    }

    /// Sets the namespace, only one namespace is allowed across metrics
    pub fn add_namespace(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        debug!("Adding metrics namespace: {name}");
        self.state().set.set_namespace(name)
    }

    /// Adds a non-metric property written alongside the metrics
    /// * Kept across automatic flushes, cleared by [flush](Collector::flush)
    pub fn add_metadata(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.state().set.add_metadata(key.into(), value.into());
        self
    }

    pub fn remove_metadata(&self, key: &str) -> &Self {
        self.state().set.remove_metadata(key);
        self
    }

    /// Validates the current batch and returns its EMF document without clearing it
    pub fn serialize_metric_set(&self) -> Result<Value> {
        let state = self.state();
        debug!("Serializing {} metrics", state.set.metric_count());
        let emf = state.set.to_emf(&self.config.default_dimensions, self.timestamp())?;
        Ok(serde_json::to_value(&emf)?)
    }

    /// Resets metrics, dimensions and metadata, default dimensions and namespace are kept
    pub fn clear_metrics(&self) {
        debug!("Clearing out existing metric set from memory");
        self.state().set.clear();
    }

    /// True when no metrics, dimensions or metadata are pending
    pub fn is_empty(&self) -> bool {
        self.state().set.is_empty()
    }

    /// Values currently pending under `name`
    pub fn metric_values(&self, name: &str) -> Option<Vec<f64>> {
        self.state().set.values(name).map(<[f64]>::to_vec)
    }

    pub fn namespace(&self) -> Option<String> {
        self.state().set.namespace().map(str::to_owned)
    }

    /// Validate, write the batch as a single line to the output and clear it
    /// * Nothing is written or cleared if validation fails
    pub fn flush(&self) -> Result<()> {
        let mut state = self.state();
        self.write_document(&state.set, &self.config.default_dimensions)?;
        state.set.clear();
        Ok(())
    }

    /// Flush used at the end of an invocation, an empty batch only warns unless configured to raise
    #[cfg(feature = "lambda")]
    pub(crate) fn flush_invocation(&self) -> Result<()> {
        let mut state = self.state();
        if state.set.metric_count() == 0 && !self.config.raise_on_empty_metrics {
            tracing::warn!("No application metrics to publish. The cold-start metric may be published if enabled.");
            state.set.clear();
            return Ok(());
        }
        self.write_document(&state.set, &self.config.default_dimensions)?;
        state.set.clear();
        Ok(())
    }

    /// Starts an isolated one-metric batch with its own dimensions, flushed when closed or dropped
    pub fn single_metric<U>(&self, name: impl Into<String>, unit: U, value: impl Into<f64>) -> Result<SingleMetric<'_>>
    where
        U: TryInto<MetricUnit>,
        MetricsError: From<U::Error>,
    {
        SingleMetric::new(self, self.namespace(), name.into(), unit.try_into()?, value.into())
    }

    /// Serialize a batch and write it as one line to the output
    pub(crate) fn write_document(&self, set: &MetricSet, defaults: &[(String, String)]) -> Result<()> {
        let emf = set.to_emf(defaults, self.timestamp())?;
        let mut line = serde_json::to_vec(&emf)?;
        line.push(b'\n');

        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        output.write_all(&line)?;
        output.flush()?;
        Ok(())
    }

    /// True exactly once per process
    #[cfg(feature = "lambda")]
    pub(crate) fn take_cold_start(&self) -> bool {
        self.cold_start.swap(false, Ordering::Relaxed)
    }

    /// Emits the cold start metric as its own document with `function_name` and `service` dimensions
    #[cfg(feature = "lambda")]
    pub(crate) fn emit_cold_start(&self, name: &str) -> Result<()> {
        let mut metric = self.single_metric(name, MetricUnit::Count, 1)?;
        if let Some(function_name) = &self.config.function_name {
            metric.add_dimension("function_name", function_name.as_str());
        }
        if let Some(service) = &self.config.service {
            metric.add_dimension("service", service.as_str());
        }
        metric.close()
    }

    /// update the unit for a metric name, disregard what metric type it is
    fn update_unit(&self, key: metrics::KeyName, unit: Option<metrics::Unit>) {
        let mut state = self.state();

        match unit.map(MetricUnit::try_from) {
            Some(Ok(unit)) => {
                state.units.insert(key.as_str().to_string(), unit);
            }
            Some(Err(e)) => {
                error!("Unable to describe {}: {e}", key.as_str());
                state.units.remove(key.as_str());
            }
            None => {
                state.units.remove(key.as_str());
            }
        }
    }

    /// Entry point for recorder handles, failures can only be logged
    fn record(&self, name: &str, default_unit: MetricUnit, value: f64) {
        let mut state = self.state();
        let unit = state.units.get(name).copied().unwrap_or(default_unit);
        if let Err(e) = self.add_metric_locked(&mut state, name.to_string(), unit, value) {
            error!("Unable to record {name}: {e}");
        }
    }
}

struct CounterHandle {
    collector: &'static Collector,
    name: String,
}

impl metrics::CounterFn for CounterHandle {
    fn increment(&self, value: u64) {
        self.collector.record(&self.name, MetricUnit::Count, value as f64);
    }

    fn absolute(&self, value: u64) {
        self.collector.record(&self.name, MetricUnit::Count, value as f64);
    }
}

/// Gauge value stored as f64 bits, each update records the resulting value
struct GaugeHandle {
    collector: &'static Collector,
    name: String,
    value: AtomicU64,
}

impl GaugeHandle {
    fn update(&self, f: impl Fn(f64) -> f64) {
        let mut current = self.value.load(Ordering::Relaxed);
        let new = loop {
            let new = f(f64::from_bits(current));
            match self
                .value
                .compare_exchange_weak(current, new.to_bits(), Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => break new,
                Err(actual) => current = actual,
            }
        };
        self.collector.record(&self.name, MetricUnit::NoUnit, new);
    }
}

impl metrics::GaugeFn for GaugeHandle {
    fn increment(&self, value: f64) {
        self.update(|current| current + value);
    }

    fn decrement(&self, value: f64) {
        self.update(|current| current - value);
    }

    fn set(&self, value: f64) {
        self.update(|_| value);
    }
}

struct HistogramHandle {
    collector: &'static Collector,
    name: String,
}

impl metrics::HistogramFn for HistogramHandle {
    fn record(&self, value: f64) {
        self.collector.record(&self.name, MetricUnit::NoUnit, value);
    }
}

/// [metrics::Recorder] feeding `counter!`, `gauge!` and `histogram!` into a [Collector]
///
/// Labels are not supported as dimensions are batch wide, use [Collector::add_dimension]
pub struct Recorder {
    collector: &'static Collector,
}

impl From<&'static Collector> for Recorder {
    fn from(collector: &'static Collector) -> Self {
        Self { collector }
    }
}

impl Recorder {
    fn reject_labels(&self, kind: &str, key: &metrics::Key) -> bool {
        if key.labels().next().is_some() {
            error!(
                "Unable to register {kind} {} as labels are not supported, use add_dimension instead",
                key.name()
            );
            return true;
        }
        false
    }
}

impl metrics::Recorder for Recorder {
    fn describe_counter(&self, key: metrics::KeyName, unit: Option<metrics::Unit>, _description: SharedString) {
        self.collector.update_unit(key, unit)
    }

    fn describe_gauge(&self, key: metrics::KeyName, unit: Option<metrics::Unit>, _description: SharedString) {
        self.collector.update_unit(key, unit)
    }

    fn describe_histogram(&self, key: metrics::KeyName, unit: Option<metrics::Unit>, _description: SharedString) {
        self.collector.update_unit(key, unit)
    }

    fn register_counter(&self, key: &metrics::Key, _metadata: &metrics::Metadata<'_>) -> metrics::Counter {
        if self.reject_labels("counter", key) {
            return metrics::Counter::noop();
        }

        metrics::Counter::from_arc(Arc::new(CounterHandle {
            collector: self.collector,
            name: key.name().to_string(),
        }))
    }

    fn register_gauge(&self, key: &metrics::Key, _metadata: &metrics::Metadata<'_>) -> metrics::Gauge {
        if self.reject_labels("gauge", key) {
            return metrics::Gauge::noop();
        }

        let mut state = self.collector.state();
        let gauge = state
            .gauges
            .entry(key.name().to_string())
            .or_insert_with(|| {
                Arc::new(GaugeHandle {
                    collector: self.collector,
                    name: key.name().to_string(),
                    value: AtomicU64::new(0.0f64.to_bits()),
                })
            })
            .clone();

        metrics::Gauge::from_arc(gauge)
    }

    fn register_histogram(&self, key: &metrics::Key, _metadata: &metrics::Metadata<'_>) -> metrics::Histogram {
        if self.reject_labels("histogram", key) {
            return metrics::Histogram::noop();
        }

        metrics::Histogram::from_arc(Arc::new(HistogramHandle {
            collector: self.collector,
            name: key.name().to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{collector, SharedBuffer};
    use crate::Builder;

    fn booking_collector(buffer: &SharedBuffer) -> Collector {
        Builder::new()
            .cloudwatch_namespace("ServerlessAirline")
            .with_timestamp(1687657545423)
            .with_writer(buffer.clone())
            .build()
            .unwrap()
    }

    #[test]
    fn flush_writes_one_line_and_clears() {
        let buffer = SharedBuffer::default();
        let metrics = booking_collector(&buffer);

        metrics.add_dimension("operation", "confirm_booking");
        metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1).unwrap();
        metrics.add_metric("BookingConfirmation", "Count", 2).unwrap();
        metrics.add_metric("Latency", "Milliseconds", 12.5).unwrap();
        metrics.add_metadata("booking_id", "7051cd10");
        metrics.flush().unwrap();

        assert_eq!(
            buffer.contents(),
            r#"{"_aws":{"Timestamp":1687657545423,"CloudWatchMetrics":[{"Namespace":"ServerlessAirline","Dimensions":[["operation"]],"Metrics":[{"Name":"BookingConfirmation","Unit":"Count"},{"Name":"Latency","Unit":"Milliseconds"}]}]},"operation":"confirm_booking","booking_id":"7051cd10","BookingConfirmation":[1.0,2.0],"Latency":12.5}
"#
        );
        assert!(metrics.is_empty());
    }

    #[test]
    fn flush_without_metrics_fails() {
        let buffer = SharedBuffer::default();
        let metrics = booking_collector(&buffer);
        metrics.add_dimension("operation", "confirm_booking");

        assert!(matches!(metrics.flush(), Err(MetricsError::SchemaValidation(_))));
        assert!(buffer.contents().is_empty());
        // state is kept for the caller to fix up
        assert!(!metrics.is_empty());
    }

    #[test]
    fn flush_without_dimensions_fails() {
        let buffer = SharedBuffer::default();
        let metrics = booking_collector(&buffer);
        metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1).unwrap();

        assert!(matches!(metrics.flush(), Err(MetricsError::SchemaValidation(_))));
        assert_eq!(metrics.metric_values("BookingConfirmation"), Some(vec![1.0]));
    }

    #[test]
    fn flush_with_ten_dimensions_fails() {
        let metrics = booking_collector(&SharedBuffer::default());
        for i in 0..10 {
            metrics.add_dimension(format!("dimension_{i}"), "value");
        }
        metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1).unwrap();

        let err = metrics.flush().unwrap_err();
        assert!(err.to_string().contains("at most 9 dimensions"));
    }

    #[test]
    fn flush_without_namespace_fails() {
        let metrics = collector(Builder::new(), &SharedBuffer::default());
        metrics.add_dimension("operation", "confirm_booking");
        metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1).unwrap();

        let err = metrics.flush().unwrap_err();
        assert!(err.to_string().contains("namespace"));

        metrics.add_namespace("ServerlessAirline").unwrap();
        metrics.flush().unwrap();
    }

    #[test]
    fn second_namespace_fails() {
        let metrics = booking_collector(&SharedBuffer::default());
        assert!(matches!(
            metrics.add_namespace("Another"),
            Err(MetricsError::UniqueNamespace(_))
        ));
        assert_eq!(metrics.namespace().as_deref(), Some("ServerlessAirline"));
    }

    #[test]
    fn removed_metadata_is_not_written() {
        let buffer = SharedBuffer::default();
        let metrics = booking_collector(&buffer);
        metrics
            .add_dimension("operation", "confirm_booking")
            .add_metadata("booking_id", "7051cd10")
            .add_metadata("card", "visa")
            .remove_metadata("card");
        metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1).unwrap();
        metrics.flush().unwrap();

        let lines = buffer.lines();
        assert_eq!(lines[0]["booking_id"], "7051cd10");
        assert!(lines[0].get("card").is_none());
    }

    #[test]
    fn invalid_unit_string_fails() {
        let metrics = booking_collector(&SharedBuffer::default());
        assert!(matches!(
            metrics.add_metric("BookingConfirmation", "Bananas", 1),
            Err(MetricsError::MetricUnit(_))
        ));
        assert!(metrics.is_empty());
    }

    #[test]
    fn serialize_then_clear_leaves_collector_empty() {
        let metrics = booking_collector(&SharedBuffer::default());
        metrics.add_dimension("operation", "confirm_booking");
        metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1).unwrap();

        let document = metrics.serialize_metric_set().unwrap();
        assert_eq!(document["BookingConfirmation"], serde_json::json!(1.0));
        assert_eq!(document["_aws"]["CloudWatchMetrics"][0]["Namespace"], "ServerlessAirline");
        assert!(!metrics.is_empty());

        metrics.clear_metrics();
        assert!(metrics.is_empty());
        assert!(metrics.metric_values("BookingConfirmation").is_none());
    }

    #[test]
    fn hundredth_metric_starts_fresh_batch() {
        let buffer = SharedBuffer::default();
        let metrics = booking_collector(&buffer);
        metrics.add_dimension("operation", "confirm_booking");
        metrics.add_metadata("booking_id", "7051cd10");

        for i in 0..MAX_METRICS - 1 {
            metrics.add_metric(format!("metric_{i}"), MetricUnit::Count, 1).unwrap();
        }
        assert!(buffer.contents().is_empty());

        metrics.add_metric("metric_99", MetricUnit::Count, 1).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0]["_aws"]["CloudWatchMetrics"][0]["Metrics"].as_array().unwrap().len(),
            MAX_METRICS - 1
        );
        assert!(lines[0].get("metric_99").is_none());

        // the fresh batch keeps dimensions and metadata and holds only the new metric
        assert_eq!(metrics.metric_values("metric_99"), Some(vec![1.0]));
        assert!(metrics.metric_values("metric_0").is_none());
        let document = metrics.serialize_metric_set().unwrap();
        assert_eq!(document["operation"], "confirm_booking");
        assert_eq!(document["booking_id"], "7051cd10");
    }

    #[test]
    fn hundred_values_trigger_flush() {
        let buffer = SharedBuffer::default();
        let metrics = booking_collector(&buffer);
        metrics.add_dimension("operation", "confirm_booking");

        for i in 0..MAX_VALUES_PER_METRIC {
            metrics.add_metric("Latency", MetricUnit::Milliseconds, i as f64).unwrap();
        }
        metrics.add_metric("Latency", MetricUnit::Milliseconds, 500).unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["Latency"].as_array().unwrap().len(), MAX_VALUES_PER_METRIC);
        assert_eq!(metrics.metric_values("Latency"), Some(vec![500.0]));
    }

    #[test]
    fn failed_implicit_flush_keeps_batch() {
        let buffer = SharedBuffer::default();
        let metrics = booking_collector(&buffer);

        for i in 0..MAX_METRICS - 1 {
            metrics.add_metric(format!("metric_{i}"), MetricUnit::Count, 1).unwrap();
        }
        // no dimension, so the implicit flush cannot validate
        assert!(matches!(
            metrics.add_metric("overflow", MetricUnit::Count, 1),
            Err(MetricsError::SchemaValidation(_))
        ));
        assert!(buffer.contents().is_empty());
        assert!(metrics.metric_values("overflow").is_none());
        assert_eq!(metrics.metric_values("metric_98"), Some(vec![1.0]));
    }

    #[test]
    fn default_dimensions_survive_clear() {
        let buffer = SharedBuffer::default();
        let metrics = collector(
            Builder::new()
                .cloudwatch_namespace("ServerlessAirline")
                .service("booking")
                .with_dimension("environment", "prod"),
            &buffer,
        );

        metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1).unwrap();
        metrics.flush().unwrap();
        metrics.add_metric("BookingConfirmation", MetricUnit::Count, 1).unwrap();
        metrics.flush().unwrap();

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert_eq!(line["service"], "booking");
            assert_eq!(line["environment"], "prod");
            assert_eq!(
                line["_aws"]["CloudWatchMetrics"][0]["Dimensions"],
                serde_json::json!([["environment", "service"]])
            );
        }
    }

    #[cfg(feature = "lambda")]
    #[test]
    fn empty_invocation_flush_logs_warning() {
        let logs = SharedBuffer::default();
        let subscriber = {
            let logs = logs.clone();
            tracing_subscriber::fmt()
                .json()
                .without_time()
                .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
                .with_writer(move || logs.clone())
                .finish()
        };

        let buffer = SharedBuffer::default();
        let metrics = booking_collector(&buffer);
        metrics.add_dimension("operation", "confirm_booking");

        tracing::subscriber::with_default(subscriber, || metrics.flush_invocation()).unwrap();

        assert!(buffer.contents().is_empty());
        assert!(metrics.is_empty());
        let logged = logs.lines();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0]["level"], "WARN");
        assert!(logged[0]["fields"]["message"]
            .as_str()
            .unwrap()
            .starts_with("No application metrics to publish"));
    }

    #[test]
    fn recorder_feeds_collector() {
        let buffer = SharedBuffer::default();
        let metrics: &'static Collector = Box::leak(Box::new(booking_collector(&buffer)));
        metrics.add_dimension("operation", "confirm_booking");
        let recorder = Recorder::from(metrics);

        metrics::with_local_recorder(&recorder, || {
            metrics::describe_histogram!("runtime", metrics::Unit::Milliseconds, "");
            metrics::counter!("success").increment(1);
            metrics::counter!("success").increment(2);
            metrics::gauge!("inflight").set(3.0);
            metrics::gauge!("inflight").increment(1.0);
            metrics::histogram!("runtime").record(4.0);
            metrics::histogram!("runtime").record(5.0);
            metrics::counter!("labelled", "api" => "a_function").increment(1);
        });

        assert_eq!(metrics.metric_values("success"), Some(vec![1.0, 2.0]));
        assert_eq!(metrics.metric_values("inflight"), Some(vec![3.0, 4.0]));
        assert_eq!(metrics.metric_values("runtime"), Some(vec![4.0, 5.0]));
        assert!(metrics.metric_values("labelled").is_none());

        let document = metrics.serialize_metric_set().unwrap();
        assert_eq!(
            document["_aws"]["CloudWatchMetrics"][0]["Metrics"],
            serde_json::json!([
                {"Name": "inflight", "Unit": "None"},
                {"Name": "runtime", "Unit": "Milliseconds"},
                {"Name": "success", "Unit": "Count"},
            ])
        );
    }
}
