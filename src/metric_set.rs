//! # Metric Set
//!
//! The in-memory batch of metrics, dimensions and metadata written as one EMF document

use super::emf;
use super::error::{MetricsError, Result};
use super::unit::MetricUnit;
use serde_json::value::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// The Embedded Metric Format supports a maximum of 100 metrics per document
pub const MAX_METRICS: usize = 100;

/// The Embedded Metric Format supports a maximum of 100 values per key
pub const MAX_VALUES_PER_METRIC: usize = 100;

/// CloudWatch accepts at most 9 dimensions in a dimension set (plus the implicit namespace)
pub const MAX_DIMENSIONS: usize = 9;

const MAX_NAME_LENGTH: usize = 255;
const MAX_DIMENSION_LENGTH: usize = 250;

/// Values must be finite to be representable in JSON
pub fn check_value(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(MetricsError::MetricValue(format!("{value} is not a valid number for metric '{name}'")));
    }
    Ok(())
}

pub(crate) struct MetricEntry {
    unit: MetricUnit,
    values: Vec<f64>,
}

#[derive(Default)]
pub(crate) struct MetricSet {
    metrics: BTreeMap<String, MetricEntry>,
    dimensions: BTreeMap<String, String>,
    metadata: BTreeMap<String, Value>,
    namespace: Option<String>,
}

impl MetricSet {
    pub fn with_namespace(namespace: Option<String>) -> Self {
        Self {
            namespace,
            ..Default::default()
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Fails if a namespace was already set
    pub fn set_namespace(&mut self, name: String) -> Result<()> {
        if let Some(existing) = &self.namespace {
            return Err(MetricsError::UniqueNamespace(existing.clone()));
        }
        self.namespace = Some(name);
        Ok(())
    }

    pub fn replace_namespace(&mut self, name: String) {
        self.namespace = Some(name);
    }

    /// True when a value under `name` has to start a fresh batch
    ///
    /// * a new name that would be the 100th distinct metric
    /// * a 101st value for an existing name
    pub fn is_full_for(&self, name: &str) -> bool {
        match self.metrics.get(name) {
            Some(entry) => entry.values.len() >= MAX_VALUES_PER_METRIC,
            None => self.metrics.len() + 1 >= MAX_METRICS,
        }
    }

    /// Appends a data point, the most recent unit for a name wins
    pub fn add_metric(&mut self, name: String, unit: MetricUnit, value: f64) -> Result<()> {
        check_value(&name, value)?;

        let entry = self.metrics.entry(name).or_insert_with(|| MetricEntry {
            unit,
            values: Vec::new(),
        });
        entry.unit = unit;
        entry.values.push(value);
        Ok(())
    }

    pub fn add_dimension(&mut self, name: String, value: String) {
        self.dimensions.insert(name, value);
    }

    pub fn add_metadata(&mut self, key: String, value: Value) {
        self.metadata.insert(key, value);
    }

    pub fn remove_metadata(&mut self, key: &str) {
        self.metadata.remove(key);
    }

    /// Drop the metrics only, dimensions, metadata and namespace carry over
    pub fn clear_values(&mut self) {
        self.metrics.clear();
    }

    /// Drop everything except the namespace
    pub fn clear(&mut self) {
        self.clear_values();
        self.metadata.clear();
        self.dimensions.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.dimensions.is_empty() && self.metadata.is_empty()
    }

    pub fn metric_count(&self) -> usize {
        self.metrics.len()
    }

    pub fn values(&self, name: &str) -> Option<&[f64]> {
        self.metrics.get(name).map(|entry| entry.values.as_slice())
    }

    /// Default dimensions merged with the batch dimensions, batch values override defaults
    fn merged_dimensions<'a>(&'a self, defaults: &'a [(String, String)]) -> BTreeMap<&'a str, &'a str> {
        let mut merged: BTreeMap<&str, &str> = defaults.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        for (name, value) in &self.dimensions {
            merged.insert(name, value);
        }
        merged
    }

    /// Check the batch against the CloudWatch EMF schema rules
    pub fn validate(&self, defaults: &[(String, String)]) -> Result<()> {
        let invalid = |message: String| Err(MetricsError::SchemaValidation(message));

        match self.namespace.as_deref() {
            None => return invalid("namespace must be set".into()),
            Some("") => return invalid("namespace must not be empty".into()),
            Some(namespace) if namespace.chars().count() > MAX_NAME_LENGTH => {
                return invalid(format!("namespace must be at most {MAX_NAME_LENGTH} characters"))
            }
            Some(_) => {}
        }

        if self.metrics.is_empty() {
            return invalid("at least one metric is required".into());
        }
        if self.metrics.len() > MAX_METRICS {
            return invalid(format!("at most {MAX_METRICS} metrics are allowed, got {}", self.metrics.len()));
        }

        let dimensions = self.merged_dimensions(defaults);
        if dimensions.is_empty() {
            return invalid("at least one dimension is required".into());
        }
        if dimensions.len() > MAX_DIMENSIONS {
            return invalid(format!("at most {MAX_DIMENSIONS} dimensions are allowed, got {}", dimensions.len()));
        }

        for (name, value) in &dimensions {
            if name.is_empty() || name.chars().count() > MAX_DIMENSION_LENGTH {
                return invalid(format!("dimension name '{name}' must be 1 to {MAX_DIMENSION_LENGTH} characters"));
            }
            if value.is_empty() || value.chars().count() > MAX_DIMENSION_LENGTH {
                return invalid(format!("dimension '{name}' value must be 1 to {MAX_DIMENSION_LENGTH} characters"));
            }
        }

        for name in self.metrics.keys() {
            if name.is_empty() || name.chars().count() > MAX_NAME_LENGTH {
                return invalid(format!("metric name '{name}' must be 1 to {MAX_NAME_LENGTH} characters"));
            }
            if dimensions.contains_key(name.as_str()) {
                return invalid(format!("metric '{name}' collides with a dimension of the same name"));
            }
        }

        Ok(())
    }

    /// Validate and build the EMF document for this batch
    pub fn to_emf<'a>(&'a self, defaults: &'a [(String, String)], timestamp: u64) -> Result<emf::EmfDocument<'a>> {
        self.validate(defaults)?;

        // validate() guarantees the namespace
        let namespace = self.namespace.as_deref().unwrap_or_default();
        let mut emf = emf::EmfDocument::new(namespace, timestamp);

        for (name, value) in self.merged_dimensions(defaults) {
            emf.push_dimension(name, value);
        }

        for (name, entry) in &self.metrics {
            emf.push_metric(name, entry.unit, &entry.values);
        }

        for (key, value) in &self.metadata {
            if emf.values.contains_key(key.as_str()) || emf.dimensions.contains_key(key.as_str()) {
                warn!("Dropping metadata {key} as it collides with a metric or dimension name");
                continue;
            }
            emf.properties.insert(key, value);
        }

        Ok(emf)
    }
}
