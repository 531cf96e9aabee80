//! CloudWatch embedded metrics aggregator in the style of Lambda Powertools
//!
//! Metrics and batch wide dimensions accumulate in a process wide [Collector] that survives warm
//! invocations, and are written to stdout as one
//! [EMF](https://docs.aws.amazon.com/AmazonCloudWatch/latest/monitoring/CloudWatch_Embedded_Metric_Format_Specification.html)
//! JSON document per flush.

pub use {
    builder::Builder,
    collector::{Collector, Recorder},
    config::PowertoolsEnv,
    error::{MetricsError, Result},
    metric_set::{MAX_DIMENSIONS, MAX_METRICS, MAX_VALUES_PER_METRIC},
    single::SingleMetric,
    unit::MetricUnit,
};

mod builder;
mod collector;
pub mod config;
mod emf;
mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
mod metric_set;
mod single;
mod unit;
