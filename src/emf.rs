//! # EMF
//!
//! Borrowing serde model of one CloudWatch Embedded Metric Format document
//!
//! <https://docs.aws.amazon.com/AmazonCloudWatch/latest/monitoring/CloudWatch_Embedded_Metric_Format_Specification.html>

use super::unit::MetricUnit;
use serde::Serialize;
use serde_json::value::Value;
use std::collections::BTreeMap;

/// Root node: the `_aws` metadata plus flattened target members
///
/// Dimension values, metadata and metric values all live at the top level, in that order
#[derive(Serialize)]
pub struct EmfDocument<'a> {
    #[serde(rename = "_aws")]
    pub metadata: EmfMetadata<'a>,
    #[serde(flatten)]
    pub dimensions: BTreeMap<&'a str, &'a str>,
    #[serde(flatten)]
    pub properties: BTreeMap<&'a str, &'a Value>,
    #[serde(flatten)]
    pub values: BTreeMap<&'a str, Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmfMetadata<'a> {
    pub timestamp: u64,
    #[serde(rename = "CloudWatchMetrics")]
    pub directives: [MetricDirective<'a>; 1],
}

/// One namespace with a single dimension set
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDirective<'a> {
    pub namespace: &'a str,
    pub dimensions: [Vec<&'a str>; 1],
    pub metrics: Vec<MetricDefinition<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDefinition<'a> {
    pub name: &'a str,
    pub unit: MetricUnit,
}

impl<'a> EmfDocument<'a> {
    pub fn new(namespace: &'a str, timestamp: u64) -> Self {
        Self {
            metadata: EmfMetadata {
                timestamp,
                directives: [MetricDirective {
                    namespace,
                    dimensions: [vec![]],
                    metrics: vec![],
                }],
            },
            dimensions: Default::default(),
            properties: Default::default(),
            values: Default::default(),
        }
    }

    fn directive(&mut self) -> &mut MetricDirective<'a> {
        &mut self.metadata.directives[0]
    }

    pub fn push_dimension(&mut self, name: &'a str, value: &'a str) {
        if self.dimensions.insert(name, value).is_none() {
            self.directive().dimensions[0].push(name);
        }
    }

    /// A single data point is written as a scalar, several as an array
    pub fn push_metric(&mut self, name: &'a str, unit: MetricUnit, values: &[f64]) {
        self.directive().metrics.push(MetricDefinition { name, unit });
        let value = match values {
            [single] => Value::from(*single),
            many => Value::from(many.to_vec()),
        };
        self.values.insert(name, value);
    }
}
