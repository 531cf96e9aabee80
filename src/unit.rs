//! # Unit
//!
//! Units supported by CloudWatch for a MetricDatum
//!
//! <https://docs.aws.amazon.com/AmazonCloudWatch/latest/APIReference/API_MetricDatum.html>

use super::error::MetricsError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Declares [MetricUnit] along with its lookup table and CloudWatch strings
macro_rules! metric_units {
    ($($(#[$meta:meta])* $variant:ident => $value:literal,)*) => {
        /// A CloudWatch metric unit
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MetricUnit {
            $($(#[$meta])* $variant,)*
        }

        /// (unit, variant name, CloudWatch value)
        const UNITS: &[(MetricUnit, &str, &str)] = &[$((MetricUnit::$variant, stringify!($variant), $value),)*];

        impl MetricUnit {
            /// The string CloudWatch expects in the `Unit` field
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(MetricUnit::$variant => $value,)*
                }
            }
        }
    };
}

metric_units! {
    Seconds => "Seconds",
    Microseconds => "Microseconds",
    Milliseconds => "Milliseconds",
    Bytes => "Bytes",
    Kilobytes => "Kilobytes",
    Megabytes => "Megabytes",
    Gigabytes => "Gigabytes",
    Terabytes => "Terabytes",
    Bits => "Bits",
    Kilobits => "Kilobits",
    Megabits => "Megabits",
    Gigabits => "Gigabits",
    Terabits => "Terabits",
    Percent => "Percent",
    Count => "Count",
    BytesPerSecond => "Bytes/Second",
    KilobytesPerSecond => "Kilobytes/Second",
    MegabytesPerSecond => "Megabytes/Second",
    GigabytesPerSecond => "Gigabytes/Second",
    TerabytesPerSecond => "Terabytes/Second",
    BitsPerSecond => "Bits/Second",
    KilobitsPerSecond => "Kilobits/Second",
    MegabitsPerSecond => "Megabits/Second",
    GigabitsPerSecond => "Gigabits/Second",
    TerabitsPerSecond => "Terabits/Second",
    CountPerSecond => "Count/Second",
    /// Explicitly unitless
    NoUnit => "None",
}

impl fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MetricUnit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Accepts either the CloudWatch value ("Count/Second") or the variant name ("CountPerSecond")
impl FromStr for MetricUnit {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UNITS
            .iter()
            .find(|(_, name, value)| *value == s || *name == s)
            .map(|(unit, _, _)| *unit)
            .ok_or_else(|| {
                let options: Vec<&str> = UNITS.iter().map(|(_, name, _)| *name).collect();
                MetricsError::MetricUnit(format!("'{s}', expected either option: {options:?}"))
            })
    }
}

impl TryFrom<&str> for MetricUnit {
    type Error = MetricsError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl TryFrom<String> for MetricUnit {
    type Error = MetricsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Convert a metrics::Unit into the closest CloudWatch unit
///
/// CloudWatch has no nanosecond unit so that conversion fails
impl TryFrom<metrics::Unit> for MetricUnit {
    type Error = MetricsError;

    fn try_from(unit: metrics::Unit) -> Result<Self, Self::Error> {
        Ok(match unit {
            metrics::Unit::Count => MetricUnit::Count,
            metrics::Unit::Percent => MetricUnit::Percent,
            metrics::Unit::Seconds => MetricUnit::Seconds,
            metrics::Unit::Milliseconds => MetricUnit::Milliseconds,
            metrics::Unit::Microseconds => MetricUnit::Microseconds,
            metrics::Unit::Nanoseconds => {
                return Err(MetricsError::MetricUnit("Nanoseconds is not supported by CloudWatch".into()))
            }
            metrics::Unit::Tebibytes => MetricUnit::Terabytes,
            metrics::Unit::Gibibytes => MetricUnit::Gigabytes,
            metrics::Unit::Mebibytes => MetricUnit::Megabytes,
            metrics::Unit::Kibibytes => MetricUnit::Kilobytes,
            metrics::Unit::Bytes => MetricUnit::Bytes,
            metrics::Unit::TerabitsPerSecond => MetricUnit::TerabitsPerSecond,
            metrics::Unit::GigabitsPerSecond => MetricUnit::GigabitsPerSecond,
            metrics::Unit::MegabitsPerSecond => MetricUnit::MegabitsPerSecond,
            metrics::Unit::KilobitsPerSecond => MetricUnit::KilobitsPerSecond,
            metrics::Unit::BitsPerSecond => MetricUnit::BitsPerSecond,
            metrics::Unit::CountPerSecond => MetricUnit::CountPerSecond,
        })
    }
}
