//! Types that mirror the feed's JSON schema, plus the closed metric set.

use serde::{Deserialize, Serialize};

/// The two tracked channels. Anything else on the wire is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Cpu,
    Ram,
}

impl Metric {
    pub const ALL: [Metric; 2] = [Metric::Cpu, Metric::Ram];

    // Wire tags are exact and case sensitive
    pub fn from_field(field: &str) -> Option<Metric> {
        match field {
            "cpu" => Some(Metric::Cpu),
            "ram" => Some(Metric::Ram),
            _ => None,
        }
    }

    pub fn field(self) -> &'static str {
        match self {
            Metric::Cpu => "cpu",
            Metric::Ram => "ram",
        }
    }

    /// Wire record carrying `value` for this channel.
    pub fn record(self, value: impl Into<serde_json::Value>) -> RawRecord {
        RawRecord::new(self.field(), value)
    }

    /// Name of the series handed to the renderer.
    pub fn series_name(self) -> &'static str {
        match self {
            Metric::Cpu => "cpu-load",
            Metric::Ram => "ram-load",
        }
    }
}

/// One record as delivered in a `perfData` batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "_field")]
    pub field: String,
    // Any JSON; missing key becomes null
    #[serde(rename = "_value", default)]
    pub value: serde_json::Value,
}

impl RawRecord {
    pub fn new(field: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// A record whose channel is known. `value` is `None` when the payload
/// was absent or not a finite number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub metric: Metric,
    pub value: Option<f64>,
}

impl Sample {
    pub fn from_record(rec: &RawRecord) -> Option<Sample> {
        let metric = Metric::from_field(&rec.field)?;
        let value = rec.value.as_f64().filter(|v| v.is_finite());
        Some(Sample { metric, value })
    }
}

/// Envelope carried in each WebSocket text frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum FeedFrame {
    #[serde(rename = "connect")]
    Connect,
    // Records stay untyped so one bad entry does not sink the batch
    #[serde(rename = "perfData")]
    PerfData {
        #[serde(default)]
        data: Vec<serde_json::Value>,
    },
}
