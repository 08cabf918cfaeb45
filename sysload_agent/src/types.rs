//! Data types sent to the client over WebSocket.
//! Keep this module minimal and stable — it defines the wire format.

use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PerfRecord {
    #[serde(rename = "_field")]
    pub field: &'static str,
    #[serde(rename = "_value")]
    pub value: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "event")]
pub enum Frame {
    #[serde(rename = "perfData")]
    PerfData { data: Vec<PerfRecord> },
}
