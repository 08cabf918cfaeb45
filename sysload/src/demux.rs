//! Routes a `perfData` batch into the per-channel windows.

use crate::history::Windows;
use crate::types::{Metric, RawRecord, Sample};

/// What a batch did to the windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteOutcome {
    pub cpu: usize,
    pub ram: usize,
    pub dropped: usize,
}

impl RouteOutcome {
    pub fn appended(&self) -> usize {
        self.cpu + self.ram
    }
}

/// Pushes each record, in arrival order, into the window of its channel.
/// Unknown tags and absent values are discarded silently.
pub fn route(windows: &mut Windows, batch: &[RawRecord]) -> RouteOutcome {
    let mut out = RouteOutcome::default();
    if batch.is_empty() {
        return out;
    }
    for rec in batch {
        let Some(Sample { metric, value: Some(v) }) = Sample::from_record(rec) else {
            out.dropped += 1;
            continue;
        };
        windows.get_mut(metric).push(Some(v));
        match metric {
            Metric::Cpu => out.cpu += 1,
            Metric::Ram => out.ram += 1,
        }
    }
    out
}
