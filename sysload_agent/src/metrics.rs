//! CPU and RAM utilisation sampling using sysinfo.

use sysinfo::{CpuRefreshKind, MemoryRefreshKind, RefreshKind, System};

use crate::types::PerfRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Load {
    pub cpu_pct: f64,
    pub ram_pct: f64,
}

pub fn new_system() -> System {
    let refresh_kind = RefreshKind::nothing()
        .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
        .with_memory(MemoryRefreshKind::nothing().with_ram());
    let mut sys = System::new_with_specifics(refresh_kind);
    // First cpu reading is only meaningful relative to a previous refresh
    sys.refresh_cpu_usage();
    sys
}

pub fn collect_load(sys: &mut System) -> Load {
    sys.refresh_cpu_usage();
    sys.refresh_memory();
    Load {
        cpu_pct: round1(sys.global_cpu_usage() as f64),
        ram_pct: round1(ram_percent(sys.used_memory(), sys.total_memory())),
    }
}

pub fn ram_percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (used as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

pub fn perf_batch(load: Load) -> Vec<PerfRecord> {
    vec![
        PerfRecord {
            field: "cpu",
            value: load.cpu_pct,
        },
        PerfRecord {
            field: "ram",
            value: load.ram_pct,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Frame;

    #[test]
    fn ram_percent_handles_zero_total() {
        assert_eq!(ram_percent(10, 0), 0.0);
        assert_eq!(ram_percent(50, 200), 25.0);
    }

    #[test]
    fn batch_serializes_to_perf_data_frame() {
        let frame = Frame::PerfData {
            data: perf_batch(Load {
                cpu_pct: round1(12.345),
                ram_pct: 61.0,
            }),
        };
        let js = serde_json::to_string(&frame).unwrap();
        assert_eq!(
            js,
            r#"{"event":"perfData","data":[{"_field":"cpu","_value":12.3},{"_field":"ram","_value":61.0}]}"#
        );
    }
}
