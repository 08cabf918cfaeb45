//! Bounded, FIFO-evicting windows backing the load chart.

use std::collections::VecDeque;

use crate::types::Metric;

pub const DEFAULT_CAPACITY: usize = 10;

/// Placeholder shape shown before real data arrives.
pub const DEFAULT_SEED: [f64; 8] = [10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0];

pub fn push_capped<T>(dq: &mut VecDeque<T>, v: T, cap: usize) {
    if dq.len() == cap {
        dq.pop_front();
    }
    dq.push_back(v);
}

/// Fixed-capacity window of the most recent values for one channel.
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    values: VecDeque<f64>,
    cap: usize,
}

impl SlidingWindow {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            values: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Builds a window pre-filled with `seed`. Seeds longer than the
    /// capacity keep only their newest values.
    pub fn seeded(cap: usize, seed: &[f64]) -> Self {
        let mut w = Self::new(cap);
        for &v in seed {
            w.push(Some(v));
        }
        w
    }

    /// Appends `v`, evicting exactly one value from the front once full.
    /// Absent or non-finite values leave the window untouched.
    pub fn push(&mut self, v: Option<f64>) -> &VecDeque<f64> {
        if let Some(v) = v.filter(|v| v.is_finite()) {
            push_capped(&mut self.values, v, self.cap);
        }
        &self.values
    }

    pub fn snapshot(&self) -> Vec<f64> {
        self.values.iter().copied().collect()
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn last(&self) -> Option<f64> {
        self.values.back().copied()
    }
}

// One window per channel; owned for the process lifetime
#[derive(Debug, Clone)]
pub struct Windows {
    pub cpu: SlidingWindow,
    pub ram: SlidingWindow,
}

impl Windows {
    pub fn new(cap: usize) -> Self {
        Self {
            cpu: SlidingWindow::new(cap),
            ram: SlidingWindow::new(cap),
        }
    }

    pub fn seeded(cap: usize, seed: &[f64]) -> Self {
        Self {
            cpu: SlidingWindow::seeded(cap, seed),
            ram: SlidingWindow::seeded(cap, seed),
        }
    }

    pub fn get(&self, metric: Metric) -> &SlidingWindow {
        match metric {
            Metric::Cpu => &self.cpu,
            Metric::Ram => &self.ram,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut SlidingWindow {
        match metric {
            Metric::Cpu => &mut self.cpu,
            Metric::Ram => &mut self.ram,
        }
    }
}

impl Default for Windows {
    fn default() -> Self {
        Self::seeded(DEFAULT_CAPACITY, &DEFAULT_SEED)
    }
}
