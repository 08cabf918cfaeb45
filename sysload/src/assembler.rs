//! Pull-side view of the windows for the renderer.

use std::cell::RefCell;
use std::rc::Rc;

use crate::history::Windows;
use crate::types::Metric;

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: &'static str,
    pub data: Vec<f64>,
}

/// Current contents of both windows, CPU first. Lengths may differ;
/// cross-channel alignment is left to the renderer.
pub fn assemble(windows: &Windows) -> [Series; 2] {
    Metric::ALL.map(|m| Series {
        name: m.series_name(),
        data: windows.get(m).snapshot(),
    })
}

pub struct SeriesAssembler {
    windows: Rc<RefCell<Windows>>,
}

impl SeriesAssembler {
    pub fn new(windows: Rc<RefCell<Windows>>) -> Self {
        Self { windows }
    }

    // Computed fresh on every call
    pub fn assemble(&self) -> [Series; 2] {
        assemble(&self.windows.borrow())
    }
}
