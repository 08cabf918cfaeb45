//! UI module root: exposes drawing functions for individual panels.

pub mod header;
pub mod load;
