//! Streaming ingestion and windowed buffers for a live CPU/RAM load chart.
//!
//! Data flows feed -> [`stream::StreamController`] -> [`demux::route`] ->
//! [`history::Windows`] -> [`assembler::SeriesAssembler`] -> renderer.

pub mod assembler;
pub mod demux;
pub mod feed;
pub mod history;
pub mod profiles;
pub mod stream;
pub mod types;
pub mod ws;
