//! Trace Timeline Library
//!
//! Reconstructs per-component execution timelines from the six-line text
//! trace log written by the component runtime.
//!
//! # Architecture
//!
//! This library covers everything up to, but not including, rendering:
//! - Parses the text log into typed records, one per six-line block
//! - Groups records per process into state-machine and flow intervals,
//!   port occurrences and generic events
//! - Places intervals on a shared per-component time axis and derives gaps
//! - Computes spacing statistics over any subset of occurrences
//!
//! Malformed blocks are reported and skipped; they never abort a pass.
//! Interactive inspection lives in the application layer (trace-viewer).
//!
//! # Example Usage
//!
//! ```no_run
//! use trace_timeline::{IntervalLayout, ReconstructConfig, Reconstructor, SpacingStats};
//! use std::path::Path;
//!
//! let reconstructor = Reconstructor::new(ReconstructConfig::new());
//! let outcome = reconstructor.reconstruct_file(Path::new("output.txt")).unwrap();
//!
//! for component in outcome.timeline.components() {
//!     let Ok(origin) = component.base_time() else { continue };
//!     for (name, series) in &component.state_machines {
//!         let layout = IntervalLayout::compute(series, origin);
//!         println!("{name}: {} visible gaps", layout.visible_gaps().count());
//!     }
//!     println!("{:?}", SpacingStats::from_timestamps(&component.events.timestamps()));
//! }
//! ```

// Public modules
pub mod config;
pub mod formats;
pub mod geometry;
pub mod reconstruct;
pub mod stats;
pub mod timeline;
pub mod types;
pub mod viewport;

// Re-export main types for convenience
pub use config::ReconstructConfig;
pub use formats::TextLogParser;
pub use geometry::{Gap, GapKind, IntervalLayout, PlacedInterval};
pub use reconstruct::{port_key, Reconstruction, Reconstructor};
pub use stats::{SpacingStats, SpacingSummary};
pub use timeline::{Component, Interval, IntervalSeries, Occurrence, OccurrenceSeries, Timeline};
pub use types::{
    Category, PacketOrigin, RecordKind, Result, TimelineError, Timestamp, TraceRecord,
};
pub use viewport::TimeWindow;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
