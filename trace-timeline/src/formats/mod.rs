//! Trace log format parsers
//!
//! The only supported format is the six-line text log written by the
//! component runtime. The parser yields one `Result<TraceRecord>` per block.

pub mod text_log;

// Re-export parser types
pub use text_log::{TextLogParser, TextLogRecords, BLOCK_LINES};
