//! Core types for the trace timeline library
//!
//! This module defines the typed records produced by the log parser and the
//! error type shared by every stage. Positional argument conventions of the
//! text log are resolved by the parser; everything downstream works with the
//! named fields defined here.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for timeline operations
pub type Result<T> = std::result::Result<T, TimelineError>;

/// Time of day with microsecond resolution (`HH:MM:SS:ffffff`)
///
/// All records of one trace share a calendar day, so ordering and
/// differences are computed on the time of day alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveTime);

impl Timestamp {
    /// Build a timestamp from its components, `None` if out of range
    pub fn from_hms_micro(hour: u32, min: u32, sec: u32, micro: u32) -> Option<Self> {
        NaiveTime::from_hms_micro_opt(hour, min, sec, micro).map(Self)
    }

    /// Microseconds elapsed since midnight
    pub fn micros_of_day(&self) -> i64 {
        self.0.num_seconds_from_midnight() as i64 * 1_000_000
            + (self.0.nanosecond() / 1_000) as i64
    }

    /// Signed difference `self - origin` in microseconds
    pub fn micros_since(&self, origin: Timestamp) -> i64 {
        self.micros_of_day() - origin.micros_of_day()
    }

    /// Signed difference `self - origin` in seconds
    pub fn seconds_since(&self, origin: Timestamp) -> f64 {
        self.micros_since(origin) as f64 / 1e6
    }
}

impl FromStr for Timestamp {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || TimelineError::InvalidTimestamp(s.to_string());

        let mut parts = s.split(':');
        let (Some(h), Some(m), Some(sec), Some(frac), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(invalid());
        };

        // Shorter fractions are right-padded: "5" is half a second
        if frac.is_empty() || frac.len() > 6 || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let micro: u32 = format!("{frac:0<6}").parse().map_err(|_| invalid())?;

        let hour: u32 = h.parse().map_err(|_| invalid())?;
        let min: u32 = m.parse().map_err(|_| invalid())?;
        let sec: u32 = sec.parse().map_err(|_| invalid())?;

        Timestamp::from_hms_micro(hour, min, sec, micro).ok_or_else(invalid)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{:06}",
            self.0.format("%H:%M:%S"),
            self.0.nanosecond() / 1_000
        )
    }
}

/// Record category, used for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    State,
    PortFlow,
    PortPacket,
    Event,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::State => write!(f, "state"),
            Category::PortFlow => write!(f, "port flow"),
            Category::PortPacket => write!(f, "port packet"),
            Category::Event => write!(f, "event"),
        }
    }
}

/// Who emitted a port packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketOrigin {
    /// Sent while a state machine was in a given state
    Machine {
        /// State machine driving the port
        machine: String,
        /// State active when the packet was sent
        state: String,
    },
    /// Received on the server side (no machine context in the record)
    Server,
}

/// Category-specific payload of a trace record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKind {
    /// A state machine entered `state`; the record's end closes the interval
    State {
        /// State machine name
        machine: String,
        /// State label
        state: String,
    },

    /// A port flow became active for the state machine `owner`
    PortFlow {
        /// Flow name
        flow: String,
        /// State machine owning the flow (series key)
        owner: String,
        /// Flow mode, e.g. `simple` or `on_off`
        mode: String,
        /// Numeric flow parameters as logged (at least two)
        parameters: Vec<String>,
    },

    /// A packet went through a port
    PortPacket {
        /// Port name
        port: String,
        /// Transport, e.g. `TCP` or `UDP`
        transport: String,
        /// Sender context
        origin: PacketOrigin,
    },

    /// A generic event
    Event {
        /// Event name
        event: String,
        /// Event scope, e.g. `app`, `local`, `env`
        scope: String,
        /// Direction, e.g. `event_snd`, `event_rcv`
        direction: String,
    },
}

impl RecordKind {
    /// The category this payload belongs to
    pub fn category(&self) -> Category {
        match self {
            RecordKind::State { .. } => Category::State,
            RecordKind::PortFlow { .. } => Category::PortFlow,
            RecordKind::PortPacket { .. } => Category::PortPacket,
            RecordKind::Event { .. } => Category::Event,
        }
    }
}

/// One trace record (one six-line block of the log)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    /// Process identifier of the emitting component
    pub pid: String,
    /// Record timestamp
    pub start: Timestamp,
    /// End timestamp for begin/end records, if logged
    pub end: Option<Timestamp>,
    /// Category payload
    pub kind: RecordKind,
}

/// Errors that can occur while reading and reconstructing a trace
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord {
        /// 1-based line number of the block's first line
        line: usize,
        /// What was missing or unreadable
        reason: String,
        /// Raw lines of the offending block
        block: Vec<String>,
    },

    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("Component {0} has no state-machine series, time origin is undefined")]
    MissingOrigin(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
