//! Reconstructed timeline model
//!
//! A [`Timeline`] owns one [`Component`] per process identifier. Each
//! component groups its records into interval series (state machines,
//! flows) and occurrence series (ports, events). Maps keep insertion order,
//! so iteration follows first appearance in the log.

use crate::types::{Result, TimelineError, Timestamp};
use crate::viewport::TimeWindow;
use indexmap::IndexMap;

/// One bar on a timeline: a labeled interval
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    /// Interval start
    pub start: Timestamp,
    /// Interval end, absent when the log never closed it
    pub end: Option<Timestamp>,
    /// State or flow label
    pub label: String,
    /// Human-readable argument summary (flows only)
    pub detail: Option<String>,
}

/// Ordered intervals of one state machine or flow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSeries {
    intervals: Vec<Interval>,
}

impl IntervalSeries {
    pub fn push(&mut self, interval: Interval) {
        self.intervals.push(interval);
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Earliest start in the series
    pub fn earliest_start(&self) -> Option<Timestamp> {
        self.intervals.iter().map(|i| i.start).min()
    }
}

/// A point event on a timeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub at: Timestamp,
    pub label: String,
}

/// Ordered point events of one port or of a component's generic events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OccurrenceSeries {
    occurrences: Vec<Occurrence>,
}

impl OccurrenceSeries {
    pub fn push(&mut self, occurrence: Occurrence) {
        self.occurrences.push(occurrence);
    }

    pub fn occurrences(&self) -> &[Occurrence] {
        &self.occurrences
    }

    pub fn len(&self) -> usize {
        self.occurrences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }

    /// Timestamps whose offset from `origin` falls inside `window`
    ///
    /// Bounds are inclusive. The result keeps series order; callers that
    /// need ascending order sort it themselves.
    pub fn visible_in(&self, origin: Timestamp, window: TimeWindow) -> Vec<Timestamp> {
        self.occurrences
            .iter()
            .map(|o| o.at)
            .filter(|at| window.contains(at.seconds_since(origin)))
            .collect()
    }

    /// All timestamps of the series
    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.occurrences.iter().map(|o| o.at).collect()
    }
}

/// All series reconstructed for one process identifier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Component {
    pub pid: String,
    /// State machine name → state intervals
    pub state_machines: IndexMap<String, IntervalSeries>,
    /// Owning state machine → flow intervals
    pub flows: IndexMap<String, IntervalSeries>,
    /// `name(transport) role` → packet occurrences
    pub ports: IndexMap<String, OccurrenceSeries>,
    /// Generic events of the component
    pub events: OccurrenceSeries,
}

impl Component {
    pub fn new(pid: impl Into<String>) -> Self {
        Self {
            pid: pid.into(),
            ..Self::default()
        }
    }

    /// Time origin shared by every series of this component
    ///
    /// The origin is the earliest state-machine start. Components without
    /// state machines have no origin, and offsets cannot be computed.
    pub fn base_time(&self) -> Result<Timestamp> {
        self.state_machines
            .values()
            .filter_map(IntervalSeries::earliest_start)
            .min()
            .ok_or_else(|| TimelineError::MissingOrigin(self.pid.clone()))
    }

    /// Number of records folded into this component
    pub fn record_count(&self) -> usize {
        self.state_machines.values().map(IntervalSeries::len).sum::<usize>()
            + self.flows.values().map(IntervalSeries::len).sum::<usize>()
            + self.ports.values().map(OccurrenceSeries::len).sum::<usize>()
            + self.events.len()
    }
}

/// Every component of one trace, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    components: IndexMap<String, Component>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Component for `pid`, created on first use
    pub fn component_mut(&mut self, pid: &str) -> &mut Component {
        self.components
            .entry(pid.to_string())
            .or_insert_with(|| Component::new(pid))
    }

    pub fn component(&self, pid: &str) -> Option<&Component> {
        self.components.get(pid)
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
