//! Timeline reconstruction
//!
//! This module provides the primary interface for the library. The
//! [`Reconstructor`] folds a stream of parsed records into a [`Timeline`],
//! one record at a time and in log order. Malformed blocks reported by the
//! parser are collected rather than propagated, so a single bad record never
//! costs the rest of the trace.

use crate::config::ReconstructConfig;
use crate::formats::TextLogParser;
use crate::timeline::{Interval, Occurrence, Timeline};
use crate::types::{PacketOrigin, RecordKind, Result, TimelineError, TraceRecord};
use std::path::Path;

/// Outcome of one reconstruction pass
#[derive(Debug, Default)]
pub struct Reconstruction {
    /// Reconstructed components
    pub timeline: Timeline,
    /// Blocks that could not be turned into records, in log order
    pub malformed: Vec<TimelineError>,
    /// Records dropped by the configured filters
    pub filtered: usize,
}

/// Series key and occurrence label for a port packet
///
/// Packets sent from a state machine are keyed `name(transport) machine`
/// and labeled with the active state; packets without machine context are
/// keyed `name(transport) Server` and labeled `Server`.
pub fn port_key(port: &str, transport: &str, origin: &PacketOrigin) -> (String, String) {
    match origin {
        PacketOrigin::Machine { machine, state } => {
            (format!("{port}({transport}) {machine}"), state.clone())
        }
        PacketOrigin::Server => (
            format!("{port}({transport}) Server"),
            "Server".to_string(),
        ),
    }
}

/// Folds trace records into per-component series
pub struct Reconstructor {
    config: ReconstructConfig,
}

impl Reconstructor {
    /// Create a reconstructor with the given filters
    pub fn new(config: ReconstructConfig) -> Self {
        Self { config }
    }

    /// Read and reconstruct a text log file
    ///
    /// # Arguments
    /// * `path` - Path to the six-line text log
    ///
    /// # Returns
    /// * `Result<Reconstruction>` - Err only if the file cannot be read
    pub fn reconstruct_file(&self, path: &Path) -> Result<Reconstruction> {
        let records = TextLogParser::parse(path)?;
        Ok(self.reconstruct(records))
    }

    /// Reconstruct a timeline from parsed records
    ///
    /// Malformed records are logged, kept in the outcome and skipped.
    pub fn reconstruct<I>(&self, records: I) -> Reconstruction
    where
        I: IntoIterator<Item = Result<TraceRecord>>,
    {
        let mut outcome = Reconstruction::default();

        for record in records {
            match record {
                Ok(record) => {
                    if self.config.should_process(&record.pid, record.kind.category()) {
                        Self::apply(&mut outcome.timeline, record);
                    } else {
                        outcome.filtered += 1;
                    }
                }
                Err(err) => {
                    if let TimelineError::MalformedRecord { block, .. } = &err {
                        log::warn!("{}; block: {:?}", err, block);
                    } else {
                        log::warn!("{}", err);
                    }
                    outcome.malformed.push(err);
                }
            }
        }

        log::info!(
            "Reconstructed {} components ({} malformed records, {} filtered)",
            outcome.timeline.len(),
            outcome.malformed.len(),
            outcome.filtered
        );
        outcome
    }

    /// Append one record to its component's series
    fn apply(timeline: &mut Timeline, record: TraceRecord) {
        let TraceRecord {
            pid,
            start,
            end,
            kind,
        } = record;
        let component = timeline.component_mut(&pid);

        match kind {
            RecordKind::State { machine, state } => {
                component
                    .state_machines
                    .entry(machine)
                    .or_default()
                    .push(Interval {
                        start,
                        end,
                        label: state,
                        detail: None,
                    });
            }
            RecordKind::PortFlow {
                flow,
                owner,
                mode,
                parameters,
            } => {
                let mut parts = vec![mode.as_str()];
                parts.extend(parameters.iter().take(2).map(String::as_str));
                let detail = parts.join(" ");
                component.flows.entry(owner).or_default().push(Interval {
                    start,
                    end,
                    label: flow,
                    detail: Some(detail),
                });
            }
            RecordKind::PortPacket {
                port,
                transport,
                origin,
            } => {
                let (key, label) = port_key(&port, &transport, &origin);
                component
                    .ports
                    .entry(key)
                    .or_default()
                    .push(Occurrence { at: start, label });
            }
            RecordKind::Event {
                event,
                scope,
                direction,
            } => {
                component.events.push(Occurrence {
                    at: start,
                    label: format!("{event}_{scope}_{direction}"),
                });
            }
        }
    }
}

impl Default for Reconstructor {
    fn default() -> Self {
        Self::new(ReconstructConfig::default())
    }
}
