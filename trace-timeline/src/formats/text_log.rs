//! Six-line text trace log parser
//!
//! The component runtime writes one record per block of six lines:
//!
//! ```text
//! name: Sender
//! ts: 10:00:00:000000
//! pid: 4242
//! cat: state
//! args: IDLE
//! end: 10:00:01:000000
//! ```
//!
//! Blank lines separate blocks but are not significant: they are stripped
//! before grouping. The `end:` line is always present but may carry no
//! value. Argument and category conventions are resolved here into the
//! named fields of [`RecordKind`].
//!
//! A block that cannot be turned into a record is yielded as
//! [`TimelineError::MalformedRecord`] carrying the raw lines; the iterator
//! keeps going with the next block.

use crate::types::{
    Category, PacketOrigin, RecordKind, Result, TimelineError, Timestamp, TraceRecord,
};
use std::fs;
use std::path::Path;

/// Number of non-blank lines per record
pub const BLOCK_LINES: usize = 6;

/// Text log parser
pub struct TextLogParser;

impl TextLogParser {
    /// Read a log file and return an iterator over its records
    pub fn parse(path: &Path) -> Result<TextLogRecords> {
        log::info!("Parsing trace log: {:?}", path);
        let content = fs::read_to_string(path)?;
        Ok(Self::parse_str(&content))
    }

    /// Split already-loaded log text into blocks
    pub fn parse_str(content: &str) -> TextLogRecords {
        let mut blocks = Vec::new();
        let mut current = RawBlock::default();

        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            if current.lines.is_empty() {
                current.line = idx + 1;
            }
            current.lines.push(line.to_string());
            if current.lines.len() == BLOCK_LINES {
                blocks.push(std::mem::take(&mut current));
            }
        }
        if !current.lines.is_empty() {
            // Truncated tail, reported when iterated
            blocks.push(current);
        }

        log::debug!("Trace log split into {} blocks", blocks.len());
        TextLogRecords {
            blocks: blocks.into_iter(),
        }
    }
}

#[derive(Debug, Default)]
struct RawBlock {
    /// 1-based line number of the first line
    line: usize,
    lines: Vec<String>,
}

/// Iterator over the records of a text log
pub struct TextLogRecords {
    blocks: std::vec::IntoIter<RawBlock>,
}

impl Iterator for TextLogRecords {
    type Item = Result<TraceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let block = self.blocks.next()?;
        Some(parse_block(block.line, &block.lines))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.blocks.size_hint()
    }
}

/// Second whitespace token of a `key: value` line
fn value_token(line: &str) -> Option<&str> {
    line.split_whitespace().nth(1)
}

fn classify(cat_line: &str) -> Option<Category> {
    let tokens: Vec<&str> = cat_line.split_whitespace().collect();
    if tokens == ["cat:", "state"] {
        Some(Category::State)
    } else if tokens.starts_with(&["cat:", "port", "flow"]) {
        Some(Category::PortFlow)
    } else if tokens.starts_with(&["cat:", "port", "packet"]) {
        Some(Category::PortPacket)
    } else if tokens.starts_with(&["cat:", "event"]) {
        Some(Category::Event)
    } else {
        None
    }
}

fn parse_block(line: usize, lines: &[String]) -> Result<TraceRecord> {
    let malformed = |reason: String| TimelineError::MalformedRecord {
        line,
        reason,
        block: lines.to_vec(),
    };

    if lines.len() < BLOCK_LINES {
        return Err(malformed(format!(
            "truncated block ({} of {} lines)",
            lines.len(),
            BLOCK_LINES
        )));
    }

    let name = lines[0]
        .strip_prefix("name:")
        .unwrap_or(lines[0].as_str())
        .trim()
        .to_string();

    let start = match value_token(&lines[1]) {
        Some(token) => token
            .parse::<Timestamp>()
            .map_err(|_| malformed(format!("invalid timestamp {token:?}")))?,
        None => return Err(malformed("missing timestamp".to_string())),
    };

    let pid = value_token(&lines[2])
        .ok_or_else(|| malformed("missing pid".to_string()))?
        .to_string();

    let mut args: Vec<&str> = lines[4].split_whitespace().collect();
    if args.first() == Some(&"args:") {
        args.remove(0);
    }

    let end = match value_token(&lines[5]) {
        Some(token) => match token.parse::<Timestamp>() {
            Ok(end) => Some(end),
            Err(e) => {
                log::warn!("Block at line {}: {}, end treated as absent", line, e);
                None
            }
        },
        None => None,
    };

    let category = classify(&lines[3])
        .ok_or_else(|| malformed(format!("unrecognized category line {:?}", lines[3])))?;

    let kind = match category {
        Category::State => {
            let state = args
                .first()
                .ok_or_else(|| malformed("state record without a state argument".to_string()))?;
            RecordKind::State {
                machine: name,
                state: state.to_string(),
            }
        }
        Category::PortFlow => {
            if args.len() < 4 {
                return Err(malformed(format!(
                    "flow record needs mode, owner and two parameters, got {} arguments",
                    args.len()
                )));
            }
            RecordKind::PortFlow {
                flow: name,
                owner: args[1].to_string(),
                mode: args[0].to_string(),
                parameters: args[2..].iter().map(|s| s.to_string()).collect(),
            }
        }
        Category::PortPacket => {
            let transport = args
                .first()
                .ok_or_else(|| malformed("packet record without a transport argument".to_string()))?;
            let origin = if args.len() >= 3 {
                PacketOrigin::Machine {
                    machine: args[1].to_string(),
                    state: args[2].to_string(),
                }
            } else {
                PacketOrigin::Server
            };
            RecordKind::PortPacket {
                port: name,
                transport: transport.to_string(),
                origin,
            }
        }
        Category::Event => {
            let tokens: Vec<&str> = lines[3].split_whitespace().collect();
            match (tokens.get(2), tokens.get(3)) {
                (Some(scope), Some(direction)) => RecordKind::Event {
                    event: name,
                    scope: scope.to_string(),
                    direction: direction.to_string(),
                },
                _ => {
                    return Err(malformed(
                        "event category needs scope and direction".to_string(),
                    ))
                }
            }
        }
    };

    log::trace!("Parsed {} record for pid {} at {}", category, pid, start);

    Ok(TraceRecord {
        pid,
        start,
        end,
        kind,
    })
}
