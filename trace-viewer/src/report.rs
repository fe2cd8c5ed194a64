//! Console reports
//!
//! Spacing statistics requested from a panel and the headless `--summary`
//! output are both plain text written to stdout.

use std::fmt::Write;
use std::path::Path;

use trace_timeline::{Component, Reconstruction, SpacingStats};

/// Statistics block for one panel
///
/// # Arguments
/// * `title` - Title of the panel the statistics belong to
/// * `pid` - Component the panel belongs to
/// * `stats` - Result of the spacing analysis
pub fn format_stats(title: &str, pid: &str, stats: &SpacingStats) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "Component PID: {}", pid);
    match stats {
        SpacingStats::Summary(summary) => {
            let _ = writeln!(out, " Nr: {}", summary.occurrences());
            let _ = writeln!(out, " Min: {}", summary.min);
            let _ = writeln!(out, " Max: {}", summary.max);
            let _ = writeln!(out, " Avg: {}", summary.mean);
            let _ = writeln!(out, " Std_dev: {}", summary.std_dev);
        }
        SpacingStats::InsufficientData { .. } => {
            let _ = writeln!(out, "Not enough data to analyse");
        }
    }
    out
}

/// Print a statistics block followed by a blank line
pub fn print_stats(title: &str, pid: &str, stats: &SpacingStats) {
    println!("{}", format_stats(title, pid, stats));
}

/// One-line form shown next to the Analyse button
pub fn inline_stats(stats: &SpacingStats) -> String {
    match stats {
        SpacingStats::Summary(s) => format!(
            "Nr: {}  Min: {:.6}  Max: {:.6}  Avg: {:.6}  Std_dev: {:.6}",
            s.occurrences(),
            s.min,
            s.max,
            s.mean,
            s.std_dev
        ),
        SpacingStats::InsufficientData { occurrences } => {
            format!("Not enough data to analyse ({} visible)", occurrences)
        }
    }
}

/// Full-range overview of one component
pub fn format_component(component: &Component) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Component PID: {}", component.pid);
    match component.base_time() {
        Ok(origin) => {
            let _ = writeln!(out, " Origin: {}", origin);
        }
        Err(e) => {
            let _ = writeln!(out, " Origin: unavailable ({})", e);
        }
    }

    let machines: Vec<&str> = component.state_machines.keys().map(String::as_str).collect();
    let _ = writeln!(out, " State machines: {} [{}]", machines.len(), machines.join(", "));
    let _ = writeln!(
        out,
        " Flows: {}",
        component.flows.values().map(|s| s.len()).sum::<usize>()
    );
    let _ = writeln!(out, " Ports: {}", component.ports.len());
    let _ = writeln!(out, " Events: {}", component.events.len());

    for (key, series) in &component.ports {
        let stats = SpacingStats::from_timestamps(&series.timestamps());
        let _ = writeln!(out, "  {}: {}", key, inline_stats(&stats));
    }
    let stats = SpacingStats::from_timestamps(&component.events.timestamps());
    let _ = writeln!(out, "  Events: {}", inline_stats(&stats));
    out
}

/// Headless summary of a whole reconstruction
pub fn format_summary(source: &Path, outcome: &Reconstruction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Trace: {:?}", source);
    let _ = writeln!(
        out,
        "Components: {}  Malformed blocks: {}  Filtered records: {}",
        outcome.timeline.len(),
        outcome.malformed.len(),
        outcome.filtered
    );
    for error in &outcome.malformed {
        let _ = writeln!(out, "  {}", error);
    }
    for component in outcome.timeline.components() {
        let _ = writeln!(out);
        out.push_str(&format_component(component));
    }
    out
}

pub fn print_summary(source: &Path, outcome: &Reconstruction) {
    print!("{}", format_summary(source, outcome));
}
