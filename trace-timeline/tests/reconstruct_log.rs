// End-to-end reconstruction of a log in the runtime's output format
use std::path::PathBuf;

use trace_timeline::{
    GapKind, IntervalLayout, Reconstruction, Reconstructor, SpacingStats, TimeWindow,
    TimelineError, Timestamp,
};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/component_trace.txt")
}

fn reconstruct() -> Reconstruction {
    let _ = env_logger::builder().is_test(true).try_init();
    Reconstructor::default()
        .reconstruct_file(&fixture())
        .expect("fixture is readable")
}

fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

#[test]
fn test_components_in_log_order() {
    let outcome = reconstruct();
    let pids: Vec<_> = outcome.timeline.components().map(|c| c.pid.as_str()).collect();
    assert_eq!(pids, vec!["100", "200"]);
}

#[test]
fn test_malformed_block_does_not_disturb_neighbours() {
    let outcome = reconstruct();

    assert_eq!(outcome.malformed.len(), 1);
    match &outcome.malformed[0] {
        TimelineError::MalformedRecord { line, reason, block } => {
            assert_eq!(*line, 43);
            assert_eq!(reason, "missing timestamp");
            assert_eq!(block[0], "name: Receiver");
        }
        other => panic!("unexpected error: {other}"),
    }

    // The skipped Receiver record leaves the Receiver series untouched
    let component = outcome.timeline.component("100").unwrap();
    assert_eq!(component.state_machines["Receiver"].len(), 1);
    // and the next block (a server-side packet) is still read
    assert_eq!(component.ports["in(UDP) Server"].len(), 1);
}

#[test]
fn test_series_grouping() {
    let outcome = reconstruct();
    let component = outcome.timeline.component("100").unwrap();

    let machines: Vec<_> = component.state_machines.keys().cloned().collect();
    assert_eq!(machines, vec!["Sender", "Receiver"]);

    let sender: Vec<_> = component.state_machines["Sender"]
        .intervals()
        .iter()
        .map(|i| (i.label.as_str(), i.end))
        .collect();
    assert_eq!(
        sender,
        vec![
            ("IDLE", Some(ts("10:00:01:000000"))),
            ("SENDING", Some(ts("10:00:03:000000"))),
            ("IDLE", None),
        ]
    );

    let flows = component.flows["Sender"].intervals();
    assert_eq!(flows.len(), 2);
    assert_eq!(flows[0].label, "burst");
    assert_eq!(flows[0].detail.as_deref(), Some("on_off 64 10"));
    assert_eq!(flows[1].detail.as_deref(), Some("simple 128 20"));

    let ports: Vec<_> = component.ports.keys().cloned().collect();
    assert_eq!(ports, vec!["out(TCP) Sender", "in(UDP) Server"]);
    let out_labels: Vec<_> = component.ports["out(TCP) Sender"]
        .occurrences()
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(out_labels, vec!["SENDING", "SENDING"]);
    assert_eq!(component.ports["in(UDP) Server"].occurrences()[0].label, "Server");

    let events: Vec<_> = component
        .events
        .occurrences()
        .iter()
        .map(|o| o.label.as_str())
        .collect();
    assert_eq!(events, vec!["start_app_event_snd", "start_env_event_rcv"]);
}

#[test]
fn test_geometry_shares_state_machine_origin() {
    let outcome = reconstruct();
    let component = outcome.timeline.component("100").unwrap();
    let origin = component.base_time().unwrap();
    assert_eq!(origin, ts("10:00:00:000000"));

    let sender = IntervalLayout::compute(&component.state_machines["Sender"], origin);
    let kinds: Vec<_> = sender.gaps.iter().map(|g| g.kind()).collect();
    assert_eq!(kinds, vec![GapKind::Idle, GapKind::Adjacent]);
    assert_eq!(sender.gaps[0].micros, 500_000);
    assert_eq!(sender.intervals[2].duration, 0.0);

    // Flows are placed against the same origin
    let flows = IntervalLayout::compute(&component.flows["Sender"], origin);
    assert_eq!(flows.intervals[0].offset, 1.5);
    assert_eq!(flows.intervals[1].offset, 3.0);
    assert_eq!(flows.gaps[0].micros, 500_000);
}

#[test]
fn test_component_without_state_machines_has_no_origin() {
    let outcome = reconstruct();
    let component = outcome.timeline.component("200").unwrap();
    assert_eq!(component.events.len(), 2);
    assert!(matches!(
        component.base_time(),
        Err(TimelineError::MissingOrigin(ref pid)) if pid == "200"
    ));
}

#[test]
fn test_viewport_scoped_statistics() {
    let outcome = reconstruct();
    let component = outcome.timeline.component("100").unwrap();
    let origin = component.base_time().unwrap();

    let out = &component.ports["out(TCP) Sender"];
    let visible = out.visible_in(origin, TimeWindow::new(0.0, 2.0));
    let summary = *SpacingStats::from_timestamps(&visible).summary().unwrap();
    assert_eq!(summary.count, 1);
    assert_eq!(summary.mean, 0.1);

    // Zoomed past the first packet only one occurrence remains
    let visible = out.visible_in(origin, TimeWindow::new(1.65, 2.0));
    assert_eq!(
        SpacingStats::from_timestamps(&visible),
        SpacingStats::InsufficientData { occurrences: 1 }
    );

    let events = SpacingStats::from_timestamps(&component.events.timestamps());
    assert_eq!(events.summary().unwrap().max, 4.0);
}
