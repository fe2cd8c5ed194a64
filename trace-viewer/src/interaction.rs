//! Per-panel interaction state
//!
//! Click, hover and analyse handling is kept here as plain state
//! transitions, independent of egui. The draw step in `panel.rs` reads
//! this state every frame and feeds pointer input back into it.

use std::collections::BTreeMap;

use trace_timeline::{
    Gap, IntervalLayout, OccurrenceSeries, PlacedInterval, SpacingStats, TimeWindow, Timestamp,
};

/// Clickable element of an interval panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BarElement {
    /// Interval bar, by position in the layout
    Interval(usize),
    /// Gap bar, by position in `IntervalLayout::gaps`
    Gap(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarState {
    Collapsed,
    Expanded,
}

/// Which bars of one interval panel show their annotation
#[derive(Debug, Default)]
pub struct IntervalPanelState {
    /// Expanded elements and the plot position their text is anchored at
    expanded: BTreeMap<BarElement, [f64; 2]>,
}

impl IntervalPanelState {
    pub fn state(&self, element: BarElement) -> BarState {
        if self.expanded.contains_key(&element) {
            BarState::Expanded
        } else {
            BarState::Collapsed
        }
    }

    /// Flip `element` between collapsed and expanded
    ///
    /// `anchor` is where the annotation is drawn when expanding.
    pub fn toggle(&mut self, element: BarElement, anchor: [f64; 2]) -> BarState {
        if self.expanded.remove(&element).is_some() {
            BarState::Collapsed
        } else {
            self.expanded.insert(element, anchor);
            BarState::Expanded
        }
    }

    pub fn expanded(&self) -> impl Iterator<Item = (BarElement, [f64; 2])> + '_ {
        self.expanded.iter().map(|(element, anchor)| (*element, *anchor))
    }
}

/// Every bar containing the plot position `(x, y)`
///
/// Bars sit on the row `y = 0` and span `±half_height` vertically. Bars
/// narrower than `2 * min_half_width` (open intervals in particular) are
/// widened to that around their centre so they stay clickable.
pub fn hit_test(
    layout: &IntervalLayout,
    x: f64,
    y: f64,
    half_height: f64,
    min_half_width: f64,
) -> Vec<BarElement> {
    if y.abs() > half_height {
        return Vec::new();
    }

    let within = |lo: f64, hi: f64| {
        if hi - lo < 2.0 * min_half_width {
            let centre = (lo + hi) / 2.0;
            (x - centre).abs() <= min_half_width
        } else {
            x >= lo && x <= hi
        }
    };

    let intervals = layout
        .intervals
        .iter()
        .filter(|i| within(i.offset, i.end_offset()))
        .map(|i| BarElement::Interval(i.index));
    let gaps = layout
        .gaps
        .iter()
        .enumerate()
        .filter(|(_, gap)| gap.is_visible() && within(gap.offset, gap.offset + gap.seconds()))
        .map(|(idx, _)| BarElement::Gap(idx));

    intervals.chain(gaps).collect()
}

/// Text shown for an expanded interval bar
pub fn interval_annotation(interval: &PlacedInterval, placeholder: &str) -> String {
    let end = interval.end.map(|end| end.to_string()).unwrap_or_default();
    format!(
        "{} Start: {} \n End: {}\n{}\nDuration: {:.2} seconds",
        interval.label,
        interval.start,
        end,
        interval.detail.as_deref().unwrap_or(placeholder),
        interval.duration
    )
}

/// Text shown for an expanded gap bar
pub fn gap_annotation(gap: &Gap) -> String {
    format!("Gap Duration: {} µs", gap.micros)
}

/// Annotation for any element of `layout`, `None` if it does not exist
pub fn annotation(layout: &IntervalLayout, element: BarElement, placeholder: &str) -> Option<String> {
    match element {
        BarElement::Interval(idx) => layout
            .intervals
            .get(idx)
            .map(|interval| interval_annotation(interval, placeholder)),
        BarElement::Gap(idx) => layout.gaps.get(idx).map(gap_annotation),
    }
}

/// The single hover tooltip of an occurrence panel
#[derive(Debug, Default)]
pub struct HoverTooltip {
    active: Option<usize>,
}

impl HoverTooltip {
    /// Index of the occurrence whose tooltip is shown
    pub fn active(&self) -> Option<usize> {
        self.active
    }

    /// Show the tooltip for `hit`, or hide it when `None`
    ///
    /// Returns true when what is displayed changed.
    pub fn update(&mut self, hit: Option<usize>) -> bool {
        let changed = self.active != hit;
        self.active = hit;
        changed
    }
}

/// Index of the screen point closest to `pointer`, if within `radius`
pub fn nearest_point(points: &[[f32; 2]], pointer: [f32; 2], radius: f32) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let dx = p[0] - pointer[0];
            let dy = p[1] - pointer[1];
            (idx, dx * dx + dy * dy)
        })
        .filter(|(_, d2)| *d2 <= radius * radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(idx, _)| idx)
}

/// Hover and statistics state of one occurrence panel
#[derive(Debug, Default)]
pub struct OccurrencePanelState {
    pub hover: HoverTooltip,
    /// Horizontal extent at the end of the last completed frame
    viewport: Option<TimeWindow>,
    last_stats: Option<SpacingStats>,
}

impl OccurrencePanelState {
    /// Record the current horizontal extent (cheap, every frame)
    pub fn observe_viewport(&mut self, window: TimeWindow) {
        self.viewport = Some(window);
    }

    /// Spacing statistics of the occurrences inside the recorded viewport
    ///
    /// Before any viewport has been observed the whole series counts as
    /// visible.
    pub fn analyse(&mut self, series: &OccurrenceSeries, origin: Timestamp) -> SpacingStats {
        let visible = match self.viewport {
            Some(window) => series.visible_in(origin, window),
            None => series.timestamps(),
        };
        log::debug!("Analysing {} of {} occurrences", visible.len(), series.len());

        let stats = SpacingStats::from_timestamps(&visible);
        self.last_stats = Some(stats);
        stats
    }

    pub fn last_stats(&self) -> Option<&SpacingStats> {
        self.last_stats.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trace_timeline::{Interval, IntervalSeries, Occurrence};

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn layout() -> IntervalLayout {
        let mut series = IntervalSeries::default();
        series.push(Interval {
            start: ts("10:00:00:000000"),
            end: Some(ts("10:00:01:000000")),
            label: "IDLE".into(),
            detail: None,
        });
        series.push(Interval {
            start: ts("10:00:02:000000"),
            end: Some(ts("10:00:02:500000")),
            label: "burst".into(),
            detail: Some("on_off 64 10".into()),
        });
        series.push(Interval {
            start: ts("10:00:03:000000"),
            end: None,
            label: "IDLE".into(),
            detail: None,
        });
        IntervalLayout::compute(&series, ts("10:00:00:000000"))
    }

    #[test]
    fn test_toggle_twice_returns_to_collapsed() {
        let mut state = IntervalPanelState::default();
        let bar = BarElement::Interval(0);
        assert_eq!(state.state(bar), BarState::Collapsed);

        assert_eq!(state.toggle(bar, [0.5, 0.0]), BarState::Expanded);
        assert_eq!(state.state(bar), BarState::Expanded);
        assert_eq!(state.toggle(bar, [0.7, 0.1]), BarState::Collapsed);
        assert_eq!(state.state(bar), BarState::Collapsed);
        assert_eq!(state.expanded().count(), 0);
    }

    #[test]
    fn test_gap_toggle_is_independent_of_bars() {
        let mut state = IntervalPanelState::default();
        state.toggle(BarElement::Interval(0), [0.5, 0.0]);
        state.toggle(BarElement::Gap(0), [1.5, 0.0]);
        state.toggle(BarElement::Gap(0), [1.5, 0.0]);

        assert_eq!(state.state(BarElement::Interval(0)), BarState::Expanded);
        assert_eq!(state.state(BarElement::Gap(0)), BarState::Collapsed);
    }

    #[test]
    fn test_hit_test() {
        let layout = layout();

        assert_eq!(hit_test(&layout, 0.5, 0.1, 0.3, 0.01), vec![BarElement::Interval(0)]);
        assert_eq!(hit_test(&layout, 1.5, 0.0, 0.3, 0.01), vec![BarElement::Gap(0)]);
        // Outside the bar row
        assert!(hit_test(&layout, 0.5, 0.5, 0.3, 0.01).is_empty());
        // Open interval at 3.0 is reachable through the minimum width
        assert_eq!(hit_test(&layout, 3.005, 0.0, 0.3, 0.01), vec![BarElement::Interval(2)]);
        assert!(hit_test(&layout, 3.5, 0.0, 0.3, 0.01).is_empty());
    }

    #[test]
    fn test_annotations_are_deterministic() {
        let layout = layout();

        let text = annotation(&layout, BarElement::Interval(0), "No arguments").unwrap();
        assert_eq!(
            text,
            "IDLE Start: 10:00:00:000000 \n End: 10:00:01:000000\nNo arguments\nDuration: 1.00 seconds"
        );
        assert_eq!(annotation(&layout, BarElement::Interval(0), "No arguments").unwrap(), text);

        let flow = annotation(&layout, BarElement::Interval(1), "No arguments").unwrap();
        assert!(flow.contains("\non_off 64 10\n"));
        assert!(flow.ends_with("Duration: 0.50 seconds"));

        let open = annotation(&layout, BarElement::Interval(2), "No arguments").unwrap();
        assert!(open.contains(" End: \n"));

        assert_eq!(
            annotation(&layout, BarElement::Gap(0), "No arguments").unwrap(),
            "Gap Duration: 1000000 µs"
        );
        assert!(annotation(&layout, BarElement::Gap(9), "No arguments").is_none());
    }

    #[test]
    fn test_hover_shows_single_nearest_point() {
        let points = [[10.0, 50.0], [20.0, 50.0], [100.0, 50.0]];
        assert_eq!(nearest_point(&points, [18.0, 51.0], 6.0), Some(1));
        assert_eq!(nearest_point(&points, [60.0, 50.0], 6.0), None);

        let mut tooltip = HoverTooltip::default();
        assert!(tooltip.update(Some(1)));
        assert!(!tooltip.update(Some(1)));
        assert_eq!(tooltip.active(), Some(1));
        assert!(tooltip.update(None));
        assert_eq!(tooltip.active(), None);
    }

    #[test]
    fn test_analyse_uses_observed_viewport() {
        let origin = ts("10:00:00:000000");
        let mut series = OccurrenceSeries::default();
        for at in ["10:00:00:000000", "10:00:01:500000", "10:00:03:000000", "10:00:09:000000"] {
            series.push(Occurrence {
                at: ts(at),
                label: "x".into(),
            });
        }

        let mut state = OccurrencePanelState::default();
        let everything = state.analyse(&series, origin);
        assert_eq!(everything.summary().unwrap().count, 3);

        state.observe_viewport(TimeWindow::new(0.0, 3.0));
        let zoomed = state.analyse(&series, origin);
        assert_eq!(zoomed.summary().unwrap().mean, 1.5);
        assert_eq!(state.last_stats(), Some(&zoomed));

        state.observe_viewport(TimeWindow::new(5.0, 8.0));
        assert_eq!(
            state.analyse(&series, origin),
            SpacingStats::InsufficientData { occurrences: 0 }
        );
    }
}
