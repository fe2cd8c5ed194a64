//! Interval geometry
//!
//! Places the intervals of one series on the component's time axis and
//! derives the idle gaps between consecutive intervals. Offsets and
//! durations are in seconds; gaps are kept in whole microseconds, the
//! resolution of the log.

use crate::timeline::IntervalSeries;
use crate::types::Timestamp;

/// An interval positioned relative to the component origin
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedInterval {
    /// Position of the interval within its series
    pub index: usize,
    /// Seconds from the origin to the start (negative if before it)
    pub offset: f64,
    /// Seconds from start to end, zero when the end is absent
    pub duration: f64,
    pub start: Timestamp,
    pub end: Option<Timestamp>,
    pub label: String,
    pub detail: Option<String>,
}

impl PlacedInterval {
    /// Offset of the interval's end (equal to `offset` for open intervals)
    pub fn end_offset(&self) -> f64 {
        self.offset + self.duration
    }
}

/// How consecutive intervals relate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapKind {
    /// Positive idle time, drawn
    Idle,
    /// Next interval starts exactly where this one ends
    Adjacent,
    /// Next interval starts before this one ends
    Overlap,
}

/// Space between interval `after` and interval `after + 1`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    /// Index of the interval the gap follows
    pub after: usize,
    /// Offset (seconds) where the gap begins
    pub offset: f64,
    /// Gap length in microseconds, negative for overlaps
    pub micros: i64,
}

impl Gap {
    pub fn kind(&self) -> GapKind {
        match self.micros {
            m if m > 0 => GapKind::Idle,
            0 => GapKind::Adjacent,
            _ => GapKind::Overlap,
        }
    }

    /// Only strictly positive gaps are drawn
    pub fn is_visible(&self) -> bool {
        self.kind() == GapKind::Idle
    }

    /// Gap length in seconds
    pub fn seconds(&self) -> f64 {
        self.micros as f64 / 1e6
    }
}

/// Render-ready geometry of one interval series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalLayout {
    pub intervals: Vec<PlacedInterval>,
    /// One entry per consecutive pair, `intervals.len() - 1` in total
    pub gaps: Vec<Gap>,
}

impl IntervalLayout {
    /// Compute offsets, durations and gaps for `series` against `origin`
    pub fn compute(series: &IntervalSeries, origin: Timestamp) -> Self {
        let intervals: Vec<PlacedInterval> = series
            .intervals()
            .iter()
            .enumerate()
            .map(|(index, interval)| PlacedInterval {
                index,
                offset: interval.start.seconds_since(origin),
                duration: interval
                    .end
                    .map(|end| end.seconds_since(interval.start))
                    .unwrap_or(0.0),
                start: interval.start,
                end: interval.end,
                label: interval.label.clone(),
                detail: interval.detail.clone(),
            })
            .collect();

        let gaps = series
            .intervals()
            .windows(2)
            .enumerate()
            .map(|(after, pair)| {
                let (current, next) = (&pair[0], &pair[1]);
                let current_end = current.end.unwrap_or(current.start);
                Gap {
                    after,
                    offset: current_end.seconds_since(origin),
                    micros: next.start.micros_since(current_end),
                }
            })
            .collect();

        Self { intervals, gaps }
    }

    /// Gaps that should be drawn
    pub fn visible_gaps(&self) -> impl Iterator<Item = &Gap> {
        self.gaps.iter().filter(|gap| gap.is_visible())
    }

    /// Horizontal extent covered by the intervals, if any
    pub fn extent(&self) -> Option<(f64, f64)> {
        let min = self
            .intervals
            .iter()
            .map(|i| i.offset)
            .fold(f64::INFINITY, f64::min);
        let max = self
            .intervals
            .iter()
            .map(PlacedInterval::end_offset)
            .fold(f64::NEG_INFINITY, f64::max);
        (min.is_finite() && max.is_finite()).then_some((min, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::Interval;

    fn ts(s: &str) -> Timestamp {
        s.parse().unwrap()
    }

    fn series(spans: &[(&str, Option<&str>)]) -> IntervalSeries {
        let mut series = IntervalSeries::default();
        for (i, (start, end)) in spans.iter().enumerate() {
            series.push(Interval {
                start: ts(start),
                end: end.map(ts),
                label: format!("S{i}"),
                detail: None,
            });
        }
        series
    }

    #[test]
    fn test_offsets_durations_and_gaps() {
        let origin = ts("10:00:00:000000");
        let layout = IntervalLayout::compute(
            &series(&[
                ("10:00:00:000000", Some("10:00:01:000000")),
                ("10:00:01:500000", Some("10:00:02:000000")),
                ("10:00:02:000000", Some("10:00:03:000000")),
            ]),
            origin,
        );

        assert_eq!(layout.intervals[0].offset, 0.0);
        assert_eq!(layout.intervals[0].duration, 1.0);
        assert_eq!(layout.intervals[1].offset, 1.5);
        assert_eq!(layout.intervals[1].duration, 0.5);

        assert_eq!(layout.gaps.len(), 2);
        assert_eq!(layout.gaps[0].micros, 500_000);
        assert_eq!(layout.gaps[0].offset, 1.0);
        assert_eq!(layout.gaps[0].kind(), GapKind::Idle);
        assert_eq!(layout.gaps[1].kind(), GapKind::Adjacent);
        assert_eq!(layout.visible_gaps().count(), 1);
    }

    #[test]
    fn test_positive_gap_implies_no_overlap() {
        let origin = ts("09:59:59:000000");
        let layout = IntervalLayout::compute(
            &series(&[
                ("10:00:00:000000", Some("10:00:00:300000")),
                ("10:00:00:200000", Some("10:00:01:000000")),
                ("10:00:01:000001", None),
                ("10:00:02:000000", Some("10:00:02:100000")),
            ]),
            origin,
        );

        for gap in &layout.gaps {
            let current = &layout.intervals[gap.after];
            let next = &layout.intervals[gap.after + 1];
            if gap.is_visible() {
                assert!(current.end_offset() <= next.offset);
            }
        }
        assert_eq!(layout.gaps[0].kind(), GapKind::Overlap);
        assert_eq!(layout.gaps[1].micros, 1);
    }

    #[test]
    fn test_absent_end_yields_zero_duration() {
        let origin = ts("10:00:00:000000");
        let layout = IntervalLayout::compute(
            &series(&[("10:00:01:000000", None), ("10:00:03:000000", None)]),
            origin,
        );

        assert_eq!(layout.intervals[0].duration, 0.0);
        assert_eq!(layout.intervals[0].end_offset(), 1.0);
        // Gap measured from the start of an open interval
        assert_eq!(layout.gaps[0].micros, 2_000_000);
    }

    #[test]
    fn test_offsets_before_origin_are_negative() {
        let origin = ts("10:00:05:000000");
        let layout = IntervalLayout::compute(&series(&[("10:00:04:000000", None)]), origin);
        assert_eq!(layout.intervals[0].offset, -1.0);
        assert_eq!(layout.extent(), Some((-1.0, -1.0)));
    }

    #[test]
    fn test_single_and_empty_series_have_no_gaps() {
        let origin = ts("10:00:00:000000");
        assert!(IntervalLayout::compute(&series(&[]), origin).gaps.is_empty());
        assert!(IntervalLayout::compute(&series(&[("10:00:00:000000", None)]), origin)
            .gaps
            .is_empty());
        assert_eq!(IntervalLayout::compute(&series(&[]), origin).extent(), None);
    }
}
