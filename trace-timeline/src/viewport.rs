//! Horizontal viewport extent
//!
//! A [`TimeWindow`] is the visible range of a panel's time axis, in seconds
//! relative to the component origin. It is what decides which occurrences
//! count as visible when statistics are requested.

/// Closed range of seconds on a component's time axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: f64,
    pub end: f64,
}

impl TimeWindow {
    /// Build a window, swapping the bounds if given in reverse
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// Whether `seconds` lies inside the window (inclusive)
    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.start && seconds <= self.end
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_normalizes_bounds() {
        let window = TimeWindow::new(3.0, -1.0);
        assert_eq!(window.start, -1.0);
        assert_eq!(window.end, 3.0);
        assert_eq!(window.width(), 4.0);
    }

    #[test]
    fn test_window_contains_bounds() {
        let window = TimeWindow::new(0.0, 1.0);
        assert!(window.contains(0.0));
        assert!(window.contains(1.0));
        assert!(!window.contains(1.000001));
        assert!(!window.contains(-0.5));
    }
}
