//! Quiet hours: a daily hour-of-day window during which no new tasks are
//! promoted to running.

use serde::{Deserialize, Serialize};

/// A daily quiet window over hour-of-day (0..=23).
///
/// - Same-day range (`start < end`): quiet when `start <= hour < end`.
/// - Wrap-around range (`start > end`, e.g. 23..6): quiet when
///   `hour >= start || hour < end`.
/// - `start == end`: never quiet. A degenerate range is not a 24-hour
///   block; the conservative reading keeps the scheduler working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuietHours {
    pub start: u32,
    pub end: u32,
}

impl QuietHours {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: start % 24,
            end: end % 24,
        }
    }

    /// Is `hour` inside the quiet window?
    pub fn contains(&self, hour: u32) -> bool {
        if self.start == self.end {
            false
        } else if self.start < self.end {
            self.start <= hour && hour < self.end
        } else {
            hour >= self.start || hour < self.end
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    // Same-day window.
    #[case(9, 17, 9, true)]
    #[case(9, 17, 16, true)]
    #[case(9, 17, 17, false)]
    #[case(9, 17, 8, false)]
    // One-hour window at h.
    #[case(14, 15, 14, true)]
    #[case(14, 15, 15, false)]
    // Window starting two hours later never covers h.
    #[case(16, 18, 14, false)]
    // Wrap-around overnight window.
    #[case(23, 6, 23, true)]
    #[case(23, 6, 2, true)]
    #[case(23, 6, 6, false)]
    #[case(23, 6, 12, false)]
    // Wrap-around covering the whole day except one hour.
    #[case(14, 13, 14, true)]
    #[case(14, 13, 13, false)]
    #[case(14, 13, 0, true)]
    // Degenerate range: never quiet.
    #[case(5, 5, 5, false)]
    #[case(0, 0, 12, false)]
    fn quiet_hours_table(
        #[case] start: u32,
        #[case] end: u32,
        #[case] hour: u32,
        #[case] quiet: bool,
    ) {
        assert_eq!(QuietHours::new(start, end).contains(hour), quiet);
    }

    #[test]
    fn constructor_wraps_out_of_range_hours() {
        let q = QuietHours::new(25, 30);
        assert_eq!(q.start, 1);
        assert_eq!(q.end, 6);
    }
}
