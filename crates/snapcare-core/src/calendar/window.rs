//! Rolling window of consecutive days.
//!
//! The window never looks at the clock. Callers pass the reference day in,
//! which keeps every view reproducible in tests.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::recurrence::{self, DayBucket};
use crate::task::Task;

/// Largest number of days a window may show.
pub const MAX_WINDOW_DAYS: u32 = 31;

/// `len` consecutive days starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayWindow {
    start: NaiveDate,
    len: u32,
}

impl DayWindow {
    pub fn new(start: NaiveDate, len: u32) -> Self {
        Self { start, len }
    }

    /// Window reached by paging `page` times from `reference`.
    ///
    /// Page 0 starts at `reference`; negative pages go back in time.
    pub fn page(reference: NaiveDate, len: u32, page: i64) -> Self {
        Self::new(reference, len).shift(page.saturating_mul(i64::from(len)))
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Last day of the window, `None` when empty.
    pub fn end(&self) -> Option<NaiveDate> {
        let last = self.len.checked_sub(1)?;
        self.start.checked_add_days(Days::new(u64::from(last)))
    }

    /// Days in order. Stops early at the end of chrono's date range.
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..u64::from(self.len))
            .map_while(|i| self.start.checked_add_days(Days::new(i)))
            .collect()
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        match self.end() {
            Some(end) => self.start <= day && day <= end,
            None => false,
        }
    }

    /// Move the start by `days` (negative = earlier). Out-of-range moves
    /// leave the window where it is.
    pub fn shift(&self, days: i64) -> Self {
        let magnitude = Days::new(days.unsigned_abs());
        let start = if days >= 0 {
            self.start.checked_add_days(magnitude)
        } else {
            self.start.checked_sub_days(magnitude)
        };
        Self {
            start: start.unwrap_or(self.start),
            len: self.len,
        }
    }

    /// Swipe forward one full window.
    pub fn next_page(&self) -> Self {
        self.shift(i64::from(self.len))
    }

    /// Swipe back one full window.
    pub fn previous_page(&self) -> Self {
        self.shift(-i64::from(self.len))
    }

    /// Bucket `tasks` over this window's days.
    pub fn bucketize<'a>(&self, tasks: &'a [Task]) -> Vec<DayBucket<'a>> {
        recurrence::bucketize(tasks, &self.days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_are_consecutive_across_month_end() {
        let w = DayWindow::new(day(2024, 2, 28), 3);
        assert_eq!(w.days(), vec![day(2024, 2, 28), day(2024, 2, 29), day(2024, 3, 1)]);
        assert_eq!(w.end(), Some(day(2024, 3, 1)));
    }

    #[test]
    fn empty_window_has_no_days() {
        let w = DayWindow::new(day(2024, 1, 1), 0);
        assert!(w.is_empty());
        assert!(w.days().is_empty());
        assert_eq!(w.end(), None);
        assert!(!w.contains(day(2024, 1, 1)));
    }

    #[test]
    fn paging_moves_by_whole_windows() {
        let w = DayWindow::new(day(2024, 1, 1), 2);
        assert_eq!(w.next_page().start(), day(2024, 1, 3));
        assert_eq!(w.previous_page().start(), day(2023, 12, 30));
        assert_eq!(w.next_page().previous_page(), w);
        assert_eq!(DayWindow::page(day(2024, 1, 1), 7, -2).start(), day(2023, 12, 18));
    }

    #[test]
    fn contains_checks_both_ends() {
        let w = DayWindow::new(day(2024, 1, 10), 5);
        assert!(w.contains(day(2024, 1, 10)));
        assert!(w.contains(day(2024, 1, 14)));
        assert!(!w.contains(day(2024, 1, 15)));
        assert!(!w.contains(day(2024, 1, 9)));
    }

    #[test]
    fn shift_out_of_range_is_a_no_op() {
        let w = DayWindow::new(NaiveDate::MAX, 1);
        assert_eq!(w.shift(1).start(), NaiveDate::MAX);
    }
}
