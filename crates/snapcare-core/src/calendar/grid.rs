//! Vertical time axis of a day column.
//!
//! Tasks are positioned from their slot offset. The grid reports whether a
//! task falls inside the visible hour range but never drops it; clipping or
//! scrolling is up to whoever draws the column.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::recurrence::{slot_offset, DayBucket};
use crate::task::Task;

/// Hour range and scale of a day column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeGrid {
    start_hour: u32,
    end_hour: u32,
    hour_height: u32,
}

/// Where a task card goes in a day column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub task_id: String,
    /// Offset from the top of the column; negative above `start_hour`.
    pub top: f64,
    pub visible: bool,
    pub time_label: String,
}

impl Default for TimeGrid {
    fn default() -> Self {
        Self {
            start_hour: 7,
            end_hour: 22,
            hour_height: 60,
        }
    }
}

impl TimeGrid {
    pub fn new(start_hour: u32, end_hour: u32, hour_height: u32) -> Result<Self, ValidationError> {
        if end_hour > 23 {
            return Err(ValidationError::InvalidValue {
                field: "end_hour".into(),
                message: format!("{end_hour} is not an hour of the day"),
            });
        }
        if start_hour >= end_hour {
            return Err(ValidationError::InvalidValue {
                field: "start_hour".into(),
                message: format!("must be before end_hour ({start_hour} >= {end_hour})"),
            });
        }
        if hour_height == 0 {
            return Err(ValidationError::InvalidValue {
                field: "hour_height".into(),
                message: "must be positive".into(),
            });
        }
        Ok(Self {
            start_hour,
            end_hour,
            hour_height,
        })
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn hour_height(&self) -> u32 {
        self.hour_height
    }

    /// Total height; the last labelled hour gets a full row.
    pub fn content_height(&self) -> u32 {
        (self.end_hour - self.start_hour + 1) * self.hour_height
    }

    /// One label per row, `start_hour..=end_hour`.
    pub fn hour_labels(&self) -> Vec<String> {
        (self.start_hour..=self.end_hour).map(hour_label).collect()
    }

    pub fn place(&self, task: &Task) -> Placement {
        let slot = slot_offset(task);
        let from = self.start_hour * 60;
        let until = (self.end_hour + 1) * 60;
        let minutes_from_top = f64::from(slot) - f64::from(from);
        Placement {
            task_id: task.id.clone(),
            top: minutes_from_top * f64::from(self.hour_height) / 60.0,
            visible: (from..until).contains(&slot),
            time_label: time_label(task.anchor.time()),
        }
    }

    /// Placements for every occurrence in a bucket, in bucket order.
    pub fn layout(&self, bucket: &DayBucket<'_>) -> Vec<Placement> {
        bucket.occurrences.iter().map(|t| self.place(t)).collect()
    }
}

/// `7 AM`, `12 PM`, `10 PM`, `12 AM`.
pub fn hour_label(hour: u32) -> String {
    match hour % 24 {
        0 => "12 AM".to_string(),
        h @ 1..=11 => format!("{h} AM"),
        12 => "12 PM".to_string(),
        h => format!("{} PM", h - 12),
    }
}

/// `9:05 AM` style label for a card.
pub fn time_label(time: NaiveTime) -> String {
    let (pm, hour) = time.hour12();
    format!("{hour}:{:02} {}", time.minute(), if pm { "PM" } else { "AM" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Frequency, TaskType};
    use chrono::NaiveDateTime;

    fn task_at(time: &str) -> Task {
        Task {
            id: time.into(),
            title: "t".into(),
            description: String::new(),
            anchor: NaiveDateTime::parse_from_str(&format!("2024-01-01T{time}"), "%Y-%m-%dT%H:%M")
                .unwrap(),
            frequency: Frequency::Daily,
            task_type: TaskType::Other,
        }
    }

    #[test]
    fn default_grid_matches_day_column() {
        let grid = TimeGrid::default();
        assert_eq!(grid.content_height(), 16 * 60);
        let labels = grid.hour_labels();
        assert_eq!(labels.len(), 16);
        assert_eq!(labels.first().map(String::as_str), Some("7 AM"));
        assert_eq!(labels[5], "12 PM");
        assert_eq!(labels.last().map(String::as_str), Some("10 PM"));
    }

    #[test]
    fn place_scales_by_hour_height() {
        let grid = TimeGrid::new(7, 22, 120).unwrap();
        let p = grid.place(&task_at("09:30"));
        assert_eq!(p.top, 300.0);
        assert!(p.visible);
        assert_eq!(p.time_label, "9:30 AM");
    }

    #[test]
    fn tasks_outside_hours_are_placed_but_hidden() {
        let grid = TimeGrid::default();
        let early = grid.place(&task_at("06:00"));
        assert_eq!(early.top, -60.0);
        assert!(!early.visible);

        let last_row = grid.place(&task_at("22:59"));
        assert!(last_row.visible);
        assert!(!grid.place(&task_at("23:00")).visible);
    }

    #[test]
    fn rejects_inverted_or_flat_grids() {
        assert!(TimeGrid::new(10, 10, 60).is_err());
        assert!(TimeGrid::new(12, 8, 60).is_err());
        assert!(TimeGrid::new(7, 24, 60).is_err());
        assert!(TimeGrid::new(7, 22, 0).is_err());
    }

    #[test]
    fn labels_use_twelve_hour_clock() {
        assert_eq!(hour_label(0), "12 AM");
        assert_eq!(hour_label(13), "1 PM");
        assert_eq!(time_label(NaiveTime::from_hms_opt(0, 5, 0).unwrap()), "12:05 AM");
        assert_eq!(time_label(NaiveTime::from_hms_opt(14, 30, 0).unwrap()), "2:30 PM");
    }
}
