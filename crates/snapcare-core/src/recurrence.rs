//! Recurrence evaluation and day bucketing.
//!
//! Everything here is a pure function of its inputs. The calendar calls
//! [`bucketize`] on every redraw, so nothing is cached and nothing logs.
//!
//! Rules, with `delta = day - anchor_day` in whole calendar days:
//!
//! | frequency | occurs when                                  |
//! |-----------|----------------------------------------------|
//! | once      | `delta == 0`                                 |
//! | daily     | `delta >= 0`                                 |
//! | weekly    | `delta >= 0` and same weekday as the anchor  |
//! | monthly   | `delta >= 0` and same day-of-month           |
//! | other     | treated as once                              |
//!
//! A monthly task anchored on the 29th, 30th or 31st skips months that are
//! too short rather than moving to the month's last day.

use chrono::{Datelike, Months, NaiveDate, Timelike};
use serde::Serialize;

use crate::task::{Frequency, Task};

/// Longest gap between two monthly occurrences is two months (31st across
/// a 30-day month), so a year of lookahead always finds the next one.
const MONTH_LOOKAHEAD: u32 = 12;

/// Tasks occurring on one calendar day, in task-collection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayBucket<'a> {
    pub date: NaiveDate,
    pub occurrences: Vec<&'a Task>,
}

impl DayBucket<'_> {
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Whether `task` manifests on `day`.
pub fn occurs_on(task: &Task, day: NaiveDate) -> bool {
    let anchor_day = task.anchor_day();
    let delta = day.signed_duration_since(anchor_day).num_days();
    if delta < 0 {
        return false;
    }

    match &task.frequency {
        Frequency::Daily => true,
        Frequency::Weekly => day.weekday() == anchor_day.weekday(),
        Frequency::Monthly => day.day() == anchor_day.day(),
        Frequency::Once | Frequency::Other(_) => delta == 0,
    }
}

/// Minutes since midnight of the anchor's time-of-day.
///
/// The same on every occurrence day.
pub fn slot_offset(task: &Task) -> u32 {
    task.anchor.hour() * 60 + task.anchor.minute()
}

/// One bucket per entry of `days`, in the same order, empty ones included.
pub fn bucketize<'a>(tasks: &'a [Task], days: &[NaiveDate]) -> Vec<DayBucket<'a>> {
    days.iter()
        .map(|&date| DayBucket {
            date,
            occurrences: tasks.iter().filter(|t| occurs_on(t, date)).collect(),
        })
        .collect()
}

/// First day on or after `from` on which `task` occurs.
///
/// `None` for single-occurrence tasks whose day has passed.
pub fn next_occurrence(task: &Task, from: NaiveDate) -> Option<NaiveDate> {
    let anchor_day = task.anchor_day();
    let start = from.max(anchor_day);

    match &task.frequency {
        Frequency::Once | Frequency::Other(_) => (from <= anchor_day).then_some(anchor_day),
        Frequency::Daily => Some(start),
        Frequency::Weekly => {
            let ahead = (anchor_day.weekday().num_days_from_monday() + 7
                - start.weekday().num_days_from_monday())
                % 7;
            start.checked_add_days(chrono::Days::new(u64::from(ahead)))
        }
        Frequency::Monthly => {
            let first_of_month = start.with_day(1)?;
            (0..=MONTH_LOOKAHEAD)
                .filter_map(|i| first_of_month.checked_add_months(Months::new(i)))
                .filter_map(|m| m.with_day(anchor_day.day()))
                .find(|d| *d >= start)
        }
    }
}

/// Every occurrence of `task` in the inclusive range `from..=to`.
pub fn occurrences_between(
    task: &Task,
    from: NaiveDate,
    to: NaiveDate,
) -> impl Iterator<Item = NaiveDate> + '_ {
    let start = from.max(task.anchor_day());
    start
        .iter_days()
        .take_while(move |d| *d <= to)
        .filter(move |d| occurs_on(task, *d))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskType;
    use chrono::NaiveDateTime;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn task(id: &str, anchor: &str, frequency: Frequency) -> Task {
        Task {
            id: id.into(),
            title: format!("task {id}"),
            description: String::new(),
            anchor: NaiveDateTime::parse_from_str(anchor, "%Y-%m-%dT%H:%M").unwrap(),
            frequency,
            task_type: TaskType::Medication,
        }
    }

    fn window(start: &str, len: u64) -> Vec<NaiveDate> {
        day(start).iter_days().take(len as usize).collect()
    }

    #[test]
    fn once_matches_only_anchor_day_regardless_of_time() {
        let t = task("a", "2024-03-10T23:59", Frequency::Once);
        assert!(occurs_on(&t, day("2024-03-10")));
        assert!(!occurs_on(&t, day("2024-03-11")));
        assert!(!occurs_on(&t, day("2024-03-09")));
    }

    #[test]
    fn once_scenario_slot_offset() {
        let t = task("a", "2024-03-10T14:30", Frequency::Once);
        assert!(!occurs_on(&t, day("2024-03-11")));
        assert!(occurs_on(&t, day("2024-03-10")));
        assert_eq!(slot_offset(&t), 870);
    }

    #[test]
    fn daily_never_before_anchor() {
        let t = task("a", "2024-01-01T08:00", Frequency::Daily);
        assert!(!occurs_on(&t, day("2023-12-31")));
        assert!(occurs_on(&t, day("2024-01-01")));
        assert!(occurs_on(&t, day("2031-07-19")));
    }

    #[test]
    fn weekly_scenario_over_fifteen_days() {
        let t = task("a", "2024-01-01T09:00", Frequency::Weekly);
        let hits: Vec<_> = window("2024-01-01", 15)
            .into_iter()
            .filter(|d| occurs_on(&t, *d))
            .collect();
        assert_eq!(hits, vec![day("2024-01-01"), day("2024-01-08"), day("2024-01-15")]);
    }

    #[test]
    fn weekly_crosses_year_boundary() {
        let t = task("a", "2023-12-27T09:00", Frequency::Weekly);
        assert!(occurs_on(&t, day("2024-01-03")));
        assert!(!occurs_on(&t, day("2024-01-02")));
    }

    #[test]
    fn monthly_skips_short_months() {
        let t = task("a", "2024-01-31T08:00", Frequency::Monthly);
        let feb = window("2024-02-01", 29);
        assert!(feb.iter().all(|d| !occurs_on(&t, *d)));
        assert!(occurs_on(&t, day("2024-03-31")));
        assert!(!occurs_on(&t, day("2024-04-30")));
        assert!(occurs_on(&t, day("2024-05-31")));
    }

    #[test]
    fn monthly_leap_day_only_in_leap_years() {
        let t = task("a", "2024-02-29T08:00", Frequency::Monthly);
        assert!(occurs_on(&t, day("2024-03-29")));
        assert!(!occurs_on(&t, day("2025-02-28")));
        assert!(occurs_on(&t, day("2028-02-29")));
    }

    #[test]
    fn unknown_frequency_degrades_to_once() {
        let t = task("a", "2024-01-01T09:00", Frequency::Other("hourly".into()));
        assert!(occurs_on(&t, day("2024-01-01")));
        assert!(!occurs_on(&t, day("2024-01-02")));
    }

    #[test]
    fn bucketize_keeps_task_order_and_day_order() {
        let tasks = vec![
            task("late", "2024-01-01T20:00", Frequency::Daily),
            task("early", "2024-01-01T07:00", Frequency::Daily),
            task("once", "2024-01-02T12:00", Frequency::Once),
        ];
        let days = vec![day("2024-01-02"), day("2024-01-01"), day("2023-12-31")];
        let buckets = bucketize(&tasks, &days);

        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].date, day("2024-01-02"));
        let ids: Vec<_> = buckets[0].occurrences.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["late", "early", "once"]);
        assert_eq!(buckets[1].occurrences.len(), 2);
        assert!(buckets[2].is_empty());
    }

    #[test]
    fn bucketize_empty_inputs() {
        assert!(bucketize(&[], &[]).is_empty());
        let buckets = bucketize(&[], &window("2024-01-01", 3));
        assert_eq!(buckets.len(), 3);
        assert!(buckets.iter().all(DayBucket::is_empty));
    }

    #[test]
    fn next_occurrence_per_rule() {
        let weekly = task("w", "2024-01-01T09:00", Frequency::Weekly);
        assert_eq!(next_occurrence(&weekly, day("2023-06-01")), Some(day("2024-01-01")));
        assert_eq!(next_occurrence(&weekly, day("2024-01-02")), Some(day("2024-01-08")));

        let monthly = task("m", "2024-01-31T08:00", Frequency::Monthly);
        assert_eq!(next_occurrence(&monthly, day("2024-02-01")), Some(day("2024-03-31")));

        let once = task("o", "2024-01-31T08:00", Frequency::Once);
        assert_eq!(next_occurrence(&once, day("2024-01-31")), Some(day("2024-01-31")));
        assert_eq!(next_occurrence(&once, day("2024-02-01")), None);
    }

    #[test]
    fn occurrences_between_is_inclusive() {
        let t = task("a", "2024-01-31T08:00", Frequency::Monthly);
        let hits: Vec<_> = occurrences_between(&t, day("2024-01-01"), day("2024-05-31")).collect();
        assert_eq!(hits, vec![day("2024-01-31"), day("2024-03-31"), day("2024-05-31")]);
        assert_eq!(occurrences_between(&t, day("2024-06-01"), day("2024-05-01")).count(), 0);
    }
}
