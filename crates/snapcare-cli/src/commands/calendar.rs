//! Calendar commands for CLI.

use clap::Subcommand;
use serde::Serialize;
use snapcare_core::calendar::MAX_WINDOW_DAYS;
use snapcare_core::task::parse_day;
use snapcare_core::{Config, DayWindow, TaskStore};

use super::{open_store, today, CmdResult};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Show a window of days with the tasks occurring on each
    Show {
        /// First day of page 0 (default: today)
        #[arg(long)]
        from: Option<String>,
        /// Days per page, 1 to 31 (default: calendar.window_days)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS)))]
        days: Option<u32>,
        /// Pages to move from --from; negative goes back
        #[arg(long, default_value = "0", allow_negative_numbers = true)]
        page: i64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct CardView<'a> {
    id: &'a str,
    title: &'a str,
    #[serde(rename = "type")]
    task_type: &'a str,
    frequency: String,
    time: String,
    top: f64,
    visible: bool,
}

#[derive(Serialize)]
struct DayView<'a> {
    date: chrono::NaiveDate,
    tasks: Vec<CardView<'a>>,
}

pub fn run(action: CalendarAction) -> CmdResult {
    match action {
        CalendarAction::Show {
            from,
            days,
            page,
            json,
        } => {
            let config = Config::load_or_default();
            let grid = config.time_grid()?;
            let reference = match from {
                Some(raw) => parse_day(&raw)?,
                None => today(),
            };
            let len = days.unwrap_or(config.calendar.window_days);
            let window = DayWindow::page(reference, len, page);

            let store = TaskStore::new(open_store()?);
            let book = store.load()?;
            let buckets = window.bucketize(book.tasks());

            let views: Vec<DayView<'_>> = buckets
                .iter()
                .map(|bucket| DayView {
                    date: bucket.date,
                    tasks: bucket
                        .occurrences
                        .iter()
                        .zip(grid.layout(bucket))
                        .map(|(task, placement)| CardView {
                            id: &task.id,
                            title: &task.title,
                            task_type: task.task_type.as_str(),
                            frequency: task.frequency.to_string(),
                            time: placement.time_label,
                            top: placement.top,
                            visible: placement.visible,
                        })
                        .collect(),
                })
                .collect();
            tracing::debug!(start = %window.start(), days = window.len(), "calendar rendered");

            if json {
                println!("{}", serde_json::to_string_pretty(&views)?);
            } else {
                print_text(&views);
            }
        }
    }
    Ok(())
}

fn print_text(views: &[DayView<'_>]) {
    for (i, day) in views.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", day.date.format("%a, %b %d %Y"));
        if day.tasks.is_empty() {
            println!("  (no tasks)");
        }
        for card in &day.tasks {
            let hidden = if card.visible { "" } else { "  (outside grid)" };
            println!(
                "  {:>8}  {} [{}] ({}){hidden}",
                card.time, card.title, card.task_type, card.frequency
            );
        }
    }
}
