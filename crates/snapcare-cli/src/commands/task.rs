//! Task management commands for CLI.

use chrono::Days;
use clap::Subcommand;
use snapcare_core::task::{parse_anchor, parse_day};
use snapcare_core::{next_occurrence, occurrences_between, Frequency, NewTask, TaskStore, TaskType};

use super::{open_store, today, CmdResult};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// First occurrence (e.g. "2024-01-01T09:00")
        #[arg(long)]
        at: String,
        /// Task description
        #[arg(long, default_value = "")]
        description: String,
        /// once, daily, weekly or monthly
        #[arg(long, default_value = "once")]
        frequency: String,
        /// medication, wound or appointment
        #[arg(long = "type", default_value = "medication")]
        task_type: String,
    },
    /// List all tasks
    List,
    /// Show one task and its upcoming occurrences
    Show {
        /// Task ID
        id: String,
        /// First day to look at (default: today)
        #[arg(long)]
        from: Option<String>,
        /// Number of days to look ahead
        #[arg(long, default_value = "14")]
        days: u32,
    },
}

pub fn run(action: TaskAction) -> CmdResult {
    let mut store = TaskStore::new(open_store()?);

    match action {
        TaskAction::Add {
            title,
            at,
            description,
            frequency,
            task_type,
        } => {
            let frequency = Frequency::from(frequency.as_str());
            if !frequency.is_known() {
                eprintln!("warning: unknown frequency '{frequency}', task will occur once");
            }
            let draft = NewTask::new(title, parse_anchor(&at)?)
                .with_description(description)
                .with_frequency(frequency)
                .with_type(TaskType::from(task_type.as_str()));
            let task = store.append(draft)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List => {
            let book = store.load()?;
            println!("{}", serde_json::to_string_pretty(&book)?);
        }
        TaskAction::Show { id, from, days } => {
            let book = store.load()?;
            let task = book.get(&id).ok_or(format!("Task not found: {id}"))?;
            let from = match from {
                Some(raw) => parse_day(&raw)?,
                None => today(),
            };
            let to = from
                .checked_add_days(Days::new(u64::from(days.saturating_sub(1))))
                .unwrap_or(from);
            let upcoming: Vec<_> = if days == 0 {
                Vec::new()
            } else {
                occurrences_between(task, from, to).collect()
            };
            let out = serde_json::json!({
                "task": task,
                "next": next_occurrence(task, from),
                "upcoming": upcoming,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
