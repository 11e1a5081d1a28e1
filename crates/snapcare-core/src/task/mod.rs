//! Health tasks tracked on the calendar.
//!
//! A task is anchored at a local date and time-of-day and repeats according
//! to its [`Frequency`]. Tasks are only ever appended to a [`TaskBook`];
//! insertion order is the order every calendar view filters and displays
//! them in.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;

/// Recurrence rule of a task.
///
/// Values outside the four known rules are kept verbatim in
/// [`Frequency::Other`] and evaluated like [`Frequency::Once`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    #[default]
    Once,
    Daily,
    Weekly,
    Monthly,
    Other(String),
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Once => "once",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Other(raw) => raw,
        }
    }

    /// True for the four rules the evaluator understands natively.
    pub fn is_known(&self) -> bool {
        !matches!(self, Frequency::Other(_))
    }
}

impl From<&str> for Frequency {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "once" => Frequency::Once,
            "daily" => Frequency::Daily,
            "weekly" => Frequency::Weekly,
            "monthly" => Frequency::Monthly,
            _ => Frequency::Other(raw.to_string()),
        }
    }
}

impl From<String> for Frequency {
    fn from(raw: String) -> Self {
        Frequency::from(raw.as_str())
    }
}

impl From<Frequency> for String {
    fn from(freq: Frequency) -> Self {
        match freq {
            Frequency::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display category of a task. Has no effect on recurrence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Medication,
    Wound,
    Appointment,
    #[serde(other)]
    Other,
}

/// Background and border colours used when drawing a task card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TypePalette {
    pub background: &'static str,
    pub border: &'static str,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Medication => "medication",
            TaskType::Wound => "wound",
            TaskType::Appointment => "appointment",
            TaskType::Other => "other",
        }
    }

    pub fn palette(&self) -> TypePalette {
        match self {
            TaskType::Medication => TypePalette {
                background: "#E3F2FD",
                border: "#2196F3",
            },
            TaskType::Wound => TypePalette {
                background: "#FFF9C4",
                border: "#FFC107",
            },
            TaskType::Appointment => TypePalette {
                background: "#E8F5E9",
                border: "#4CAF50",
            },
            TaskType::Other => TypePalette {
                background: "#F5F5F5",
                border: "#9E9E9E",
            },
        }
    }
}

impl From<&str> for TaskType {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "medication" => TaskType::Medication,
            "wound" => TaskType::Wound,
            "appointment" => TaskType::Appointment,
            _ => TaskType::Other,
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scheduled health task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned once at creation
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// First occurrence, in local wall-clock time
    pub anchor: NaiveDateTime,
    #[serde(default)]
    pub frequency: Frequency,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
}

impl Task {
    /// Calendar day of the first occurrence.
    pub fn anchor_day(&self) -> NaiveDate {
        self.anchor.date()
    }
}

/// User-supplied fields of a task that has not been added yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub anchor: NaiveDateTime,
    pub frequency: Frequency,
    pub task_type: TaskType,
}

impl NewTask {
    /// Draft with the add-task form defaults: `once`, `medication`.
    pub fn new(title: impl Into<String>, anchor: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            anchor,
            frequency: Frequency::default(),
            task_type: TaskType::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Reject drafts the add form would refuse to save.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyField("title".into()));
        }
        Ok(())
    }

    fn into_task(self, id: String) -> Task {
        Task {
            id,
            title: self.title,
            description: self.description,
            anchor: self.anchor,
            frequency: self.frequency,
            task_type: self.task_type,
        }
    }
}

/// Ordered, append-only collection of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskBook {
    tasks: Vec<Task>,
}

impl TaskBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a draft, give it a fresh id and append it.
    pub fn add(&mut self, draft: NewTask) -> Result<&Task, ValidationError> {
        draft.validate()?;
        let task = draft.into_task(uuid::Uuid::new_v4().to_string());
        tracing::debug!(id = %task.id, frequency = %task.frequency, "task appended");
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// Parse a user-entered anchor timestamp.
///
/// Accepts `YYYY-MM-DDTHH:MM[:SS]`, the same with a space separator, and
/// RFC 3339 timestamps (converted to local wall-clock time).
pub fn parse_anchor(raw: &str) -> Result<NaiveDateTime, ValidationError> {
    let raw = raw.trim();
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Local).naive_local());
    }
    Err(ValidationError::InvalidValue {
        field: "anchor".into(),
        message: format!("'{raw}' is not a date and time like 2024-01-31T08:00"),
    })
}

/// Parse a calendar day in `YYYY-MM-DD` form.
pub fn parse_day(raw: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| ValidationError::InvalidValue {
        field: "day".into(),
        message: format!("'{}': {e}", raw.trim()),
    })
}
