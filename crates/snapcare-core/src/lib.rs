//! # SnapCare Core Library
//!
//! Business logic for the SnapCare health assistant: photo analysis and
//! assistant chat, plus a calendar of recurring health tasks (medications,
//! wound care, appointments). The `snapcare` CLI is a thin layer over the
//! same library.
//!
//! ## Architecture
//!
//! - **Recurrence**: pure evaluation of which tasks fall on which day and
//!   where on the day's time axis
//! - **Calendar**: paged day windows and the hour grid of a day column
//! - **Storage**: key-value blobs (SQLite on device) and TOML configuration
//! - **Assistant**: HTTP client for the analysis/chat service and the chat
//!   transcript built around it
//!
//! ## Key Components
//!
//! - [`occurs_on`], [`slot_offset`], [`bucketize`]: recurrence evaluator
//! - [`DayWindow`], [`TimeGrid`]: calendar view model
//! - [`TaskStore`], [`ProfileStore`]: persisted documents
//! - [`Config`]: application configuration management
//! - [`AssistantBackend`]: trait for the analysis/chat service

pub mod assistant;
pub mod calendar;
pub mod capture;
pub mod error;
pub mod onboarding;
pub mod profile;
pub mod recurrence;
pub mod storage;
pub mod task;

pub use assistant::{AssistantBackend, Conversation, DiagnosisResult, HttpBackend, SimulatedBackend};
pub use calendar::{DayWindow, Placement, TimeGrid};
pub use capture::{Camera, FileCamera, PhotoHandle};
pub use error::{BackendError, ConfigError, CoreError, StorageError, ValidationError};
pub use onboarding::{OnboardingOutcome, Permission, PermissionGate, PermissionStatus};
pub use profile::{Profile, ProfileSection, ProfileStore};
pub use recurrence::{bucketize, next_occurrence, occurrences_between, occurs_on, slot_offset, DayBucket};
pub use storage::{Config, KvStore, MemoryKvStore, SqliteKvStore, TaskStore};
pub use task::{Frequency, NewTask, Task, TaskBook, TaskType};
