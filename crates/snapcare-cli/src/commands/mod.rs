pub mod assistant;
pub mod calendar;
pub mod config;
pub mod onboard;
pub mod profile;
pub mod task;

use snapcare_core::SqliteKvStore;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Key-value store in the data directory.
pub fn open_store() -> Result<SqliteKvStore, Box<dyn std::error::Error>> {
    Ok(SqliteKvStore::open()?)
}

/// Today in local time. The only place the CLI reads the clock.
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
