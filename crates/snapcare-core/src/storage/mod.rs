mod config;
pub mod json_path;
pub mod kv;
pub mod tasks;

pub use config::{AssistantConfig, BackendConfig, CalendarConfig, Config};
pub use kv::{KvStore, MemoryKvStore, SqliteKvStore};
pub use tasks::TaskStore;

use std::path::PathBuf;

/// Returns the data directory, creating it if needed.
///
/// `SNAPCARE_DATA_DIR` wins when set. Otherwise `~/.config/snapcare`, or
/// `~/.config/snapcare-dev` with `SNAPCARE_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("SNAPCARE_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("SNAPCARE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("snapcare-dev")
            } else {
                base_dir.join("snapcare")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
