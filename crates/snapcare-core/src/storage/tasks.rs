//! Task list persisted as a single JSON document.

use super::kv::{load_json, save_json, KvStore};
use crate::error::Result;
use crate::task::{NewTask, Task, TaskBook};

/// Key the task list is stored under.
pub const TASKS_KEY: &str = "tasks";

pub struct TaskStore<S> {
    store: S,
}

impl<S: KvStore> TaskStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Load the task book. A missing document is an empty book; a corrupt
    /// one is an error so it is never silently overwritten.
    pub fn load(&self) -> Result<TaskBook> {
        let book = load_json::<TaskBook, _>(&self.store, TASKS_KEY)?.unwrap_or_default();
        tracing::debug!(count = book.len(), "tasks loaded");
        Ok(book)
    }

    pub fn save(&mut self, book: &TaskBook) -> Result<()> {
        save_json(&mut self.store, TASKS_KEY, book)?;
        tracing::debug!(count = book.len(), "tasks saved");
        Ok(())
    }

    /// Append one task and persist the whole list.
    pub fn append(&mut self, draft: NewTask) -> Result<Task> {
        let mut book = self.load()?;
        let task = book.add(draft)?.clone();
        self.save(&book)?;
        tracing::info!(id = %task.id, title = %task.title, "task added");
        Ok(task)
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, StorageError, ValidationError};
    use crate::storage::MemoryKvStore;
    use crate::task::Frequency;
    use chrono::NaiveDateTime;

    fn anchor(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn missing_document_is_empty_book() {
        let store = TaskStore::new(MemoryKvStore::new());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn append_persists_in_order() {
        let mut kv = MemoryKvStore::new();
        {
            let mut store = TaskStore::new(&mut kv);
            store
                .append(NewTask::new("Amoxicillin", anchor("2024-01-01T08:00")).with_frequency(Frequency::Daily))
                .unwrap();
            store.append(NewTask::new("Dermatologist", anchor("2024-01-05T15:00"))).unwrap();
        }
        let book = TaskStore::new(kv).load().unwrap();
        let titles: Vec<_> = book.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Amoxicillin", "Dermatologist"]);
        assert_eq!(book.tasks()[0].frequency, Frequency::Daily);
    }

    #[test]
    fn append_rejects_invalid_draft_without_writing() {
        let mut store = TaskStore::new(MemoryKvStore::new());
        let err = store.append(NewTask::new("", anchor("2024-01-01T08:00"))).unwrap_err();
        assert!(matches!(err, CoreError::Validation(ValidationError::EmptyField(_))));
        assert_eq!(store.into_inner().get(TASKS_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let mut kv = MemoryKvStore::new();
        kv.set(TASKS_KEY, "{\"oops\":").unwrap();
        let store = TaskStore::new(kv);
        assert!(matches!(
            store.load(),
            Err(CoreError::Storage(StorageError::CorruptBlob { .. }))
        ));
    }
}
