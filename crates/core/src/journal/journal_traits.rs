use super::journal_model::JournalEntry;
use crate::errors::Result;
use async_trait::async_trait;

/// Durable append/delete store for journal entries.
///
/// Ordering is the engine's concern: callers sort with
/// [`sort_for_replay`](super::sort_for_replay) before replaying.
#[async_trait]
pub trait JournalRepositoryTrait: Send + Sync {
    fn list_entries(&self) -> Result<Vec<JournalEntry>>;
    async fn insert_entry(&self, entry: JournalEntry) -> Result<JournalEntry>;
    /// Deletes a whole row and returns it.
    async fn delete_entry(&self, entry_id: &str) -> Result<JournalEntry>;
}
