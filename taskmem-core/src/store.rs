//! Traits for the external record store collaborator.

use async_trait::async_trait;

use crate::error::Result;
use crate::record::{RecordId, TaskRecord};

/// An opaque pagination cursor issued by the record store.
///
/// Treated as a resumable bookmark: the memory subsystem persists it across
/// reindex interruptions but never inspects it.
pub type PageCursor = u64;

/// One page of records plus the cursor for the next page.
#[derive(Debug, Clone)]
pub struct RecordPage {
    /// Records in this page, in store order.
    pub records: Vec<TaskRecord>,
    /// Cursor to pass to the next `list_page` call; `None` when exhausted.
    pub next_cursor: Option<PageCursor>,
}

/// Read access to the external record store.
///
/// Implementations may clamp `page_size` to their own ceiling; callers must
/// drive pagination by the returned cursor rather than assuming the
/// requested page size was honored.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// List one page of records starting at `cursor` (`None` for the first page).
    async fn list_page(&self, cursor: Option<PageCursor>, page_size: usize) -> Result<RecordPage>;

    /// Fetch a single record by id, or `None` if it does not exist.
    async fn get_by_id(&self, id: RecordId) -> Result<Option<TaskRecord>>;
}

/// Lifecycle notifications emitted by the record store on its commit boundary.
///
/// `on_created`/`on_updated` fire after the mutation has committed, never
/// before, so observers cannot index content that is later rolled back.
/// Delivery is at-least-once; observers must tolerate duplicate calls.
#[async_trait]
pub trait RecordObserver: Send + Sync {
    /// A record was created and committed.
    async fn on_created(&self, record: &TaskRecord);

    /// A record's content or status changed and the change committed.
    async fn on_updated(&self, record: &TaskRecord);

    /// A record was deleted.
    async fn on_deleted(&self, id: RecordId);
}
