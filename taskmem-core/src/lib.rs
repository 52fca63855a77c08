//! Core types and traits for the taskmem semantic task memory.
//!
//! This crate provides:
//! - Record snapshot types (`TaskRecord`, `RecordId`, `RecordStatus`)
//! - The paginated `RecordStore` read trait
//! - `RecordObserver` lifecycle notifications
//! - The minimal `Tool` trait for exposing operations to agent callers

mod error;
mod record;
mod store;
mod tool;

pub use error::{CoreError, Result};
pub use record::{RecordId, RecordStatus, TaskRecord};
pub use store::{PageCursor, RecordObserver, RecordPage, RecordStore};
pub use tool::Tool;
