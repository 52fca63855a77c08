//! Text embedding for the taskmem semantic task memory.
//!
//! This crate provides:
//! - The [`Encoder`] trait and the [`ContentMode`] tag it requires
//! - [`FastembedEncoder`], a locally-run model with lazy one-time init
//!
//! The mode prefix is a hard requirement of the embedding model's training,
//! not a stylistic choice: document-indexed text and query text are scored
//! differently, and the wrong prefix degrades relevance without any error.

mod encoder;
mod error;
mod nomic;

pub use encoder::{ContentMode, Encoder};
pub use error::{EmbedError, Result};
pub use nomic::{DEFAULT_DIMENSIONS, DEFAULT_TIMEOUT, FastembedEncoder};
