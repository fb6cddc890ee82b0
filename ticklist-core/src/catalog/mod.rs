//! Entity catalog
//!
//! An insertion-ordered, in-memory mapping of [`TodoId`] to [`TodoItem`].
//! Records are created pending and may move to completed exactly once.
//! Every operation either succeeds or returns a [`CatalogError`] without
//! touching the stored records.
//!
//! # Example
//!
//! ```rust
//! use ticklist_core::catalog::{Catalog, TodoId};
//!
//! let mut catalog = Catalog::new();
//! let item = catalog.create("Ship it").unwrap();
//! assert_eq!(item.id, TodoId::from("1"));
//!
//! let outcome = catalog.complete(&item.id).unwrap();
//! assert!(outcome.item().completed);
//! ```

mod model;
mod store;

pub use model::{Completion, TodoId, TodoItem, TodoStatus};
pub use store::{Catalog, SharedCatalog};

/// Errors raised by catalog operations.
///
/// None of these are retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A required field was missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No record exists for the id
    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// Every numeric id has been handed out
    #[error("No identifiers left to allocate")]
    IdsExhausted,
}
