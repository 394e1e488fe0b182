/// SQLite implementation of [`RecordStore`].
pub mod sqlite;

use thiserror::Error;

use crate::{
    contact::{Contact, ContactDraft},
    types::ContactId,
};

/// Failure of a single record store operation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing table could not be reached or the statement failed.
    #[error("database access failed: {0}")]
    Access(#[from] rusqlite::Error),
    /// An update or delete matched no row.
    #[error("no contact with id {0}")]
    NotFound(ContactId),
    /// The data directory could not be prepared.
    #[error("data directory unavailable: {0}")]
    Io(#[from] std::io::Error),
    /// The connection target is unusable.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Result alias for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// CRUD access to the contacts table.
///
/// Implementations never panic on engine errors; every failure comes back
/// as a [`StoreError`].
pub trait RecordStore: Send {
    /// Inserts a row and returns it with the assigned id.
    fn create(&self, draft: &ContactDraft) -> StoreResult<Contact>;
    /// Returns every row in natural retrieval order.
    fn list(&self) -> StoreResult<Vec<Contact>>;
    /// Overwrites name, phone and email of the row matching `contact.id`.
    fn update(&self, contact: &Contact) -> StoreResult<()>;
    /// Removes the row with `id`.
    fn delete(&self, id: ContactId) -> StoreResult<()>;
}
