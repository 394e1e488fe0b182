//! In-memory contact mirror.

/// Id-keyed, insertion-ordered contact collection.
pub mod book;
