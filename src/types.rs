//! Shared primitive IDs.

/// Store-assigned contact identifier (SQLite rowid).
pub type ContactId = i64;
