//! Runtime event stream payloads.

use crate::types::ContactId;

/// Events emitted by the owner thread after a mutation succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactEvent {
    /// A contact was created.
    Created {
        /// Assigned id.
        id: ContactId,
    },
    /// A contact's fields were replaced.
    Updated {
        /// Updated contact id.
        id: ContactId,
    },
    /// A contact was removed.
    Deleted {
        /// Removed contact id.
        id: ContactId,
    },
}
