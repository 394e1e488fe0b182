//! Contact domain record and draft types.

use serde::{Deserialize, Serialize};

use crate::types::ContactId;

/// Fully materialized contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Store-assigned identifier.
    pub id: ContactId,
    /// Display name.
    pub name: String,
    /// Phone number, if any.
    pub phone: Option<String>,
    /// Email address, if any.
    pub email: Option<String>,
}

/// Field values of a contact that has no id yet, or replacement values
/// for an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContactDraft {
    /// Display name.
    pub name: String,
    /// Phone number, if any.
    pub phone: Option<String>,
    /// Email address, if any.
    pub email: Option<String>,
}

impl ContactDraft {
    /// Builds a draft from raw field values.
    pub fn new(
        name: impl Into<String>,
        phone: Option<impl Into<String>>,
        email: Option<impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.map(Into::into),
            email: email.map(Into::into),
        }
    }

    /// Attaches a store-assigned id.
    pub fn into_contact(self, id: ContactId) -> Contact {
        Contact {
            id,
            name: self.name,
            phone: self.phone,
            email: self.email,
        }
    }
}

impl Contact {
    /// Overwrites every field except the id.
    pub fn apply(&mut self, draft: ContactDraft) {
        self.name = draft.name;
        self.phone = draft.phone;
        self.email = draft.email;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_id_and_replaces_fields() {
        let mut c = ContactDraft::new("Ann", Some("555-1111"), Some("ann@x.com")).into_contact(7);
        c.apply(ContactDraft::new("Ann B.", None::<String>, Some("annb@x.com")));

        assert_eq!(c.id, 7);
        assert_eq!(c.name, "Ann B.");
        assert_eq!(c.phone, None);
        assert_eq!(c.email.as_deref(), Some("annb@x.com"));
    }
}
