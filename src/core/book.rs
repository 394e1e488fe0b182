use hashbrown::HashMap;

use crate::{contact::Contact, types::ContactId};

/// Id-keyed contact map that remembers insertion order.
#[derive(Debug, Default, Clone)]
pub struct ContactBook {
    records: HashMap<ContactId, Contact>,
    order: Vec<ContactId>,
}

impl ContactBook {
    /// Empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts `contacts` in the given order. A repeated id keeps its first
    /// occurrence.
    pub fn from_contacts(contacts: Vec<Contact>) -> Self {
        let mut book = Self::new();
        for contact in contacts {
            if !book.records.contains_key(&contact.id) {
                book.push(contact);
            }
        }
        book
    }

    /// Appends `contact`, replacing any entry with the same id in place.
    pub fn push(&mut self, contact: Contact) {
        let id = contact.id;
        if self.records.insert(id, contact).is_none() {
            self.order.push(id);
        }
    }

    /// Entry with `id`.
    pub fn get(&self, id: ContactId) -> Option<&Contact> {
        self.records.get(&id)
    }

    /// Mutable entry with `id`.
    pub fn get_mut(&mut self, id: ContactId) -> Option<&mut Contact> {
        self.records.get_mut(&id)
    }

    /// Removes and returns the entry with `id`.
    pub fn remove(&mut self, id: ContactId) -> Option<Contact> {
        let contact = self.records.remove(&id)?;
        if let Some(pos) = self.order.iter().position(|x| *x == id) {
            self.order.remove(pos);
        }
        Some(contact)
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> &[ContactId] {
        &self.order
    }

    /// Cloned entries in insertion order.
    pub fn to_vec(&self) -> Vec<Contact> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id).cloned())
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when the book holds no entries.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
