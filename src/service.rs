//! Contact service: the store plus its synchronized in-memory mirror.

use log::{error, info, warn};
use thiserror::Error;

use crate::{
    contact::{Contact, ContactDraft},
    core::book::ContactBook,
    persist::{RecordStore, StoreError},
    types::ContactId,
};

/// Failure of a service operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The record store rejected or could not run the operation.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// An update targeted an id absent from memory; the store was not touched.
    #[error("contact {0} is not loaded")]
    UnknownContact(ContactId),
    /// The store deleted a row that memory did not hold.
    #[error("contact {0} was deleted from the store but missing in memory")]
    Inconsistent(ContactId),
}

/// Result alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Authoritative in-memory view of a [`RecordStore`].
///
/// Memory only changes after the store reports success, so a failed
/// operation leaves [`ContactService::list`] untouched.
pub struct ContactService<S: RecordStore> {
    store: S,
    book: ContactBook,
}

impl<S: RecordStore> ContactService<S> {
    /// Loads every row from `store` once and adopts it as the mirror.
    pub fn new(store: S) -> ServiceResult<Self> {
        let book = ContactBook::from_contacts(store.list()?);
        info!("loaded {} contacts", book.len());
        Ok(Self { store, book })
    }

    /// Snapshot of all contacts in insertion order.
    pub fn list(&self) -> Vec<Contact> {
        self.book.to_vec()
    }

    /// Clone of the contact with `id`, if loaded.
    pub fn get(&self, id: ContactId) -> Option<Contact> {
        self.book.get(id).cloned()
    }

    /// Number of loaded contacts.
    pub fn len(&self) -> usize {
        self.book.len()
    }

    /// True when no contacts are loaded.
    pub fn is_empty(&self) -> bool {
        self.book.is_empty()
    }

    /// Inserts a contact and appends it to memory with its assigned id.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        phone: Option<String>,
        email: Option<String>,
    ) -> ServiceResult<Contact> {
        let draft = ContactDraft {
            name: name.into(),
            phone,
            email,
        };
        match self.store.create(&draft) {
            Ok(contact) => {
                self.book.push(contact.clone());
                info!("contact '{}' added with id {}", contact.name, contact.id);
                Ok(contact)
            }
            Err(err) => {
                error!("failed to add contact '{}'", draft.name);
                Err(err.into())
            }
        }
    }

    /// Replaces name, phone and email of a loaded contact.
    pub fn update(
        &mut self,
        id: ContactId,
        name: impl Into<String>,
        phone: Option<String>,
        email: Option<String>,
    ) -> ServiceResult<()> {
        if self.book.get(id).is_none() {
            warn!("contact {id} not found in memory for update");
            return Err(ServiceError::UnknownContact(id));
        }

        let draft = ContactDraft {
            name: name.into(),
            phone,
            email,
        };
        let replacement = draft.clone().into_contact(id);
        if let Err(err) = self.store.update(&replacement) {
            error!("failed to update contact {id}");
            return Err(err.into());
        }

        if let Some(entry) = self.book.get_mut(id) {
            entry.apply(draft);
        }
        info!("contact {id} updated");
        Ok(())
    }

    /// Deletes a contact from the store, then from memory.
    pub fn delete(&mut self, id: ContactId) -> ServiceResult<()> {
        if let Err(err) = self.store.delete(id) {
            error!("failed to delete contact {id}");
            return Err(err.into());
        }

        if self.book.remove(id).is_none() {
            error!("contact {id} deleted from the store but not found in memory");
            return Err(ServiceError::Inconsistent(id));
        }
        info!("contact {id} deleted");
        Ok(())
    }

    /// Backing store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::persist::StoreResult;

    #[derive(Default)]
    struct Calls {
        rows: Vec<Contact>,
        next_id: ContactId,
        updates: usize,
        fail: bool,
    }

    #[derive(Clone, Default)]
    struct VecStore(Arc<Mutex<Calls>>);

    fn offline() -> StoreError {
        StoreError::Access(rusqlite::Error::InvalidQuery)
    }

    impl RecordStore for VecStore {
        fn create(&self, draft: &ContactDraft) -> StoreResult<Contact> {
            let mut calls = self.0.lock().expect("lock");
            if calls.fail {
                return Err(offline());
            }
            calls.next_id += 1;
            let contact = draft.clone().into_contact(calls.next_id);
            calls.rows.push(contact.clone());
            Ok(contact)
        }

        fn list(&self) -> StoreResult<Vec<Contact>> {
            let calls = self.0.lock().expect("lock");
            if calls.fail {
                return Err(offline());
            }
            Ok(calls.rows.clone())
        }

        fn update(&self, contact: &Contact) -> StoreResult<()> {
            let mut calls = self.0.lock().expect("lock");
            calls.updates += 1;
            if calls.fail {
                return Err(offline());
            }
            let row = calls
                .rows
                .iter_mut()
                .find(|r| r.id == contact.id)
                .ok_or(StoreError::NotFound(contact.id))?;
            *row = contact.clone();
            Ok(())
        }

        fn delete(&self, id: ContactId) -> StoreResult<()> {
            let mut calls = self.0.lock().expect("lock");
            if calls.fail {
                return Err(offline());
            }
            let pos = calls
                .rows
                .iter()
                .position(|r| r.id == id)
                .ok_or(StoreError::NotFound(id))?;
            calls.rows.remove(pos);
            Ok(())
        }
    }

    #[test]
    fn failed_load_is_not_an_empty_book() {
        let store = VecStore::default();
        store.0.lock().unwrap().fail = true;

        let err = ContactService::new(store).err().expect("load must fail");
        assert!(matches!(err, ServiceError::Store(StoreError::Access(_))));
    }

    #[test]
    fn update_of_unloaded_id_never_reaches_the_store() {
        let store = VecStore::default();
        let mut svc = ContactService::new(store.clone()).unwrap();
        svc.create("Ann", None, None).unwrap();

        let err = svc.update(99, "Ghost", None, None).unwrap_err();
        assert!(matches!(err, ServiceError::UnknownContact(99)));
        assert_eq!(store.0.lock().unwrap().updates, 0);
    }

    #[test]
    fn store_failure_leaves_memory_untouched() {
        let store = VecStore::default();
        let mut svc = ContactService::new(store.clone()).unwrap();
        let ann = svc.create("Ann", Some("555-1111".into()), None).unwrap();
        let before = svc.list();

        store.0.lock().unwrap().fail = true;
        assert!(svc.create("Bob", None, None).is_err());
        assert!(svc.update(ann.id, "Ann B.", None, None).is_err());
        assert!(svc.delete(ann.id).is_err());

        assert_eq!(svc.list(), before);
    }

    #[test]
    fn delete_of_row_unknown_to_memory_is_inconsistent() {
        let store = VecStore::default();
        let mut svc = ContactService::new(store.clone()).unwrap();
        let stray = store
            .create(&ContactDraft::new("Stray", None::<String>, None::<String>))
            .unwrap();

        let err = svc.delete(stray.id).unwrap_err();
        assert!(matches!(err, ServiceError::Inconsistent(id) if id == stray.id));
        assert!(store.0.lock().unwrap().rows.is_empty());
    }

    #[test]
    fn list_is_a_defensive_copy() {
        let mut svc = ContactService::new(VecStore::default()).unwrap();
        svc.create("Ann", None, None).unwrap();

        let mut copy = svc.list();
        copy[0].name = "Mallory".to_string();
        copy.clear();

        assert_eq!(svc.list()[0].name, "Ann");
        assert_eq!(svc.get(1).map(|c| c.name), Some("Ann".to_string()));
    }
}
