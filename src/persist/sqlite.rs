//! SQLite-backed contacts table.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{error, info, warn};
use rusqlite::{Connection, OpenFlags, Row, params};

use crate::{
    config::StoreConfig,
    contact::{Contact, ContactDraft},
    types::ContactId,
};

use super::{RecordStore, StoreError, StoreResult};

/// SQLite implementation of [`crate::persist::RecordStore`].
///
/// Holds only the connection target. Every operation opens its own
/// connection and closes it before returning.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteRecordStore {
    /// Prepares the data directory and the `contacts` table described by
    /// `config`.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        config.validate()?;
        if !config.data_dir.as_os_str().is_empty() {
            fs::create_dir_all(&config.data_dir)?;
        }

        let store = Self {
            path: config.database_path(),
            busy_timeout: config.busy_timeout(),
        };

        let conn = Connection::open(&store.path)?;
        conn.busy_timeout(store.busy_timeout)?;
        conn.execute_batch(include_str!("schema.sql"))?;
        info!("record store ready at {}", store.path.display());
        Ok(store)
    }

    /// Database file backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    // Never creates the file: a database removed after `open` is an
    // access error, not a fresh empty table.
    fn connect(&self) -> StoreResult<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.busy_timeout(self.busy_timeout)?;
        Ok(conn)
    }

    fn insert_row(&self, draft: &ContactDraft) -> StoreResult<Contact> {
        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO contacts(name, phone, email) VALUES (?1, ?2, ?3)",
            params![draft.name, draft.phone, draft.email],
        )?;
        Ok(draft.clone().into_contact(conn.last_insert_rowid()))
    }

    fn select_all(&self) -> StoreResult<Vec<Contact>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT id, name, phone, email FROM contacts")?;
        let rows = stmt.query_map([], contact_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn update_row(&self, contact: &Contact) -> StoreResult<()> {
        let conn = self.connect()?;
        let changed = conn.execute(
            "UPDATE contacts SET name = ?1, phone = ?2, email = ?3 WHERE id = ?4",
            params![contact.name, contact.phone, contact.email, contact.id],
        )?;
        if changed == 0 {
            return Err(StoreError::NotFound(contact.id));
        }
        Ok(())
    }

    fn delete_row(&self, id: ContactId) -> StoreResult<()> {
        let conn = self.connect()?;
        let changed = conn.execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }
}

impl RecordStore for SqliteRecordStore {
    fn create(&self, draft: &ContactDraft) -> StoreResult<Contact> {
        let res = self.insert_row(draft);
        match &res {
            Ok(contact) => info!("contact added: {} (id {})", contact.name, contact.id),
            Err(err) => error!("adding contact {:?} failed: {err}", draft.name),
        }
        res
    }

    fn list(&self) -> StoreResult<Vec<Contact>> {
        let res = self.select_all();
        match &res {
            Ok(contacts) => info!("retrieved {} contacts", contacts.len()),
            Err(err) => error!("retrieving contacts failed: {err}"),
        }
        res
    }

    fn update(&self, contact: &Contact) -> StoreResult<()> {
        let res = self.update_row(contact);
        log_mutation("update", contact.id, &res);
        res
    }

    fn delete(&self, id: ContactId) -> StoreResult<()> {
        let res = self.delete_row(id);
        log_mutation("delete", id, &res);
        res
    }
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        phone: row.get(2)?,
        email: row.get(3)?,
    })
}

fn log_mutation(what: &str, id: ContactId, res: &StoreResult<()>) {
    match res {
        Ok(()) => info!("{what} of contact {id} succeeded"),
        Err(StoreError::NotFound(_)) => warn!("{what}: no contact with id {id}"),
        Err(err) => error!("{what} of contact {id} failed: {err}"),
    }
}
