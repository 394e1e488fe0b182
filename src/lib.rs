//! Contact records in a SQLite table, mirrored by an in-memory service.
//!
//! # Examples
//!
//! Direct service usage:
//! ```
//! use contactbook::{
//!     config::StoreConfig,
//!     persist::sqlite::SqliteRecordStore,
//!     service::ContactService,
//! };
//!
//! let dir = tempfile::tempdir().expect("tmp");
//! let store = SqliteRecordStore::open(&StoreConfig::in_dir(dir.path())).expect("open store");
//! let mut contacts = ContactService::new(store).expect("load");
//!
//! let ann = contacts
//!     .create("Ann", Some("555-1111".to_string()), Some("ann@x.com".to_string()))
//!     .expect("create");
//! assert_eq!(ann.id, 1);
//!
//! contacts.update(ann.id, "Ann B.", None, None).expect("update");
//! assert_eq!(contacts.list()[0].name, "Ann B.");
//! ```
//!
//! Shared usage through the runtime handle:
//! ```no_run
//! use contactbook::{
//!     config::StoreConfig,
//!     contact::ContactDraft,
//!     persist::sqlite::SqliteRecordStore,
//!     runtime::handle::{spawn_contact_book, RuntimeConfig},
//!     service::ContactService,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = SqliteRecordStore::open(&StoreConfig::default()).expect("open store");
//! let service = ContactService::new(store).expect("load");
//! let handle = spawn_contact_book(service, RuntimeConfig::default());
//! let bob = handle
//!     .create(ContactDraft::new("Bob", Some("555-2222"), None::<String>))
//!     .await
//!     .expect("create");
//! handle.delete(bob.id).await.expect("delete");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```
#![deny(missing_docs)]

/// Store connection target and its loaders.
pub mod config;
/// Contact domain records and drafts.
pub mod contact;
/// In-memory contact mirror.
pub mod core;
/// Record store abstraction and SQLite implementation.
pub mod persist;
/// Single-owner runtime handle and events.
pub mod runtime;
/// Contact service synchronizing the store and memory.
pub mod service;
/// Shared primitive types.
pub mod types;
