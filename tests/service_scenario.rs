use std::fs;

use tempfile::TempDir;

use contactbook::{
    config::StoreConfig,
    contact::Contact,
    persist::{sqlite::SqliteRecordStore, RecordStore, StoreError},
    service::{ContactService, ServiceError},
};

fn open_service(tmp: &TempDir) -> ContactService<SqliteRecordStore> {
    let store = SqliteRecordStore::open(&StoreConfig::in_dir(tmp.path())).expect("open sqlite");
    ContactService::new(store).expect("load")
}

fn some(s: &str) -> Option<String> {
    Some(s.to_string())
}

fn names(contacts: &[Contact]) -> Vec<&str> {
    contacts.iter().map(|c| c.name.as_str()).collect()
}

#[test]
fn create_update_delete_walkthrough() {
    let tmp = TempDir::new().expect("tmp");
    let mut svc = open_service(&tmp);

    let ann = svc
        .create("Ann", some("555-1111"), some("ann@x.com"))
        .expect("create ann");
    let bob = svc
        .create("Bob", some("555-2222"), some("bob@x.com"))
        .expect("create bob");
    assert_eq!((ann.id, bob.id), (1, 2));
    assert_eq!(svc.list(), vec![ann.clone(), bob.clone()]);

    svc.update(1, "Ann B.", some("555-1111"), some("annb@x.com"))
        .expect("update ann");
    let listed = svc.list();
    assert_eq!(names(&listed), ["Ann B.", "Bob"]);
    assert_eq!(listed[0].email.as_deref(), Some("annb@x.com"));
    assert_eq!(listed[1], bob);

    svc.delete(2).expect("delete bob");
    let listed = svc.list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
    assert_eq!(listed[0].name, "Ann B.");

    assert_eq!(svc.store().list().expect("store list"), listed);
}

#[test]
fn update_of_unknown_id_fails_and_changes_nothing() {
    let tmp = TempDir::new().expect("tmp");
    let mut svc = open_service(&tmp);
    svc.create("Ann", None, None).expect("create");
    let before = svc.list();

    let err = svc.update(77, "Nobody", None, None).unwrap_err();
    assert!(matches!(err, ServiceError::UnknownContact(77)));
    assert_eq!(svc.list(), before);
}

#[test]
fn second_delete_fails() {
    let tmp = TempDir::new().expect("tmp");
    let mut svc = open_service(&tmp);
    let ann = svc.create("Ann", None, None).expect("create");

    svc.delete(ann.id).expect("first delete");
    assert!(svc.list().iter().all(|c| c.id != ann.id));

    let err = svc.delete(ann.id).unwrap_err();
    assert!(matches!(err, ServiceError::Store(StoreError::NotFound(_))));
}

#[test]
fn list_is_stable_without_mutation() {
    let tmp = TempDir::new().expect("tmp");
    let mut svc = open_service(&tmp);
    svc.create("Ann", some("1"), None).expect("create");
    svc.create("Bob", None, some("bob@x.com")).expect("create");

    assert_eq!(svc.list(), svc.list());
}

#[test]
fn new_service_reloads_what_the_previous_one_wrote() {
    let tmp = TempDir::new().expect("tmp");
    let written = {
        let mut svc = open_service(&tmp);
        svc.create("Ann", some("555-1111"), None).expect("create");
        let bob = svc.create("Bob", None, None).expect("create");
        svc.update(bob.id, "Robert", None, some("rob@x.com"))
            .expect("update");
        svc.list()
    };

    let reloaded = open_service(&tmp);
    assert_eq!(reloaded.list(), written);
    assert_eq!(reloaded.get(2).map(|c| c.name), some("Robert"));
}

#[test]
fn unreachable_database_fails_construction() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteRecordStore::open(&StoreConfig::in_dir(tmp.path())).expect("open");
    fs::remove_file(store.path()).expect("remove db");

    let err = ContactService::new(store).err().expect("load must fail");
    assert!(matches!(err, ServiceError::Store(StoreError::Access(_))));
}

#[test]
fn deleting_a_row_added_behind_the_services_back_is_inconsistent() {
    let tmp = TempDir::new().expect("tmp");
    let mut svc = open_service(&tmp);

    let other = SqliteRecordStore::open(&StoreConfig::in_dir(tmp.path())).expect("open");
    let stray = other
        .create(&contactbook::contact::ContactDraft::new(
            "Stray",
            None::<String>,
            None::<String>,
        ))
        .expect("create behind");

    let err = svc.delete(stray.id).unwrap_err();
    assert!(matches!(err, ServiceError::Inconsistent(id) if id == stray.id));
    assert!(other.list().expect("list").is_empty());
}
