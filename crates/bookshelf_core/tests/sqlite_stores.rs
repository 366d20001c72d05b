use bookshelf_core::db::migrations::latest_version;
use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    Creator, NamedRecordStore, Publisher, SqliteCreatorStore, SqlitePublisherStore,
    SqliteWorkStore, StoreError, Work, WorkInput, WorkStore,
};
use rusqlite::Connection;

fn input(isbn: i64, title: &str) -> WorkInput {
    WorkInput {
        isbn,
        title: title.to_string(),
        year: 1944,
        total_copies: 5,
        loaned_copies: 2,
        creator_name: "Borges".to_string(),
        publisher_name: "Sur".to_string(),
    }
}

#[test]
fn named_put_is_an_idempotent_upsert() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteCreatorStore::try_new(&conn).unwrap();

    let mut creator = Creator::new("Borges");
    store.put(&creator).unwrap();
    store.put(&creator).unwrap();
    assert_eq!(store.list_all().unwrap().len(), 1);

    creator.name = "Jorge Luis Borges".to_string();
    store.put(&creator).unwrap();
    let loaded = store.get_by_id(creator.id).unwrap().unwrap();
    assert_eq!(loaded, creator);
}

#[test]
fn find_by_name_is_exact_and_case_sensitive() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteCreatorStore::try_new(&conn).unwrap();
    store.put(&Creator::new("Borges")).unwrap();

    assert!(store.find_by_name("Borges").unwrap().is_some());
    assert!(store.find_by_name("borges").unwrap().is_none());
    assert!(store.find_by_name("Borg").unwrap().is_none());
}

#[test]
fn creator_and_publisher_namespaces_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let creators = SqliteCreatorStore::try_new(&conn).unwrap();
    let publishers = SqlitePublisherStore::try_new(&conn).unwrap();

    creators.put(&Creator::new("Planeta")).unwrap();
    assert!(publishers.find_by_name("Planeta").unwrap().is_none());
    assert!(publishers.list_all().unwrap().is_empty());
}

#[test]
fn list_all_keeps_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let store = SqlitePublisherStore::try_new(&conn).unwrap();
    for name in ["Sur", "Emecé", "Losada"] {
        store.put(&Publisher::new(name)).unwrap();
    }

    let names: Vec<_> = store
        .list_all()
        .unwrap()
        .into_iter()
        .map(|publisher| publisher.name)
        .collect();
    assert_eq!(names, ["Sur", "Emecé", "Losada"]);
}

#[test]
fn remove_referenced_creator_reports_integrity_violation() {
    let conn = open_db_in_memory().unwrap();
    let creators = SqliteCreatorStore::try_new(&conn).unwrap();
    let publishers = SqlitePublisherStore::try_new(&conn).unwrap();
    let works = SqliteWorkStore::try_new(&conn).unwrap();

    let creator = Creator::new("Borges");
    let publisher = Publisher::new("Sur");
    creators.put(&creator).unwrap();
    publishers.put(&publisher).unwrap();
    let work = Work::new(&input(1, "Ficciones"), creator.clone(), publisher);
    works.put(&work).unwrap();

    let err = creators.remove(creator.id).unwrap_err();
    assert!(matches!(
        err,
        StoreError::IntegrityViolation { table: "creators", id } if id == creator.id
    ));

    works.remove(work.id).unwrap();
    creators.remove(creator.id).unwrap();
    assert!(creators.get_by_id(creator.id).unwrap().is_none());
}

#[test]
fn remove_absent_id_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let works = SqliteWorkStore::try_new(&conn).unwrap();
    let creators = SqliteCreatorStore::try_new(&conn).unwrap();

    let ghost = Creator::new("nobody");
    assert!(matches!(
        creators.remove(ghost.id),
        Err(StoreError::NotFound { table: "creators", .. })
    ));
    assert!(matches!(
        works.remove(ghost.id),
        Err(StoreError::NotFound { table: "works", .. })
    ));
}

#[test]
fn work_put_rejects_dangling_references() {
    let conn = open_db_in_memory().unwrap();
    let works = SqliteWorkStore::try_new(&conn).unwrap();

    let work = Work::new(
        &input(1, "Ficciones"),
        Creator::new("unsaved"),
        Publisher::new("unsaved"),
    );
    assert!(matches!(works.put(&work), Err(StoreError::Db(_))));
    assert!(works.list_all().unwrap().is_empty());
}

#[test]
fn work_queries_hydrate_references() {
    let conn = open_db_in_memory().unwrap();
    let creators = SqliteCreatorStore::try_new(&conn).unwrap();
    let publishers = SqlitePublisherStore::try_new(&conn).unwrap();
    let works = SqliteWorkStore::try_new(&conn).unwrap();

    let borges = Creator::new("Borges");
    let sur = Publisher::new("Sur");
    creators.put(&borges).unwrap();
    publishers.put(&sur).unwrap();
    let ficciones = Work::new(&input(1, "Ficciones"), borges.clone(), sur.clone());
    let aleph = Work::new(&input(2, "El Aleph"), borges.clone(), sur.clone());
    works.put(&ficciones).unwrap();
    works.put(&aleph).unwrap();

    assert_eq!(works.find_by_isbn(1).unwrap().unwrap(), ficciones);
    assert_eq!(works.find_by_title("El Aleph").unwrap().unwrap(), aleph);
    assert!(works.find_by_title("el aleph").unwrap().is_none());
    assert_eq!(works.find_by_creator_name("Borges").unwrap().len(), 2);
    assert_eq!(works.find_by_publisher_name("Sur").unwrap(), [ficciones, aleph]);
    assert!(works.find_by_creator_name("Cortázar").unwrap().is_empty());
}

#[test]
fn stores_reject_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteWorkStore::try_new(&conn) {
        Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn stores_reject_connection_missing_required_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE creators (id TEXT PRIMARY KEY NOT NULL, name TEXT NOT NULL);")
        .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteCreatorStore::try_new(&conn),
        Err(StoreError::MissingRequiredColumn {
            table: "creators",
            column: "active"
        })
    ));
    assert!(matches!(
        SqlitePublisherStore::try_new(&conn),
        Err(StoreError::MissingRequiredTable("publishers"))
    ));
}
