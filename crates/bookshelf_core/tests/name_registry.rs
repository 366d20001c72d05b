use bookshelf_core::db::open_db_in_memory;
use bookshelf_core::{
    CatalogError, CreatorRegistry, PublisherRegistry, SqliteCreatorStore, SqlitePublisherStore,
    SqliteWorkCatalog, WorkInput,
};
use rusqlite::Connection;

fn creator_registry(conn: &Connection) -> CreatorRegistry<SqliteCreatorStore<'_>> {
    CreatorRegistry::new(SqliteCreatorStore::try_new(conn).unwrap())
}

#[test]
fn create_assigns_id_and_marks_active() {
    let conn = open_db_in_memory().unwrap();
    let registry = creator_registry(&conn);

    let creator = registry.create("Borges").unwrap();
    assert!(creator.active);
    assert_eq!(creator.name, "Borges");

    let found = registry.find_by_name("Borges").unwrap().unwrap();
    assert_eq!(found, creator);
}

#[test]
fn create_twice_with_same_name_fails() {
    let conn = open_db_in_memory().unwrap();
    let registry = creator_registry(&conn);

    registry.create("Borges").unwrap();
    let err = registry.create("Borges").unwrap_err();
    assert!(matches!(err, CatalogError::Validation(message) if message.contains("already exists")));
    assert_eq!(registry.list_all().unwrap().len(), 1);
}

#[test]
fn blank_names_are_rejected() {
    let conn = open_db_in_memory().unwrap();
    let registry = creator_registry(&conn);

    assert!(matches!(registry.create("   "), Err(CatalogError::Validation(_))));
    assert!(matches!(registry.find_by_name(""), Err(CatalogError::Validation(_))));
    assert!(registry.list_all().unwrap().is_empty());
}

#[test]
fn find_by_name_returns_none_when_absent() {
    let conn = open_db_in_memory().unwrap();
    let registry = creator_registry(&conn);

    assert!(registry.find_by_name("Cortázar").unwrap().is_none());
}

#[test]
fn rename_overwrites_name() {
    let conn = open_db_in_memory().unwrap();
    let registry = creator_registry(&conn);

    let mut creator = registry.create("Borges").unwrap();
    registry.rename(&mut creator, "Jorge Luis Borges").unwrap();

    assert_eq!(creator.name, "Jorge Luis Borges");
    assert!(registry.find_by_name("Borges").unwrap().is_none());
    let stored = registry.find_by_name("Jorge Luis Borges").unwrap().unwrap();
    assert_eq!(stored.id, creator.id);
    assert!(stored.active);
}

#[test]
fn rename_to_name_held_by_another_record_fails() {
    let conn = open_db_in_memory().unwrap();
    let registry = creator_registry(&conn);

    let mut borges = registry.create("Borges").unwrap();
    registry.create("Bioy Casares").unwrap();

    let err = registry.rename(&mut borges, "Bioy Casares").unwrap_err();
    assert!(matches!(err, CatalogError::Validation(_)));
    assert_eq!(borges.name, "Borges");
}

#[test]
fn rename_rejects_blank_name_and_unsaved_record() {
    let conn = open_db_in_memory().unwrap();
    let registry = creator_registry(&conn);

    let mut stored = registry.create("Borges").unwrap();
    assert!(matches!(
        registry.rename(&mut stored, " "),
        Err(CatalogError::Validation(_))
    ));

    let mut unsaved = bookshelf_core::Creator::new("Ghost");
    let err = registry.rename(&mut unsaved, "Still a ghost").unwrap_err();
    assert!(matches!(err, CatalogError::Validation(message) if message.contains("does not exist")));
}

#[test]
fn delete_unknown_id_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let registry = creator_registry(&conn);

    let ghost = bookshelf_core::Creator::new("Ghost");
    assert!(matches!(registry.delete(ghost.id), Err(CatalogError::NotFound(_))));
}

#[test]
fn delete_referenced_creator_is_blocked_until_works_are_removed() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteWorkCatalog::open(&conn).unwrap();
    catalog
        .create(&WorkInput {
            isbn: 1,
            title: "Ficciones".to_string(),
            year: 1944,
            total_copies: 1,
            loaned_copies: 0,
            creator_name: "Borges".to_string(),
            publisher_name: "Sur".to_string(),
        })
        .unwrap();

    let borges = catalog.creators().find_by_name("Borges").unwrap().unwrap();
    let err = catalog.creators().delete(borges.id).unwrap_err();
    match err {
        CatalogError::Integrity(message) => assert!(message.contains("delete those works first")),
        other => panic!("unexpected error: {other}"),
    }

    catalog.delete(1).unwrap();
    catalog.creators().delete(borges.id).unwrap();
    assert!(catalog.creators().find_by_name("Borges").unwrap().is_none());
}

#[test]
fn publisher_registry_follows_the_same_rules() {
    let conn = open_db_in_memory().unwrap();
    let registry = PublisherRegistry::new(SqlitePublisherStore::try_new(&conn).unwrap());

    let mut sur = registry.create("Sur").unwrap();
    assert!(matches!(registry.create("Sur"), Err(CatalogError::Validation(_))));
    registry.rename(&mut sur, "Editorial Sur").unwrap();
    registry.delete(sur.id).unwrap();
    assert!(registry.list_all().unwrap().is_empty());
}

#[test]
fn delete_referenced_publisher_is_blocked_until_works_are_removed() {
    let conn = open_db_in_memory().unwrap();
    let catalog = SqliteWorkCatalog::open(&conn).unwrap();
    let work = catalog
        .create(&WorkInput {
            isbn: 2,
            title: "Sur".to_string(),
            year: 1931,
            total_copies: 2,
            loaned_copies: 1,
            creator_name: "Ocampo".to_string(),
            publisher_name: "Editorial Sur".to_string(),
        })
        .unwrap();

    let err = catalog.publishers().delete(work.publisher.id).unwrap_err();
    match err {
        CatalogError::Integrity(message) => assert!(message.contains("delete those works first")),
        other => panic!("unexpected error: {other}"),
    }
    assert!(catalog.publishers().find_by_name("Editorial Sur").unwrap().is_some());

    catalog.delete(2).unwrap();
    catalog.publishers().delete(work.publisher.id).unwrap();
    assert!(catalog.publishers().list_all().unwrap().is_empty());
}

#[test]
fn same_name_may_exist_as_creator_and_publisher() {
    let conn = open_db_in_memory().unwrap();
    let creators = creator_registry(&conn);
    let publishers = PublisherRegistry::new(SqlitePublisherStore::try_new(&conn).unwrap());

    creators.create("Planeta").unwrap();
    publishers.create("Planeta").unwrap();
}
