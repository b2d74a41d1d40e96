use storage::repository::{LearnerSlot, LearnerSlotRepository, Storage};
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_slot_roundtrip_and_overwrite() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_slots?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    assert!(repo.read_slot(LearnerSlot::Active).await.unwrap().is_none());

    repo.write_slot(LearnerSlot::Active, r#"{"id":"Mia"}"#)
        .await
        .unwrap();
    repo.write_slot(LearnerSlot::Active, r#"{"id":"Mia","badges":["🌟 First Star"]}"#)
        .await
        .unwrap();

    let stored = repo.read_slot(LearnerSlot::Active).await.unwrap();
    assert_eq!(
        stored.as_deref(),
        Some(r#"{"id":"Mia","badges":["🌟 First Star"]}"#)
    );
    assert!(repo.read_slot(LearnerSlot::Shelved).await.unwrap().is_none());
}

#[tokio::test]
async fn sqlite_delete_clears_only_the_named_slot() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_delete?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("migrate");

    repo.write_slot(LearnerSlot::Active, "active").await.unwrap();
    repo.write_slot(LearnerSlot::Shelved, "shelved").await.unwrap();

    repo.delete_slot(LearnerSlot::Active).await.unwrap();
    repo.delete_slot(LearnerSlot::Active).await.unwrap();

    assert!(repo.read_slot(LearnerSlot::Active).await.unwrap().is_none());
    assert_eq!(
        repo.read_slot(LearnerSlot::Shelved).await.unwrap().as_deref(),
        Some("shelved")
    );
}

#[tokio::test]
async fn migrations_are_rerunnable() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
}

#[tokio::test]
async fn storage_sqlite_builds_slot_repository() {
    let storage = Storage::sqlite("sqlite:file:memdb_storage?mode=memory&cache=shared")
        .await
        .expect("storage");
    storage
        .learner_slots
        .write_slot(LearnerSlot::Shelved, "{}")
        .await
        .unwrap();
    assert!(
        storage
            .learner_slots
            .read_slot(LearnerSlot::Shelved)
            .await
            .unwrap()
            .is_some()
    );
}
