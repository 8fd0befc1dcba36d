use office_hours_queue::migration::{Migrator, MigratorTrait};
use office_hours_queue::{
    EntryOptions, QueueStatus, QueueStore, SeaOrmStore, StoreError, StudentStatus,
};
use sea_orm::{ConnectOptions, Database};

async fn store() -> SeaOrmStore {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // Every pooled connection to `:memory:` would otherwise get its own database.
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(opt).await.unwrap();
    Migrator::up(&conn, None).await.unwrap();
    SeaOrmStore::new(conn)
}

#[tokio::test]
async fn create_queue_assigns_id_and_open_status() {
    let store = store().await;
    let queue = store.create_queue("prof", "cs101").await.unwrap();

    assert!(queue.id.is_some());
    assert_eq!(queue.owner_id, "prof");
    assert_eq!(queue.channel_id, "cs101");
    assert_eq!(queue.status, QueueStatus::Open);
    assert!(queue.opened_at.is_some());
    assert!(queue.is_empty());
}

#[tokio::test]
async fn entry_rows_round_trip() {
    let store = store().await;
    let queue_id = store.create_queue("prof", "cs101").await.unwrap().id.unwrap();

    let alice = store
        .create_queue_entry(
            "alice",
            queue_id,
            EntryOptions {
                question: Some("Why is my borrow checker angry?".into()),
                private_entry: true,
            },
        )
        .await
        .unwrap();
    let bob = store
        .create_queue_entry("bob", queue_id, EntryOptions::default())
        .await
        .unwrap();

    assert_eq!(alice.resolved, StudentStatus::Waiting);
    assert!(alice.id.unwrap() < bob.id.unwrap());

    store
        .update_queue_entry_status(alice.id.unwrap(), StudentStatus::Conversing)
        .await
        .unwrap();
    store
        .update_queue_entry_status(alice.id.unwrap(), StudentStatus::Resolved)
        .await
        .unwrap();

    let entries = store.list_queue_entries(queue_id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].user_id, "alice");
    assert_eq!(
        entries[0].question.as_deref(),
        Some("Why is my borrow checker angry?")
    );
    assert!(entries[0].private_entry);
    assert_eq!(entries[0].resolved, StudentStatus::Resolved);
    assert_eq!(entries[1].user_id, "bob");
    assert_eq!(entries[1].question, None);
    assert!(!entries[1].private_entry);
    assert_eq!(entries[1].resolved, StudentStatus::Waiting);
}

#[tokio::test]
async fn queues_are_listed_by_owner_and_channel() {
    let store = store().await;
    let first = store.create_queue("prof", "cs101").await.unwrap().id.unwrap();
    store.create_queue("prof", "cs202").await.unwrap();
    store.create_queue("ta", "cs101").await.unwrap();
    let second = store.create_queue("prof", "cs101").await.unwrap().id.unwrap();

    store
        .update_queue_status(first, QueueStatus::Closed)
        .await
        .unwrap();

    let owned = store.list_queues_by_owner("prof", "cs101").await.unwrap();
    let summary: Vec<_> = owned.iter().map(|q| (q.id.unwrap(), q.status)).collect();
    assert_eq!(
        summary,
        [(first, QueueStatus::Closed), (second, QueueStatus::Open)]
    );
}

#[tokio::test]
async fn updates_of_missing_rows_are_not_found() {
    let store = store().await;

    assert!(matches!(
        store.update_queue_status(42, QueueStatus::Closed).await,
        Err(StoreError::NotFound { id: 42, .. })
    ));
    assert!(matches!(
        store
            .update_queue_entry_status(7, StudentStatus::Conversing)
            .await,
        Err(StoreError::NotFound { id: 7, .. })
    ));
    assert!(matches!(
        store
            .create_queue_entry("alice", 99, EntryOptions::default())
            .await,
        Err(StoreError::NotFound { id: 99, .. })
    ));
    assert!(store.list_queue_entries(99).await.unwrap().is_empty());
}
