//! The full bot against a real (SQLite) database.

mod common;

use common::{say, FakeChannel, CHANNEL};
use office_hours_queue::migration::{Migrator, MigratorTrait};
use office_hours_queue::{OfficeHours, QueueStore, SeaOrmStore, StudentStatus};
use sea_orm::{ConnectOptions, Database};

#[tokio::test]
async fn resolved_student_stays_in_history() {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let conn = Database::connect(opt).await.unwrap();
    Migrator::up(&conn, None).await.unwrap();

    let bot = OfficeHours::new(
        SeaOrmStore::new(conn),
        FakeChannel::with_members(&["prof", "alice", "bob"]),
    );

    bot.respond(&say("prof", "start office hour")).await.unwrap();
    bot.respond(&say("alice", "join office hours pattern matching"))
        .await
        .unwrap();
    bot.respond(&say("bob", "join office hours")).await.unwrap();
    bot.respond(&say("prof", "get next student")).await.unwrap();
    bot.respond(&say("prof", "mark student complete")).await.unwrap();

    let queue_id = {
        let sessions = bot.sessions().lock().await;
        let queue = sessions.get(CHANNEL).unwrap();
        assert!(!queue.check_queue("alice"));
        assert_eq!(queue.get_queue_position("bob"), Some(0));
        queue.id.unwrap()
    };

    let rows = bot.store().list_queue_entries(queue_id).await.unwrap();
    let statuses: Vec<_> = rows
        .iter()
        .map(|e| (e.user_id.as_str(), e.resolved))
        .collect();
    assert_eq!(
        statuses,
        [("alice", StudentStatus::Resolved), ("bob", StudentStatus::Waiting)]
    );

    let sent = bot.transport().sent_texts();
    assert_eq!(sent.len(), 6);
    assert_eq!(
        sent[5],
        "Conversation with Alice is finished and they have been removed from the queue."
    );
}
