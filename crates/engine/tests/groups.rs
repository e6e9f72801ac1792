use sea_orm::{ConnectionTrait, Statement};

use engine::EngineError;

mod common;
use common::{engine_with_db, register};

async fn count(db: &sea_orm::DatabaseConnection, sql: &str, group_id: &str) -> i64 {
    let backend = db.get_database_backend();
    let row = db
        .query_one(Statement::from_sql_and_values(
            backend,
            sql,
            vec![group_id.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

#[tokio::test]
async fn new_group_adds_creator_as_participant() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", Some("Alice")).await;

    let group_id = engine
        .new_group("Viagem", Some("Praia em janeiro"), "alice")
        .await
        .unwrap();

    let roster = engine.participants(&group_id, "alice").await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].name, "Alice");
    assert_eq!(roster[0].user_id.as_deref(), Some("alice"));
}

#[tokio::test]
async fn creator_without_display_name_gets_placeholder() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "bob", None).await;

    let group_id = engine.new_group("Casa", None, "bob").await.unwrap();

    let roster = engine.participants(&group_id, "bob").await.unwrap();
    assert_eq!(roster[0].name, "Você");
}

#[tokio::test]
async fn group_names_are_unique_per_creator() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", Some("Alice")).await;
    register(&engine, "bob", Some("Bob")).await;

    engine.new_group("Viagem", None, "alice").await.unwrap();
    let err = engine.new_group("viagem", None, "alice").await.unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));

    // A different creator can reuse the name.
    engine.new_group("Viagem", None, "bob").await.unwrap();
}

#[tokio::test]
async fn update_group_renames() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", Some("Alice")).await;

    let group_id = engine.new_group("Viagem", None, "alice").await.unwrap();
    engine
        .update_group(&group_id, "alice", "Viagem 2026", Some("atualizado"))
        .await
        .unwrap();

    let group = engine.group(&group_id, "alice").await.unwrap();
    assert_eq!(group.name, "Viagem 2026");
    assert_eq!(group.description.as_deref(), Some("atualizado"));
}

#[tokio::test]
async fn groups_are_hidden_from_strangers() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", Some("Alice")).await;
    register(&engine, "mallory", Some("Mallory")).await;

    let group_id = engine.new_group("Viagem", None, "alice").await.unwrap();

    let err = engine.group(&group_id, "mallory").await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn linked_participant_sees_group_but_cannot_delete_it() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", Some("Alice")).await;
    register(&engine, "bob", Some("Bob")).await;

    let group_id = engine.new_group("Casa", None, "alice").await.unwrap();
    let bob_participant = engine
        .add_participant(&group_id, "Bob", "alice")
        .await
        .unwrap();
    engine
        .link_participant(&group_id, bob_participant, "bob", "alice")
        .await
        .unwrap();

    let group = engine.group(&group_id, "bob").await.unwrap();
    assert_eq!(group.name, "Casa");

    let err = engine.delete_group(&group_id, "bob").await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn delete_group_leaves_no_orphan_rows() {
    let (engine, db) = engine_with_db().await;
    register(&engine, "alice", Some("Alice")).await;

    let group_id = engine.new_group("Viagem", None, "alice").await.unwrap();
    let roster = engine.participants(&group_id, "alice").await.unwrap();
    let alice_id = roster[0].id;
    let bob_id = engine
        .add_participant(&group_id, "Bob", "alice")
        .await
        .unwrap();

    engine
        .new_expense(
            &group_id,
            "alice",
            engine::ExpenseDraft {
                title: "Jantar".to_string(),
                total: engine::MoneyCents::new(9000),
                occurred_on: chrono::NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
                payer_id: alice_id,
                split: engine::Split::Equal {
                    participant_ids: vec![alice_id, bob_id],
                },
            },
        )
        .await
        .unwrap();

    engine.delete_group(&group_id, "alice").await.unwrap();

    assert_eq!(
        count(&db, "SELECT COUNT(*) AS n FROM groups WHERE id = ?", &group_id).await,
        0
    );
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) AS n FROM participants WHERE group_id = ?",
            &group_id
        )
        .await,
        0
    );
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) AS n FROM expenses WHERE group_id = ?",
            &group_id
        )
        .await,
        0
    );
    assert_eq!(
        count(
            &db,
            "SELECT COUNT(*) AS n FROM shares WHERE expense_id IN \
             (SELECT id FROM expenses WHERE group_id = ?)",
            &group_id
        )
        .await,
        0
    );
}

#[tokio::test]
async fn group_summaries_count_and_balance() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", Some("Alice")).await;

    let group_id = engine.new_group("Viagem", None, "alice").await.unwrap();
    let roster = engine.participants(&group_id, "alice").await.unwrap();
    let alice_id = roster[0].id;
    let bob_id = engine
        .add_participant(&group_id, "Bob", "alice")
        .await
        .unwrap();

    engine
        .new_expense(
            &group_id,
            "alice",
            engine::ExpenseDraft {
                title: "Mercado".to_string(),
                total: engine::MoneyCents::new(10000),
                occurred_on: chrono::NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                payer_id: alice_id,
                split: engine::Split::Equal {
                    participant_ids: vec![alice_id, bob_id],
                },
            },
        )
        .await
        .unwrap();

    let summaries = engine.group_summaries("alice").await.unwrap();
    assert_eq!(summaries.len(), 1);
    let summary = &summaries[0];
    assert_eq!(summary.participant_count, 2);
    assert_eq!(summary.expense_count, 1);
    assert_eq!(summary.my_balance, engine::MoneyCents::new(5000));
}
