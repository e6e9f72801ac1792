use chrono::NaiveDate;
use uuid::Uuid;

use engine::{EngineError, ExpenseDraft, MoneyCents, Split, SplitMode};

mod common;
use common::{engine_with_db, register};

/// Group "Trip" with participants A(lice), B(ob), C(arol). Alice is the
/// creator and her roster entry is linked to her account.
async fn trip_group(engine: &engine::Engine) -> (String, Uuid, Uuid, Uuid) {
    register(engine, "alice", Some("A")).await;
    let group_id = engine.new_group("Trip", None, "alice").await.unwrap();
    let roster = engine.participants(&group_id, "alice").await.unwrap();
    let a = roster[0].id;
    let b = engine.add_participant(&group_id, "B", "alice").await.unwrap();
    let c = engine.add_participant(&group_id, "C", "alice").await.unwrap();
    (group_id, a, b, c)
}

fn draft(title: &str, total: i64, payer: Uuid, split: Split) -> ExpenseDraft {
    ExpenseDraft {
        title: title.to_string(),
        total: MoneyCents::new(total),
        occurred_on: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
        payer_id: payer,
        split,
    }
}

#[tokio::test]
async fn equal_dinner_splits_evenly_and_balances_add_up() {
    let (engine, _db) = engine_with_db().await;
    let (group_id, a, b, c) = trip_group(&engine).await;

    let expense_id = engine
        .new_expense(
            &group_id,
            "alice",
            draft(
                "Dinner",
                9000,
                a,
                Split::Equal {
                    participant_ids: vec![a, b, c],
                },
            ),
        )
        .await
        .unwrap();

    let (expense, shares) = engine
        .expense_detail(&group_id, expense_id, "alice")
        .await
        .unwrap();
    assert_eq!(expense.split_mode, SplitMode::Equal);
    assert_eq!(shares.len(), 3);
    for share in &shares {
        assert_eq!(share.amount, MoneyCents::new(3000));
    }

    let balances = engine.group_balances(&group_id, "alice").await.unwrap();
    let balance_of = |id: Uuid| {
        balances
            .iter()
            .find(|entry| entry.participant_id == id)
            .unwrap()
            .balance
    };
    assert_eq!(balance_of(a), MoneyCents::new(6000));
    assert_eq!(balance_of(b), MoneyCents::new(-3000));
    assert_eq!(balance_of(c), MoneyCents::new(-3000));
}

#[tokio::test]
async fn two_participant_group_settles_half_and_half() {
    let (engine, _db) = engine_with_db().await;
    register(&engine, "alice", Some("A")).await;
    let group_id = engine.new_group("Par", None, "alice").await.unwrap();
    let roster = engine.participants(&group_id, "alice").await.unwrap();
    let a = roster[0].id;
    let b = engine.add_participant(&group_id, "B", "alice").await.unwrap();

    engine
        .new_expense(
            &group_id,
            "alice",
            draft(
                "Aluguel",
                10000,
                a,
                Split::Equal {
                    participant_ids: vec![a, b],
                },
            ),
        )
        .await
        .unwrap();

    assert_eq!(
        engine
            .participant_balance(&group_id, a, "alice")
            .await
            .unwrap(),
        MoneyCents::new(5000)
    );
    assert_eq!(
        engine
            .participant_balance(&group_id, b, "alice")
            .await
            .unwrap(),
        MoneyCents::new(-5000)
    );
}

#[tokio::test]
async fn equal_split_remainder_goes_to_first_selected() {
    let (engine, _db) = engine_with_db().await;
    let (group_id, a, b, c) = trip_group(&engine).await;

    let expense_id = engine
        .new_expense(
            &group_id,
            "alice",
            draft(
                "Táxi",
                10000,
                a,
                Split::Equal {
                    participant_ids: vec![a, b, c],
                },
            ),
        )
        .await
        .unwrap();

    let (_, shares) = engine
        .expense_detail(&group_id, expense_id, "alice")
        .await
        .unwrap();
    let mut amounts: Vec<i64> = shares.iter().map(|s| s.amount.cents()).collect();
    amounts.sort_unstable();
    assert_eq!(amounts, vec![3333, 3333, 3334]);
    assert_eq!(amounts.iter().sum::<i64>(), 10000);
}

#[tokio::test]
async fn manual_taxi_accepted_and_rejected_with_discrepancy() {
    let (engine, _db) = engine_with_db().await;
    let (group_id, a, b, c) = trip_group(&engine).await;

    engine
        .new_expense(
            &group_id,
            "alice",
            draft(
                "Taxi",
                5000,
                b,
                Split::Manual {
                    amounts: vec![
                        (a, MoneyCents::new(2000)),
                        (b, MoneyCents::new(2000)),
                        (c, MoneyCents::new(1000)),
                    ],
                },
            ),
        )
        .await
        .unwrap();

    let err = engine
        .new_expense(
            &group_id,
            "alice",
            draft(
                "Taxi 2",
                5000,
                b,
                Split::Manual {
                    amounts: vec![
                        (a, MoneyCents::new(2000)),
                        (b, MoneyCents::new(2000)),
                        (c, MoneyCents::new(500)),
                    ],
                },
            ),
        )
        .await
        .unwrap_err();

    assert_eq!(err.split_discrepancy(), Some(MoneyCents::new(-500)));

    // Nothing was persisted for the rejected draft.
    let expenses = engine.list_expenses(&group_id, "alice").await.unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].expense.title, "Taxi");
}

#[tokio::test]
async fn editing_an_expense_replaces_all_shares() {
    let (engine, _db) = engine_with_db().await;
    let (group_id, a, b, c) = trip_group(&engine).await;

    let expense_id = engine
        .new_expense(
            &group_id,
            "alice",
            draft(
                "Jantar",
                9000,
                a,
                Split::Equal {
                    participant_ids: vec![a, b, c],
                },
            ),
        )
        .await
        .unwrap();

    engine
        .update_expense(
            &group_id,
            expense_id,
            "alice",
            draft(
                "Jantar (corrigido)",
                6000,
                b,
                Split::Manual {
                    amounts: vec![(a, MoneyCents::new(4000)), (b, MoneyCents::new(2000))],
                },
            ),
        )
        .await
        .unwrap();

    let (expense, shares) = engine
        .expense_detail(&group_id, expense_id, "alice")
        .await
        .unwrap();
    assert_eq!(expense.title, "Jantar (corrigido)");
    assert_eq!(expense.total, MoneyCents::new(6000));
    assert_eq!(expense.payer_id, b);
    assert_eq!(expense.split_mode, SplitMode::Manual);
    assert_eq!(shares.len(), 2);
    let sum: MoneyCents = shares.iter().map(|s| s.amount).sum();
    assert_eq!(sum, MoneyCents::new(6000));

    // C no longer owes anything; B paid 6000 and owes 2000.
    assert_eq!(
        engine
            .participant_balance(&group_id, c, "alice")
            .await
            .unwrap(),
        MoneyCents::ZERO
    );
    assert_eq!(
        engine
            .participant_balance(&group_id, b, "alice")
            .await
            .unwrap(),
        MoneyCents::new(4000)
    );
}

#[tokio::test]
async fn deleting_an_expense_clears_its_effect() {
    let (engine, _db) = engine_with_db().await;
    let (group_id, a, b, _c) = trip_group(&engine).await;

    let expense_id = engine
        .new_expense(
            &group_id,
            "alice",
            draft(
                "Cinema",
                4000,
                a,
                Split::Equal {
                    participant_ids: vec![a, b],
                },
            ),
        )
        .await
        .unwrap();

    engine
        .delete_expense(&group_id, expense_id, "alice")
        .await
        .unwrap();

    assert!(
        engine
            .list_expenses(&group_id, "alice")
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(
        engine
            .participant_balance(&group_id, a, "alice")
            .await
            .unwrap(),
        MoneyCents::ZERO
    );
}

#[tokio::test]
async fn payer_must_belong_to_the_group() {
    let (engine, _db) = engine_with_db().await;
    let (group_id, a, _b, _c) = trip_group(&engine).await;

    let err = engine
        .new_expense(
            &group_id,
            "alice",
            draft(
                "Fantasma",
                1000,
                Uuid::new_v4(),
                Split::Equal {
                    participant_ids: vec![a],
                },
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));
}

#[tokio::test]
async fn split_participants_must_belong_to_the_group() {
    let (engine, _db) = engine_with_db().await;
    let (group_id, a, _b, _c) = trip_group(&engine).await;

    let err = engine
        .new_expense(
            &group_id,
            "alice",
            draft(
                "Intruso",
                1000,
                a,
                Split::Equal {
                    participant_ids: vec![a, Uuid::new_v4()],
                },
            ),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidSplit(_)));
}

#[tokio::test]
async fn expenses_list_newest_first_with_payer_names() {
    let (engine, _db) = engine_with_db().await;
    let (group_id, a, b, _c) = trip_group(&engine).await;

    let mut old = draft("Antiga", 1000, a, Split::Equal { participant_ids: vec![a, b] });
    old.occurred_on = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
    engine.new_expense(&group_id, "alice", old).await.unwrap();

    let mut recent = draft("Recente", 2000, b, Split::Equal { participant_ids: vec![a, b] });
    recent.occurred_on = NaiveDate::from_ymd_opt(2026, 4, 1).unwrap();
    engine.new_expense(&group_id, "alice", recent).await.unwrap();

    let expenses = engine.list_expenses(&group_id, "alice").await.unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0].expense.title, "Recente");
    assert_eq!(expenses[0].payer_name, "B");
    assert_eq!(expenses[1].expense.title, "Antiga");
    assert_eq!(expenses[1].payer_name, "A");
}
