//! Expense API endpoints.

use api_types::expense::{
    ExpenseCreated, ExpenseDetailResponse, ExpenseListResponse, ExpenseNew, ExpenseView,
    ShareView, SplitEntry, SplitMode as ApiSplitMode,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{ExpenseDraft, MoneyCents, Split};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_mode(mode: engine::SplitMode) -> ApiSplitMode {
    match mode {
        engine::SplitMode::Equal => ApiSplitMode::Equal,
        engine::SplitMode::Manual => ApiSplitMode::Manual,
    }
}

/// Builds the engine split from the request's mode + entry list.
fn to_split(mode: ApiSplitMode, entries: Vec<SplitEntry>) -> Result<Split, ServerError> {
    match mode {
        ApiSplitMode::Equal => Ok(Split::Equal {
            participant_ids: entries.into_iter().map(|entry| entry.participant_id).collect(),
        }),
        ApiSplitMode::Manual => {
            let mut amounts = Vec::with_capacity(entries.len());
            for entry in entries {
                let amount_minor = entry.amount_minor.ok_or_else(|| {
                    ServerError::Generic(
                        "amount_minor is required for every participant of a manual split"
                            .to_string(),
                    )
                })?;
                amounts.push((entry.participant_id, MoneyCents::new(amount_minor)));
            }
            Ok(Split::Manual { amounts })
        }
    }
}

fn to_draft(payload: ExpenseNew) -> Result<ExpenseDraft, ServerError> {
    let split = to_split(payload.split_mode, payload.participants)?;
    Ok(ExpenseDraft {
        title: payload.title,
        total: MoneyCents::new(payload.amount_minor),
        occurred_on: payload.occurred_on,
        payer_id: payload.payer_id,
        split,
    })
}

/// Records a new expense with its shares.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let draft = to_draft(payload)?;
    let id = state
        .engine
        .new_expense(&group_id, &user.username, draft)
        .await?;

    Ok((StatusCode::CREATED, Json(ExpenseCreated { id })))
}

/// The group's expenses, newest first.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state
        .engine
        .list_expenses(&group_id, &user.username)
        .await?;

    Ok(Json(ExpenseListResponse {
        expenses: expenses
            .into_iter()
            .map(|entry| ExpenseView {
                id: entry.expense.id,
                title: entry.expense.title,
                amount_minor: entry.expense.total.cents(),
                occurred_on: entry.expense.occurred_on,
                payer_id: entry.expense.payer_id,
                payer_name: entry.payer_name,
                split_mode: map_mode(entry.expense.split_mode),
            })
            .collect(),
    }))
}

/// One expense with its shares.
pub async fn detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((group_id, expense_id)): Path<(String, Uuid)>,
) -> Result<Json<ExpenseDetailResponse>, ServerError> {
    let (expense, shares) = state
        .engine
        .expense_detail(&group_id, expense_id, &user.username)
        .await?;

    Ok(Json(ExpenseDetailResponse {
        id: expense.id,
        title: expense.title,
        amount_minor: expense.total.cents(),
        occurred_on: expense.occurred_on,
        payer_id: expense.payer_id,
        split_mode: map_mode(expense.split_mode),
        shares: shares
            .into_iter()
            .map(|share| ShareView {
                participant_id: share.participant_id,
                amount_minor: share.amount.cents(),
            })
            .collect(),
    }))
}

/// Replaces an expense: the row is updated and all shares are rewritten.
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((group_id, expense_id)): Path<(String, Uuid)>,
    Json(payload): Json<ExpenseNew>,
) -> Result<StatusCode, ServerError> {
    let draft = to_draft(payload)?;
    state
        .engine
        .update_expense(&group_id, expense_id, &user.username, draft)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes an expense and its shares.
pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((group_id, expense_id)): Path<(String, Uuid)>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_expense(&group_id, expense_id, &user.username)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
