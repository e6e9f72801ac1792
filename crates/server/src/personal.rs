//! Personal spending and budget API endpoints.

use api_types::personal::{
    BudgetSet, BudgetView, Category as ApiCategory, CategoryTotalView, MonthQuery,
    MonthlySpendingResponse, PersonalExpenseCreated, PersonalExpenseNew, PersonalExpenseView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Category, MoneyCents};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

fn map_category(category: ApiCategory) -> Category {
    match category {
        ApiCategory::Alimentacao => Category::Alimentacao,
        ApiCategory::Transporte => Category::Transporte,
        ApiCategory::Lazer => Category::Lazer,
        ApiCategory::Saude => Category::Saude,
        ApiCategory::Educacao => Category::Educacao,
        ApiCategory::Moradia => Category::Moradia,
        ApiCategory::Outros => Category::Outros,
    }
}

fn map_category_back(category: Category) -> ApiCategory {
    match category {
        Category::Alimentacao => ApiCategory::Alimentacao,
        Category::Transporte => ApiCategory::Transporte,
        Category::Lazer => ApiCategory::Lazer,
        Category::Saude => ApiCategory::Saude,
        Category::Educacao => ApiCategory::Educacao,
        Category::Moradia => ApiCategory::Moradia,
        Category::Outros => ApiCategory::Outros,
    }
}

/// Records one personal expense.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PersonalExpenseNew>,
) -> Result<(StatusCode, Json<PersonalExpenseCreated>), ServerError> {
    let id = state
        .engine
        .add_personal_expense(
            &user.username,
            &payload.title,
            MoneyCents::new(payload.amount_minor),
            map_category(payload.category),
            payload.occurred_at,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(PersonalExpenseCreated { id })))
}

/// One calendar month of spending, with the total, per-category breakdown
/// and the month's budget (if set).
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlySpendingResponse>, ServerError> {
    let spending = state
        .engine
        .monthly_spending(&user.username, query.year, query.month)
        .await?;
    let budget = state
        .engine
        .monthly_budget(&user.username, query.year, query.month)
        .await?;

    Ok(Json(MonthlySpendingResponse {
        year: query.year,
        month: query.month,
        expenses: spending
            .expenses
            .into_iter()
            .map(|expense| PersonalExpenseView {
                id: expense.id,
                title: expense.title,
                amount_minor: expense.amount.cents(),
                category: map_category_back(expense.category),
                occurred_at: expense.occurred_at,
            })
            .collect(),
        total_minor: spending.total.cents(),
        by_category: spending
            .by_category
            .into_iter()
            .map(|entry| CategoryTotalView {
                category: map_category_back(entry.category),
                total_minor: entry.total.cents(),
            })
            .collect(),
        budget_minor: budget.map(MoneyCents::cents),
    }))
}

/// Removes one of the caller's personal expenses.
pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(expense_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_personal_expense(&user.username, expense_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The caller's budget for one month.
pub async fn budget_get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .engine
        .monthly_budget(&user.username, query.year, query.month)
        .await?;

    Ok(Json(BudgetView {
        year: query.year,
        month: query.month,
        amount_minor: budget.map(MoneyCents::cents),
    }))
}

/// Sets (or replaces) the caller's budget for one month.
pub async fn budget_set(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetSet>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .set_monthly_budget(
            &user.username,
            payload.year,
            payload.month,
            MoneyCents::new(payload.amount_minor),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
