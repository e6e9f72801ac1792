//! Personal spending and the monthly budget.
//!
//! These operations are per-user and independent from groups. Totals and
//! category breakdowns are aggregated from the month's rows on every read,
//! the same recompute-don't-cache stance the group balances take.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{
    Category, EngineError, MoneyCents, PersonalExpense, ResultEngine, monthly_budgets,
    personal_expenses, util::normalize_required_name,
};

use super::Engine;

/// Total spent in one category within a month.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: MoneyCents,
}

/// One calendar month of personal spending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonthlySpending {
    pub expenses: Vec<PersonalExpense>,
    pub total: MoneyCents,
    pub by_category: Vec<CategoryTotal>,
}

fn month_bounds(year: i32, month: u32) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::InvalidAmount(format!("invalid month: {year}-{month}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| EngineError::InvalidAmount(format!("invalid month: {year}-{month}")))?;

    let start = first
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::InvalidAmount("invalid month start".to_string()))?
        .and_utc();
    let end = next
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| EngineError::InvalidAmount("invalid month end".to_string()))?
        .and_utc();
    Ok((start, end))
}

impl Engine {
    /// Records one personal expense.
    pub async fn add_personal_expense(
        &self,
        user_id: &str,
        title: &str,
        amount: MoneyCents,
        category: Category,
        occurred_at: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let title = normalize_required_name(title, "expense title")?;
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }

        let expense =
            PersonalExpense::new(user_id.to_string(), title, amount, category, occurred_at);
        let expense_id = expense.id;
        let entry: personal_expenses::ActiveModel = (&expense).into();
        entry.insert(&self.database).await?;
        Ok(expense_id)
    }

    /// Removes one of the user's own personal expenses.
    pub async fn delete_personal_expense(
        &self,
        user_id: &str,
        expense_id: Uuid,
    ) -> ResultEngine<()> {
        let result = personal_expenses::Entity::delete_many()
            .filter(personal_expenses::Column::Id.eq(expense_id.to_string()))
            .filter(personal_expenses::Column::UserId.eq(user_id.to_string()))
            .exec(&self.database)
            .await?;

        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("expense not exists".to_string()));
        }
        Ok(())
    }

    /// The user's spending within one calendar month, newest first, with the
    /// month total and a per-category breakdown.
    pub async fn monthly_spending(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> ResultEngine<MonthlySpending> {
        let (start, end) = month_bounds(year, month)?;

        let models = personal_expenses::Entity::find()
            .filter(personal_expenses::Column::UserId.eq(user_id.to_string()))
            .filter(personal_expenses::Column::OccurredAt.gte(start))
            .filter(personal_expenses::Column::OccurredAt.lt(end))
            .order_by_desc(personal_expenses::Column::OccurredAt)
            .all(&self.database)
            .await?;

        let expenses = models
            .into_iter()
            .map(PersonalExpense::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        let total: MoneyCents = expenses.iter().map(|expense| expense.amount).sum();

        let by_category = Category::ALL
            .into_iter()
            .filter_map(|category| {
                let category_total: MoneyCents = expenses
                    .iter()
                    .filter(|expense| expense.category == category)
                    .map(|expense| expense.amount)
                    .sum();
                (!category_total.is_zero()).then_some(CategoryTotal {
                    category,
                    total: category_total,
                })
            })
            .collect();

        Ok(MonthlySpending {
            expenses,
            total,
            by_category,
        })
    }

    /// Sets (or replaces) the user's budget for one month.
    pub async fn set_monthly_budget(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
        amount: MoneyCents,
    ) -> ResultEngine<()> {
        month_bounds(year, month)?;
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "budget must be > 0".to_string(),
            ));
        }

        let existing = monthly_budgets::Entity::find_by_id((
            user_id.to_string(),
            year,
            month as i32,
        ))
        .one(&self.database)
        .await?;

        match existing {
            Some(_) => {
                let entry = monthly_budgets::ActiveModel {
                    user_id: ActiveValue::Set(user_id.to_string()),
                    year: ActiveValue::Set(year),
                    month: ActiveValue::Set(month as i32),
                    amount_minor: ActiveValue::Set(amount.cents()),
                };
                entry.update(&self.database).await?;
            }
            None => {
                let entry = monthly_budgets::ActiveModel {
                    user_id: ActiveValue::Set(user_id.to_string()),
                    year: ActiveValue::Set(year),
                    month: ActiveValue::Set(month as i32),
                    amount_minor: ActiveValue::Set(amount.cents()),
                };
                entry.insert(&self.database).await?;
            }
        }
        Ok(())
    }

    /// The user's budget for one month, if one was set.
    pub async fn monthly_budget(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> ResultEngine<Option<MoneyCents>> {
        month_bounds(year, month)?;

        let model = monthly_budgets::Entity::find_by_id((
            user_id.to_string(),
            year,
            month as i32,
        ))
        .one(&self.database)
        .await?;

        Ok(model.map(|budget| MoneyCents::new(budget.amount_minor)))
    }
}
