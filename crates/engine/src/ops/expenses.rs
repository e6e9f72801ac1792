//! Expense lifecycle: record, edit, delete, list.
//!
//! Shares are derived with the split calculator and persisted together with
//! the expense row. Editing never patches shares in place: the whole set is
//! deleted and rewritten from the new draft, inside the same transaction as
//! the expense update.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Expense, MoneyCents, ResultEngine, Share, Split, compute_shares, expenses,
    participants, shares, util::normalize_required_name,
};

use super::{Engine, with_tx};

/// Caller input for creating or replacing an expense.
#[derive(Clone, Debug)]
pub struct ExpenseDraft {
    pub title: String,
    pub total: MoneyCents,
    pub occurred_on: NaiveDate,
    pub payer_id: Uuid,
    pub split: Split,
}

/// An expense with its payer's display name resolved, for listings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseWithPayer {
    pub expense: Expense,
    pub payer_name: String,
}

impl Engine {
    /// Records a new expense and its shares.
    pub async fn new_expense(
        &self,
        group_id: &str,
        user_id: &str,
        draft: ExpenseDraft,
    ) -> ResultEngine<Uuid> {
        let title = normalize_required_name(&draft.title, "expense title")?;
        let share_amounts = compute_shares(draft.total, &draft.split)?;

        let expense = Expense::new(
            group_id.to_string(),
            title,
            draft.total,
            draft.occurred_on,
            draft.payer_id,
            draft.split.mode(),
        )?;
        let expense_id = expense.id;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;
            self.check_roster(&db_tx, group_id, draft.payer_id, &draft.split)
                .await?;

            let expense_entry: expenses::ActiveModel = (&expense).into();
            expense_entry.insert(&db_tx).await?;

            for share_amount in share_amounts {
                let share = Share::new(expense_id, share_amount);
                let share_entry: shares::ActiveModel = (&share).into();
                share_entry.insert(&db_tx).await?;
            }

            Ok(expense_id)
        })
    }

    /// Replaces an expense with a new draft.
    ///
    /// The expense row is updated and all prior shares are dropped and
    /// recreated from the draft's split.
    pub async fn update_expense(
        &self,
        group_id: &str,
        expense_id: Uuid,
        user_id: &str,
        draft: ExpenseDraft,
    ) -> ResultEngine<()> {
        let title = normalize_required_name(&draft.title, "expense title")?;
        if !draft.total.is_positive() {
            return Err(EngineError::InvalidAmount(
                "expense total must be > 0".to_string(),
            ));
        }
        let share_amounts = compute_shares(draft.total, &draft.split)?;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;
            self.require_expense_in_group(&db_tx, group_id, expense_id)
                .await?;
            self.check_roster(&db_tx, group_id, draft.payer_id, &draft.split)
                .await?;

            let expense_entry = expenses::ActiveModel {
                id: ActiveValue::Set(expense_id.to_string()),
                title: ActiveValue::Set(title),
                amount_minor: ActiveValue::Set(draft.total.cents()),
                occurred_on: ActiveValue::Set(draft.occurred_on),
                payer_id: ActiveValue::Set(draft.payer_id.to_string()),
                split_mode: ActiveValue::Set(draft.split.mode().as_str().to_string()),
                ..Default::default()
            };
            expense_entry.update(&db_tx).await?;

            shares::Entity::delete_many()
                .filter(shares::Column::ExpenseId.eq(expense_id.to_string()))
                .exec(&db_tx)
                .await?;

            for share_amount in share_amounts {
                let share = Share::new(expense_id, share_amount);
                let share_entry: shares::ActiveModel = (&share).into();
                share_entry.insert(&db_tx).await?;
            }

            Ok(())
        })
    }

    /// Deletes an expense and its shares.
    pub async fn delete_expense(
        &self,
        group_id: &str,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;
            self.require_expense_in_group(&db_tx, group_id, expense_id)
                .await?;

            shares::Entity::delete_many()
                .filter(shares::Column::ExpenseId.eq(expense_id.to_string()))
                .exec(&db_tx)
                .await?;
            expenses::Entity::delete_by_id(expense_id.to_string())
                .exec(&db_tx)
                .await?;

            Ok(())
        })
    }

    /// The group's expenses, newest first, with payer names resolved.
    pub async fn list_expenses(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<ExpenseWithPayer>> {
        self.require_group_member(&self.database, group_id, user_id)
            .await?;

        let expense_models = expenses::Entity::find()
            .filter(expenses::Column::GroupId.eq(group_id.to_string()))
            .order_by_desc(expenses::Column::OccurredOn)
            .all(&self.database)
            .await?;

        let roster = participants::Entity::find()
            .filter(participants::Column::GroupId.eq(group_id.to_string()))
            .all(&self.database)
            .await?;
        let names: HashMap<String, String> = roster
            .into_iter()
            .map(|participant| (participant.id, participant.name))
            .collect();

        let mut out = Vec::with_capacity(expense_models.len());
        for model in expense_models {
            let payer_name = names
                .get(&model.payer_id)
                .cloned()
                .unwrap_or_else(|| "unknown".to_string());
            out.push(ExpenseWithPayer {
                expense: Expense::try_from(model)?,
                payer_name,
            });
        }
        Ok(out)
    }

    /// One expense with its shares, as needed to pre-fill an edit form.
    pub async fn expense_detail(
        &self,
        group_id: &str,
        expense_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(Expense, Vec<Share>)> {
        self.require_group_member(&self.database, group_id, user_id)
            .await?;
        let expense_model = self
            .require_expense_in_group(&self.database, group_id, expense_id)
            .await?;

        let share_models = shares::Entity::find()
            .filter(shares::Column::ExpenseId.eq(expense_id.to_string()))
            .all(&self.database)
            .await?;

        let expense = Expense::try_from(expense_model)?;
        let shares = share_models
            .into_iter()
            .map(Share::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        Ok((expense, shares))
    }

    async fn require_expense_in_group<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: &str,
        expense_id: Uuid,
    ) -> ResultEngine<expenses::Model> {
        expenses::Entity::find_by_id(expense_id.to_string())
            .filter(expenses::Column::GroupId.eq(group_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("expense not exists".to_string()))
    }

    /// Checks the payer and every selected participant against the roster.
    async fn check_roster<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: &str,
        payer_id: Uuid,
        split: &Split,
    ) -> ResultEngine<()> {
        let roster = participants::Entity::find()
            .filter(participants::Column::GroupId.eq(group_id.to_string()))
            .all(db)
            .await?;
        let known: HashSet<String> = roster
            .into_iter()
            .map(|participant| participant.id)
            .collect();

        if !known.contains(&payer_id.to_string()) {
            return Err(EngineError::KeyNotFound(
                "payer is not a participant of this group".to_string(),
            ));
        }
        for participant_id in split.participant_ids() {
            if !known.contains(&participant_id.to_string()) {
                return Err(EngineError::InvalidSplit(format!(
                    "participant {participant_id} is not in this group"
                )));
            }
        }
        Ok(())
    }
}
