//! Balance aggregation.
//!
//! Balances are never stored: every read recomputes
//! `total paid - total owed` from the expense and share tables, so a
//! derived number can never go stale after an edit or delete.

use sea_orm::{PaginatorTrait, QueryFilter, Statement, Value, prelude::*};
use uuid::Uuid;

use crate::{Group, MoneyCents, ResultEngine, expenses, participants};

use super::Engine;

/// A participant's net position within a group.
///
/// Positive means the participant is owed money, negative that they owe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantBalance {
    pub participant_id: Uuid,
    pub name: String,
    pub balance: MoneyCents,
    /// Whether this roster entry is linked to the calling user.
    pub is_caller: bool,
}

/// One row of the groups overview: counts plus the caller's own balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupSummary {
    pub group: Group,
    pub participant_count: u64,
    pub expense_count: u64,
    pub my_balance: MoneyCents,
}

impl Engine {
    /// Net balance of one participant: sum of expense totals they paid minus
    /// sum of the shares they owe.
    pub async fn participant_balance(
        &self,
        group_id: &str,
        participant_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<MoneyCents> {
        self.require_group_member(&self.database, group_id, user_id)
            .await?;
        self.require_participant_in_group(&self.database, group_id, participant_id)
            .await?;

        self.balance_of(group_id, participant_id).await
    }

    /// Balances for the whole roster of a group.
    pub async fn group_balances(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<ParticipantBalance>> {
        self.require_group_member(&self.database, group_id, user_id)
            .await?;

        let roster = participants::Entity::find()
            .filter(participants::Column::GroupId.eq(group_id.to_string()))
            .all(&self.database)
            .await?;

        let mut balances = Vec::with_capacity(roster.len());
        for participant in roster {
            let participant_id = crate::util::parse_uuid(&participant.id, "participant")?;
            let balance = self.balance_of(group_id, participant_id).await?;
            balances.push(ParticipantBalance {
                participant_id,
                name: participant.name,
                balance,
                is_caller: participant.user_id.as_deref() == Some(user_id),
            });
        }
        Ok(balances)
    }

    /// The groups overview: every visible group with its participant and
    /// expense counts and the caller's balance in it.
    pub async fn group_summaries(&self, user_id: &str) -> ResultEngine<Vec<GroupSummary>> {
        let groups = self.visible_groups(user_id).await?;

        let mut summaries = Vec::with_capacity(groups.len());
        for group_model in groups {
            let group_id = group_model.id.clone();

            // The two counts are independent aggregates; fire them
            // concurrently and join.
            let participant_count = participants::Entity::find()
                .filter(participants::Column::GroupId.eq(group_id.clone()))
                .count(&self.database);
            let expense_count = expenses::Entity::find()
                .filter(expenses::Column::GroupId.eq(group_id.clone()))
                .count(&self.database);
            let (participant_count, expense_count) = tokio::join!(participant_count, expense_count);

            let own_row = participants::Entity::find()
                .filter(participants::Column::GroupId.eq(group_id.clone()))
                .filter(participants::Column::UserId.eq(user_id.to_string()))
                .one(&self.database)
                .await?;
            let my_balance = match own_row {
                Some(row) => {
                    let participant_id = crate::util::parse_uuid(&row.id, "participant")?;
                    self.balance_of(&group_id, participant_id).await?
                }
                None => MoneyCents::ZERO,
            };

            summaries.push(GroupSummary {
                group: group_model.into(),
                participant_count: participant_count?,
                expense_count: expense_count?,
                my_balance,
            });
        }
        Ok(summaries)
    }

    async fn balance_of(
        &self,
        group_id: &str,
        participant_id: Uuid,
    ) -> ResultEngine<MoneyCents> {
        let backend = self.database.get_database_backend();

        let total_paid: i64 = {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(amount_minor), 0) AS sum \
                 FROM expenses \
                 WHERE group_id = ? AND payer_id = ?",
                vec![
                    Value::from(group_id),
                    Value::from(participant_id.to_string()),
                ],
            );
            let row = self.database.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
        };

        let total_owed: i64 = {
            let stmt = Statement::from_sql_and_values(
                backend,
                "SELECT COALESCE(SUM(shares.amount_minor), 0) AS sum \
                 FROM shares \
                 INNER JOIN expenses ON expenses.id = shares.expense_id \
                 WHERE expenses.group_id = ? AND shares.participant_id = ?",
                vec![
                    Value::from(group_id),
                    Value::from(participant_id.to_string()),
                ],
            );
            let row = self.database.query_one(stmt).await?;
            row.and_then(|r| r.try_get("", "sum").ok()).unwrap_or(0)
        };

        Ok(MoneyCents::new(total_paid - total_owed))
    }
}
