//! Group lifecycle: create, rename, delete, lookup.

use sea_orm::{
    ActiveValue, Condition, QueryFilter, Statement, TransactionTrait,
    prelude::*,
    sea_query::{Expr, Query},
};

use crate::{
    EngineError, Group, Participant, ResultEngine, groups, participants, users,
    util::{normalize_optional_text, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    /// Creates a group and the creator's own participant row.
    ///
    /// Both inserts happen in one transaction, so a group can never exist
    /// without its creator on the roster. The participant's display name is
    /// taken from the creator's profile, falling back to a placeholder.
    pub async fn new_group(
        &self,
        name: &str,
        description: Option<&str>,
        user_id: &str,
    ) -> ResultEngine<String> {
        let name = normalize_required_name(name, "group name")?;
        let description = normalize_optional_text(description);

        let group = Group::new(name.clone(), description, user_id);
        let group_id = group.id.clone();
        let group_entry: groups::ActiveModel = (&group).into();

        with_tx!(self, |db_tx| {
            let creator = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            // Enforce unique group names per creator (case-insensitive) to
            // avoid ambiguous lookups.
            let exists = groups::Entity::find()
                .filter(groups::Column::CreatedBy.eq(user_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            group_entry.insert(&db_tx).await?;

            let display_name = creator
                .display_name
                .clone()
                .unwrap_or_else(|| "Você".to_string());
            let creator_participant = Participant::new(
                group_id.clone(),
                display_name,
                Some(user_id.to_string()),
            );
            let participant_entry: participants::ActiveModel = (&creator_participant).into();
            participant_entry.insert(&db_tx).await?;

            Ok(group_id)
        })
    }

    /// Renames a group and/or changes its description. Creator only.
    pub async fn update_group(
        &self,
        group_id: &str,
        user_id: &str,
        name: &str,
        description: Option<&str>,
    ) -> ResultEngine<()> {
        let name = normalize_required_name(name, "group name")?;
        let description = normalize_optional_text(description);

        with_tx!(self, |db_tx| {
            let group = self.require_group_owner(&db_tx, group_id, user_id).await?;

            let clash = groups::Entity::find()
                .filter(groups::Column::CreatedBy.eq(user_id.to_string()))
                .filter(Expr::cust("LOWER(name)").eq(name.to_lowercase()))
                .filter(groups::Column::Id.ne(group.id.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if clash {
                return Err(EngineError::ExistingKey(name));
            }

            let group_entry = groups::ActiveModel {
                id: ActiveValue::Set(group.id),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(description),
                ..Default::default()
            };
            group_entry.update(&db_tx).await?;

            Ok(())
        })
    }

    /// Deletes a group and everything it owns: shares, expenses,
    /// participants, then the group row, all in one transaction.
    pub async fn delete_group(&self, group_id: &str, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let group = self.require_group_owner(&db_tx, group_id, user_id).await?;
            let group_db_id = group.id;

            // Explicit cascade: not every relationship is FK-backed with
            // ON DELETE CASCADE, so delete bottom-up within the transaction.
            let backend = self.database.get_database_backend();

            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM shares WHERE expense_id IN (SELECT id FROM expenses WHERE group_id = ?);",
                    vec![group_db_id.clone().into()],
                ))
                .await?;

            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM expenses WHERE group_id = ?;",
                    vec![group_db_id.clone().into()],
                ))
                .await?;

            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM participants WHERE group_id = ?;",
                    vec![group_db_id.clone().into()],
                ))
                .await?;

            db_tx
                .execute(Statement::from_sql_and_values(
                    backend,
                    "DELETE FROM groups WHERE id = ?;",
                    vec![group_db_id.into()],
                ))
                .await?;

            Ok(())
        })
    }

    /// Returns one group the user can see.
    pub async fn group(&self, group_id: &str, user_id: &str) -> ResultEngine<Group> {
        let model = self
            .require_group_member(&self.database, group_id, user_id)
            .await?;
        Ok(model.into())
    }

    /// All groups the user created or participates in.
    pub(super) async fn visible_groups(&self, user_id: &str) -> ResultEngine<Vec<groups::Model>> {
        let member_of = Query::select()
            .column(participants::Column::GroupId)
            .from(participants::Entity)
            .and_where(Expr::col(participants::Column::UserId).eq(user_id))
            .to_owned();

        let models = groups::Entity::find()
            .filter(
                Condition::any()
                    .add(groups::Column::CreatedBy.eq(user_id.to_string()))
                    .add(groups::Column::Id.in_subquery(member_of)),
            )
            .all(&self.database)
            .await?;
        Ok(models)
    }
}
