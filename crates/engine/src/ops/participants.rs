//! Roster management: who takes part in a group.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Participant, ResultEngine, participants, users, util::normalize_required_name,
};

use super::{Engine, with_tx};

impl Engine {
    /// Adds a placeholder participant (no linked account) to a group.
    ///
    /// Names are not required to be unique; the original UI allows two
    /// participants called "João".
    pub async fn add_participant(
        &self,
        group_id: &str,
        name: &str,
        user_id: &str,
    ) -> ResultEngine<Uuid> {
        let name = normalize_required_name(name, "participant name")?;

        with_tx!(self, |db_tx| {
            self.require_group_member(&db_tx, group_id, user_id).await?;

            let participant = Participant::new(group_id.to_string(), name, None);
            let participant_id = participant.id;
            let entry: participants::ActiveModel = (&participant).into();
            entry.insert(&db_tx).await?;

            Ok(participant_id)
        })
    }

    /// Links a roster entry to a registered user, so the group shows up in
    /// that user's overview. Creator only; the entry must not be linked yet.
    pub async fn link_participant(
        &self,
        group_id: &str,
        participant_id: Uuid,
        username: &str,
        user_id: &str,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_group_owner(&db_tx, group_id, user_id).await?;
            let participant = self
                .require_participant_in_group(&db_tx, group_id, participant_id)
                .await?;
            if participant.user_id.is_some() {
                return Err(EngineError::ExistingKey(
                    "participant already linked".to_string(),
                ));
            }

            users::Entity::find_by_id(username.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("user not exists".to_string()))?;

            let mut entry: participants::ActiveModel = participant.into();
            entry.user_id = ActiveValue::Set(Some(username.to_string()));
            entry.update(&db_tx).await?;

            Ok(())
        })
    }

    /// The group's roster.
    pub async fn participants(
        &self,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<Vec<Participant>> {
        self.require_group_member(&self.database, group_id, user_id)
            .await?;

        let models = participants::Entity::find()
            .filter(participants::Column::GroupId.eq(group_id.to_string()))
            .order_by_asc(participants::Column::Name)
            .all(&self.database)
            .await?;

        models.into_iter().map(Participant::try_from).collect()
    }
}
