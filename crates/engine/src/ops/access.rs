//! Group access checks shared by the write and read paths.
//!
//! A group is visible to its creator and to every user linked to one of its
//! participants. Rename and delete are creator-only. Groups out of reach are
//! reported as not found rather than forbidden.

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, groups, participants};

use super::Engine;

impl Engine {
    /// Loads a group the user may read and write (creator or linked
    /// participant).
    pub(super) async fn require_group_member<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<groups::Model> {
        let group = groups::Entity::find_by_id(group_id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("group not exists".to_string()))?;

        if group.created_by == user_id {
            return Ok(group);
        }

        let linked = participants::Entity::find()
            .filter(participants::Column::GroupId.eq(group_id.to_string()))
            .filter(participants::Column::UserId.eq(user_id.to_string()))
            .one(db)
            .await?;

        match linked {
            Some(_) => Ok(group),
            None => Err(EngineError::KeyNotFound("group not exists".to_string())),
        }
    }

    /// Loads a group, requiring the caller to be its creator.
    pub(super) async fn require_group_owner<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: &str,
        user_id: &str,
    ) -> ResultEngine<groups::Model> {
        let group = self.require_group_member(db, group_id, user_id).await?;
        if group.created_by != user_id {
            return Err(EngineError::Forbidden(
                "only the group creator can do this".to_string(),
            ));
        }
        Ok(group)
    }

    /// Ensures a participant row exists and belongs to the given group.
    pub(super) async fn require_participant_in_group<C: ConnectionTrait>(
        &self,
        db: &C,
        group_id: &str,
        participant_id: Uuid,
    ) -> ResultEngine<participants::Model> {
        participants::Entity::find_by_id(participant_id.to_string())
            .filter(participants::Column::GroupId.eq(group_id.to_string()))
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("participant not exists".to_string()))
    }
}
