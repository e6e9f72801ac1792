//! Group participants.
//!
//! A participant belongs to exactly one group and may optionally be linked
//! to a registered user (`user_id`). Placeholder participants with no
//! account are allowed, so a group can split with people who never log in.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub group_id: String,
    pub name: String,
    pub user_id: Option<String>,
}

impl Participant {
    pub fn new(group_id: String, name: String, user_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            name,
            user_id,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub name: String,
    pub user_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::groups::Entity",
        from = "Column::GroupId",
        to = "super::groups::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Groups,
    #[sea_orm(has_many = "super::shares::Entity")]
    Shares,
}

impl Related<super::groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Groups.def()
    }
}

impl Related<super::shares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Participant {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "participant")?,
            group_id: model.group_id,
            name: model.name,
            user_id: model.user_id,
        })
    }
}

impl From<&Participant> for ActiveModel {
    fn from(participant: &Participant) -> Self {
        Self {
            id: ActiveValue::Set(participant.id.to_string()),
            group_id: ActiveValue::Set(participant.group_id.clone()),
            name: ActiveValue::Set(participant.name.clone()),
            user_id: ActiveValue::Set(participant.user_id.clone()),
        }
    }
}
