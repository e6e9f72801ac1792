//! Owed shares.
//!
//! A [`Share`] is one participant's owed portion of one expense. Invariant:
//! the shares of an expense sum to its total (exactly under equal split,
//! within one cent under manual split). Editing an expense replaces its
//! whole share set; shares are never patched row by row.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ShareAmount, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Share {
    pub id: Uuid,
    pub expense_id: Uuid,
    pub participant_id: Uuid,
    pub amount: MoneyCents,
}

impl Share {
    pub fn new(expense_id: Uuid, share: ShareAmount) -> Self {
        Self {
            id: Uuid::new_v4(),
            expense_id,
            participant_id: share.participant_id,
            amount: share.amount,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "shares")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub expense_id: String,
    pub participant_id: String,
    pub amount_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Expenses,
    #[sea_orm(
        belongs_to = "super::participants::Entity",
        from = "Column::ParticipantId",
        to = "super::participants::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Participants,
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::participants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Share {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "share")?,
            expense_id: parse_uuid(&model.expense_id, "expense")?,
            participant_id: parse_uuid(&model.participant_id, "participant")?,
            amount: MoneyCents::new(model.amount_minor),
        })
    }
}

impl From<&Share> for ActiveModel {
    fn from(share: &Share) -> Self {
        Self {
            id: ActiveValue::Set(share.id.to_string()),
            expense_id: ActiveValue::Set(share.expense_id.to_string()),
            participant_id: ActiveValue::Set(share.participant_id.to_string()),
            amount_minor: ActiveValue::Set(share.amount.cents()),
        }
    }
}
