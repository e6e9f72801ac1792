//! Shared expenses.
//!
//! An `Expense` belongs to a group, names a payer (a participant of the same
//! group) and records how its total is divided: evenly (`equal`) or with
//! caller-supplied amounts (`manual`). The owed portions themselves live in
//! the `shares` table, one row per (expense, participant) pair.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, SplitMode, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub group_id: String,
    pub title: String,
    pub total: MoneyCents,
    pub occurred_on: NaiveDate,
    pub payer_id: Uuid,
    pub split_mode: SplitMode,
}

impl Expense {
    pub fn new(
        group_id: String,
        title: String,
        total: MoneyCents,
        occurred_on: NaiveDate,
        payer_id: Uuid,
        split_mode: SplitMode,
    ) -> ResultEngine<Self> {
        if !total.is_positive() {
            return Err(EngineError::InvalidAmount(
                "expense total must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            group_id,
            title,
            total,
            occurred_on,
            payer_id,
            split_mode,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub group_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub occurred_on: Date,
    pub payer_id: String,
    pub split_mode: String,
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
    #[sea_orm(
        belongs_to = "super::participants::Entity",
        from = "Column::PayerId",
        to = "super::participants::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Payer,
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

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "expense")?,
            group_id: model.group_id,
            title: model.title,
            total: MoneyCents::new(model.amount_minor),
            occurred_on: model.occurred_on,
            payer_id: parse_uuid(&model.payer_id, "payer")?,
            split_mode: SplitMode::try_from(model.split_mode.as_str())?,
        })
    }
}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            group_id: ActiveValue::Set(expense.group_id.clone()),
            title: ActiveValue::Set(expense.title.clone()),
            amount_minor: ActiveValue::Set(expense.total.cents()),
            occurred_on: ActiveValue::Set(expense.occurred_on),
            payer_id: ActiveValue::Set(expense.payer_id.to_string()),
            split_mode: ActiveValue::Set(expense.split_mode.as_str().to_string()),
        }
    }
}
