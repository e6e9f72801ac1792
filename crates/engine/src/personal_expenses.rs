//! Personal expenses.
//!
//! Independent from groups: each row is one user's own spending, bucketed
//! into a fixed category set and tracked against a monthly budget.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, util::parse_uuid};

/// The fixed spending categories of the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Alimentacao,
    Transporte,
    Lazer,
    Saude,
    Educacao,
    Moradia,
    Outros,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Self::Alimentacao,
        Self::Transporte,
        Self::Lazer,
        Self::Saude,
        Self::Educacao,
        Self::Moradia,
        Self::Outros,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alimentacao => "alimentacao",
            Self::Transporte => "transporte",
            Self::Lazer => "lazer",
            Self::Saude => "saude",
            Self::Educacao => "educacao",
            Self::Moradia => "moradia",
            Self::Outros => "outros",
        }
    }

    /// Human-readable label, as shown in the original dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Self::Alimentacao => "Alimentação",
            Self::Transporte => "Transporte",
            Self::Lazer => "Lazer",
            Self::Saude => "Saúde",
            Self::Educacao => "Educação",
            Self::Moradia => "Moradia",
            Self::Outros => "Outros",
        }
    }
}

impl TryFrom<&str> for Category {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "alimentacao" => Ok(Self::Alimentacao),
            "transporte" => Ok(Self::Transporte),
            "lazer" => Ok(Self::Lazer),
            "saude" => Ok(Self::Saude),
            "educacao" => Ok(Self::Educacao),
            "moradia" => Ok(Self::Moradia),
            "outros" => Ok(Self::Outros),
            other => Err(EngineError::InvalidAmount(format!(
                "invalid category: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalExpense {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub amount: MoneyCents,
    pub category: Category,
    pub occurred_at: DateTime<Utc>,
}

impl PersonalExpense {
    pub fn new(
        user_id: String,
        title: String,
        amount: MoneyCents,
        category: Category,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            amount,
            category,
            occurred_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "personal_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for PersonalExpense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "personal expense")?,
            user_id: model.user_id,
            title: model.title,
            amount: MoneyCents::new(model.amount_minor),
            category: Category::try_from(model.category.as_str())?,
            occurred_at: model.occurred_at,
        })
    }
}

impl From<&PersonalExpense> for ActiveModel {
    fn from(expense: &PersonalExpense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            user_id: ActiveValue::Set(expense.user_id.clone()),
            title: ActiveValue::Set(expense.title.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            category: ActiveValue::Set(expense.category.as_str().to_string()),
            occurred_at: ActiveValue::Set(expense.occurred_at),
        }
    }
}
