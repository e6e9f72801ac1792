//! Request and response bodies shared by the server and its clients.
//!
//! Amounts are integer cents (`*_minor` fields), matching the engine's
//! money representation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Register {
        pub username: String,
        pub password: String,
        pub display_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Profile {
        pub username: String,
        pub display_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PasswordUpdate {
        pub current_password: String,
        pub new_password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResetRequest {
        pub username: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ResetConfirm {
        pub code: String,
        pub new_password: String,
    }
}

pub mod group {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupNew {
        pub name: String,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupUpdate {
        pub name: String,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupCreated {
        pub id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupView {
        pub id: String,
        pub name: String,
        pub description: Option<String>,
        pub created_by: String,
    }

    /// One row of the groups overview.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupSummaryView {
        pub id: String,
        pub name: String,
        pub description: Option<String>,
        pub participant_count: u64,
        pub expense_count: u64,
        /// The calling user's net balance in this group, in cents.
        pub my_balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupListResponse {
        pub groups: Vec<GroupSummaryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GroupDetailResponse {
        pub group: GroupView,
        pub participants: Vec<super::participant::ParticipantView>,
    }
}

pub mod participant {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantNew {
        pub name: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantCreated {
        pub id: Uuid,
    }

    /// Attach a registered user to an existing roster entry.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantLink {
        pub username: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantView {
        pub id: Uuid,
        pub name: String,
        /// Username of the linked account, absent for placeholders.
        pub user_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ParticipantListResponse {
        pub participants: Vec<ParticipantView>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SplitMode {
        Equal,
        Manual,
    }

    /// The split half of an expense draft.
    ///
    /// For `equal`, `participants` carry no amounts; for `manual`, every
    /// selected participant must carry one.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SplitEntry {
        pub participant_id: Uuid,
        pub amount_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub title: String,
        pub amount_minor: i64,
        pub occurred_on: NaiveDate,
        pub payer_id: Uuid,
        pub split_mode: SplitMode,
        pub participants: Vec<SplitEntry>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub occurred_on: NaiveDate,
        pub payer_id: Uuid,
        pub payer_name: String,
        pub split_mode: SplitMode,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ShareView {
        pub participant_id: Uuid,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseDetailResponse {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub occurred_on: NaiveDate,
        pub payer_id: Uuid,
        pub split_mode: SplitMode,
        pub shares: Vec<ShareView>,
    }
}

pub mod balance {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceView {
        pub participant_id: Uuid,
        pub name: String,
        /// Positive: is owed money. Negative: owes money. Zero: settled.
        pub balance_minor: i64,
        pub is_caller: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BalanceListResponse {
        pub balances: Vec<BalanceView>,
    }
}

pub mod personal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PersonalExpenseNew {
        pub title: String,
        pub amount_minor: i64,
        pub category: Category,
        /// RFC3339 timestamp.
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PersonalExpenseCreated {
        pub id: Uuid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PersonalExpenseView {
        pub id: Uuid,
        pub title: String,
        pub amount_minor: i64,
        pub category: Category,
        pub occurred_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryTotalView {
        pub category: Category,
        pub total_minor: i64,
    }

    /// A month of spending plus the budget context the dashboard shows.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySpendingResponse {
        pub year: i32,
        pub month: u32,
        pub expenses: Vec<PersonalExpenseView>,
        pub total_minor: i64,
        pub by_category: Vec<CategoryTotalView>,
        /// Absent when the user never set a budget for this month.
        pub budget_minor: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthQuery {
        pub year: i32,
        pub month: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSet {
        pub year: i32,
        pub month: u32,
        pub amount_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub year: i32,
        pub month: u32,
        pub amount_minor: Option<i64>,
    }
}
