//! The expense-ledger engine.
//!
//! Everything the HTTP layer does goes through [`Engine`]: group and roster
//! management, shared expenses with their owed shares, derived balances,
//! personal spending against a monthly budget, and the credential rows the
//! auth middleware checks against.
//!
//! Multi-step mutations (group + creator participant, expense + shares,
//! cascade deletes) always run inside a single database transaction.

pub use error::EngineError;
pub use expenses::Expense;
pub use groups::Group;
pub use money::MoneyCents;
pub use ops::{
    CategoryTotal, Engine, EngineBuilder, ExpenseDraft, ExpenseWithPayer, GroupSummary,
    MonthlySpending, ParticipantBalance,
};
pub use participants::Participant;
pub use personal_expenses::{Category, PersonalExpense};
pub use shares::Share;
pub use split::{ShareAmount, Split, SplitMode, compute_shares};
pub use users::password_digest;

mod error;
mod expenses;
mod groups;
mod money;
mod monthly_budgets;
mod ops;
mod participants;
mod personal_expenses;
mod shares;
mod split;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
