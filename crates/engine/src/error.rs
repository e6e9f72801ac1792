//! The errors the engine can return.

use sea_orm::DbErr;
use thiserror::Error;

use crate::MoneyCents;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid split: {0}")]
    InvalidSplit(String),
    /// Manual shares do not add up to the expense total. The signed
    /// difference `sum - total` is available via
    /// [`split_discrepancy`](Self::split_discrepancy).
    #[error("share amounts sum to {sum}, expected {total}")]
    SplitMismatch { total: MoneyCents, sum: MoneyCents },
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),
    #[error("Password policy: {0}")]
    PasswordPolicy(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// The discrepancy carried by a [`SplitMismatch`](Self::SplitMismatch),
    /// as `sum - total`.
    pub fn split_discrepancy(&self) -> Option<MoneyCents> {
        match self {
            Self::SplitMismatch { total, sum } => sum.checked_sub(*total),
            _ => None,
        }
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidSplit(a), Self::InvalidSplit(b)) => a == b,
            (
                Self::SplitMismatch { total: t1, sum: s1 },
                Self::SplitMismatch { total: t2, sum: s2 },
            ) => t1 == t2 && s1 == s2,
            (Self::InvalidCredentials(a), Self::InvalidCredentials(b)) => a == b,
            (Self::PasswordPolicy(a), Self::PasswordPolicy(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
