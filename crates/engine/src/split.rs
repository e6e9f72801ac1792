//! The split calculator.
//!
//! Given an expense total and a set of participants, [`compute_shares`]
//! derives the amount each participant owes. It is a pure function; callers
//! persist the resulting shares.
//!
//! Two modes exist, mirroring how an expense is entered:
//!
//! - [`Split::Equal`] divides the total evenly. The cent remainder is handed
//!   out one cent at a time to the earliest-selected participants, so the
//!   shares always sum exactly to the total.
//! - [`Split::Manual`] takes caller-supplied amounts and validates that they
//!   add up to the total within a one-cent tolerance.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// How an expense total is divided among the selected participants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Split {
    /// Even division among the listed participants, remainder to the first.
    Equal { participant_ids: Vec<Uuid> },
    /// Caller-supplied owed amount per participant.
    Manual { amounts: Vec<(Uuid, MoneyCents)> },
}

/// Storage tag for the two split modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMode {
    Equal,
    Manual,
}

impl SplitMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Manual => "manual",
        }
    }
}

impl TryFrom<&str> for SplitMode {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "equal" => Ok(Self::Equal),
            "manual" => Ok(Self::Manual),
            other => Err(EngineError::InvalidSplit(format!(
                "invalid split mode: {other}"
            ))),
        }
    }
}

impl Split {
    pub fn mode(&self) -> SplitMode {
        match self {
            Self::Equal { .. } => SplitMode::Equal,
            Self::Manual { .. } => SplitMode::Manual,
        }
    }

    pub fn participant_ids(&self) -> Vec<Uuid> {
        match self {
            Self::Equal { participant_ids } => participant_ids.clone(),
            Self::Manual { amounts } => amounts.iter().map(|(id, _)| *id).collect(),
        }
    }
}

/// One participant's owed portion of an expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShareAmount {
    pub participant_id: Uuid,
    pub amount: MoneyCents,
}

/// Manual shares may be off from the total by at most one cent.
const MANUAL_TOLERANCE_CENTS: i64 = 1;

/// Computes each participant's owed share of `total`.
///
/// The total must be positive and the participant set non-empty and free of
/// duplicates. Equal mode always sums exactly to the total; manual mode is
/// accepted when the supplied amounts are within one cent of it and is
/// otherwise rejected with [`EngineError::SplitMismatch`] carrying the
/// discrepancy.
pub fn compute_shares(total: MoneyCents, split: &Split) -> ResultEngine<Vec<ShareAmount>> {
    if !total.is_positive() {
        return Err(EngineError::InvalidAmount(
            "expense total must be > 0".to_string(),
        ));
    }

    let ids = split.participant_ids();
    if ids.is_empty() {
        return Err(EngineError::InvalidSplit(
            "at least one participant must be selected".to_string(),
        ));
    }
    let mut seen = HashSet::with_capacity(ids.len());
    for id in &ids {
        if !seen.insert(*id) {
            return Err(EngineError::InvalidSplit(format!(
                "participant {id} selected more than once"
            )));
        }
    }

    match split {
        Split::Equal { participant_ids } => {
            let count = participant_ids.len() as i64;
            let base = total.cents() / count;
            let remainder = total.cents() % count;

            Ok(participant_ids
                .iter()
                .enumerate()
                .map(|(index, id)| ShareAmount {
                    participant_id: *id,
                    amount: MoneyCents::new(base + i64::from((index as i64) < remainder)),
                })
                .collect())
        }
        Split::Manual { amounts } => {
            for (id, amount) in amounts {
                if amount.is_negative() {
                    return Err(EngineError::InvalidSplit(format!(
                        "share for participant {id} must not be negative"
                    )));
                }
            }

            let sum: MoneyCents = amounts.iter().map(|(_, amount)| *amount).sum();
            let discrepancy = sum
                .checked_sub(total)
                .ok_or_else(|| EngineError::InvalidAmount("amount too large".to_string()))?;
            if discrepancy.abs().cents() > MANUAL_TOLERANCE_CENTS {
                return Err(EngineError::SplitMismatch { total, sum });
            }

            Ok(amounts
                .iter()
                .map(|(id, amount)| ShareAmount {
                    participant_id: *id,
                    amount: *amount,
                })
                .collect())
        }
    }
}
