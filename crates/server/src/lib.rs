use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{app, run, run_with_listener};

mod balances;
mod expenses;
mod groups;
mod participants;
mod personal;
mod server;
mod user;

pub mod types {
    pub mod user {
        pub use api_types::user::{PasswordUpdate, Profile, Register, ResetConfirm, ResetRequest};
    }

    pub mod group {
        pub use api_types::group::{
            GroupCreated, GroupDetailResponse, GroupListResponse, GroupNew, GroupSummaryView,
            GroupUpdate, GroupView,
        };
    }

    pub mod participant {
        pub use api_types::participant::{
            ParticipantCreated, ParticipantLink, ParticipantListResponse, ParticipantNew,
            ParticipantView,
        };
    }

    pub mod expense {
        pub use api_types::expense::{
            ExpenseCreated, ExpenseDetailResponse, ExpenseListResponse, ExpenseNew, ExpenseView,
            ShareView, SplitEntry, SplitMode,
        };
    }

    pub mod balance {
        pub use api_types::balance::{BalanceListResponse, BalanceView};
    }

    pub mod personal {
        pub use api_types::personal::{
            BudgetSet, BudgetView, Category, CategoryTotalView, MonthQuery,
            MonthlySpendingResponse, PersonalExpenseCreated, PersonalExpenseNew,
            PersonalExpenseView,
        };
    }
}

pub enum ServerError {
    Engine(EngineError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::Forbidden(_) | EngineError::InvalidCredentials(_) => StatusCode::FORBIDDEN,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidSplit(_)
        | EngineError::SplitMismatch { .. }
        | EngineError::PasswordPolicy(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::MoneyCents;

    #[test]
    fn engine_forbidden_maps_to_403() {
        let res =
            ServerError::from(EngineError::Forbidden("forbidden".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn engine_not_found_maps_to_404() {
        let res = ServerError::from(EngineError::KeyNotFound("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn engine_conflict_maps_to_409() {
        let res = ServerError::from(EngineError::ExistingKey("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn engine_validation_maps_to_422() {
        let res = ServerError::from(EngineError::InvalidAmount("x".to_string())).into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let res = ServerError::from(EngineError::SplitMismatch {
            total: MoneyCents::new(5000),
            sum: MoneyCents::new(4500),
        })
        .into_response();
        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn generic_maps_to_400() {
        let res = ServerError::Generic("bad".to_string()).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
