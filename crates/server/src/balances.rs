//! Balance API endpoints.

use api_types::balance::{BalanceListResponse, BalanceView};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{ServerError, server::ServerState, user};

/// Net balance per roster entry, recomputed from the ledger on every call.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<BalanceListResponse>, ServerError> {
    let balances = state
        .engine
        .group_balances(&group_id, &user.username)
        .await?;

    Ok(Json(BalanceListResponse {
        balances: balances
            .into_iter()
            .map(|entry| BalanceView {
                participant_id: entry.participant_id,
                name: entry.name,
                balance_minor: entry.balance.cents(),
                is_caller: entry.is_caller,
            })
            .collect(),
    }))
}
