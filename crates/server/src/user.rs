//! Account endpoints and the users entity the auth middleware reads.

use api_types::user::{PasswordUpdate, Profile, Register, ResetConfirm, ResetRequest};
use axum::{Extension, Json, extract::State, http::StatusCode};
use sea_orm::entity::prelude::*;

use crate::{ServerError, server::ServerState};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub username: String,
    pub password_digest: String,
    pub display_name: Option<String>,
    pub reset_code: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Creates an account. Public.
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<Register>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .register_user(
            &payload.username,
            &payload.password,
            payload.display_name.as_deref(),
        )
        .await?;

    Ok(StatusCode::CREATED)
}

/// The authenticated user's profile.
pub async fn me(Extension(user): Extension<Model>) -> Json<Profile> {
    Json(Profile {
        username: user.username,
        display_name: user.display_name,
    })
}

/// Changes the password after verifying the current one.
pub async fn password_update(
    Extension(user): Extension<Model>,
    State(state): State<ServerState>,
    Json(payload): Json<PasswordUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_password(
            &user.username,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Issues a password reset code. Public.
///
/// The code is not returned in the response; an operator delivers it out of
/// band (the original e-mailed a reset link).
pub async fn reset_request(
    State(state): State<ServerState>,
    Json(payload): Json<ResetRequest>,
) -> Result<StatusCode, ServerError> {
    let code = state
        .engine
        .request_password_reset(&payload.username)
        .await?;
    tracing::info!("password reset code issued for {}: {code}", payload.username);

    Ok(StatusCode::ACCEPTED)
}

/// Consumes a reset code and sets a new password. Public.
pub async fn reset_confirm(
    State(state): State<ServerState>,
    Json(payload): Json<ResetConfirm>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .reset_password(&payload.code, &payload.new_password)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
