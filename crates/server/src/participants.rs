//! Roster API endpoints.

use api_types::participant::{
    ParticipantCreated, ParticipantLink, ParticipantListResponse, ParticipantNew, ParticipantView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState, user};

/// Adds a placeholder participant to the group.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<ParticipantNew>,
) -> Result<(StatusCode, Json<ParticipantCreated>), ServerError> {
    let id = state
        .engine
        .add_participant(&group_id, &payload.name, &user.username)
        .await?;

    Ok((StatusCode::CREATED, Json(ParticipantCreated { id })))
}

/// Links a roster entry to a registered user. Creator only.
pub async fn link(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path((group_id, participant_id)): Path<(String, Uuid)>,
    Json(payload): Json<ParticipantLink>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .link_participant(&group_id, participant_id, &payload.username, &user.username)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The group's roster.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<ParticipantListResponse>, ServerError> {
    let participants = state
        .engine
        .participants(&group_id, &user.username)
        .await?;

    Ok(Json(ParticipantListResponse {
        participants: participants
            .into_iter()
            .map(|participant| ParticipantView {
                id: participant.id,
                name: participant.name,
                user_id: participant.user_id,
            })
            .collect(),
    }))
}
