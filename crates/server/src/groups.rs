//! Group API endpoints.

use api_types::group::{
    GroupCreated, GroupDetailResponse, GroupListResponse, GroupNew, GroupSummaryView, GroupUpdate,
    GroupView,
};
use api_types::participant::ParticipantView;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState, user};

/// The groups overview: every visible group with counts and the caller's
/// balance.
pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GroupListResponse>, ServerError> {
    let summaries = state.engine.group_summaries(&user.username).await?;

    let groups = summaries
        .into_iter()
        .map(|summary| GroupSummaryView {
            id: summary.group.id,
            name: summary.group.name,
            description: summary.group.description,
            participant_count: summary.participant_count,
            expense_count: summary.expense_count,
            my_balance_minor: summary.my_balance.cents(),
        })
        .collect();

    Ok(Json(GroupListResponse { groups }))
}

/// Creates a group; the creator joins the roster automatically.
pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GroupNew>,
) -> Result<(StatusCode, Json<GroupCreated>), ServerError> {
    let id = state
        .engine
        .new_group(
            &payload.name,
            payload.description.as_deref(),
            &user.username,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(GroupCreated { id })))
}

/// One group with its roster.
pub async fn detail(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupDetailResponse>, ServerError> {
    let group = state.engine.group(&group_id, &user.username).await?;
    let participants = state
        .engine
        .participants(&group_id, &user.username)
        .await?;

    Ok(Json(GroupDetailResponse {
        group: GroupView {
            id: group.id,
            name: group.name,
            description: group.description,
            created_by: group.created_by,
        },
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

/// Renames a group and/or changes its description. Creator only.
pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
    Json(payload): Json<GroupUpdate>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .update_group(
            &group_id,
            &user.username,
            &payload.name,
            payload.description.as_deref(),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Deletes a group and everything in it. Creator only.
pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(group_id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_group(&group_id, &user.username).await?;

    Ok(StatusCode::NO_CONTENT)
}
