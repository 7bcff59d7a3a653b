use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::ident::CallerId;
use crate::api::dtos::{
    requests::InviteParticipantRequest,
    responses::{MessageResponse, ParticipantView, ParticipantsResponse},
};
use crate::domain::models::participant::ROLE_GUEST;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_participants(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let participants = state.participant_service.list(&event_id).await?;

    let participants = participants
        .into_iter()
        .map(|p| ParticipantView {
            uid: p.user_id,
            display_name: p.display_name,
            role: p.role,
            status: p.status,
            invited_at: p.invited_at,
            responded_at: p.responded_at,
        })
        .collect();

    Ok(Json(ParticipantsResponse { event_id, participants }))
}

pub async fn invite_participant(
    State(state): State<Arc<AppState>>,
    CallerId(caller): CallerId,
    Path(event_id): Path<String>,
    Json(payload): Json<InviteParticipantRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.user_id.is_empty() {
        return Err(AppError::Validation("userId is required".into()));
    }

    let role = payload.role.unwrap_or_else(|| ROLE_GUEST.to_string());

    state
        .invite_service
        .invite_user(&event_id, &payload.user_id, &role, payload.force_reset)
        .await?;

    info!("{} invited {} to event {}", caller, payload.user_id, event_id);

    Ok(Json(MessageResponse { success: true, message: "Participant invited".into() }))
}
