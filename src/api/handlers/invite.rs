use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::ident::CallerId;
use crate::api::dtos::{
    requests::{
        AcceptInviteTokenRequest, InviteByEmailRequest, RespondByEmailRequest,
        RespondInviteRequest,
    },
    responses::{
        InviteCreatedResponse, MessageResponse, MyInvitesResponse, PendingInvite,
        RespondByEmailResponse,
    },
};
use crate::domain::models::participant::{Participant, STATUS_ACCEPTED, STATUS_PENDING, ROLE_GUEST};
use crate::error::AppError;
use std::sync::Arc;
use chrono::Utc;
use tracing::{info, warn};

pub async fn invite_by_email(
    State(state): State<Arc<AppState>>,
    CallerId(caller): CallerId,
    Path(event_id): Path<String>,
    Json(payload): Json<InviteByEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    let invite = state
        .invite_service
        .invite_by_email(&caller, &event_id, &payload.email)
        .await?;

    Ok(Json(InviteCreatedResponse {
        success: true,
        message: format!("Invite sent to {}", payload.email),
        token: invite.token,
    }))
}

pub async fn my_invites(
    State(state): State<Arc<AppState>>,
    CallerId(caller): CallerId,
) -> Result<impl IntoResponse, AppError> {
    let pending = state
        .participant_repo
        .list_for_user_status(&caller, STATUS_PENDING)
        .await?;

    let mut invites = Vec::new();
    for participant in pending {
        let Some(event) = state.event_repo.find_by_id(&participant.event_id).await? else {
            warn!("Pending invite for missing event {}", participant.event_id);
            continue;
        };

        let organizer_name = match state.user_repo.find_by_id(&event.owner_id).await? {
            Some(owner) => owner.display_name,
            None => "Unknown organizer".to_string(),
        };

        invites.push(PendingInvite {
            event_id: event.id,
            event_title: event.title,
            event_date: event.event_time.clone(),
            event_desc: event.description,
            organizer_name,
            role: participant.role,
            status: participant.status,
            invited_at: participant.invited_at,
        });
    }

    Ok(Json(MyInvitesResponse {
        uid: caller,
        invites_found: invites.len(),
        invites,
    }))
}

/// Authenticated response path: the invitee answers from the in-app list.
pub async fn respond(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RespondInviteRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.uid.is_empty() || payload.event_id.is_empty() || payload.status.is_empty() {
        return Err(AppError::Validation("Missing parameters (uid, eventId, status)".into()));
    }

    state
        .participant_service
        .respond(&payload.event_id, &payload.uid, &payload.status, None)
        .await?;

    info!("Invite response: uid={}, event={}, status={}", payload.uid, payload.event_id, payload.status);

    let verb = if payload.status == STATUS_ACCEPTED { "accepted" } else { "rejected" };
    Ok(Json(MessageResponse {
        success: true,
        message: format!("Invitation {} successfully!", verb),
    }))
}

/// No-token response path used by the one-click email links. Trusts the
/// email address as identity, which is why it stays in its own handler.
pub async fn respond_by_email(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RespondByEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.is_empty() || payload.event_id.is_empty() || payload.status.is_empty() {
        return Err(AppError::Validation("Missing parameters (email, eventId, status)".into()));
    }

    let user = state
        .user_repo
        .find_by_email(&payload.email)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    let event = state
        .event_repo
        .find_by_id(&payload.event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    state
        .participant_service
        .respond(&payload.event_id, &user.id, &payload.status, Some(&user.display_name))
        .await?;

    // Mirror the email-flow invite record when one exists
    if let Some(invite) = state
        .invite_repo
        .find_by_email_event(&payload.email, &payload.event_id)
        .await?
    {
        if let Err(e) = state.invite_repo.update_status(&invite.id, &payload.status).await {
            warn!("Could not mirror invite {} status: {:?}", invite.id, e);
        }
    }

    info!("Email response: {} -> event {} ({})", payload.email, payload.event_id, payload.status);

    let verb = if payload.status == STATUS_ACCEPTED { "accepted" } else { "rejected" };
    Ok(Json(RespondByEmailResponse {
        success: true,
        message: format!("Invitation {} successfully!", verb),
        event_title: event.title,
    }))
}

/// Token capability path: an emailed invitee accepts after signing up. The
/// email and event are cross-checked against the invite record before any
/// state changes.
pub async fn accept_by_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AcceptInviteTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.token.is_empty() || payload.uid.is_empty() {
        return Err(AppError::Validation("Missing parameters (token, uid)".into()));
    }

    let invite = state
        .invite_repo
        .find_by_token(&payload.token)
        .await?
        .ok_or(AppError::NotFound("Invite not found".into()))?;

    if invite.event_id != payload.event_id || invite.email != payload.email {
        return Err(AppError::Forbidden("Token does not match this invitation".into()));
    }

    let event = state
        .event_repo
        .find_by_id(&invite.event_id)
        .await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let display_name = state
        .user_repo
        .find_by_id(&payload.uid)
        .await?
        .map(|u| u.display_name)
        .unwrap_or_else(|| "Guest".to_string());

    // The invitee may have no participant row yet. An existing row goes
    // through the same transition as the other response paths; a missing
    // one is created straight in the accepted state.
    if state.participant_repo.find(&invite.event_id, &payload.uid).await?.is_some() {
        state
            .participant_service
            .respond(&invite.event_id, &payload.uid, STATUS_ACCEPTED, Some(&display_name))
            .await?;
    } else {
        let mut participant = Participant::new(
            invite.event_id.clone(),
            payload.uid.clone(),
            ROLE_GUEST.to_string(),
            display_name,
        );
        participant.status = STATUS_ACCEPTED.to_string();
        participant.responded_at = Some(Utc::now());
        state.participant_repo.upsert(&participant).await?;
    }

    state.invite_repo.update_status(&invite.id, STATUS_ACCEPTED).await?;

    info!("Token invite accepted: {} joined event {}", payload.uid, invite.event_id);

    Ok(Json(RespondByEmailResponse {
        success: true,
        message: "Invitation accepted successfully!".into(),
        event_title: event.title,
    }))
}
