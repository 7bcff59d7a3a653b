use axum::{extract::State, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{SendInviteEmailRequest, SendParticipantNotificationRequest},
    responses::{DueReminder, ReminderPreviewResponse, SentResponse},
};
use crate::domain::services::schedule::due_offsets;
use crate::error::AppError;
use std::sync::Arc;
use chrono::{Duration, Utc};
use tracing::info;

const DEFAULT_ORGANIZER: &str = "Memora";

/// Single-recipient synchronous send. Unlike the scan fan-out, a provider
/// failure here surfaces to the caller as a 500.
pub async fn send_invite_email(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendInviteEmailRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.is_empty() || payload.event_id.is_empty() || payload.invite_token.is_empty() {
        return Err(AppError::Validation("Incomplete data (email, eventId, inviteToken)".into()));
    }

    let organizer = payload.organizer_name.as_deref().unwrap_or(DEFAULT_ORGANIZER);
    let event_date = payload.event_date.as_deref().unwrap_or("");

    state
        .notifier
        .send_invite_mail_raw(
            &payload.email,
            &payload.event_id,
            &payload.event_title,
            event_date,
            &payload.invite_token,
            organizer,
        )
        .await?;

    info!("Invite email sent to {}", payload.email);

    Ok(Json(SentResponse {
        success: true,
        message: "Invite email sent".into(),
        sent_to: payload.email,
    }))
}

pub async fn send_participant_notification(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SendParticipantNotificationRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.email.is_empty() || payload.event_id.is_empty() || payload.event_title.is_empty() {
        return Err(AppError::Validation("Incomplete data (email, eventId, eventTitle)".into()));
    }

    let organizer = payload.organizer_name.as_deref().unwrap_or(DEFAULT_ORGANIZER);
    let event_date = payload.event_date.as_deref().unwrap_or("");

    state
        .notifier
        .send_participant_mail_raw(
            &payload.email,
            &payload.event_id,
            &payload.event_title,
            event_date,
            organizer,
        )
        .await?;

    info!("Participant notification sent to {}", payload.email);

    Ok(Json(SentResponse {
        success: true,
        message: "Notification sent".into(),
        sent_to: payload.email,
    }))
}

/// Manual trigger entry point. Lists the reminders the scanner would send
/// right now without dispatching anything; the real sends stay with the
/// periodic job.
pub async fn trigger_reminders(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let now = Utc::now();
    let events = state
        .event_repo
        .list_starting_between(now, now + Duration::hours(24))
        .await?;

    let mut due = Vec::new();
    for event in events {
        if event.reminders.is_empty() {
            continue;
        }
        for (label, _target) in due_offsets(event.start_at, &event.reminders, now) {
            due.push(DueReminder {
                event_id: event.id.clone(),
                title: event.title.clone(),
                time: event.event_time.clone(),
                location: event.location.clone(),
                reminder: label,
                start_at: event.start_at,
            });
        }
    }

    Ok(Json(ReminderPreviewResponse {
        success: true,
        message: format!("{} reminders found to send", due.len()),
        reminders: due,
    }))
}
