use axum::{
    body::Body,
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{event, health, invite, notification, participant, user};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Events
        .route("/events", post(event::create_event))
        .route("/events/my", get(event::my_events))
        .route("/events/{event_id}", get(event::get_event))
        .route("/updateEvent", post(event::update_event))
        .route("/deleteEvent", post(event::delete_event))

        // Participants & invitations
        .route("/api/participants/{event_id}", get(participant::list_participants))
        .route("/events/{event_id}/participants", post(participant::invite_participant))
        .route("/events/{event_id}/invites", post(invite::invite_by_email))
        .route("/invites/my", get(invite::my_invites))
        .route("/invites/respond", post(invite::respond))
        .route("/invites/accept", post(invite::accept_by_token))
        .route("/respondInviteByEmail", post(invite::respond_by_email))

        // Mail relay endpoints
        .route("/sendInviteEmail", post(notification::send_invite_email))
        .route("/sendParticipantNotification", post(notification::send_participant_notification))
        .route("/trigger-reminders", get(notification::trigger_reminders))

        // Users
        .route("/users", post(user::save_user))
        .route("/users/search", get(user::search_users))
        .route("/saveFcmToken", post(user::save_fcm_token))

        // Public browsing
        .route("/events/public", get(event::public_events))
        .route("/events/public/by-date/{date}", get(event::public_events_by_date))
        .route("/events/public/{event_id}", get(event::public_event))
        .route("/calendar/public", get(event::public_calendar))
        .route("/stats/events", get(event::event_stats))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}
