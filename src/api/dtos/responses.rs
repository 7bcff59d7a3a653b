use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::models::event::Event;

#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondByEmailResponse {
    pub success: bool,
    pub message: String,
    pub event_title: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentResponse {
    pub success: bool,
    pub message: String,
    pub sent_to: String,
}

#[derive(Serialize)]
pub struct InviteCreatedResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub is_owner: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participant_role: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyEventsResponse {
    pub uid: String,
    pub total_events: usize,
    pub own_events: usize,
    pub participant_events: usize,
    pub events: Vec<EventSummary>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingInvite {
    pub event_id: String,
    pub event_title: String,
    pub event_date: String,
    pub event_desc: String,
    pub organizer_name: String,
    pub role: String,
    pub status: String,
    pub invited_at: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyInvitesResponse {
    pub uid: String,
    pub invites_found: usize,
    pub invites: Vec<PendingInvite>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantView {
    pub uid: String,
    pub display_name: String,
    pub role: String,
    pub status: String,
    pub invited_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantsResponse {
    pub event_id: String,
    pub participants: Vec<ParticipantView>,
}

#[derive(Serialize)]
pub struct PublicEventsResponse {
    pub count: usize,
    pub events: Vec<Event>,
}

#[derive(Serialize)]
pub struct DayEventsResponse {
    pub date: String,
    pub count: usize,
    pub events: Vec<Event>,
}

#[derive(Serialize)]
pub struct CalendarEntry {
    pub id: String,
    pub title: String,
    pub time: String,
    pub location: String,
    pub category: String,
}

#[derive(Serialize)]
pub struct CalendarDay {
    pub date: String,
    pub count: usize,
    pub events: Vec<CalendarEntry>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarResponse {
    pub month: String,
    pub total_public: usize,
    pub days: Vec<CalendarDay>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_events: usize,
    pub total_public: usize,
    pub total_private: usize,
    pub upcoming_public_week: usize,
    pub public_by_category: BTreeMap<String, usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueReminder {
    pub event_id: String,
    pub title: String,
    pub time: String,
    pub location: String,
    pub reminder: String,
    pub start_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct ReminderPreviewResponse {
    pub success: bool,
    pub message: String,
    pub reminders: Vec<DueReminder>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub uid: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}
