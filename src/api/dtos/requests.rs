use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Option<String>,
    #[serde(default)]
    pub location: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: NaiveDate,
    pub time: String,
    #[serde(default)]
    pub reminders: Vec<String>,
    #[serde(default)]
    pub is_public: bool,
}

/// The `updates` object of POST /updateEvent. Everything is optional;
/// date/time edits re-derive the start instant server side.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdates {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub reminders: Option<Vec<String>>,
    pub is_public: Option<bool>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub event_id: String,
    pub updates: EventUpdates,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteEventRequest {
    pub event_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteParticipantRequest {
    pub user_id: String,
    pub role: Option<String>,
    #[serde(default)]
    pub force_reset: bool,
}

#[derive(Deserialize)]
pub struct InviteByEmailRequest {
    pub email: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondInviteRequest {
    pub uid: String,
    pub event_id: String,
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondByEmailRequest {
    pub email: String,
    pub event_id: String,
    pub status: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptInviteTokenRequest {
    pub token: String,
    pub email: String,
    pub event_id: String,
    pub uid: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInviteEmailRequest {
    pub email: String,
    pub event_id: String,
    pub event_title: String,
    pub event_date: Option<String>,
    pub invite_token: String,
    pub organizer_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendParticipantNotificationRequest {
    pub email: String,
    pub event_id: String,
    pub event_title: String,
    pub event_date: Option<String>,
    pub organizer_name: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveFcmTokenRequest {
    pub user_id: String,
    pub token: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveUserRequest {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}
