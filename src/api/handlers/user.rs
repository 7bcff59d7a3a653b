use axum::{extract::{State, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::{
    requests::{SaveFcmTokenRequest, SaveUserRequest},
    responses::{MessageResponse, UserSummary},
};
use crate::domain::models::user::User;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

const SEARCH_LIMIT: i64 = 20;

/// Refreshes the identity snapshot on login.
pub async fn save_user(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.uid.is_empty() {
        return Err(AppError::Validation("uid is required".into()));
    }

    let user = User::new(
        payload.uid,
        payload.display_name.unwrap_or_else(|| "Guest".to_string()),
        payload.email,
        payload.photo_url,
    );

    let saved = state.user_repo.upsert(&user).await?;
    info!("User snapshot saved: {}", saved.id);

    Ok(Json(MessageResponse { success: true, message: "User saved".into() }))
}

pub async fn save_fcm_token(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SaveFcmTokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.user_id.is_empty() || payload.token.is_empty() {
        return Err(AppError::Validation("userId and token are required".into()));
    }

    state.user_repo.save_fcm_token(&payload.user_id, &payload.token).await?;
    info!("FCM token saved for user {}", payload.user_id);

    Ok(Json(MessageResponse { success: true, message: "FCM token saved".into() }))
}

/// Lookup for the invite dialog. Never exposes device tokens.
pub async fn search_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let query = params
        .get("q")
        .filter(|q| !q.is_empty())
        .ok_or(AppError::Validation("Query parameter q is required".into()))?;

    let users = state.user_repo.search(query, SEARCH_LIMIT).await?;

    let users: Vec<UserSummary> = users
        .into_iter()
        .map(|u| UserSummary { uid: u.id, display_name: u.display_name, email: u.email })
        .collect();

    Ok(Json(users))
}
