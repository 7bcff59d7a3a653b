use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::ident::{CallerId, MaybeCallerId};
use crate::api::dtos::{
    requests::{CreateEventRequest, DeleteEventRequest, EventUpdates, UpdateEventRequest},
    responses::{
        CalendarDay, CalendarEntry, CalendarResponse, DayEventsResponse, EventSummary,
        MessageResponse, MyEventsResponse, PublicEventsResponse, StatsResponse,
    },
};
use crate::domain::models::event::{derive_start_at, Event, CATEGORIES};
use crate::domain::services::schedule::offset_minutes;
use crate::error::AppError;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use sqlx::types::Json as SqlJson;
use uuid::Uuid;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use tracing::info;

const DEFAULT_CATEGORY: &str = "Other";
const STATS_SCAN_LIMIT: i64 = 500;

fn validate_category(category: &str) -> Result<(), AppError> {
    if CATEGORIES.contains(&category) {
        return Ok(());
    }
    Err(AppError::Validation(format!("Invalid category '{}'", category)))
}

fn validate_reminders(reminders: &[String]) -> Result<(), AppError> {
    for label in reminders {
        if offset_minutes(label).is_none() {
            return Err(AppError::Validation(format!("Unknown reminder offset '{}'", label)));
        }
    }
    Ok(())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    CallerId(caller): CallerId,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.is_empty() {
        return Err(AppError::Validation("Title is required".into()));
    }

    let category = payload.category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
    validate_category(&category)?;
    validate_reminders(&payload.reminders)?;

    let start_at = derive_start_at(payload.date, &payload.time)?;
    let now = Utc::now();

    let event = Event {
        id: Uuid::new_v4().to_string(),
        owner_id: caller.clone(),
        title: payload.title,
        description: payload.description,
        category,
        location: payload.location,
        address: payload.address,
        latitude: payload.latitude,
        longitude: payload.longitude,
        event_date: payload.date,
        event_time: payload.time,
        start_at,
        reminders: SqlJson(payload.reminders),
        is_public: payload.is_public,
        created_at: now,
        updated_at: now,
    };

    let created = state.event_repo.create(&event).await?;
    info!("Created event {} for owner {}", created.id, caller);
    Ok(Json(created))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    MaybeCallerId(caller): MaybeCallerId,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.is_public {
        return Ok(Json(event));
    }

    let Some(caller) = caller else {
        return Err(AppError::Forbidden("This event is private".into()));
    };

    if event.owner_id != caller
        && state.participant_repo.find(&event_id, &caller).await?.is_none()
    {
        return Err(AppError::Forbidden("This event is private".into()));
    }

    Ok(Json(event))
}

pub async fn my_events(
    State(state): State<Arc<AppState>>,
    CallerId(caller): CallerId,
) -> Result<impl IntoResponse, AppError> {
    let own = state.event_repo.list_by_owner(&caller).await?;
    let joined = state.event_repo.list_joined(&caller).await?;

    let own_count = own.len();
    let joined_count = joined.len();

    let mut events: Vec<EventSummary> = own
        .into_iter()
        .map(|event| EventSummary { event, is_owner: true, participant_role: None })
        .collect();

    for event in joined {
        let role = state
            .participant_repo
            .find(&event.id, &caller)
            .await?
            .map(|p| p.role);
        events.push(EventSummary { event, is_owner: false, participant_role: role });
    }

    Ok(Json(MyEventsResponse {
        uid: caller,
        total_events: events.len(),
        own_events: own_count,
        participant_events: joined_count,
        events,
    }))
}

fn apply_updates(event: &mut Event, updates: EventUpdates) -> Result<(), AppError> {
    if let Some(val) = updates.title { event.title = val; }
    if let Some(val) = updates.description { event.description = val; }
    if let Some(val) = updates.category {
        validate_category(&val)?;
        event.category = val;
    }
    if let Some(val) = updates.location { event.location = val; }
    if let Some(val) = updates.address { event.address = Some(val); }
    if let Some(val) = updates.latitude { event.latitude = Some(val); }
    if let Some(val) = updates.longitude { event.longitude = Some(val); }
    if let Some(val) = updates.reminders {
        validate_reminders(&val)?;
        event.reminders = SqlJson(val);
    }
    if let Some(val) = updates.is_public { event.is_public = val; }

    let time_changed = updates.date.is_some() || updates.time.is_some();
    if let Some(val) = updates.date { event.event_date = val; }
    if let Some(val) = updates.time { event.event_time = val; }
    if time_changed {
        event.refresh_start_at()?;
    }

    Ok(())
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    CallerId(caller): CallerId,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&payload.event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.owner_id != caller {
        return Err(AppError::Forbidden("No permission to update this event".into()));
    }

    apply_updates(&mut event, payload.updates)?;
    event.updated_at = Utc::now();

    state.event_repo.update(&event).await?;
    info!("Event updated: {}", event.id);

    Ok(Json(MessageResponse { success: true, message: "Event updated".into() }))
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    CallerId(caller): CallerId,
    Json(payload): Json<DeleteEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&payload.event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.owner_id != caller {
        return Err(AppError::Forbidden("No permission to delete this event".into()));
    }

    state.event_repo.delete_cascade(&event.id).await?;
    info!("Event deleted: {}", event.id);

    Ok(Json(MessageResponse { success: true, message: "Event deleted".into() }))
}

fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end = date.and_hms_opt(23, 59, 59).unwrap().and_utc();
    (start, end)
}

pub async fn public_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let from = match params.get("from") {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::Validation("Invalid from date, expected YYYY-MM-DD".into()))?;
            day_bounds(date).0
        }
        None => DateTime::<Utc>::UNIX_EPOCH,
    };
    let to = match params.get("to") {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| AppError::Validation("Invalid to date, expected YYYY-MM-DD".into()))?;
            day_bounds(date).1
        }
        None => Utc::now() + Duration::days(3650),
    };

    let mut events = state.event_repo.list_public_between(from, to).await?;

    if let Some(q) = params.get("q") {
        let needle = q.to_lowercase();
        events.retain(|e| {
            e.title.to_lowercase().contains(&needle)
                || e.location.to_lowercase().contains(&needle)
        });
    }

    Ok(Json(PublicEventsResponse { count: events.len(), events }))
}

pub async fn public_event(
    State(state): State<Arc<AppState>>,
    Path(event_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&event_id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if !event.is_public {
        return Err(AppError::Forbidden("Private event (not exposed by the API)".into()));
    }

    Ok(Json(event))
}

pub async fn public_events_by_date(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let day = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date, expected YYYY-MM-DD".into()))?;

    let (start, end) = day_bounds(day);
    let events = state.event_repo.list_public_between(start, end).await?;

    Ok(Json(DayEventsResponse { date, count: events.len(), events }))
}

pub async fn public_calendar(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let month = params.get("month").cloned().unwrap_or_default();
    let first_day = NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid month parameter, use ?month=YYYY-MM".into()))?;

    let next_month = if first_day.month() == 12 {
        NaiveDate::from_ymd_opt(first_day.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first_day.year(), first_day.month() + 1, 1)
    }
    .ok_or(AppError::Internal)?;

    let start = first_day.and_hms_opt(0, 0, 0).unwrap().and_utc();
    let end = next_month.and_hms_opt(0, 0, 0).unwrap().and_utc() - Duration::seconds(1);

    let events = state.event_repo.list_public_between(start, end).await?;
    let total_public = events.len();

    let mut by_day: BTreeMap<String, Vec<CalendarEntry>> = BTreeMap::new();
    for event in events {
        let day = event.start_at.date_naive().to_string();
        by_day.entry(day).or_default().push(CalendarEntry {
            id: event.id,
            title: event.title,
            time: event.event_time,
            location: event.location,
            category: event.category,
        });
    }

    let days = by_day
        .into_iter()
        .map(|(date, events)| CalendarDay { date, count: events.len(), events })
        .collect();

    Ok(Json(CalendarResponse { month, total_public, days }))
}

pub async fn event_stats(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list_all(STATS_SCAN_LIMIT).await?;

    let now = Utc::now();
    let week_ahead = now + Duration::days(7);

    let mut total_public = 0;
    let mut total_private = 0;
    let mut upcoming_public_week = 0;
    let mut public_by_category: BTreeMap<String, usize> = BTreeMap::new();

    for event in &events {
        if event.is_public {
            total_public += 1;
            if event.start_at >= now && event.start_at <= week_ahead {
                upcoming_public_week += 1;
            }
            *public_by_category.entry(event.category.clone()).or_default() += 1;
        } else {
            total_private += 1;
        }
    }

    Ok(Json(StatsResponse {
        total_events: events.len(),
        total_public,
        total_private,
        upcoming_public_week,
        public_by_category,
    }))
}
