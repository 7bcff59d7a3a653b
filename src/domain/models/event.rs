use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::error::AppError;

pub const CATEGORIES: [&str; 4] = ["Meeting", "Class", "Birthday", "Other"];

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub location: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub event_date: NaiveDate,
    pub event_time: String,
    pub start_at: DateTime<Utc>,
    pub reminders: Json<Vec<String>>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Merges the date-only value and the "HH:MM" time-of-day into the start
/// instant used for all scheduling comparisons.
pub fn derive_start_at(date: NaiveDate, time: &str) -> Result<DateTime<Utc>, AppError> {
    let time = NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time, expected HH:MM".into()))?;
    Ok(date.and_time(time).and_utc())
}

impl Event {
    /// Keeps the start_at invariant after date or time edits.
    pub fn refresh_start_at(&mut self) -> Result<(), AppError> {
        self.start_at = derive_start_at(self.event_date, &self.event_time)?;
        Ok(())
    }
}
