use memora_backend::{
    api::router::create_router,
    config::Config,
    domain::models::event::Event,
    domain::models::user::User,
    domain::ports::{EmailService, PushService},
    error::AppError,
    infra::factory::{assemble_state, load_templates},
    infra::repositories::{
        sqlite_event_repo::SqliteEventRepo,
        sqlite_invite_repo::SqliteInviteRepo,
        sqlite_participant_repo::SqliteParticipantRepo,
        sqlite_reminder_log_repo::SqliteReminderLogRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

#[derive(Clone, Debug)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<String>,
}

/// Email double that records every send and can be told to fail for
/// specific recipients.
pub struct RecordingEmailService {
    pub sent: Mutex<Vec<SentMail>>,
    pub failing: Mutex<Vec<String>>,
}

impl RecordingEmailService {
    pub fn new() -> Self {
        Self { sent: Mutex::new(Vec::new()), failing: Mutex::new(Vec::new()) }
    }

    pub fn fail_for(&self, recipient: &str) {
        self.failing.lock().unwrap().push(recipient.to_string());
    }

    pub fn sent_to(&self, recipient: &str) -> Vec<SentMail> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.recipient == recipient)
            .cloned()
            .collect()
    }

    pub fn total_sent(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailService for RecordingEmailService {
    async fn send(
        &self,
        recipient: &str,
        subject: &str,
        html_body: &str,
        attachment_name: Option<&str>,
        _attachment_data: Option<&[u8]>,
    ) -> Result<(), AppError> {
        if self.failing.lock().unwrap().iter().any(|r| r == recipient) {
            return Err(AppError::Delivery(format!("Mail relay rejected {}", recipient)));
        }

        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: html_body.to_string(),
            attachment: attachment_name.map(|n| n.to_string()),
        });
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct SentPush {
    pub device_token: String,
    pub title: String,
    pub kind: String,
}

pub struct RecordingPushService {
    pub sent: Mutex<Vec<SentPush>>,
}

impl RecordingPushService {
    pub fn new() -> Self {
        Self { sent: Mutex::new(Vec::new()) }
    }

    pub fn total_sent(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl PushService for RecordingPushService {
    async fn send(
        &self,
        device_token: &str,
        title: &str,
        _body: &str,
        _event_id: &str,
        kind: &str,
    ) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentPush {
            device_token: device_token.to_string(),
            title: title.to_string(),
            kind: kind.to_string(),
        });
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub email: Arc<RecordingEmailService>,
    pub push: Arc<RecordingPushService>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            mail_from: "noreply@memora.test".to_string(),
            push_service_url: "http://localhost".to_string(),
            push_service_token: "token".to_string(),
            frontend_url: "http://localhost:3000".to_string(),
            display_timezone: "UTC".to_string(),
        };

        let email = Arc::new(RecordingEmailService::new());
        let push = Arc::new(RecordingPushService::new());

        let state = Arc::new(assemble_state(
            &config,
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteParticipantRepo::new(pool.clone())),
            Arc::new(SqliteInviteRepo::new(pool.clone())),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteReminderLogRepo::new(pool.clone())),
            email.clone(),
            push.clone(),
            Arc::new(load_templates()),
        ));

        let router = create_router(state.clone());

        Self { router, pool, db_filename, state, email, push }
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.router
            .clone()
            .oneshot(Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn post_json_as(&self, uri: &str, uid: &str, body: Value) -> Response<Body> {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-user-id", uid)
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn seed_user(&self, id: &str, name: &str, email: Option<&str>) -> User {
        let user = User::new(
            id.to_string(),
            name.to_string(),
            email.map(|e| e.to_string()),
            None,
        );
        self.state.user_repo.upsert(&user).await.unwrap()
    }

    /// Inserts an event starting `start_in` from now, bypassing the HTTP
    /// layer so scan tests control the timeline precisely.
    pub async fn seed_event(
        &self,
        owner_id: &str,
        title: &str,
        start_at: DateTime<Utc>,
        reminders: &[&str],
    ) -> Event {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            title: title.to_string(),
            description: String::new(),
            category: "Meeting".to_string(),
            location: "HQ".to_string(),
            address: None,
            latitude: None,
            longitude: None,
            event_date: start_at.date_naive(),
            event_time: start_at.format("%H:%M").to_string(),
            start_at,
            reminders: sqlx::types::Json(reminders.iter().map(|s| s.to_string()).collect()),
            is_public: false,
            created_at: now,
            updated_at: now,
        };
        self.state.event_repo.create(&event).await.unwrap()
    }

    pub fn in_minutes(&self, minutes: i64) -> DateTime<Utc> {
        Utc::now() + Duration::minutes(minutes)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

#[allow(dead_code)]
pub async fn parse_body(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
