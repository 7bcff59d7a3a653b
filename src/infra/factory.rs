use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::domain::ports::{
    EmailService, EventRepository, InviteRepository, ParticipantRepository,
    PushService, ReminderLogRepository, UserRepository,
};
use crate::domain::services::invitations::InviteService;
use crate::domain::services::notifications::NotificationService;
use crate::domain::services::participants::ParticipantService;
use crate::state::AppState;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::push::http_push_service::HttpPushService;
use crate::infra::repositories::{
    postgres_event_repo::PostgresEventRepo, postgres_invite_repo::PostgresInviteRepo,
    postgres_participant_repo::PostgresParticipantRepo,
    postgres_reminder_log_repo::PostgresReminderLogRepo, postgres_user_repo::PostgresUserRepo,
    sqlite_event_repo::SqliteEventRepo, sqlite_invite_repo::SqliteInviteRepo,
    sqlite_participant_repo::SqliteParticipantRepo,
    sqlite_reminder_log_repo::SqliteReminderLogRepo, sqlite_user_repo::SqliteUserRepo,
};

pub fn load_templates() -> Tera {
    let mut tera = Tera::default();
    tera.add_raw_template("invite.html", include_str!("../templates/invite.html"))
        .expect("Failed to load invite template");
    tera.add_raw_template("participant_added.html", include_str!("../templates/participant_added.html"))
        .expect("Failed to load participant template");
    tera.add_raw_template("event_reminder.html", include_str!("../templates/event_reminder.html"))
        .expect("Failed to load reminder template");
    tera.add_raw_template("invite_nudge.html", include_str!("../templates/invite_nudge.html"))
        .expect("Failed to load nudge template");
    tera
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let email_service: Arc<dyn EmailService> = Arc::new(HttpEmailService::new(
        config.mail_service_url.clone(),
        config.mail_service_token.clone(),
        config.mail_from.clone(),
    ));
    let push_service: Arc<dyn PushService> = Arc::new(HttpPushService::new(
        config.push_service_url.clone(),
        config.push_service_token.clone(),
    ));

    let templates = Arc::new(load_templates());

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        assemble_state(
            config,
            Arc::new(PostgresEventRepo::new(pool.clone())),
            Arc::new(PostgresParticipantRepo::new(pool.clone())),
            Arc::new(PostgresInviteRepo::new(pool.clone())),
            Arc::new(PostgresUserRepo::new(pool.clone())),
            Arc::new(PostgresReminderLogRepo::new(pool.clone())),
            email_service,
            push_service,
            templates,
        )
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        assemble_state(
            config,
            Arc::new(SqliteEventRepo::new(pool.clone())),
            Arc::new(SqliteParticipantRepo::new(pool.clone())),
            Arc::new(SqliteInviteRepo::new(pool.clone())),
            Arc::new(SqliteUserRepo::new(pool.clone())),
            Arc::new(SqliteReminderLogRepo::new(pool.clone())),
            email_service,
            push_service,
            templates,
        )
    }
}

#[allow(clippy::too_many_arguments)]
pub fn assemble_state(
    config: &Config,
    event_repo: Arc<dyn EventRepository>,
    participant_repo: Arc<dyn ParticipantRepository>,
    invite_repo: Arc<dyn InviteRepository>,
    user_repo: Arc<dyn UserRepository>,
    reminder_log_repo: Arc<dyn ReminderLogRepository>,
    email_service: Arc<dyn EmailService>,
    push_service: Arc<dyn PushService>,
    templates: Arc<Tera>,
) -> AppState {
    let notifier = Arc::new(NotificationService::new(
        user_repo.clone(),
        email_service.clone(),
        push_service.clone(),
        templates.clone(),
        config,
    ));
    let participant_service = Arc::new(ParticipantService::new(
        participant_repo.clone(),
        user_repo.clone(),
    ));
    let invite_service = Arc::new(InviteService::new(
        event_repo.clone(),
        invite_repo.clone(),
        user_repo.clone(),
        participant_service.clone(),
        notifier.clone(),
    ));

    AppState {
        config: config.clone(),
        event_repo,
        participant_repo,
        invite_repo,
        user_repo,
        reminder_log_repo,
        email_service,
        push_service,
        participant_service,
        invite_service,
        notifier,
        templates,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
