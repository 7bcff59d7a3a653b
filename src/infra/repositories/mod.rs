pub mod postgres_event_repo;
pub mod postgres_invite_repo;
pub mod postgres_participant_repo;
pub mod postgres_reminder_log_repo;
pub mod postgres_user_repo;
pub mod sqlite_event_repo;
pub mod sqlite_invite_repo;
pub mod sqlite_participant_repo;
pub mod sqlite_reminder_log_repo;
pub mod sqlite_user_repo;
