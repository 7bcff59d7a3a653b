use std::sync::Arc;
use crate::config::Config;
use crate::domain::ports::{
    EmailService, EventRepository, InviteRepository, ParticipantRepository,
    PushService, ReminderLogRepository, UserRepository,
};
use crate::domain::services::invitations::InviteService;
use crate::domain::services::notifications::NotificationService;
use crate::domain::services::participants::ParticipantService;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub participant_repo: Arc<dyn ParticipantRepository>,
    pub invite_repo: Arc<dyn InviteRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub reminder_log_repo: Arc<dyn ReminderLogRepository>,
    pub email_service: Arc<dyn EmailService>,
    pub push_service: Arc<dyn PushService>,
    pub participant_service: Arc<ParticipantService>,
    pub invite_service: Arc<InviteService>,
    pub notifier: Arc<NotificationService>,
    pub templates: Arc<Tera>,
}
