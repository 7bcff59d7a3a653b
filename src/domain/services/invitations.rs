use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::models::event::Event;
use crate::domain::models::invite::Invite;
use crate::domain::models::notification::NotificationKind;
use crate::domain::models::participant::Participant;
use crate::domain::ports::{EventRepository, InviteRepository, UserRepository};
use crate::domain::services::notifications::NotificationService;
use crate::domain::services::participants::ParticipantService;
use crate::error::AppError;

const DEFAULT_ORGANIZER: &str = "Memora";

/// Issues invitations. Registered users get a participant row plus a
/// best-effort notification; unknown addresses get a tokenized Invite
/// record and an invitation mail.
pub struct InviteService {
    events: Arc<dyn EventRepository>,
    invites: Arc<dyn InviteRepository>,
    users: Arc<dyn UserRepository>,
    participants: Arc<ParticipantService>,
    notifier: Arc<NotificationService>,
}

impl InviteService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        invites: Arc<dyn InviteRepository>,
        users: Arc<dyn UserRepository>,
        participants: Arc<ParticipantService>,
        notifier: Arc<NotificationService>,
    ) -> Self {
        Self { events, invites, users, participants, notifier }
    }

    /// Invites a registered user. The state change commits first; a failed
    /// notification is logged and never rolls it back.
    pub async fn invite_user(
        &self,
        event_id: &str,
        user_id: &str,
        role: &str,
        force_reset: bool,
    ) -> Result<Participant, AppError> {
        let event = self.require_event(event_id).await?;

        let participant = self.participants.invite(event_id, user_id, role, force_reset).await?;

        let organizer_name = self.organizer_name(&event).await;
        let outcome = self
            .notifier
            .notify(user_id, &event, NotificationKind::ParticipantAdded, &organizer_name)
            .await;
        if outcome.any_failed() {
            warn!("Participant notification for {} on event {} did not go out", user_id, event_id);
        }

        Ok(participant)
    }

    /// Invites by email address, for people who may not have an account.
    /// Owner-only; the permission check runs before anything is written.
    pub async fn invite_by_email(
        &self,
        caller_id: &str,
        event_id: &str,
        email: &str,
    ) -> Result<Invite, AppError> {
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation("A valid email is required".into()));
        }

        let event = self.require_event(event_id).await?;

        if event.owner_id != caller_id {
            return Err(AppError::Forbidden("Only the event owner can invite".into()));
        }

        let invite = Invite::new(event_id.to_string(), email.to_string(), caller_id.to_string());
        let created = self.invites.create(&invite).await?;

        let organizer_name = self.organizer_name(&event).await;
        self.notifier
            .send_invite_mail(email, &event, &created.token, &organizer_name)
            .await?;

        info!("Invite sent to {} for event {}", email, event_id);
        Ok(created)
    }

    async fn require_event(&self, event_id: &str) -> Result<Event, AppError> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Event not found".into()))
    }

    async fn organizer_name(&self, event: &Event) -> String {
        match self.users.find_by_id(&event.owner_id).await {
            Ok(Some(owner)) => owner.display_name,
            _ => DEFAULT_ORGANIZER.to_string(),
        }
    }
}
