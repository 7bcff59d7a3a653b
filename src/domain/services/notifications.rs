use std::sync::Arc;

use chrono_tz::Tz;
use tera::{Context, Tera};
use tracing::{error, warn};
use url::form_urlencoded;

use crate::config::Config;
use crate::domain::models::event::Event;
use crate::domain::models::notification::{ChannelStatus, DispatchOutcome, NotificationKind};
use crate::domain::ports::{EmailService, PushService, UserRepository};
use crate::domain::services::calendar::generate_ics;
use crate::error::AppError;

/// Formats and delivers one notification per call. Fan-out callers rely on
/// `notify` never returning an error: every per-recipient failure is caught
/// here, logged, and reported through the outcome.
pub struct NotificationService {
    users: Arc<dyn UserRepository>,
    email: Arc<dyn EmailService>,
    push: Arc<dyn PushService>,
    templates: Arc<Tera>,
    frontend_url: String,
    display_tz: Tz,
}

impl NotificationService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        email: Arc<dyn EmailService>,
        push: Arc<dyn PushService>,
        templates: Arc<Tera>,
        config: &Config,
    ) -> Self {
        let display_tz: Tz = config.display_timezone.parse().unwrap_or(chrono_tz::UTC);
        Self {
            users,
            email,
            push,
            templates,
            frontend_url: config.frontend_url.clone(),
            display_tz,
        }
    }

    /// Notifies one registered user about an event. `detail` is the
    /// organizer display name for the invite kinds and the offset label for
    /// the reminder kinds.
    pub async fn notify(
        &self,
        user_id: &str,
        event: &Event,
        kind: NotificationKind,
        detail: &str,
    ) -> DispatchOutcome {
        let mut outcome = DispatchOutcome {
            user_id: user_id.to_string(),
            email: ChannelStatus::Skipped,
            push: ChannelStatus::Skipped,
        };

        let user = match self.users.find_by_id(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Recipient {} has no user record, skipping", user_id);
                return outcome;
            }
            Err(e) => {
                error!("Failed to load recipient {}: {:?}", user_id, e);
                outcome.email = ChannelStatus::Failed;
                return outcome;
            }
        };

        let Some(email_addr) = user.email.clone() else {
            warn!("Recipient {} ({}) has no email, skipping", user_id, user.display_name);
            return outcome;
        };

        let (subject, body) = match self.render(kind, event, &email_addr, detail) {
            Ok(rendered) => rendered,
            Err(e) => {
                error!("Failed to render {} notification for {}: {:?}", kind.as_str(), user_id, e);
                outcome.email = ChannelStatus::Failed;
                return outcome;
            }
        };

        outcome.email = match self.email.send(&email_addr, &subject, &body, None, None).await {
            Ok(()) => ChannelStatus::Sent,
            Err(e) => {
                error!("Failed to email {} <{}>: {:?}", user_id, email_addr, e);
                ChannelStatus::Failed
            }
        };

        if let Some(device_token) = user.fcm_token.as_deref() {
            let push_body = format!(
                "{} {} - {}",
                self.display_date(event),
                event.event_time,
                event.location
            );
            outcome.push = match self
                .push
                .send(device_token, &subject, &push_body, &event.id, kind.as_str())
                .await
            {
                Ok(()) => ChannelStatus::Sent,
                Err(e) => {
                    error!("Failed to push to {}: {:?}", user_id, e);
                    ChannelStatus::Failed
                }
            };
        }

        outcome
    }

    /// Invitation mail for an email-only invitee, with the tokenized accept
    /// link and an .ics attachment. Synchronous single-recipient path, so
    /// delivery failures propagate.
    pub async fn send_invite_mail(
        &self,
        email: &str,
        event: &Event,
        token: &str,
        organizer_name: &str,
    ) -> Result<(), AppError> {
        let event_date = format!("{} {}", self.display_date(event), event.event_time);
        let (subject, body) =
            self.render_invite(email, &event.id, &event.title, &event_date, token, organizer_name)?;

        let ics = generate_ics(event);
        self.email
            .send(email, &subject, &body, Some("invite.ics"), Some(ics.as_bytes()))
            .await
    }

    /// Template-only variant used by the relay endpoint, which carries its
    /// own display fields instead of an event record.
    pub async fn send_invite_mail_raw(
        &self,
        email: &str,
        event_id: &str,
        event_title: &str,
        event_date: &str,
        token: &str,
        organizer_name: &str,
    ) -> Result<(), AppError> {
        let (subject, body) =
            self.render_invite(email, event_id, event_title, event_date, token, organizer_name)?;
        self.email.send(email, &subject, &body, None, None).await
    }

    pub async fn send_participant_mail_raw(
        &self,
        email: &str,
        event_id: &str,
        event_title: &str,
        event_date: &str,
        organizer_name: &str,
    ) -> Result<(), AppError> {
        let mut ctx = Context::new();
        ctx.insert("organizer_name", organizer_name);
        ctx.insert("event_title", event_title);
        ctx.insert("event_date", event_date);
        ctx.insert("view_link", &format!("{}/events/{}", self.frontend_url, event_id));

        let subject = format!("{} added you to \"{}\"", organizer_name, event_title);
        let body = self
            .templates
            .render("participant_added.html", &ctx)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

        self.email.send(email, &subject, &body, None, None).await
    }

    fn render_invite(
        &self,
        email: &str,
        event_id: &str,
        event_title: &str,
        event_date: &str,
        token: &str,
        organizer_name: &str,
    ) -> Result<(String, String), AppError> {
        let accept_link = format!(
            "{}/accept-invite?token={}&email={}&eventId={}",
            self.frontend_url,
            token,
            encode(email),
            event_id
        );

        let mut ctx = Context::new();
        ctx.insert("organizer_name", organizer_name);
        ctx.insert("event_title", event_title);
        ctx.insert("event_date", event_date);
        ctx.insert("accept_link", &accept_link);

        let subject = format!("{} invited you to \"{}\"", organizer_name, event_title);
        let body = self
            .templates
            .render("invite.html", &ctx)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

        Ok((subject, body))
    }

    fn render(
        &self,
        kind: NotificationKind,
        event: &Event,
        recipient_email: &str,
        detail: &str,
    ) -> Result<(String, String), AppError> {
        let mut ctx = Context::new();
        ctx.insert("event_title", &event.title);
        ctx.insert("event_description", &event.description);
        ctx.insert(
            "location",
            if event.location.is_empty() { "No location set" } else { &event.location },
        );
        ctx.insert("event_date", &self.display_date(event));
        ctx.insert("event_time", &event.event_time);

        let (subject, template) = match kind {
            NotificationKind::Invite => {
                ctx.insert("organizer_name", detail);
                ctx.insert("accept_link", &format!("{}/events/{}", self.frontend_url, event.id));
                (
                    format!("{} invited you to \"{}\"", detail, event.title),
                    "invite.html",
                )
            }
            NotificationKind::ParticipantAdded => {
                ctx.insert("organizer_name", detail);
                ctx.insert("view_link", &format!("{}/events/{}", self.frontend_url, event.id));
                (
                    format!("{} added you to \"{}\"", detail, event.title),
                    "participant_added.html",
                )
            }
            NotificationKind::EventReminder => {
                ctx.insert("reminder_label", detail);
                (format!("Reminder: {}", event.title), "event_reminder.html")
            }
            NotificationKind::InviteNudge => {
                ctx.insert("reminder_label", detail);
                let respond_link = |status: &str| {
                    format!(
                        "{}/respond-invite-quick?email={}&eventId={}&status={}",
                        self.frontend_url,
                        encode(recipient_email),
                        event.id,
                        status
                    )
                };
                ctx.insert("accept_link", &respond_link("accepted"));
                ctx.insert("reject_link", &respond_link("rejected"));
                (
                    format!("Reminder: {} starts in {}!", event.title, detail),
                    "invite_nudge.html",
                )
            }
        };

        let body = self
            .templates
            .render(template, &ctx)
            .map_err(|e| AppError::InternalWithMsg(format!("Template render error: {:?}", e)))?;

        Ok((subject, body))
    }

    fn display_date(&self, event: &Event) -> String {
        event
            .start_at
            .with_timezone(&self.display_tz)
            .format("%d/%m/%Y")
            .to_string()
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
