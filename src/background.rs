use std::sync::Arc;
use std::time::{Duration, Instant};
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use tokio::time::sleep;
use tracing::{error, info, info_span, warn, Instrument};

use crate::domain::models::notification::NotificationKind;
use crate::domain::models::reminder::{ReminderClaim, KIND_EVENT_REMINDER, KIND_INVITE_NUDGE};
use crate::domain::services::recipients::{pending_recipients, reminder_recipients};
use crate::domain::services::schedule::{due_offsets, nudge_band, window_bucket};
use crate::error::AppError;
use crate::state::AppState;

const SCAN_INTERVAL: Duration = Duration::from_secs(300);
/// Wall-clock budget for one scan run. Events left over when it runs out
/// are skipped and picked up by a later run (the tolerance window covers a
/// missed cycle).
const SCAN_BUDGET: Duration = Duration::from_secs(120);
const SCAN_HORIZON_HOURS: i64 = 24;

#[derive(Debug, Default)]
pub struct ScanStats {
    pub events_seen: usize,
    pub windows_due: usize,
    pub windows_already_claimed: usize,
    pub attempted: usize,
    pub sent: usize,
    pub failed: usize,
    pub events_skipped: usize,
}

pub async fn start_reminder_scanner(state: Arc<AppState>) {
    info!("Starting event reminder scanner...");

    loop {
        let run = async {
            match run_reminder_scan(&state, Utc::now()).await {
                Ok(stats) => info!(
                    events = stats.events_seen,
                    due = stats.windows_due,
                    already_claimed = stats.windows_already_claimed,
                    attempted = stats.attempted,
                    sent = stats.sent,
                    failed = stats.failed,
                    skipped = stats.events_skipped,
                    "Reminder scan finished"
                ),
                Err(e) => error!("Reminder scan failed: {:?}", e),
            }
        };
        run.instrument(info_span!("reminder_scan")).await;

        sleep(SCAN_INTERVAL).await;
    }
}

pub async fn start_nudge_scanner(state: Arc<AppState>) {
    info!("Starting invite nudge scanner...");

    loop {
        let run = async {
            match run_nudge_scan(&state, Utc::now()).await {
                Ok(stats) => info!(
                    events = stats.events_seen,
                    due = stats.windows_due,
                    already_claimed = stats.windows_already_claimed,
                    attempted = stats.attempted,
                    sent = stats.sent,
                    failed = stats.failed,
                    skipped = stats.events_skipped,
                    "Invite nudge scan finished"
                ),
                Err(e) => error!("Invite nudge scan failed: {:?}", e),
            }
        };
        run.instrument(info_span!("invite_nudge_scan")).await;

        sleep(SCAN_INTERVAL).await;
    }
}

/// One pass of the event reminder job: events starting inside the horizon,
/// each configured offset matched against `now`, recipients fanned out
/// independently. Only the window claim can stop a dispatch; recipient
/// failures are counted, never propagated.
pub async fn run_reminder_scan(
    state: &Arc<AppState>,
    now: DateTime<Utc>,
) -> Result<ScanStats, AppError> {
    let mut stats = ScanStats::default();
    let started = Instant::now();

    let horizon = now + ChronoDuration::hours(SCAN_HORIZON_HOURS);
    let events = state.event_repo.list_starting_between(now, horizon).await?;

    let total = events.len();
    for (index, event) in events.into_iter().enumerate() {
        if started.elapsed() > SCAN_BUDGET {
            stats.events_skipped = total - index;
            warn!("Reminder scan budget exceeded, skipping {} events", stats.events_skipped);
            break;
        }

        stats.events_seen += 1;

        if event.reminders.is_empty() {
            continue;
        }

        for (label, target) in due_offsets(event.start_at, &event.reminders, now) {
            stats.windows_due += 1;

            let claim = ReminderClaim::new(
                event.id.clone(),
                KIND_EVENT_REMINDER,
                label.clone(),
                window_bucket(target),
            );
            match state.reminder_log_repo.try_claim(&claim).await {
                Ok(true) => {}
                Ok(false) => {
                    stats.windows_already_claimed += 1;
                    continue;
                }
                Err(e) => {
                    error!("Could not claim reminder window for event {}: {:?}", event.id, e);
                    stats.failed += 1;
                    continue;
                }
            }

            let participants = match state.participant_repo.list_by_event(&event.id).await {
                Ok(participants) => participants,
                Err(e) => {
                    error!("Could not load participants for event {}: {:?}", event.id, e);
                    stats.failed += 1;
                    continue;
                }
            };

            let recipients = reminder_recipients(&event.owner_id, &participants);
            info!(
                "Sending '{}' reminder for \"{}\" to {} recipients",
                label, event.title, recipients.len()
            );

            for user_id in recipients {
                stats.attempted += 1;
                let outcome = state
                    .notifier
                    .notify(&user_id, &event, NotificationKind::EventReminder, &label)
                    .await;
                if outcome.email_sent() {
                    stats.sent += 1;
                }
                if outcome.any_failed() {
                    stats.failed += 1;
                }
            }
        }
    }

    Ok(stats)
}

/// One pass of the invite nudge job: events whose start falls inside one of
/// the two disjoint response windows, pending participants only, quick
/// accept/reject links in the mail.
pub async fn run_nudge_scan(
    state: &Arc<AppState>,
    now: DateTime<Utc>,
) -> Result<ScanStats, AppError> {
    let mut stats = ScanStats::default();
    let started = Instant::now();

    let horizon = now + ChronoDuration::hours(SCAN_HORIZON_HOURS);
    let events = state.event_repo.list_starting_between(now, horizon).await?;

    let total = events.len();
    for (index, event) in events.into_iter().enumerate() {
        if started.elapsed() > SCAN_BUDGET {
            stats.events_skipped = total - index;
            warn!("Nudge scan budget exceeded, skipping {} events", stats.events_skipped);
            break;
        }

        stats.events_seen += 1;

        let Some(band) = nudge_band(event.start_at, now) else {
            continue;
        };
        stats.windows_due += 1;

        let claim = ReminderClaim::new(
            event.id.clone(),
            KIND_INVITE_NUDGE,
            band.label().to_string(),
            window_bucket(event.start_at),
        );
        match state.reminder_log_repo.try_claim(&claim).await {
            Ok(true) => {}
            Ok(false) => {
                stats.windows_already_claimed += 1;
                continue;
            }
            Err(e) => {
                error!("Could not claim nudge window for event {}: {:?}", event.id, e);
                stats.failed += 1;
                continue;
            }
        }

        let participants = match state.participant_repo.list_by_event(&event.id).await {
            Ok(participants) => participants,
            Err(e) => {
                error!("Could not load participants for event {}: {:?}", event.id, e);
                stats.failed += 1;
                continue;
            }
        };

        let pending = pending_recipients(&participants);
        if pending.is_empty() {
            continue;
        }

        info!(
            "Nudging {} pending participants of \"{}\" ({})",
            pending.len(), event.title, band.label()
        );

        for user_id in pending {
            stats.attempted += 1;
            let outcome = state
                .notifier
                .notify(&user_id, &event, NotificationKind::InviteNudge, band.label())
                .await;
            if outcome.email_sent() {
                stats.sent += 1;
            }
            if outcome.any_failed() {
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}
