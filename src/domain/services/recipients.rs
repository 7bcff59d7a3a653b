use crate::domain::models::participant::{Participant, STATUS_ACCEPTED, STATUS_PENDING};

/// Who gets an event reminder: the owner, then every participant that
/// accepted or is still pending (pending users are reminded so they respond).
/// Deduplicated by user id, owner first.
pub fn reminder_recipients(owner_id: &str, participants: &[Participant]) -> Vec<String> {
    let mut recipients = vec![owner_id.to_string()];

    for p in participants {
        if p.status != STATUS_ACCEPTED && p.status != STATUS_PENDING {
            continue;
        }
        if !recipients.iter().any(|id| id == &p.user_id) {
            recipients.push(p.user_id.clone());
        }
    }

    recipients
}

/// Who gets an invite nudge: pending participants only.
pub fn pending_recipients(participants: &[Participant]) -> Vec<String> {
    let mut recipients = Vec::new();
    for p in participants {
        if p.status == STATUS_PENDING && !recipients.iter().any(|id| id == &p.user_id) {
            recipients.push(p.user_id.clone());
        }
    }
    recipients
}
