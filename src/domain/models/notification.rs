use serde::Serialize;

/// Why a user is being notified about an event. Each kind maps to its own
/// template and subject line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Invite,
    ParticipantAdded,
    EventReminder,
    InviteNudge,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::Invite => "invite",
            NotificationKind::ParticipantAdded => "participant-added",
            NotificationKind::EventReminder => "event-reminder",
            NotificationKind::InviteNudge => "invite-nudge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelStatus {
    Sent,
    Skipped,
    Failed,
}

/// Per-channel result for one recipient. Batch callers tally these instead
/// of reacting to individual errors.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchOutcome {
    pub user_id: String,
    pub email: ChannelStatus,
    pub push: ChannelStatus,
}

impl DispatchOutcome {
    pub fn email_sent(&self) -> bool {
        self.email == ChannelStatus::Sent
    }

    pub fn any_failed(&self) -> bool {
        self.email == ChannelStatus::Failed || self.push == ChannelStatus::Failed
    }
}
