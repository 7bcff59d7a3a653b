pub mod calendar;
pub mod invitations;
pub mod notifications;
pub mod participants;
pub mod recipients;
pub mod schedule;
