use crate::domain::models::event::Event;
use chrono::Duration;
use icalendar::{Calendar, Component, Event as IcalEvent, EventLike};

/// Generates an iCalendar (.ics) string for an event invitation
pub fn generate_ics(event: &Event) -> String {
    let mut calendar = Calendar::new();

    let ical_event = IcalEvent::new()
        .summary(&event.title)
        .description(&event.description)
        .location(&event.location)
        .starts(event.start_at)
        .ends(event.start_at + Duration::hours(1))
        .uid(&event.id)
        .done();

    calendar.push(ical_event);
    calendar.to_string()
}
