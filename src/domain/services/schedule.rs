use chrono::{DateTime, Duration, Utc};

/// How far past its target instant an offset still counts as due. Must stay
/// at or above the scan cadence so no window falls between two runs.
pub const TOLERANCE_MINUTES: i64 = 60;

/// Maps a configured reminder label to minutes before start. Labels are
/// stored in the form the product ships ("10 min", "1 hora", "1 dia");
/// the English spellings are accepted as aliases.
pub fn offset_minutes(label: &str) -> Option<i64> {
    match label {
        "10 min" => Some(10),
        "1 hora" | "1 hour" => Some(60),
        "1 dia" | "1 day" => Some(24 * 60),
        _ => None,
    }
}

/// Offsets of `reminders` whose target instant (start − offset) has been
/// reached but is less than the tolerance window in the past. An offset
/// whose target is still ahead of `now` is never due, however close.
pub fn due_offsets(
    start_at: DateTime<Utc>,
    reminders: &[String],
    now: DateTime<Utc>,
) -> Vec<(String, DateTime<Utc>)> {
    let tolerance = Duration::minutes(TOLERANCE_MINUTES);
    let mut due = Vec::new();

    for label in reminders {
        let Some(minutes) = offset_minutes(label) else {
            continue;
        };
        let target = start_at - Duration::minutes(minutes);
        if target <= now && now - target < tolerance {
            due.push((label.clone(), target));
        }
    }

    due
}

/// The two disjoint nudge windows before an event starts. Keeping them
/// non-overlapping means a single run can never fire both for one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NudgeBand {
    OneHour,
    TenMinutes,
}

impl NudgeBand {
    pub fn label(&self) -> &'static str {
        match self {
            NudgeBand::OneHour => "1 hora",
            NudgeBand::TenMinutes => "10 min",
        }
    }
}

/// Band match on whole minutes until start: (55, 65] and (5, 15].
pub fn nudge_band(start_at: DateTime<Utc>, now: DateTime<Utc>) -> Option<NudgeBand> {
    let minutes_until = (start_at - now).num_minutes();
    if minutes_until > 55 && minutes_until <= 65 {
        Some(NudgeBand::OneHour)
    } else if minutes_until > 5 && minutes_until <= 15 {
        Some(NudgeBand::TenMinutes)
    } else {
        None
    }
}

/// Bucket key for the dispatch ledger. Derived from the target instant, so
/// every run that computes the same window claims the same key.
pub fn window_bucket(target: DateTime<Utc>) -> i64 {
    target.timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_hour_offset_not_due_before_target() {
        let now = Utc::now();
        let start = now + Duration::minutes(61);
        assert!(due_offsets(start, &labels(&["1 hora"]), now).is_empty());
    }

    #[test]
    fn one_hour_offset_due_after_target() {
        let now = Utc::now();
        let start = now + Duration::minutes(59);
        let due = due_offsets(start, &labels(&["1 hora"]), now);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].0, "1 hora");
    }

    #[test]
    fn target_older_than_tolerance_is_not_due() {
        let now = Utc::now();
        // 10-minute offset, event started 55 minutes ago: target is 65
        // minutes in the past, outside the window.
        let start = now - Duration::minutes(55);
        assert!(due_offsets(start, &labels(&["10 min"]), now).is_empty());
    }

    #[test]
    fn day_offset_due_at_exact_moment() {
        let now = Utc::now();
        let start = now + Duration::hours(24);
        let due = due_offsets(start, &labels(&["1 dia"]), now);
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn english_aliases_parse() {
        assert_eq!(offset_minutes("1 hour"), Some(60));
        assert_eq!(offset_minutes("1 day"), Some(1440));
        assert_eq!(offset_minutes("5 min"), None);
    }

    #[test]
    fn unknown_labels_are_ignored() {
        let now = Utc::now();
        let start = now + Duration::minutes(9);
        assert!(due_offsets(start, &labels(&["tomorrow"]), now).is_empty());
    }

    #[test]
    fn hour_band_edges() {
        let now = Utc::now();
        assert_eq!(nudge_band(now + Duration::minutes(54), now), None);
        assert_eq!(nudge_band(now + Duration::minutes(56), now), Some(NudgeBand::OneHour));
        assert_eq!(nudge_band(now + Duration::minutes(64), now), Some(NudgeBand::OneHour));
        assert_eq!(nudge_band(now + Duration::minutes(66), now), None);
    }

    #[test]
    fn ten_minute_band_edges() {
        let now = Utc::now();
        assert_eq!(nudge_band(now + Duration::minutes(5), now), None);
        assert_eq!(nudge_band(now + Duration::minutes(6), now), Some(NudgeBand::TenMinutes));
        assert_eq!(nudge_band(now + Duration::minutes(15), now), Some(NudgeBand::TenMinutes));
        assert_eq!(nudge_band(now + Duration::minutes(16), now), None);
    }

    #[test]
    fn bands_are_disjoint() {
        let now = Utc::now();
        for m in 0..120 {
            let band = nudge_band(now + Duration::minutes(m), now);
            if let Some(b) = band {
                let in_hour = m > 55 && m <= 65;
                let in_ten = m > 5 && m <= 15;
                assert!(in_hour ^ in_ten, "minute {} matched {:?} unexpectedly", m, b);
            }
        }
    }
}
