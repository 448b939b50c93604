//! Event date-times as editors type them: RFC 3339 with an offset, or a
//! local `YYYY-MM-DDTHH:MM[:SS]` / `YYYY-MM-DD` read in the event timezone.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};

const LOCAL_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventTime {
    Zoned(DateTime<FixedOffset>),
    Local(NaiveDateTime),
}

impl EventTime {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
            return Some(EventTime::Zoned(zoned));
        }
        for format in LOCAL_FORMATS {
            if let Ok(local) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(EventTime::Local(local));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(EventTime::Local)
    }

    pub fn plus(&self, duration: Duration) -> Self {
        match self {
            EventTime::Zoned(t) => EventTime::Zoned(*t + duration),
            EventTime::Local(t) => EventTime::Local(*t + duration),
        }
    }

    /// ISO 8601 as `Date` parses it in the browser
    pub fn to_iso(&self) -> String {
        match self {
            EventTime::Zoned(t) => t.to_rfc3339(),
            EventTime::Local(t) => t.format("%Y-%m-%dT%H:%M:%S").to_string(),
        }
    }

    /// iCalendar basic format; zoned times are converted to UTC
    pub fn to_basic(&self) -> String {
        match self {
            EventTime::Zoned(t) => t.with_timezone(&Utc).format("%Y%m%dT%H%M%SZ").to_string(),
            EventTime::Local(t) => t.format("%Y%m%dT%H%M%S").to_string(),
        }
    }

    /// Comparable instant, treating local times as UTC
    pub fn sort_key(&self) -> NaiveDateTime {
        match self {
            EventTime::Zoned(t) => t.naive_utc(),
            EventTime::Local(t) => *t,
        }
    }
}
