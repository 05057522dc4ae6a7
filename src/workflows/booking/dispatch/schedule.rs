use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use super::super::domain::{hhmm, BookingId};

/// Errors raised while building or parsing schedule slots.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("invalid clock time '{0}': expected HH:MM")]
    InvalidTime(String),
    #[error("duration must be positive, got {minutes} minutes")]
    NonPositiveDuration { minutes: i64 },
    #[error("slot starting {start} with {minutes} minutes would cross midnight")]
    CrossesMidnight { start: NaiveTime, minutes: i64 },
}

/// Half-open interval on a single service date. Construction rejects slots
/// that would wrap past midnight, so an end time is always after its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

impl TimeSlot {
    pub fn new(start: NaiveTime, minutes: i64) -> Result<Self, ScheduleError> {
        if minutes <= 0 {
            return Err(ScheduleError::NonPositiveDuration { minutes });
        }

        let (end, wrapped) = start.overflowing_add_signed(Duration::minutes(minutes));
        if wrapped != 0 {
            return Err(ScheduleError::CrossesMidnight { start, minutes });
        }

        Ok(Self { start, end })
    }

    pub fn parse(start: &str, minutes: i64) -> Result<Self, ScheduleError> {
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M")
            .map_err(|_| ScheduleError::InvalidTime(start.to_string()))?;
        Self::new(start, minutes)
    }

    /// Classic interval test: intervals sharing only an endpoint do not
    /// overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        !(self.end <= other.start || self.start >= other.end)
    }

    pub fn minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A reserved interval on a crew member's day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedSlot {
    #[serde(flatten)]
    pub slot: TimeSlot,
    pub booking_id: BookingId,
}

/// One calendar day on a crew member's schedule: the working window plus the
/// reserved intervals, kept sorted by start time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub window: TimeSlot,
    pub booked: Vec<BookedSlot>,
}

impl DaySchedule {
    /// 08:00-18:00, the window stamped on a date the first time it is booked.
    pub fn standard_window() -> TimeSlot {
        TimeSlot {
            start: NaiveTime::from_hms_opt(8, 0, 0).expect("valid window start"),
            end: NaiveTime::from_hms_opt(18, 0, 0).expect("valid window end"),
        }
    }

    pub fn is_free(&self, slot: &TimeSlot) -> bool {
        self.booked.iter().all(|entry| !entry.slot.overlaps(slot))
    }

    pub fn jobs(&self) -> usize {
        self.booked.len()
    }

    pub fn booked_minutes(&self) -> i64 {
        self.booked.iter().map(|entry| entry.slot.minutes()).sum()
    }

    /// Append and re-sort by start time. Overlap checking happens before the
    /// insert, under the roster's lock.
    pub(crate) fn insert_sorted(&mut self, entry: BookedSlot) {
        self.booked.push(entry);
        self.booked.sort_by_key(|entry| entry.slot.start);
    }
}

impl Default for DaySchedule {
    fn default() -> Self {
        Self {
            window: Self::standard_window(),
            booked: Vec::new(),
        }
    }
}
