use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for bookings coming in from the intake funnel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BookingId(pub String);

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable identifier for a roster entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkerId(pub String);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Five-digit postal code identifying a service area.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Zone(pub String);

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The service menu offered by the booking funnel. Wire names match the
/// intake form exactly.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum ServiceType {
    Standard,
    Deep,
    MoveInOut,
    Airbnb,
    PostConstruction,
}

impl ServiceType {
    /// Skill tag a crew member must carry to take this job type.
    pub const fn skill_tag(self) -> &'static str {
        match self {
            ServiceType::Standard => "standard",
            ServiceType::Deep => "deep",
            ServiceType::MoveInOut => "move_in_out",
            ServiceType::Airbnb => "airbnb",
            ServiceType::PostConstruction => "post_construction",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ServiceType::Standard => "standard clean",
            ServiceType::Deep => "deep clean",
            ServiceType::MoveInOut => "move in/out clean",
            ServiceType::Airbnb => "airbnb turnover",
            ServiceType::PostConstruction => "post-construction clean",
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "standard" => Ok(ServiceType::Standard),
            "deep" => Ok(ServiceType::Deep),
            "moveInOut" | "move_in_out" | "move-in-out" => Ok(ServiceType::MoveInOut),
            "airbnb" => Ok(ServiceType::Airbnb),
            "postConstruction" | "post_construction" | "post-construction" => {
                Ok(ServiceType::PostConstruction)
            }
            other => Err(format!("unknown service type '{other}'")),
        }
    }
}

/// Recurrence chosen at checkout; drives the loyalty discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Onetime,
    Weekly,
    Biweekly,
    Monthly,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "onetime" | "one-time" => Ok(Frequency::Onetime),
            "weekly" => Ok(Frequency::Weekly),
            "biweekly" => Ok(Frequency::Biweekly),
            "monthly" => Ok(Frequency::Monthly),
            other => Err(format!("unknown frequency '{other}'")),
        }
    }
}

/// Time-of-day bucket used by the peak-hours surcharge table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl FromStr for TimeOfDay {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "morning" => Ok(TimeOfDay::Morning),
            "afternoon" => Ok(TimeOfDay::Afternoon),
            "evening" => Ok(TimeOfDay::Evening),
            other => Err(format!("unknown time of day '{other}'")),
        }
    }
}

/// Everything the quote calculator needs about a property and the requested
/// service. Unrecognized add-on identifiers and locations are allowed and
/// priced at zero / multiplier 1.0; the closed enums are validated at the
/// serde boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub bedrooms: u8,
    pub bathrooms: u8,
    pub square_feet: u32,
    pub service_type: ServiceType,
    pub frequency: Frequency,
    #[serde(default)]
    pub add_ons: Vec<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub time_of_day: Option<TimeOfDay>,
    /// 0 = Sunday .. 6 = Saturday, matching the intake form's day picker.
    #[serde(default)]
    pub day_of_week: Option<u8>,
    #[serde(default)]
    pub rush_service: bool,
}

pub const DEFAULT_DURATION_HOURS: f32 = 3.0;

/// Booking descriptor handed to the dispatcher. Pricing never sees this; the
/// two components are called independently by the intake layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub booking_id: BookingId,
    pub address: String,
    pub service_type: ServiceType,
    pub service_date: NaiveDate,
    #[serde(with = "hhmm")]
    pub service_time: NaiveTime,
    #[serde(default)]
    pub duration_hours: Option<f32>,
}

impl BookingRequest {
    pub fn duration_minutes(&self) -> i64 {
        let hours = self.duration_hours.unwrap_or(DEFAULT_DURATION_HOURS);
        (hours * 60.0).round() as i64
    }
}

/// Serde helpers for the `HH:MM` clock strings used throughout the booking
/// wire format.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Pull the first 5-digit postal code out of a free-form address. `None`
/// means zone filtering is skipped entirely, not that the address is bad.
pub fn extract_zone(address: &str) -> Option<Zone> {
    static ZIP: OnceLock<Regex> = OnceLock::new();
    let pattern = ZIP.get_or_init(|| Regex::new(r"\b(\d{5})\b").expect("zip pattern compiles"));
    pattern
        .find(address)
        .map(|found| Zone(found.as_str().to_string()))
}
