use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::super::domain::{Frequency, ServiceType, TimeOfDay};

/// Per-service-type dollar values, one field per menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceRates {
    pub standard: f64,
    pub deep: f64,
    pub move_in_out: f64,
    pub airbnb: f64,
    pub post_construction: f64,
}

impl ServiceRates {
    pub fn get(&self, service: ServiceType) -> f64 {
        match service {
            ServiceType::Standard => self.standard,
            ServiceType::Deep => self.deep,
            ServiceType::MoveInOut => self.move_in_out,
            ServiceType::Airbnb => self.airbnb,
            ServiceType::PostConstruction => self.post_construction,
        }
    }
}

/// Loyalty discount rates per recurrence choice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrequencyDiscounts {
    pub onetime: f64,
    pub weekly: f64,
    pub biweekly: f64,
    pub monthly: f64,
}

impl FrequencyDiscounts {
    pub fn rate(&self, frequency: Frequency) -> f64 {
        match frequency {
            Frequency::Onetime => self.onetime,
            Frequency::Weekly => self.weekly,
            Frequency::Biweekly => self.biweekly,
            Frequency::Monthly => self.monthly,
        }
    }
}

/// Peak-hours multipliers per time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayPartMultipliers {
    pub morning: f64,
    pub afternoon: f64,
    pub evening: f64,
}

impl DayPartMultipliers {
    fn get(&self, time: TimeOfDay) -> f64 {
        match time {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Afternoon => self.afternoon,
            TimeOfDay::Evening => self.evening,
        }
    }
}

/// Weekday/weekend timing table. Day 0 is Sunday, so 0 and 6 are weekend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingMultipliers {
    pub weekday: DayPartMultipliers,
    pub weekend: DayPartMultipliers,
}

impl TimingMultipliers {
    pub fn multiplier(&self, time: TimeOfDay, day_of_week: u8) -> f64 {
        let parts = if matches!(day_of_week, 0 | 6) {
            &self.weekend
        } else {
            &self.weekday
        };
        parts.get(time)
    }
}

/// The published tariff: every constant the quote calculator consumes.
/// Serde-serializable so operations can load a seasonal override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateCard {
    /// Minimum charge; covers the included room counts and the square-footage
    /// allowance.
    pub base_price: f64,
    pub included_bedrooms: u8,
    pub included_bathrooms: u8,
    pub bedroom_rate: f64,
    pub bathroom_rate: f64,
    /// Square footage included in the base price.
    pub sqft_allowance: u32,
    /// Above this, the marginal sqft rate carries the premium factor.
    pub sqft_premium_threshold: u32,
    pub sqft_premium_factor: f64,
    pub sqft_rates: ServiceRates,
    pub service_multipliers: ServiceRates,
    pub frequency_discounts: FrequencyDiscounts,
    pub timing: TimingMultipliers,
    pub rush_surcharge_rate: f64,
    pub add_ons: BTreeMap<String, f64>,
    pub locations: BTreeMap<String, f64>,
    pub competitor_markups: [f64; 3],
}

impl RateCard {
    /// The tariff published on the marketing site.
    pub fn standard() -> Self {
        let add_ons = BTreeMap::from(
            [
                ("insideFridge", 35.0),
                ("insideOven", 35.0),
                ("insideCabinets", 40.0),
                ("interiorWindows", 45.0),
                ("laundry", 25.0),
                ("dishes", 20.0),
                ("garageSweep", 50.0),
                ("petHairTreatment", 30.0),
            ]
            .map(|(key, price)| (key.to_string(), price)),
        );

        let locations = BTreeMap::from(
            [
                ("downtown-austin", 1.25),
                ("west-lake-hills", 1.20),
                ("tarrytown", 1.15),
                ("round-rock", 1.10),
                ("cedar-park", 1.10),
            ]
            .map(|(key, multiplier)| (key.to_string(), multiplier)),
        );

        Self {
            base_price: 135.0,
            included_bedrooms: 3,
            included_bathrooms: 2,
            bedroom_rate: 25.0,
            bathroom_rate: 20.0,
            sqft_allowance: 1500,
            sqft_premium_threshold: 3000,
            sqft_premium_factor: 1.15,
            sqft_rates: ServiceRates {
                standard: 0.08,
                deep: 0.12,
                move_in_out: 0.14,
                airbnb: 0.07,
                post_construction: 0.18,
            },
            service_multipliers: ServiceRates {
                standard: 1.0,
                deep: 1.5,
                move_in_out: 1.8,
                airbnb: 0.9,
                post_construction: 2.5,
            },
            frequency_discounts: FrequencyDiscounts {
                onetime: 0.0,
                weekly: 0.20,
                biweekly: 0.15,
                monthly: 0.10,
            },
            timing: TimingMultipliers {
                weekday: DayPartMultipliers {
                    morning: 1.0,
                    afternoon: 1.0,
                    evening: 1.10,
                },
                weekend: DayPartMultipliers {
                    morning: 1.15,
                    afternoon: 1.10,
                    evening: 1.20,
                },
            },
            rush_surcharge_rate: 0.25,
            add_ons,
            locations,
            competitor_markups: [1.25, 1.20, 1.15],
        }
    }

    /// Multiplier for a free-form location string; unmatched areas pay 1.0.
    pub fn location_multiplier(&self, location: Option<&str>) -> f64 {
        location
            .map(normalize_location)
            .and_then(|key| self.locations.get(&key).copied())
            .unwrap_or(1.0)
    }

    pub fn add_on_price(&self, id: &str) -> f64 {
        self.add_ons.get(id).copied().unwrap_or(0.0)
    }
}

impl Default for RateCard {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lowercase, collapse whitespace runs to single hyphens.
pub(crate) fn normalize_location(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
