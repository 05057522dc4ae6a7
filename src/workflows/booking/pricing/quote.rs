use serde::{Deserialize, Serialize};

/// Priced quote with the transparent breakdown shown on the booking form.
/// Dollar totals are whole dollars; breakdown lines are cents-precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Base + rooms + sqft, after the service and location multipliers.
    pub subtotal: f64,
    pub add_ons_total: f64,
    /// Peak-timing and rush charges; never discounted.
    pub surcharge: f64,
    pub discount: f64,
    pub total: f64,
    /// What the recurrence discount saved, for marketing display.
    pub savings: f64,
    pub breakdown: QuoteBreakdown,
}

/// Line items reconstructing how the subtotal and surcharge were built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub base: f64,
    pub rooms: f64,
    pub sqft: f64,
    /// Dollars added by the location multiplier.
    pub location: f64,
    /// Dollars added by timing and rush surcharges.
    pub timing: f64,
}

/// Display-only price anchoring against typical competitor markups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorComparison {
    pub our_price: f64,
    pub competitors: Vec<CompetitorPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorPrice {
    pub tier: String,
    pub price: f64,
}
