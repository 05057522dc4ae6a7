mod quote;
mod rates;

pub use quote::{CompetitorComparison, CompetitorPrice, Quote, QuoteBreakdown};
pub use rates::{
    DayPartMultipliers, FrequencyDiscounts, RateCard, ServiceRates, TimingMultipliers,
};

use super::domain::QuoteRequest;

const COMPETITOR_TIERS: [&str; 3] = ["Premium franchise", "National chain", "Local average"];

/// Stateless calculator applying the published tariff to a quote request.
/// Pure and infallible: every input degrades to a priced quote.
pub struct QuoteEngine {
    rates: RateCard,
}

impl QuoteEngine {
    pub fn new(rates: RateCard) -> Self {
        Self { rates }
    }

    pub fn rates(&self) -> &RateCard {
        &self.rates
    }

    /// Price a booking. Internal arithmetic stays unrounded; only the
    /// returned figures are rounded (totals to dollars, lines to cents).
    pub fn quote(&self, request: &QuoteRequest) -> Quote {
        let rates = &self.rates;

        let sqft_charge = self.sqft_charge(request);
        let room_charge = self.room_charge(request);

        let pre_multiplier = rates.base_price + sqft_charge + room_charge;
        let service_adjusted = pre_multiplier * rates.service_multipliers.get(request.service_type);
        let subtotal = service_adjusted * rates.location_multiplier(request.location.as_deref());

        // Surcharges accumulate against the post-location subtotal and are
        // never re-multiplied or discounted.
        let mut surcharge = 0.0;
        if let (Some(time), Some(day)) = (request.time_of_day, request.day_of_week) {
            surcharge += subtotal * (rates.timing.multiplier(time, day) - 1.0);
        }
        if request.rush_service {
            surcharge += subtotal * rates.rush_surcharge_rate;
        }

        let add_ons_total: f64 = request
            .add_ons
            .iter()
            .map(|id| rates.add_on_price(id))
            .sum();

        let discount =
            (subtotal + add_ons_total) * rates.frequency_discounts.rate(request.frequency);

        let pre_discount = subtotal + add_ons_total + surcharge;
        let total = (pre_discount - discount).round();
        let savings = (pre_discount - total).round();

        Quote {
            subtotal: round_cents(subtotal),
            add_ons_total: round_cents(add_ons_total),
            surcharge: round_cents(surcharge),
            discount: round_cents(discount),
            total,
            savings,
            breakdown: QuoteBreakdown {
                base: round_cents(rates.base_price),
                rooms: round_cents(room_charge),
                sqft: round_cents(sqft_charge),
                location: round_cents(subtotal - service_adjusted),
                timing: round_cents(surcharge),
            },
        }
    }

    /// Anchor the quoted total against typical competitor markups.
    pub fn competitor_comparison(&self, total: f64) -> CompetitorComparison {
        let competitors = self
            .rates
            .competitor_markups
            .iter()
            .zip(COMPETITOR_TIERS)
            .map(|(markup, tier)| CompetitorPrice {
                tier: tier.to_string(),
                price: (total * markup).round(),
            })
            .collect();

        CompetitorComparison {
            our_price: total,
            competitors,
        }
    }

    /// Two-tier progressive overage: the band between the allowance and the
    /// premium threshold bills at the service rate, footage past the
    /// threshold at rate * premium factor. No cliff at the boundary.
    fn sqft_charge(&self, request: &QuoteRequest) -> f64 {
        let rates = &self.rates;
        if request.square_feet <= rates.sqft_allowance {
            return 0.0;
        }

        let rate = rates.sqft_rates.get(request.service_type);
        let standard_band = request
            .square_feet
            .min(rates.sqft_premium_threshold)
            .saturating_sub(rates.sqft_allowance) as f64;
        let premium_band = request
            .square_feet
            .saturating_sub(rates.sqft_premium_threshold) as f64;

        standard_band * rate + premium_band * rate * rates.sqft_premium_factor
    }

    fn room_charge(&self, request: &QuoteRequest) -> f64 {
        let rates = &self.rates;
        let extra_bedrooms = request.bedrooms.saturating_sub(rates.included_bedrooms) as f64;
        let extra_bathrooms = request.bathrooms.saturating_sub(rates.included_bathrooms) as f64;
        extra_bedrooms * rates.bedroom_rate + extra_bathrooms * rates.bathroom_rate
    }
}

impl Default for QuoteEngine {
    fn default() -> Self {
        Self::new(RateCard::standard())
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::super::domain::{Frequency, ServiceType, TimeOfDay};
    use super::*;

    fn request() -> QuoteRequest {
        QuoteRequest {
            bedrooms: 3,
            bathrooms: 2,
            square_feet: 1500,
            service_type: ServiceType::Standard,
            frequency: Frequency::Onetime,
            add_ons: Vec::new(),
            location: None,
            time_of_day: None,
            day_of_week: None,
            rush_service: false,
        }
    }

    #[test]
    fn included_property_prices_at_the_base() {
        let engine = QuoteEngine::default();
        let quote = engine.quote(&request());
        assert_eq!(quote.total, 135.0);
        assert_eq!(quote.breakdown.rooms, 0.0);
        assert_eq!(quote.breakdown.sqft, 0.0);
    }

    #[test]
    fn sqft_premium_band_applies_only_past_the_threshold() {
        let engine = QuoteEngine::default();
        let mut big = request();
        big.square_feet = 3500;
        let quote = engine.quote(&big);
        // (3000-1500)*0.08 + 500*0.08*1.15
        assert_eq!(quote.breakdown.sqft, 166.0);
    }

    #[test]
    fn room_charges_start_beyond_the_included_counts() {
        let engine = QuoteEngine::default();
        let mut roomy = request();
        roomy.bedrooms = 5;
        roomy.bathrooms = 3;
        let quote = engine.quote(&roomy);
        assert_eq!(quote.breakdown.rooms, 2.0 * 25.0 + 20.0);
    }

    #[test]
    fn rush_and_timing_surcharges_stack_additively() {
        let engine = QuoteEngine::default();
        let mut rushed = request();
        rushed.time_of_day = Some(TimeOfDay::Evening);
        rushed.day_of_week = Some(6);
        rushed.rush_service = true;
        let quote = engine.quote(&rushed);
        // weekend evening 1.20 => +20%, rush => +25%, both of the subtotal
        assert_eq!(quote.surcharge, round_cents(135.0 * 0.45));
        assert_eq!(quote.breakdown.timing, quote.surcharge);
    }

    #[test]
    fn timing_surcharge_needs_both_time_and_day() {
        let engine = QuoteEngine::default();
        let mut partial = request();
        partial.time_of_day = Some(TimeOfDay::Evening);
        let quote = engine.quote(&partial);
        assert_eq!(quote.surcharge, 0.0);
    }

    #[test]
    fn competitor_comparison_applies_fixed_markups() {
        let engine = QuoteEngine::default();
        let comparison = engine.competitor_comparison(200.0);
        assert_eq!(comparison.our_price, 200.0);
        let prices: Vec<f64> = comparison
            .competitors
            .iter()
            .map(|entry| entry.price)
            .collect();
        assert_eq!(prices, vec![250.0, 240.0, 230.0]);
    }
}
