//! Trip price computation.
//!
//! ```text
//! total = (basePrice * priceMultiplier / 100
//!          + pricePerNight * max(duration - 2, 1)
//!          + sum(experience prices)) * travelers
//! ```
//!
//! All intermediate values are kept in hundredths of a dollar so the class
//! multiplier never truncates; the total is rounded half-up to whole dollars
//! once at the end. That keeps the total monotonic in both the traveler count
//! and the multiplier.

use serde::Serialize;
use thiserror::Error;

use crate::model::{Accommodation, Destination, DestinationType, Experience, Id, TravelClass};

pub const MAX_TRAVELERS: u32 = 6;

/// Nights not spent in transit; the first and last day of a journey are travel days.
pub fn stay_nights(duration_days: u32) -> u32 {
    duration_days.saturating_sub(2).max(1)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    #[error("Travelers must be between 1 and {MAX_TRAVELERS}, got {0}")]
    InvalidTravelers(u32),
    #[error("Price calculation overflowed")]
    Overflow,
}

#[derive(Debug, Clone)]
pub struct PriceInputs<'a> {
    pub destination: &'a Destination,
    pub travel_class: &'a TravelClass,
    pub accommodation: Option<&'a Accommodation>,
    pub experiences: Vec<&'a Experience>,
    pub travelers: u32,
}

/// Price breakdown for one selection. Component costs are per traveler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub base_fare: u64,
    pub stay_nights: u32,
    pub accommodation_cost: u64,
    pub experiences_cost: u64,
    pub per_traveler: u64,
    pub travelers: u32,
    pub total_price: u64,
}

impl Quote {
    /// Quote for a selection that has no destination or travel class yet.
    pub fn empty(travelers: u32) -> Self {
        Self {
            travelers,
            ..Self::default()
        }
    }
}

pub fn validate_travelers(travelers: u32) -> Result<u32, PricingError> {
    if (1..=MAX_TRAVELERS).contains(&travelers) {
        Ok(travelers)
    } else {
        Err(PricingError::InvalidTravelers(travelers))
    }
}

pub fn quote(inputs: &PriceInputs<'_>) -> Result<Quote, PricingError> {
    let travelers = validate_travelers(inputs.travelers)?;

    let base_cents = fare_cents(inputs.destination.base_price, inputs.travel_class.price_multiplier)?;

    let nights = stay_nights(inputs.destination.duration);
    let accommodation_cost = match inputs.accommodation {
        Some(accommodation) => accommodation
            .price_per_night
            .checked_mul(u64::from(nights))
            .ok_or(PricingError::Overflow)?,
        None => 0,
    };

    let experiences_cost = inputs
        .experiences
        .iter()
        .try_fold(0_u64, |sum, experience| sum.checked_add(experience.price))
        .ok_or(PricingError::Overflow)?;

    let extras_cents = accommodation_cost
        .checked_add(experiences_cost)
        .and_then(|extras| extras.checked_mul(100))
        .ok_or(PricingError::Overflow)?;
    let per_traveler_cents = base_cents
        .checked_add(extras_cents)
        .ok_or(PricingError::Overflow)?;
    let total_cents = per_traveler_cents
        .checked_mul(u64::from(travelers))
        .ok_or(PricingError::Overflow)?;

    Ok(Quote {
        base_fare: round_cents(base_cents),
        stay_nights: inputs.accommodation.map_or(0, |_| nights),
        accommodation_cost,
        experiences_cost,
        per_traveler: round_cents(per_traveler_cents),
        travelers,
        total_price: round_cents(total_cents),
    })
}

/// Per-traveler fare for a destination in a class, rounded to whole dollars.
pub fn fare(base_price: u64, price_multiplier: u32) -> Result<u64, PricingError> {
    fare_cents(base_price, price_multiplier).map(round_cents)
}

fn fare_cents(base_price: u64, price_multiplier: u32) -> Result<u64, PricingError> {
    base_price
        .checked_mul(u64::from(price_multiplier))
        .ok_or(PricingError::Overflow)
}

fn round_cents(cents: u64) -> u64 {
    cents / 100 + u64::from(cents % 100 >= 50)
}

/// Whole-dollar USD display, e.g. `$1,250,000`.
pub fn format_usd(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    out.push('$');
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassFare {
    pub travel_class_id: Id,
    pub travel_class_name: String,
    pub price: u64,
    pub formatted: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareRow {
    pub destination_id: Id,
    pub destination_name: String,
    #[serde(rename = "type")]
    pub kind: DestinationType,
    pub duration: u32,
    pub distance: u64,
    pub fares: Vec<ClassFare>,
}

/// Destination x travel class comparison table.
pub fn fare_matrix(
    destinations: &[Destination],
    travel_classes: &[TravelClass],
) -> Result<Vec<FareRow>, PricingError> {
    destinations
        .iter()
        .map(|destination| {
            let fares = travel_classes
                .iter()
                .map(|class| {
                    let price = fare(destination.base_price, class.price_multiplier)?;
                    Ok(ClassFare {
                        travel_class_id: class.id,
                        travel_class_name: class.name.clone(),
                        price,
                        formatted: format_usd(price),
                    })
                })
                .collect::<Result<Vec<_>, PricingError>>()?;
            Ok(FareRow {
                destination_id: destination.id,
                destination_name: destination.name.clone(),
                kind: destination.kind,
                duration: destination.duration,
                distance: destination.distance,
                fares,
            })
        })
        .collect::<Result<Vec<_>, PricingError>>()
}

#[cfg(test)]
mod tests {
    use crate::model::{Accommodation, Destination, DestinationType, Experience, TravelClass};

    use super::{
        fare_matrix, format_usd, quote, stay_nights, PriceInputs, PricingError, Quote,
    };

    fn destination(base_price: u64, duration: u32) -> Destination {
        Destination {
            id: 1,
            name: String::from("International Space Station"),
            description: String::new(),
            kind: DestinationType::Orbital,
            image_url: String::new(),
            distance: 420,
            duration,
            base_price,
        }
    }

    fn class(price_multiplier: u32) -> TravelClass {
        TravelClass {
            id: 2,
            name: String::from("Astronaut Class"),
            description: String::new(),
            price_multiplier,
            features: Vec::new(),
        }
    }

    fn hotel(price_per_night: u64) -> Accommodation {
        Accommodation {
            id: 1,
            name: String::from("Aurora Orbital Hotel"),
            description: String::new(),
            destination_id: 1,
            image_url: String::new(),
            capacity: 36,
            size: 400,
            price_per_night,
            amenities: Vec::new(),
        }
    }

    fn experience(id: u64, price: u64) -> Experience {
        Experience {
            id,
            name: String::from("Zero-G Floating"),
            description: String::new(),
            destination_id: 1,
            image_url: String::new(),
            duration: 90,
            price,
        }
    }

    #[test]
    fn stay_nights_subtracts_transit_days_with_floor_of_one() {
        assert_eq!(stay_nights(10), 8);
        assert_eq!(stay_nights(180), 178);
        assert_eq!(stay_nights(3), 1);
        assert_eq!(stay_nights(2), 1);
        assert_eq!(stay_nights(0), 1);
    }

    #[test]
    fn quote_combines_fare_stay_and_experiences() {
        let destination = destination(58_000, 10);
        let class = class(150);
        let hotel = hotel(12_500);
        let zero_g = experience(1, 8_500);
        let walk = experience(2, 25_000);

        let quote = quote(&PriceInputs {
            destination: &destination,
            travel_class: &class,
            accommodation: Some(&hotel),
            experiences: vec![&zero_g, &walk],
            travelers: 2,
        });

        assert_eq!(
            quote,
            Ok(Quote {
                base_fare: 87_000,
                stay_nights: 8,
                accommodation_cost: 100_000,
                experiences_cost: 33_500,
                per_traveler: 220_500,
                travelers: 2,
                total_price: 441_000,
            })
        );
    }

    #[test]
    fn zero_experiences_cost_nothing() {
        let destination = destination(58_000, 10);
        let class = class(100);
        let quote = quote(&PriceInputs {
            destination: &destination,
            travel_class: &class,
            accommodation: None,
            experiences: Vec::new(),
            travelers: 1,
        });

        let quote = quote.unwrap_or_default();
        assert_eq!(quote.experiences_cost, 0);
        assert_eq!(quote.accommodation_cost, 0);
        assert_eq!(quote.total_price, 58_000);
    }

    #[test]
    fn fractional_fares_round_half_up_once() {
        let destination = destination(12_345, 10);
        let class = class(150);
        let one = quote(&PriceInputs {
            destination: &destination,
            travel_class: &class,
            accommodation: None,
            experiences: Vec::new(),
            travelers: 1,
        })
        .map(|q| q.total_price);
        let two = quote(&PriceInputs {
            destination: &destination,
            travel_class: &class,
            accommodation: None,
            experiences: Vec::new(),
            travelers: 2,
        })
        .map(|q| q.total_price);

        assert_eq!(one, Ok(18_518));
        assert_eq!(two, Ok(37_035));
    }

    #[test]
    fn total_is_monotonic_in_travelers() {
        let destination = destination(125_000, 14);
        let class = class(150);
        let hotel = hotel(18_000);
        let rover = experience(3, 15_000);

        let totals = (1..=6)
            .map(|travelers| {
                quote(&PriceInputs {
                    destination: &destination,
                    travel_class: &class,
                    accommodation: Some(&hotel),
                    experiences: vec![&rover],
                    travelers,
                })
                .map(|q| q.total_price)
                .unwrap_or_default()
            })
            .collect::<Vec<_>>();

        assert!(totals.windows(2).all(|pair| pair[0] < pair[1]), "{totals:?}");
    }

    #[test]
    fn total_is_monotonic_in_price_multiplier() {
        let destination = destination(350_000, 180);
        let hotel = hotel(26_000);

        let totals = [50, 100, 150, 175, 250]
            .into_iter()
            .map(|multiplier| {
                let class = class(multiplier);
                quote(&PriceInputs {
                    destination: &destination,
                    travel_class: &class,
                    accommodation: Some(&hotel),
                    experiences: Vec::new(),
                    travelers: 3,
                })
                .map(|q| q.total_price)
                .unwrap_or_default()
            })
            .collect::<Vec<_>>();

        assert!(totals.windows(2).all(|pair| pair[0] < pair[1]), "{totals:?}");
    }

    #[test]
    fn travelers_outside_allowed_range_are_rejected() {
        let destination = destination(58_000, 10);
        let class = class(100);
        for travelers in [0, 7] {
            let result = quote(&PriceInputs {
                destination: &destination,
                travel_class: &class,
                accommodation: None,
                experiences: Vec::new(),
                travelers,
            });
            assert_eq!(result, Err(PricingError::InvalidTravelers(travelers)));
        }
    }

    #[test]
    fn overflow_is_reported() {
        let destination = destination(u64::MAX / 2, 10);
        let class = class(250);
        let result = quote(&PriceInputs {
            destination: &destination,
            travel_class: &class,
            accommodation: None,
            experiences: Vec::new(),
            travelers: 1,
        });
        assert_eq!(result, Err(PricingError::Overflow));
    }

    #[test]
    fn format_usd_groups_thousands() {
        assert_eq!(format_usd(0), "$0");
        assert_eq!(format_usd(999), "$999");
        assert_eq!(format_usd(1_000), "$1,000");
        assert_eq!(format_usd(87_000), "$87,000");
        assert_eq!(format_usd(1_250_000), "$1,250,000");
    }

    #[test]
    fn fare_matrix_has_one_fare_per_class() {
        let destinations = vec![destination(58_000, 10), destination(125_000, 14)];
        let classes = vec![class(100), class(250)];

        let rows = fare_matrix(&destinations, &classes).unwrap_or_default();
        assert_eq!(rows.len(), 2);
        let prices = rows[1].fares.iter().map(|f| f.price).collect::<Vec<_>>();
        assert_eq!(prices, vec![125_000, 312_500]);
        assert_eq!(rows[1].fares[1].formatted, "$312,500");
    }
}
