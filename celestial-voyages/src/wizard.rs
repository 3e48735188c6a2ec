//! Five-step booking wizard.
//!
//! The wizard is a plain value: a current [`Step`] plus the accumulated
//! [`Selection`]. Callers hold it between requests and drive it with
//! [`Wizard::advance`] and [`Wizard::back`]. Moving forward is gated by the
//! selection the current step asks for; the final step additionally requires
//! a signed-in traveler and otherwise answers with a login redirect instead of
//! a booking.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{Destination, DestinationType, Id, NewTrip, TripStatus};
use crate::pricing::{validate_travelers, PricingError, Quote};

const BOOKING_PATH: &str = "/booking";
const LOGIN_PATH: &str = "/login";

/// Everything except unreserved URL characters gets escaped in a return URL.
const RETURN_URL_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Step {
    Destination = 1,
    TravelClass = 2,
    Accommodation = 3,
    Experiences = 4,
    Payment = 5,
}

impl Step {
    pub fn next(self) -> Option<Step> {
        match self {
            Step::Destination => Some(Step::TravelClass),
            Step::TravelClass => Some(Step::Accommodation),
            Step::Accommodation => Some(Step::Experiences),
            Step::Experiences => Some(Step::Payment),
            Step::Payment => None,
        }
    }

    pub fn prev(self) -> Option<Step> {
        match self {
            Step::Destination => None,
            Step::TravelClass => Some(Step::Destination),
            Step::Accommodation => Some(Step::TravelClass),
            Step::Experiences => Some(Step::Accommodation),
            Step::Payment => Some(Step::Experiences),
        }
    }
}

impl TryFrom<u8> for Step {
    type Error = WizardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Step::Destination),
            2 => Ok(Step::TravelClass),
            3 => Ok(Step::Accommodation),
            4 => Ok(Step::Experiences),
            5 => Ok(Step::Payment),
            other => Err(WizardError::InvalidStep(other)),
        }
    }
}

impl From<Step> for u8 {
    fn from(step: Step) -> Self {
        step as u8
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    #[default]
    CreditCard,
    Crypto,
    Wire,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selection {
    pub destination_id: Option<Id>,
    pub travel_class_id: Option<Id>,
    pub accommodation_id: Option<Id>,
    pub experience_ids: Vec<Id>,
    pub departure_date: Option<NaiveDate>,
    pub travelers: u32,
    pub contact_name: String,
    pub contact_email: String,
    pub payment_method: PaymentMethod,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            destination_id: None,
            travel_class_id: None,
            accommodation_id: None,
            experience_ids: Vec::new(),
            departure_date: None,
            travelers: 1,
            contact_name: String::new(),
            contact_email: String::new(),
            payment_method: PaymentMethod::default(),
        }
    }
}

impl Selection {
    /// Restores the shareable part of a selection from a booking URL query
    /// (`destination`, `class`, `accommodation`, `travelers`). Unknown keys
    /// and unparsable values are ignored.
    pub fn from_query(query: &str) -> Self {
        let mut selection = Self::default();
        for pair in query.trim_start_matches('?').split('&') {
            let Some((key, raw)) = pair.split_once('=') else {
                continue;
            };
            let value = percent_decode_str(raw).decode_utf8_lossy();
            match key {
                "destination" => selection.destination_id = value.parse().ok(),
                "class" => selection.travel_class_id = value.parse().ok(),
                "accommodation" => selection.accommodation_id = value.parse().ok(),
                "travelers" => {
                    if let Some(travelers) = value
                        .parse::<u32>()
                        .ok()
                        .and_then(|n| validate_travelers(n).ok())
                    {
                        selection.travelers = travelers;
                    }
                }
                _ => {}
            }
        }
        selection
    }

    /// Inverse of [`Selection::from_query`]. A single traveler is implied.
    pub fn to_query(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(id) = self.destination_id {
            pairs.push(format!("destination={id}"));
        }
        if let Some(id) = self.travel_class_id {
            pairs.push(format!("class={id}"));
        }
        if let Some(id) = self.accommodation_id {
            pairs.push(format!("accommodation={id}"));
        }
        if self.travelers > 1 {
            pairs.push(format!("travelers={}", self.travelers));
        }
        pairs.join("&")
    }

    pub fn booking_url(&self) -> String {
        let query = self.to_query();
        if query.is_empty() {
            String::from(BOOKING_PATH)
        } else {
            format!("{BOOKING_PATH}?{query}")
        }
    }

    pub fn login_redirect(&self) -> String {
        let return_url = self.booking_url();
        format!(
            "{LOGIN_PATH}?redirect={}",
            utf8_percent_encode(&return_url, RETURN_URL_ENCODE_SET)
        )
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("Invalid booking step {0}")]
    InvalidStep(u8),
    #[error("Please select a destination")]
    MissingDestination,
    #[error("Please select a departure date")]
    MissingDepartureDate,
    #[error("Please select a travel class")]
    MissingTravelClass,
    #[error("Please select accommodation")]
    MissingAccommodation,
    #[error("Please fill in all required fields")]
    MissingContactDetails,
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Outcome of a successful [`Wizard::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Moved to `step`; `query` reflects the selection for the booking URL.
    Moved { step: Step, query: String },
    /// The payment step was reached without a signed-in traveler.
    LoginRequired { redirect: String },
    /// Every gate passed on the payment step; the trip may be booked.
    Submit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wizard {
    step: Step,
    selection: Selection,
}

impl Wizard {
    pub fn new(selection: Selection) -> Self {
        Self::resume(Step::Destination, selection)
    }

    pub fn resume(step: Step, selection: Selection) -> Self {
        Self { step, selection }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn into_selection(self) -> Selection {
        self.selection
    }

    pub fn advance(&mut self, authenticated: bool) -> Result<Transition, WizardError> {
        let Some(next) = self.step.next() else {
            if !authenticated {
                return Ok(Transition::LoginRequired {
                    redirect: self.selection.login_redirect(),
                });
            }
            self.check_through(Step::Payment)?;
            return Ok(Transition::Submit);
        };

        self.check_through(self.step)?;
        self.step = next;
        Ok(Transition::Moved {
            step: next,
            query: self.selection.to_query(),
        })
    }

    /// Steps back one; the first step stays where it is.
    pub fn back(&mut self) -> Step {
        if let Some(prev) = self.step.prev() {
            self.step = prev;
        }
        self.step
    }

    // The selection arrives from the client on every request, so earlier
    // gates are re-checked rather than trusted.
    fn check_through(&self, step: Step) -> Result<(), WizardError> {
        let selection = &self.selection;
        if selection.destination_id.is_none() {
            return Err(WizardError::MissingDestination);
        }
        if selection.departure_date.is_none() {
            return Err(WizardError::MissingDepartureDate);
        }
        validate_travelers(selection.travelers)?;
        if step >= Step::TravelClass && selection.travel_class_id.is_none() {
            return Err(WizardError::MissingTravelClass);
        }
        if step >= Step::Accommodation && selection.accommodation_id.is_none() {
            return Err(WizardError::MissingAccommodation);
        }
        if step == Step::Payment
            && (selection.contact_name.trim().is_empty()
                || selection.contact_email.trim().is_empty())
        {
            return Err(WizardError::MissingContactDetails);
        }
        Ok(())
    }
}

/// Departure at midnight UTC on the chosen day.
pub fn departure_timestamp(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// The journey returns `duration_days` after departure.
pub fn return_timestamp(departure: DateTime<Utc>, duration_days: u32) -> DateTime<Utc> {
    departure
        .checked_add_days(Days::new(u64::from(duration_days)))
        .unwrap_or(departure)
}

/// Builds the trip record for a selection that passed the payment step.
pub fn trip_draft(
    selection: &Selection,
    user_id: Id,
    destination: &Destination,
    quote: &Quote,
) -> Result<NewTrip, WizardError> {
    let departure_date = selection
        .departure_date
        .map(departure_timestamp)
        .ok_or(WizardError::MissingDepartureDate)?;
    let travel_class_id = selection
        .travel_class_id
        .ok_or(WizardError::MissingTravelClass)?;
    let accommodation_id = selection
        .accommodation_id
        .ok_or(WizardError::MissingAccommodation)?;

    Ok(NewTrip {
        user_id,
        destination_id: destination.id,
        travel_class_id,
        accommodation_id,
        departure_date,
        return_date: return_timestamp(departure_date, destination.duration),
        total_price: quote.total_price,
        status: TripStatus::Booked,
        booked_experiences: selection.experience_ids.clone(),
    })
}

pub const DEPARTURE_OPTION_COUNT: u64 = 5;
const DEPARTURE_SPACING_DAYS: u64 = 14;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartureOption {
    pub date: NaiveDate,
    pub label: String,
}

/// Upcoming launch windows: the first two weeks out, then fortnightly.
pub fn departure_options(kind: DestinationType, today: NaiveDate) -> Vec<DepartureOption> {
    (0..DEPARTURE_OPTION_COUNT)
        .filter_map(|i| {
            let date = today.checked_add_days(Days::new(DEPARTURE_SPACING_DAYS * (i + 1)))?;
            let mission = match kind {
                DestinationType::Orbital => format!("ISS Expedition {}", 70 + i),
                DestinationType::Lunar => format!("Lunar Mission {}", i + 1),
                DestinationType::Planetary => format!("Mars Expedition {}", i + 1),
            };
            Some(DepartureOption {
                date,
                label: format!("{} - {mission}", date.format("%B %-d, %Y")),
            })
        })
        .collect::<Vec<_>>()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::model::DestinationType;
    use crate::pricing::PricingError;

    use super::{
        departure_options, departure_timestamp, return_timestamp, Selection, Step, Transition,
        Wizard, WizardError,
    };

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn complete_selection() -> Selection {
        Selection {
            destination_id: Some(1),
            travel_class_id: Some(2),
            accommodation_id: Some(1),
            experience_ids: vec![1, 2],
            departure_date: Some(date(2026, 11, 1)),
            travelers: 2,
            contact_name: String::from("Ada Lovelace"),
            contact_email: String::from("ada@example.com"),
            ..Selection::default()
        }
    }

    #[test]
    fn walks_forward_through_every_step() {
        let mut wizard = Wizard::new(complete_selection());
        let mut visited = vec![wizard.step()];
        while let Ok(Transition::Moved { step, .. }) = wizard.advance(true) {
            visited.push(step);
        }
        assert_eq!(
            visited,
            vec![
                Step::Destination,
                Step::TravelClass,
                Step::Accommodation,
                Step::Experiences,
                Step::Payment,
            ]
        );
        assert_eq!(wizard.advance(true), Ok(Transition::Submit));
    }

    #[test]
    fn each_step_is_gated_by_its_selection() {
        let mut wizard = Wizard::new(Selection::default());
        assert_eq!(wizard.advance(true), Err(WizardError::MissingDestination));

        let mut wizard = Wizard::new(Selection {
            destination_id: Some(1),
            ..Selection::default()
        });
        assert_eq!(wizard.advance(true), Err(WizardError::MissingDepartureDate));
        assert_eq!(wizard.step(), Step::Destination);

        let mut no_class = complete_selection();
        no_class.travel_class_id = None;
        let mut wizard = Wizard::resume(Step::TravelClass, no_class);
        assert_eq!(wizard.advance(true), Err(WizardError::MissingTravelClass));

        let mut no_stay = complete_selection();
        no_stay.accommodation_id = None;
        let mut wizard = Wizard::resume(Step::Accommodation, no_stay);
        assert_eq!(wizard.advance(true), Err(WizardError::MissingAccommodation));
    }

    #[test]
    fn experiences_step_needs_no_selection() {
        let mut selection = complete_selection();
        selection.experience_ids.clear();
        let mut wizard = Wizard::resume(Step::Experiences, selection);
        assert!(matches!(
            wizard.advance(true),
            Ok(Transition::Moved {
                step: Step::Payment,
                ..
            })
        ));
    }

    #[test]
    fn payment_without_login_redirects_instead_of_submitting() {
        let mut wizard = Wizard::resume(Step::Payment, complete_selection());
        assert_eq!(
            wizard.advance(false),
            Ok(Transition::LoginRequired {
                redirect: String::from(
                    "/login?redirect=%2Fbooking%3Fdestination%3D1%26class%3D2%26accommodation%3D1%26travelers%3D2"
                ),
            })
        );
        assert_eq!(wizard.step(), Step::Payment);
    }

    #[test]
    fn payment_requires_contact_details() {
        let mut selection = complete_selection();
        selection.contact_email = String::from("  ");
        let mut wizard = Wizard::resume(Step::Payment, selection);
        assert_eq!(wizard.advance(true), Err(WizardError::MissingContactDetails));
    }

    #[test]
    fn travelers_are_bounded() {
        let mut selection = complete_selection();
        selection.travelers = 7;
        let mut wizard = Wizard::new(selection);
        assert_eq!(
            wizard.advance(true),
            Err(WizardError::Pricing(PricingError::InvalidTravelers(7)))
        );
    }

    #[test]
    fn back_stops_at_first_step() {
        let mut wizard = Wizard::resume(Step::TravelClass, Selection::default());
        assert_eq!(wizard.back(), Step::Destination);
        assert_eq!(wizard.back(), Step::Destination);
    }

    #[test]
    fn step_numbers_round_trip_and_reject_out_of_range() {
        assert_eq!(Step::try_from(3), Ok(Step::Accommodation));
        assert_eq!(u8::from(Step::Payment), 5);
        assert_eq!(Step::try_from(0), Err(WizardError::InvalidStep(0)));
        assert_eq!(Step::try_from(6), Err(WizardError::InvalidStep(6)));
    }

    #[test]
    fn query_restores_shareable_selection() {
        let selection = Selection::from_query("?destination=2&class=3&accommodation=2&travelers=4");
        assert_eq!(selection.destination_id, Some(2));
        assert_eq!(selection.travel_class_id, Some(3));
        assert_eq!(selection.accommodation_id, Some(2));
        assert_eq!(selection.travelers, 4);
        assert_eq!(
            selection.to_query(),
            "destination=2&class=3&accommodation=2&travelers=4"
        );

        let messy = Selection::from_query("destination=abc&travelers=99&utm=x");
        assert_eq!(messy, Selection::default());
        assert_eq!(messy.booking_url(), "/booking");
    }

    #[test]
    fn return_date_adds_journey_duration() {
        let departure = departure_timestamp(date(2026, 11, 1));
        let back = return_timestamp(departure, 14);
        assert_eq!(back.date_naive(), date(2026, 11, 15));
    }

    #[test]
    fn departure_options_are_fortnightly_with_mission_names() {
        let options = departure_options(DestinationType::Orbital, date(2026, 10, 15));
        assert_eq!(options.len(), 5);
        assert_eq!(options[0].date, date(2026, 10, 29));
        assert_eq!(options[0].label, "October 29, 2026 - ISS Expedition 70");
        assert_eq!(options[4].date, date(2026, 12, 24));

        let lunar = departure_options(DestinationType::Lunar, date(2026, 10, 15));
        assert!(lunar[1].label.ends_with("Lunar Mission 2"));
        let mars = departure_options(DestinationType::Planetary, date(2026, 10, 15));
        assert!(mars[2].label.ends_with("Mars Expedition 3"));
    }
}
