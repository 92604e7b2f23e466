use crate::model::{Booking, CabinClass, Flight};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Multi-criteria flight filter. Unset fields impose no constraint.
///
/// Country and airport filters are case-insensitive substring matches;
/// the date filter matches the calendar day of departure.
#[derive(Debug, Clone, Default)]
pub struct FlightQuery {
    pub departure_country: Option<String>,
    pub destination_country: Option<String>,
    pub departure_date: Option<NaiveDate>,
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    pub max_price: Option<Decimal>,
    /// Requested cabin class. Seat availability is tracked as a single
    /// pool per flight, not per class, so this field narrows nothing
    /// beyond the open-seats floor callers already apply; it is carried
    /// so a request can state the class it intends to book.
    pub cabin: Option<CabinClass>,
}

impl FlightQuery {
    pub fn matches(&self, flight: &Flight) -> bool {
        optional_contains(&self.departure_country, &flight.departure_country)
            && optional_contains(&self.destination_country, &flight.destination_country)
            && optional_contains(&self.departure_airport, &flight.departure_airport)
            && optional_contains(&self.arrival_airport, &flight.arrival_airport)
            && self
                .departure_date
                .map_or(true, |d| flight.departure_at.date() == d)
            && self.max_price.map_or(true, |p| flight.base_price <= p)
    }
}

/// Multi-criteria booking filter, evaluated against a booking joined to
/// its flight. Cancelled bookings never match.
#[derive(Debug, Clone, Default)]
pub struct BookingQuery {
    pub flight_id: Option<Uuid>,
    pub passenger_id: Option<Uuid>,
    pub max_price: Option<Decimal>,
    pub cabin: Option<CabinClass>,
    pub departure_country: Option<String>,
    pub destination_country: Option<String>,
    pub departure_airport: Option<String>,
    pub arrival_airport: Option<String>,
    pub departure_date: Option<NaiveDate>,
}

impl BookingQuery {
    pub fn matches(&self, booking: &Booking, flight: &Flight) -> bool {
        !booking.cancelled
            && self.flight_id.map_or(true, |id| booking.flight_id == id)
            && self.passenger_id.map_or(true, |id| booking.passenger_id == id)
            && self.max_price.map_or(true, |p| booking.total_price <= p)
            && self.cabin.map_or(true, |c| booking.cabin == c)
            && optional_contains(&self.departure_country, &flight.departure_country)
            && optional_contains(&self.destination_country, &flight.destination_country)
            && optional_contains(&self.departure_airport, &flight.departure_airport)
            && optional_contains(&self.arrival_airport, &flight.arrival_airport)
            && self
                .departure_date
                .map_or(true, |d| flight.departure_at.date() == d)
    }
}

fn optional_contains(needle: &Option<String>, haystack: &str) -> bool {
    match needle {
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use rust_decimal_macros::dec;

    fn flight() -> Flight {
        Flight::new(
            "GW204",
            "United Kingdom",
            "Spain",
            "LHR",
            "MAD",
            NaiveDateTime::parse_from_str("2026-09-15 14:00", "%Y-%m-%d %H:%M").unwrap(),
            dec!(89.99),
            40,
        )
    }

    #[test]
    fn empty_query_matches_everything() {
        assert!(FlightQuery::default().matches(&flight()));
    }

    #[test]
    fn country_filter_is_case_insensitive_substring() {
        let query = FlightQuery {
            departure_country: Some("kingdom".to_string()),
            ..Default::default()
        };
        assert!(query.matches(&flight()));

        let query = FlightQuery {
            departure_country: Some("france".to_string()),
            ..Default::default()
        };
        assert!(!query.matches(&flight()));
    }

    #[test]
    fn date_filter_matches_calendar_day() {
        let query = FlightQuery {
            departure_date: NaiveDate::from_ymd_opt(2026, 9, 15),
            ..Default::default()
        };
        assert!(query.matches(&flight()));

        let query = FlightQuery {
            departure_date: NaiveDate::from_ymd_opt(2026, 9, 16),
            ..Default::default()
        };
        assert!(!query.matches(&flight()));
    }

    #[test]
    fn max_price_is_inclusive() {
        let query = FlightQuery {
            max_price: Some(dec!(89.99)),
            ..Default::default()
        };
        assert!(query.matches(&flight()));

        let query = FlightQuery {
            max_price: Some(dec!(89.98)),
            ..Default::default()
        };
        assert!(!query.matches(&flight()));
    }

    #[test]
    fn cancelled_booking_never_matches() {
        let flight = flight();
        let mut booking =
            Booking::new(Uuid::new_v4(), flight.id, CabinClass::Economy, 2, dec!(179.98));
        assert!(BookingQuery::default().matches(&booking, &flight));

        booking.cancelled = true;
        assert!(!BookingQuery::default().matches(&booking, &flight));
    }

    #[test]
    fn booking_filters_combine_over_booking_and_flight() {
        let flight = flight();
        let booking =
            Booking::new(Uuid::new_v4(), flight.id, CabinClass::Business, 1, dec!(224.98));

        let query = BookingQuery {
            flight_id: Some(flight.id),
            cabin: Some(CabinClass::Business),
            destination_country: Some("SPAIN".to_string()),
            max_price: Some(dec!(300)),
            ..Default::default()
        };
        assert!(query.matches(&booking, &flight));

        let query = BookingQuery {
            cabin: Some(CabinClass::Economy),
            ..Default::default()
        };
        assert!(!query.matches(&booking, &flight));
    }
}
