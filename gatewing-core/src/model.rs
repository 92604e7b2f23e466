use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Travel classes sold on every flight
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CabinClass {
    Economy,
    Business,
    FirstClass,
}

impl CabinClass {
    pub const ALL: [CabinClass; 3] = [
        CabinClass::Economy,
        CabinClass::Business,
        CabinClass::FirstClass,
    ];
}

impl fmt::Display for CabinClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CabinClass::Economy => write!(f, "Economy"),
            CabinClass::Business => write!(f, "Business"),
            CabinClass::FirstClass => write!(f, "FirstClass"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown cabin class: {0}")]
pub struct ParseCabinClassError(String);

impl FromStr for CabinClass {
    type Err = ParseCabinClassError;

    /// Class names arrive from operator input and are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(CabinClass::Economy),
            "business" => Ok(CabinClass::Business),
            "firstclass" | "first_class" => Ok(CabinClass::FirstClass),
            other => Err(ParseCabinClassError(other.to_string())),
        }
    }
}

/// A scheduled flight with its remaining seat pool.
///
/// `available_seats` is the authoritative pool and may only be written
/// through the inventory store. The `u32` keeps the count non-negative;
/// there is no capacity ceiling (seats never regenerate beyond what was
/// loaded at registration).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub departure_country: String,
    pub destination_country: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_at: NaiveDateTime,
    pub base_price: Decimal,
    pub available_seats: u32,
}

impl Flight {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        flight_number: impl Into<String>,
        departure_country: impl Into<String>,
        destination_country: impl Into<String>,
        departure_airport: impl Into<String>,
        arrival_airport: impl Into<String>,
        departure_at: NaiveDateTime,
        base_price: Decimal,
        available_seats: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            flight_number: flight_number.into(),
            departure_country: departure_country.into(),
            destination_country: destination_country.into(),
            departure_airport: departure_airport.into(),
            arrival_airport: arrival_airport.into(),
            departure_at,
            base_price,
            available_seats,
        }
    }

    /// Field constraints checked at the registration/import boundary.
    /// Returns one message per violated constraint; empty means valid.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        required_with_max(&mut errors, &self.flight_number, "Flight number", 10);
        required_with_max(&mut errors, &self.departure_country, "Departure country", 50);
        required_with_max(
            &mut errors,
            &self.destination_country,
            "Destination country",
            50,
        );
        required_with_max(&mut errors, &self.departure_airport, "Departure airport", 50);
        required_with_max(&mut errors, &self.arrival_airport, "Arrival airport", 50);

        if self.base_price <= Decimal::ZERO {
            errors.push("Price must be greater than 0".to_string());
        }

        errors
    }
}

fn required_with_max(errors: &mut Vec<String>, value: &str, field: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.push(format!("{field} is required"));
    } else if value.chars().count() > max_len {
        errors.push(format!("{field} cannot exceed {max_len} characters"));
    }
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} to {} - {}",
            self.flight_number,
            self.departure_country,
            self.destination_country,
            self.departure_at.format("%Y-%m-%d %H:%M"),
        )
    }
}

/// A traveller known to the system. The email address is the idempotency
/// key for registration; contact details may be updated later.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub passport_number: String,
    pub email: String,
    pub phone: String,
}

impl Passenger {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        passport_number: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            passport_number: passport_number.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }
}

/// A claim of `seats` against one flight's seat pool.
///
/// `total_price` is computed when the booking is created or modified and
/// frozen afterwards; later price changes on the flight do not reach
/// existing bookings. A cancelled booking is terminal and immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub passenger_id: Uuid,
    pub flight_id: Uuid,
    pub cabin: CabinClass,
    pub seats: u32,
    pub total_price: Decimal,
    pub cancelled: bool,
    pub booked_at: DateTime<Utc>,
}

impl Booking {
    pub fn new(
        passenger_id: Uuid,
        flight_id: Uuid,
        cabin: CabinClass,
        seats: u32,
        total_price: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            passenger_id,
            flight_id,
            cabin,
            seats,
            total_price,
            cancelled: false,
            booked_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn departure() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn cabin_class_parses_case_insensitively() {
        assert_eq!("economy".parse::<CabinClass>().unwrap(), CabinClass::Economy);
        assert_eq!("BUSINESS".parse::<CabinClass>().unwrap(), CabinClass::Business);
        assert_eq!(
            " FirstClass ".parse::<CabinClass>().unwrap(),
            CabinClass::FirstClass
        );
        assert!("premium".parse::<CabinClass>().is_err());
    }

    #[test]
    fn valid_flight_has_no_errors() {
        let flight = Flight::new(
            "GW100",
            "Norway",
            "Japan",
            "OSL",
            "NRT",
            departure(),
            dec!(450.00),
            120,
        );
        assert!(flight.validation_errors().is_empty());
    }

    #[test]
    fn validation_reports_each_violated_field() {
        let mut flight = Flight::new(
            "GW100-OVERLONG-NUMBER",
            "",
            "Japan",
            "OSL",
            "NRT",
            departure(),
            dec!(-10),
            0,
        );
        flight.departure_airport = "x".repeat(51);

        let errors = flight.validation_errors();
        assert!(errors.iter().any(|e| e.contains("Flight number")));
        assert!(errors.iter().any(|e| e.contains("Departure country is required")));
        assert!(errors.iter().any(|e| e.contains("Departure airport")));
        assert!(errors.iter().any(|e| e.contains("Price must be greater than 0")));
        assert_eq!(errors.len(), 4);
    }
}
