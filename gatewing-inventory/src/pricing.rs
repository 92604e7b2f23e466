use gatewing_core::model::{CabinClass, Flight};
use rust_decimal::Decimal;

/// Fixed per-class price multipliers applied to a flight's base price.
pub fn multiplier(cabin: CabinClass) -> Decimal {
    match cabin {
        CabinClass::Economy => Decimal::new(10, 1),    // 1.0
        CabinClass::Business => Decimal::new(25, 1),   // 2.5
        CabinClass::FirstClass => Decimal::new(40, 1), // 4.0
    }
}

/// Per-seat price for one cabin class on a flight.
pub fn price_for(flight: &Flight, cabin: CabinClass) -> Decimal {
    flight.base_price * multiplier(cabin)
}

/// Total price for `seats` seats in `cabin`, computed from the flight's
/// current base price. Bookings freeze this value at creation time.
pub fn quote(flight: &Flight, cabin: CabinClass, seats: u32) -> Decimal {
    price_for(flight, cabin) * Decimal::from(seats)
}
