use crate::directory::{DirectoryError, PassengerDirectory};
use gatewing_core::model::{Booking, CabinClass, Flight};
use gatewing_core::query::BookingQuery;
use gatewing_core::repository::{BookingRepository, RepositoryError};
use gatewing_inventory::{pricing, FlightInventory, InventoryError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("flight not found: {0}")]
    FlightNotFound(Uuid),

    #[error("passenger not found: {0}")]
    PassengerNotFound(Uuid),

    #[error("booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("booking already cancelled: {0}")]
    AlreadyCancelled(Uuid),

    #[error("seat count must be at least 1")]
    InvalidSeatCount,

    #[error("insufficient seats: requested {requested}, available {available}")]
    InsufficientSeats { requested: u32, available: u32 },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("booking storage failed: {0}")]
    Storage(#[from] RepositoryError),
}

impl From<InventoryError> for LedgerError {
    fn from(err: InventoryError) -> Self {
        match err {
            InventoryError::NotFound(id) => LedgerError::FlightNotFound(id),
            InventoryError::InsufficientSeats {
                requested,
                available,
            } => LedgerError::InsufficientSeats {
                requested,
                available,
            },
            InventoryError::Validation(msg) => LedgerError::Validation(msg),
            InventoryError::Storage(err) => LedgerError::Storage(err),
        }
    }
}

impl From<DirectoryError> for LedgerError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::NotFound(id) => LedgerError::PassengerNotFound(id),
            DirectoryError::Validation(msg) => LedgerError::Validation(msg),
            DirectoryError::Storage(err) => LedgerError::Storage(err),
        }
    }
}

/// Orchestrates booking create/modify/cancel against the seat pool.
///
/// A booking is only persisted once its seats have been taken from the
/// inventory, and seats taken for a request that then fails storage are
/// always given back. Mutations of one booking are serialized through a
/// per-booking lock; operations on different bookings run concurrently.
pub struct BookingLedger {
    bookings: Arc<dyn BookingRepository>,
    inventory: Arc<FlightInventory>,
    directory: Arc<PassengerDirectory>,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl BookingLedger {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        inventory: Arc<FlightInventory>,
        directory: Arc<PassengerDirectory>,
    ) -> Self {
        Self {
            bookings,
            inventory,
            directory,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, booking_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        // A count of 1 means only the map holds the lock; no caller is in
        // or waiting on its critical section, so the entry can go.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(booking_id).or_default().clone()
    }

    /// Creates a booking, claiming `seats` from the flight's pool.
    ///
    /// Seats are reserved before the booking is persisted; if persisting
    /// fails the reservation is rolled back so no seats are stranded.
    pub async fn create_booking(
        &self,
        passenger_id: Uuid,
        flight_id: Uuid,
        cabin: CabinClass,
        seats: u32,
    ) -> Result<Booking, LedgerError> {
        self.directory
            .get(passenger_id)
            .await?
            .ok_or(LedgerError::PassengerNotFound(passenger_id))?;

        if seats == 0 {
            return Err(LedgerError::InvalidSeatCount);
        }

        let flight = self
            .inventory
            .get(flight_id)
            .await?
            .ok_or(LedgerError::FlightNotFound(flight_id))?;

        let total_price = pricing::quote(&flight, cabin, seats);

        self.inventory.reserve(flight_id, seats).await?;

        let booking = Booking::new(passenger_id, flight_id, cabin, seats, total_price);
        if let Err(err) = self.bookings.add(booking.clone()).await {
            if let Err(release_err) = self.inventory.release(flight_id, seats).await {
                error!(%flight_id, seats, %release_err, "failed to roll back reservation after storage fault");
            }
            return Err(err.into());
        }

        info!(booking_id = %booking.id, %flight_id, seats, %total_price, "booking created");
        Ok(booking)
    }

    /// Cancels a booking and returns its seats to the pool exactly once.
    /// Cancelling an unknown or already-cancelled booking is a reported,
    /// non-fatal failure that changes no state.
    pub async fn cancel_booking(&self, booking_id: Uuid) -> Result<Booking, LedgerError> {
        let lock = self.lock_for(booking_id).await;
        let _guard = lock.lock().await;

        let mut booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or(LedgerError::BookingNotFound(booking_id))?;

        if booking.cancelled {
            return Err(LedgerError::AlreadyCancelled(booking_id));
        }

        // Persist the cancelled flag before releasing: the flag is what
        // guards against a second release of the same seats.
        booking.cancelled = true;
        self.bookings.update(booking.clone()).await?;
        self.inventory
            .release(booking.flight_id, booking.seats)
            .await?;

        info!(%booking_id, flight_id = %booking.flight_id, seats = booking.seats, "booking cancelled");
        Ok(booking)
    }

    /// Changes a booking's cabin class and seat count.
    ///
    /// Growth reserves only the delta, and does so before the booking is
    /// touched, so a failed reservation leaves everything unchanged.
    /// Shrink releases the surplus only after the updated booking has been
    /// persisted, so the visible pool never overstates availability.
    /// The total price is recomputed from the flight's current pricing.
    pub async fn modify_booking(
        &self,
        booking_id: Uuid,
        new_cabin: CabinClass,
        new_seats: u32,
    ) -> Result<Booking, LedgerError> {
        if new_seats == 0 {
            return Err(LedgerError::InvalidSeatCount);
        }

        let lock = self.lock_for(booking_id).await;
        let _guard = lock.lock().await;

        let mut booking = self
            .bookings
            .get(booking_id)
            .await?
            .ok_or(LedgerError::BookingNotFound(booking_id))?;

        if booking.cancelled {
            return Err(LedgerError::AlreadyCancelled(booking_id));
        }

        let flight = self
            .inventory
            .get(booking.flight_id)
            .await?
            .ok_or(LedgerError::FlightNotFound(booking.flight_id))?;

        let old_seats = booking.seats;
        if new_seats > old_seats {
            self.inventory
                .reserve(booking.flight_id, new_seats - old_seats)
                .await?;
        }

        booking.cabin = new_cabin;
        booking.seats = new_seats;
        booking.total_price = pricing::quote(&flight, new_cabin, new_seats);

        if let Err(err) = self.bookings.update(booking.clone()).await {
            if new_seats > old_seats {
                if let Err(release_err) = self
                    .inventory
                    .release(booking.flight_id, new_seats - old_seats)
                    .await
                {
                    error!(%booking_id, %release_err, "failed to roll back reservation after storage fault");
                }
            }
            return Err(err.into());
        }

        if new_seats < old_seats {
            self.inventory
                .release(booking.flight_id, old_seats - new_seats)
                .await?;
        }

        info!(%booking_id, seats = new_seats, cabin = %new_cabin, "booking modified");
        Ok(booking)
    }

    pub async fn get_booking(&self, booking_id: Uuid) -> Result<Option<Booking>, LedgerError> {
        Ok(self.bookings.get(booking_id).await?)
    }

    pub async fn all_bookings(&self) -> Result<Vec<Booking>, LedgerError> {
        Ok(self.bookings.get_all().await?)
    }

    pub async fn bookings_for_passenger(
        &self,
        passenger_id: Uuid,
    ) -> Result<Vec<Booking>, LedgerError> {
        let bookings = self.bookings.get_all().await?;
        Ok(bookings
            .into_iter()
            .filter(|b| b.passenger_id == passenger_id)
            .collect())
    }

    /// Pure read: joins each non-cancelled booking to its flight and
    /// applies all supplied filters. Store iteration order is kept.
    pub async fn search_bookings(&self, query: &BookingQuery) -> Result<Vec<Booking>, LedgerError> {
        let bookings = self.bookings.get_all().await?;
        let flights: HashMap<Uuid, Flight> = self
            .inventory
            .get_all()
            .await?
            .into_iter()
            .map(|f| (f.id, f))
            .collect();

        Ok(bookings
            .into_iter()
            .filter(|b| {
                flights
                    .get(&b.flight_id)
                    .map_or(false, |f| query.matches(b, f))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use gatewing_core::model::{Flight, Passenger};
    use gatewing_store::memory::{
        InMemoryBookingRepository, InMemoryFlightRepository, InMemoryPassengerRepository,
    };
    use rust_decimal_macros::dec;

    async fn ledger_with_booking() -> (BookingLedger, Booking) {
        let inventory = Arc::new(FlightInventory::new(Arc::new(
            InMemoryFlightRepository::new(),
        )));
        let directory = Arc::new(PassengerDirectory::new(Arc::new(
            InMemoryPassengerRepository::new(),
        )));

        let flight = inventory
            .register(Flight::new(
                "GW7",
                "Norway",
                "Denmark",
                "OSL",
                "CPH",
                NaiveDateTime::parse_from_str("2026-05-10 12:00", "%Y-%m-%d %H:%M").unwrap(),
                dec!(80),
                10,
            ))
            .await
            .unwrap();
        let passenger = directory
            .register(Passenger::new(
                "Kai",
                "Holm",
                "K1",
                "kai@example.com",
                "+45 1",
            ))
            .await
            .unwrap();

        let ledger = BookingLedger::new(
            Arc::new(InMemoryBookingRepository::new()),
            inventory,
            directory,
        );
        let booking = ledger
            .create_booking(passenger.id, flight.id, CabinClass::Economy, 2)
            .await
            .unwrap();
        (ledger, booking)
    }

    #[tokio::test]
    async fn idle_booking_locks_are_pruned() {
        let (ledger, booking) = ledger_with_booking().await;

        ledger
            .modify_booking(booking.id, CabinClass::Economy, 3)
            .await
            .unwrap();
        // The next acquisition sweeps entries no caller still holds.
        ledger.cancel_booking(booking.id).await.unwrap();

        let locks = ledger.locks.lock().await;
        assert_eq!(locks.len(), 1);
        assert!(locks.contains_key(&booking.id));
    }
}
