use gatewing_core::model::Flight;
use gatewing_core::query::FlightQuery;
use gatewing_core::repository::{FlightRepository, RepositoryError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("flight not found: {0}")]
    NotFound(Uuid),

    #[error("insufficient seats: requested {requested}, available {available}")]
    InsufficientSeats { requested: u32, available: u32 },

    #[error("flight validation failed: {0}")]
    Validation(String),

    #[error("flight storage failed: {0}")]
    Storage(#[from] RepositoryError),
}

/// Owns the authoritative available-seat count per flight.
///
/// All seat accounting goes through `reserve` and `release`; both hold a
/// per-flight exclusive lock across the read-check-write sequence so two
/// concurrent callers can never both claim the last seat. No other
/// component writes `available_seats`.
pub struct FlightInventory {
    flights: Arc<dyn FlightRepository>,
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl FlightInventory {
    pub fn new(flights: Arc<dyn FlightRepository>) -> Self {
        Self {
            flights,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, flight_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        // A count of 1 means only the map holds the lock; no caller is in
        // or waiting on its critical section, so the entry can go.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(flight_id).or_default().clone()
    }

    /// Validates field constraints and appends the flight with its declared
    /// seat count as the initial pool.
    pub async fn register(&self, flight: Flight) -> Result<Flight, InventoryError> {
        let errors = flight.validation_errors();
        if !errors.is_empty() {
            return Err(InventoryError::Validation(errors.join("; ")));
        }

        self.flights.add(flight.clone()).await?;
        info!(flight_id = %flight.id, number = %flight.flight_number, seats = flight.available_seats, "flight registered");
        Ok(flight)
    }

    pub async fn get(&self, flight_id: Uuid) -> Result<Option<Flight>, InventoryError> {
        Ok(self.flights.get(flight_id).await?)
    }

    pub async fn get_all(&self) -> Result<Vec<Flight>, InventoryError> {
        Ok(self.flights.get_all().await?)
    }

    /// Updates flight details. The stored seat count is kept as-is: seats
    /// only move through `reserve`/`release`.
    pub async fn update_details(&self, mut flight: Flight) -> Result<(), InventoryError> {
        let lock = self.lock_for(flight.id).await;
        let _guard = lock.lock().await;

        let current = self
            .flights
            .get(flight.id)
            .await?
            .ok_or(InventoryError::NotFound(flight.id))?;
        flight.available_seats = current.available_seats;
        self.flights.update(flight).await?;
        Ok(())
    }

    pub async fn remove(&self, flight_id: Uuid) -> Result<(), InventoryError> {
        self.flights.delete(flight_id).await?;
        Ok(())
    }

    /// Atomically takes `seats` from the flight's pool.
    ///
    /// The check and the decrement happen under the flight's lock; no other
    /// reserve/release on the same flight observes an intermediate state.
    pub async fn reserve(&self, flight_id: Uuid, seats: u32) -> Result<(), InventoryError> {
        let lock = self.lock_for(flight_id).await;
        let _guard = lock.lock().await;

        let mut flight = self
            .flights
            .get(flight_id)
            .await?
            .ok_or(InventoryError::NotFound(flight_id))?;

        if flight.available_seats < seats {
            return Err(InventoryError::InsufficientSeats {
                requested: seats,
                available: flight.available_seats,
            });
        }

        flight.available_seats -= seats;
        let remaining = flight.available_seats;
        self.flights.update(flight).await?;
        debug!(%flight_id, seats, remaining, "seats reserved");
        Ok(())
    }

    /// Returns `seats` to the flight's pool. No upper bound is enforced;
    /// the caller must release exactly once per matching reservation.
    pub async fn release(&self, flight_id: Uuid, seats: u32) -> Result<(), InventoryError> {
        let lock = self.lock_for(flight_id).await;
        let _guard = lock.lock().await;

        let mut flight = self
            .flights
            .get(flight_id)
            .await?
            .ok_or(InventoryError::NotFound(flight_id))?;

        flight.available_seats += seats;
        let remaining = flight.available_seats;
        self.flights.update(flight).await?;
        debug!(%flight_id, seats, remaining, "seats released");
        Ok(())
    }

    /// Read-only flight search. Flights with an empty seat pool are
    /// excluded from every result (class availability is not tracked
    /// separately from the total pool).
    pub async fn search(&self, query: &FlightQuery) -> Result<Vec<Flight>, InventoryError> {
        let flights = self.flights.get_all().await?;
        Ok(flights
            .into_iter()
            .filter(|f| f.available_seats > 0 && query.matches(f))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use gatewing_store::memory::InMemoryFlightRepository;
    use rust_decimal_macros::dec;

    fn inventory() -> FlightInventory {
        FlightInventory::new(Arc::new(InMemoryFlightRepository::new()))
    }

    fn flight(seats: u32) -> Flight {
        Flight::new(
            "GW42",
            "Norway",
            "Japan",
            "OSL",
            "NRT",
            NaiveDateTime::parse_from_str("2026-11-05 09:15", "%Y-%m-%d %H:%M").unwrap(),
            dec!(450),
            seats,
        )
    }

    #[tokio::test]
    async fn register_rejects_invalid_fields() {
        let inventory = inventory();
        let mut bad = flight(10);
        bad.base_price = dec!(0);

        let err = inventory.register(bad).await.unwrap_err();
        assert!(matches!(err, InventoryError::Validation(_)));
        assert!(inventory.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn reserve_decrements_and_rejects_overdraw() {
        let inventory = inventory();
        let flight = inventory.register(flight(5)).await.unwrap();

        inventory.reserve(flight.id, 3).await.unwrap();
        assert_eq!(
            inventory.get(flight.id).await.unwrap().unwrap().available_seats,
            2
        );

        let err = inventory.reserve(flight.id, 3).await.unwrap_err();
        assert!(matches!(
            err,
            InventoryError::InsufficientSeats {
                requested: 3,
                available: 2
            }
        ));
        assert_eq!(
            inventory.get(flight.id).await.unwrap().unwrap().available_seats,
            2
        );
    }

    #[tokio::test]
    async fn reserve_unknown_flight_is_not_found() {
        let inventory = inventory();
        let err = inventory.reserve(Uuid::new_v4(), 1).await.unwrap_err();
        assert!(matches!(err, InventoryError::NotFound(_)));
    }

    #[tokio::test]
    async fn release_has_no_upper_bound() {
        let inventory = inventory();
        let flight = inventory.register(flight(2)).await.unwrap();

        inventory.release(flight.id, 10).await.unwrap();
        assert_eq!(
            inventory.get(flight.id).await.unwrap().unwrap().available_seats,
            12
        );
    }

    #[tokio::test]
    async fn concurrent_reserves_never_oversell() {
        let inventory = Arc::new(inventory());
        let flight = inventory.register(flight(5)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let inventory = Arc::clone(&inventory);
            let flight_id = flight.id;
            handles.push(tokio::spawn(
                async move { inventory.reserve(flight_id, 1).await },
            ));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 5);
        assert_eq!(
            inventory.get(flight.id).await.unwrap().unwrap().available_seats,
            0
        );
    }

    #[tokio::test]
    async fn search_excludes_empty_flights() {
        let inventory = inventory();
        let full = inventory.register(flight(3)).await.unwrap();
        let mut sold_out = flight(1);
        sold_out.flight_number = "GW43".to_string();
        let sold_out = inventory.register(sold_out).await.unwrap();
        inventory.reserve(sold_out.id, 1).await.unwrap();

        let results = inventory.search(&FlightQuery::default()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, full.id);
    }

    #[tokio::test]
    async fn idle_flight_locks_are_pruned() {
        let inventory = inventory();
        let f1 = inventory.register(flight(10)).await.unwrap();
        let mut other = flight(10);
        other.flight_number = "GW44".to_string();
        let f2 = inventory.register(other).await.unwrap();

        inventory.reserve(f1.id, 1).await.unwrap();
        inventory.reserve(f2.id, 1).await.unwrap();

        // The next acquisition sweeps entries no caller still holds.
        inventory.reserve(f1.id, 1).await.unwrap();

        let locks = inventory.locks.lock().await;
        assert_eq!(locks.len(), 1);
        assert!(locks.contains_key(&f1.id));
    }

    #[tokio::test]
    async fn update_details_preserves_seat_pool() {
        let inventory = inventory();
        let registered = inventory.register(flight(8)).await.unwrap();
        inventory.reserve(registered.id, 3).await.unwrap();

        let mut edited = registered.clone();
        edited.base_price = dec!(999);
        edited.available_seats = 1000; // must be ignored
        inventory.update_details(edited).await.unwrap();

        let stored = inventory.get(registered.id).await.unwrap().unwrap();
        assert_eq!(stored.base_price, dec!(999));
        assert_eq!(stored.available_seats, 5);
    }
}
