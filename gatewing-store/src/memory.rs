use async_trait::async_trait;
use gatewing_core::model::{Booking, Flight, Passenger};
use gatewing_core::repository::{
    BookingRepository, FlightRepository, PassengerRepository, RepositoryError,
};
use tokio::sync::RwLock;
use uuid::Uuid;

/// In-memory repositories backing tests and default wiring. Semantics match
/// the JSON snapshot repositories: `update` of an unknown id is an error,
/// `delete` of an unknown id is a no-op.
#[derive(Default)]
pub struct InMemoryFlightRepository {
    flights: RwLock<Vec<Flight>>,
}

impl InMemoryFlightRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightRepository for InMemoryFlightRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Flight>, RepositoryError> {
        Ok(self.flights.read().await.iter().find(|f| f.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Flight>, RepositoryError> {
        Ok(self.flights.read().await.clone())
    }

    async fn add(&self, flight: Flight) -> Result<(), RepositoryError> {
        self.flights.write().await.push(flight);
        Ok(())
    }

    async fn update(&self, flight: Flight) -> Result<(), RepositoryError> {
        let mut flights = self.flights.write().await;
        match flights.iter_mut().find(|f| f.id == flight.id) {
            Some(stored) => {
                *stored = flight;
                Ok(())
            }
            None => Err(RepositoryError::MissingRecord(flight.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.flights.write().await.retain(|f| f.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryPassengerRepository {
    passengers: RwLock<Vec<Passenger>>,
}

impl InMemoryPassengerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PassengerRepository for InMemoryPassengerRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Passenger>, RepositoryError> {
        Ok(self
            .passengers
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<Passenger>, RepositoryError> {
        Ok(self.passengers.read().await.clone())
    }

    async fn add(&self, passenger: Passenger) -> Result<(), RepositoryError> {
        self.passengers.write().await.push(passenger);
        Ok(())
    }

    async fn update(&self, passenger: Passenger) -> Result<(), RepositoryError> {
        let mut passengers = self.passengers.write().await;
        match passengers.iter_mut().find(|p| p.id == passenger.id) {
            Some(stored) => {
                *stored = passenger;
                Ok(())
            }
            None => Err(RepositoryError::MissingRecord(passenger.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.passengers.write().await.retain(|p| p.id != id);
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Passenger>, RepositoryError> {
        let needle = email.trim().to_lowercase();
        Ok(self
            .passengers
            .read()
            .await
            .iter()
            .find(|p| p.email.trim().to_lowercase() == needle)
            .cloned())
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Passenger>, RepositoryError> {
        let needle = phone.trim();
        Ok(self
            .passengers
            .read()
            .await
            .iter()
            .find(|p| p.phone.trim() == needle)
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepositoryError> {
        Ok(self
            .bookings
            .read()
            .await
            .iter()
            .find(|b| b.id == id)
            .cloned())
    }

    async fn get_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        Ok(self.bookings.read().await.clone())
    }

    async fn add(&self, booking: Booking) -> Result<(), RepositoryError> {
        self.bookings.write().await.push(booking);
        Ok(())
    }

    async fn update(&self, booking: Booking) -> Result<(), RepositoryError> {
        let mut bookings = self.bookings.write().await;
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(stored) => {
                *stored = booking;
                Ok(())
            }
            None => Err(RepositoryError::MissingRecord(booking.id)),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        self.bookings.write().await.retain(|b| b.id != id);
        Ok(())
    }
}
