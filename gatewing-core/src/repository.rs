use crate::model::{Booking, Flight, Passenger};
use async_trait::async_trait;
use uuid::Uuid;

/// Failures surfaced by a persistence collaborator. These are storage
/// faults, not domain outcomes; callers that already reserved inventory
/// must compensate before re-raising one of these.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored collection could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no stored record with id {0}")]
    MissingRecord(Uuid),
}

/// Flight persistence. Writes replace the whole stored collection; no
/// partial-write visibility is assumed by callers.
#[async_trait]
pub trait FlightRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Flight>, RepositoryError>;
    async fn get_all(&self) -> Result<Vec<Flight>, RepositoryError>;
    async fn add(&self, flight: Flight) -> Result<(), RepositoryError>;
    async fn update(&self, flight: Flight) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

/// Passenger persistence, with the email/phone lookups the directory needs.
#[async_trait]
pub trait PassengerRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Passenger>, RepositoryError>;
    async fn get_all(&self) -> Result<Vec<Passenger>, RepositoryError>;
    async fn add(&self, passenger: Passenger) -> Result<(), RepositoryError>;
    async fn update(&self, passenger: Passenger) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Passenger>, RepositoryError>;
    async fn find_by_phone(&self, phone: &str) -> Result<Option<Passenger>, RepositoryError>;
}

/// Booking persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepositoryError>;
    async fn get_all(&self) -> Result<Vec<Booking>, RepositoryError>;
    async fn add(&self, booking: Booking) -> Result<(), RepositoryError>;
    async fn update(&self, booking: Booking) -> Result<(), RepositoryError>;
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
