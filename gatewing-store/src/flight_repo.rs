use crate::collection::JsonCollection;
use async_trait::async_trait;
use gatewing_core::model::Flight;
use gatewing_core::repository::{FlightRepository, RepositoryError};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Flight persistence over a whole-collection JSON snapshot file.
///
/// A mutation lock serializes load-mutate-save sequences within this
/// process; without it two writers could base their snapshots on the same
/// loaded state and lose one of the writes.
pub struct JsonFlightRepository {
    collection: JsonCollection<Flight>,
    write_lock: Mutex<()>,
}

impl JsonFlightRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            collection: JsonCollection::new(path),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl FlightRepository for JsonFlightRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Flight>, RepositoryError> {
        let flights = self.collection.load().await?;
        Ok(flights.into_iter().find(|f| f.id == id))
    }

    async fn get_all(&self) -> Result<Vec<Flight>, RepositoryError> {
        self.collection.load().await
    }

    async fn add(&self, flight: Flight) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut flights = self.collection.load().await?;
        flights.push(flight);
        self.collection.save(&flights).await
    }

    async fn update(&self, flight: Flight) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut flights = self.collection.load().await?;
        match flights.iter_mut().find(|f| f.id == flight.id) {
            Some(stored) => *stored = flight,
            None => return Err(RepositoryError::MissingRecord(flight.id)),
        }
        self.collection.save(&flights).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut flights = self.collection.load().await?;
        flights.retain(|f| f.id != id);
        self.collection.save(&flights).await
    }
}
