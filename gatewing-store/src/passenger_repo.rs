use crate::collection::JsonCollection;
use async_trait::async_trait;
use gatewing_core::model::Passenger;
use gatewing_core::repository::{PassengerRepository, RepositoryError};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Passenger persistence over a whole-collection JSON snapshot file.
pub struct JsonPassengerRepository {
    collection: JsonCollection<Passenger>,
    write_lock: Mutex<()>,
}

impl JsonPassengerRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            collection: JsonCollection::new(path),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl PassengerRepository for JsonPassengerRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Passenger>, RepositoryError> {
        let passengers = self.collection.load().await?;
        Ok(passengers.into_iter().find(|p| p.id == id))
    }

    async fn get_all(&self) -> Result<Vec<Passenger>, RepositoryError> {
        self.collection.load().await
    }

    async fn add(&self, passenger: Passenger) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut passengers = self.collection.load().await?;
        passengers.push(passenger);
        self.collection.save(&passengers).await
    }

    async fn update(&self, passenger: Passenger) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut passengers = self.collection.load().await?;
        match passengers.iter_mut().find(|p| p.id == passenger.id) {
            Some(stored) => *stored = passenger,
            None => return Err(RepositoryError::MissingRecord(passenger.id)),
        }
        self.collection.save(&passengers).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut passengers = self.collection.load().await?;
        passengers.retain(|p| p.id != id);
        self.collection.save(&passengers).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Passenger>, RepositoryError> {
        let needle = email.trim().to_lowercase();
        let passengers = self.collection.load().await?;
        Ok(passengers
            .into_iter()
            .find(|p| p.email.trim().to_lowercase() == needle))
    }

    async fn find_by_phone(&self, phone: &str) -> Result<Option<Passenger>, RepositoryError> {
        let needle = phone.trim().to_string();
        let passengers = self.collection.load().await?;
        Ok(passengers.into_iter().find(|p| p.phone.trim() == needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lookups_work_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passengers.json");

        let repo = JsonPassengerRepository::new(&path);
        let p = Passenger::new("Grace", "Hopper", "P7654321", "grace@navy.mil", "+1 555 0100");
        repo.add(p.clone()).await.unwrap();

        let reopened = JsonPassengerRepository::new(&path);
        assert_eq!(
            reopened
                .find_by_email(" GRACE@navy.mil ")
                .await
                .unwrap()
                .unwrap()
                .id,
            p.id
        );
        assert_eq!(
            reopened
                .find_by_phone("+1 555 0100")
                .await
                .unwrap()
                .unwrap()
                .id,
            p.id
        );
    }
}
