use crate::collection::JsonCollection;
use async_trait::async_trait;
use gatewing_core::model::Booking;
use gatewing_core::repository::{BookingRepository, RepositoryError};
use std::path::Path;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Booking persistence over a whole-collection JSON snapshot file.
pub struct JsonBookingRepository {
    collection: JsonCollection<Booking>,
    write_lock: Mutex<()>,
}

impl JsonBookingRepository {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            collection: JsonCollection::new(path),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl BookingRepository for JsonBookingRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Booking>, RepositoryError> {
        let bookings = self.collection.load().await?;
        Ok(bookings.into_iter().find(|b| b.id == id))
    }

    async fn get_all(&self) -> Result<Vec<Booking>, RepositoryError> {
        self.collection.load().await
    }

    async fn add(&self, booking: Booking) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut bookings = self.collection.load().await?;
        bookings.push(booking);
        self.collection.save(&bookings).await
    }

    async fn update(&self, booking: Booking) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut bookings = self.collection.load().await?;
        match bookings.iter_mut().find(|b| b.id == booking.id) {
            Some(stored) => *stored = booking,
            None => return Err(RepositoryError::MissingRecord(booking.id)),
        }
        self.collection.save(&bookings).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut bookings = self.collection.load().await?;
        bookings.retain(|b| b.id != id);
        self.collection.save(&bookings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatewing_core::model::CabinClass;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn cancelled_flag_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookings.json");

        let repo = JsonBookingRepository::new(&path);
        let mut booking = Booking::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            CabinClass::Economy,
            2,
            dec!(240),
        );
        repo.add(booking.clone()).await.unwrap();

        booking.cancelled = true;
        repo.update(booking.clone()).await.unwrap();

        let reopened = JsonBookingRepository::new(&path);
        assert!(reopened.get(booking.id).await.unwrap().unwrap().cancelled);
    }
}
