use gatewing_core::model::Passenger;
use gatewing_core::repository::{PassengerRepository, RepositoryError};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("passenger not found: {0}")]
    NotFound(Uuid),

    #[error("passenger validation failed: {0}")]
    Validation(String),

    #[error("passenger storage failed: {0}")]
    Storage(#[from] RepositoryError),
}

/// Resolves passenger identities by id, email, or phone, and registers new
/// passengers. Email is the idempotency key: registering an email that is
/// already known returns the stored passenger unchanged.
pub struct PassengerDirectory {
    passengers: Arc<dyn PassengerRepository>,
}

impl PassengerDirectory {
    pub fn new(passengers: Arc<dyn PassengerRepository>) -> Self {
        Self { passengers }
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Passenger>, DirectoryError> {
        Ok(self.passengers.get(id).await?)
    }

    pub async fn get_all(&self) -> Result<Vec<Passenger>, DirectoryError> {
        Ok(self.passengers.get_all().await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Passenger>, DirectoryError> {
        Ok(self.passengers.find_by_email(email).await?)
    }

    pub async fn find_by_phone(&self, phone: &str) -> Result<Option<Passenger>, DirectoryError> {
        Ok(self.passengers.find_by_phone(phone).await?)
    }

    /// Explicit registration. Fails when the email is already taken; use
    /// `get_or_register` for the idempotent path.
    pub async fn register(&self, passenger: Passenger) -> Result<Passenger, DirectoryError> {
        validate(&passenger)?;

        if self
            .passengers
            .find_by_email(&passenger.email)
            .await?
            .is_some()
        {
            return Err(DirectoryError::Validation(format!(
                "a passenger with email {} already exists",
                passenger.email
            )));
        }

        self.passengers.add(passenger.clone()).await?;
        info!(passenger_id = %passenger.id, "passenger registered");
        Ok(passenger)
    }

    /// Looks the passenger up by email; registers them when absent. A new
    /// registration requires name and phone.
    pub async fn get_or_register(
        &self,
        email: &str,
        name: Option<&str>,
        phone: Option<&str>,
    ) -> Result<Passenger, DirectoryError> {
        if let Some(existing) = self.passengers.find_by_email(email).await? {
            return Ok(existing);
        }

        let (name, phone) = match (name, phone) {
            (Some(n), Some(p)) if !n.trim().is_empty() && !p.trim().is_empty() => (n, p),
            _ => {
                return Err(DirectoryError::Validation(
                    "passenger not found and no details provided to register".to_string(),
                ))
            }
        };

        self.register(Passenger::new(name, "", "", email, phone))
            .await
    }

    /// Contact details are the only mutable part of a passenger record.
    pub async fn update_contact(
        &self,
        id: Uuid,
        email: Option<String>,
        phone: Option<String>,
    ) -> Result<Passenger, DirectoryError> {
        let mut passenger = self
            .passengers
            .get(id)
            .await?
            .ok_or(DirectoryError::NotFound(id))?;

        if let Some(email) = email {
            passenger.email = email;
        }
        if let Some(phone) = phone {
            passenger.phone = phone;
        }
        validate(&passenger)?;

        self.passengers.update(passenger.clone()).await?;
        Ok(passenger)
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), DirectoryError> {
        self.passengers.delete(id).await?;
        Ok(())
    }
}

fn validate(passenger: &Passenger) -> Result<(), DirectoryError> {
    if passenger.first_name.trim().is_empty() {
        return Err(DirectoryError::Validation(
            "passenger name is required".to_string(),
        ));
    }
    let email = passenger.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(DirectoryError::Validation(
            "a valid passenger email is required".to_string(),
        ));
    }
    Ok(())
}
