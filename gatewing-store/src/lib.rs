pub mod app_config;
pub mod booking_repo;
pub mod flight_repo;
pub mod memory;
pub mod passenger_repo;

mod collection;

pub use booking_repo::JsonBookingRepository;
pub use flight_repo::JsonFlightRepository;
pub use memory::{InMemoryBookingRepository, InMemoryFlightRepository, InMemoryPassengerRepository};
pub use passenger_repo::JsonPassengerRepository;
