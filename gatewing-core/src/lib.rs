pub mod model;
pub mod query;
pub mod repository;

pub use model::{Booking, CabinClass, Flight, Passenger};
pub use query::{BookingQuery, FlightQuery};
pub use repository::{BookingRepository, FlightRepository, PassengerRepository, RepositoryError};
