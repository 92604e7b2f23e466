pub mod directory;
pub mod ledger;

pub use directory::{DirectoryError, PassengerDirectory};
pub use ledger::{BookingLedger, LedgerError};
