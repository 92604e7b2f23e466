//! Bulk flight import from CSV text.
//!
//! A structurally invalid file (wrong header) aborts the whole batch. Rows
//! are otherwise independent: a row that fails to parse or violates a field
//! constraint is recorded as a line-numbered error and skipped, and the
//! rest of the batch proceeds.

use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use gatewing_core::model::Flight;
use gatewing_inventory::{FlightInventory, InventoryError};
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

pub const EXPECTED_HEADER: [&str; 8] = [
    "FlightNumber",
    "DepartureCountry",
    "DestinationCountry",
    "DepartureDate",
    "DepartureAirport",
    "ArrivalAirport",
    "Price",
    "AvailableSeats",
];

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("unexpected CSV header {found:?}, expected {EXPECTED_HEADER:?}")]
    Header { found: Vec<String> },

    #[error("CSV could not be read: {0}")]
    Csv(#[from] csv::Error),

    /// A storage fault while registering an already-validated row. Not a
    /// row error: the batch cannot continue against a broken store.
    #[error("flight registration failed: {0}")]
    Inventory(#[from] InventoryError),
}

/// Outcome of one import batch. An empty `errors` list means the batch
/// fully succeeded.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub success_count: usize,
    pub imported: Vec<Flight>,
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Validates and stages a batch of flights, committing each valid row
/// through the inventory store's registration.
pub struct FlightImporter {
    inventory: Arc<FlightInventory>,
}

impl FlightImporter {
    pub fn new(inventory: Arc<FlightInventory>) -> Self {
        Self { inventory }
    }

    pub async fn import(&self, csv_text: &str) -> Result<ImportReport, ImportError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_reader(csv_text.as_bytes());

        let headers = reader.headers()?.clone();
        if headers.iter().ne(EXPECTED_HEADER) {
            return Err(ImportError::Header {
                found: headers.iter().map(str::to_string).collect(),
            });
        }

        let mut report = ImportReport::default();

        for (index, record) in reader.records().enumerate() {
            // Header is line 1; the first record is line 2.
            let line = index + 2;

            let record = match record {
                Ok(record) => record,
                Err(err) => {
                    report.errors.push(format!("line {line}: {err}"));
                    continue;
                }
            };

            let flight = match parse_row(&record) {
                Ok(flight) => flight,
                Err(messages) => {
                    for message in messages {
                        report.errors.push(format!("line {line}: {message}"));
                    }
                    continue;
                }
            };

            match self.inventory.register(flight).await {
                Ok(flight) => {
                    report.success_count += 1;
                    report.imported.push(flight);
                }
                Err(InventoryError::Validation(message)) => {
                    report.errors.push(format!("line {line}: {message}"));
                }
                Err(err) => return Err(err.into()),
            }
        }

        if report.errors.is_empty() {
            info!(imported = report.success_count, "flight import completed");
        } else {
            warn!(
                imported = report.success_count,
                failed = report.errors.len(),
                "flight import completed with row errors"
            );
        }

        Ok(report)
    }
}

fn parse_row(record: &StringRecord) -> Result<Flight, Vec<String>> {
    let field = |i: usize| record.get(i).unwrap_or_default();

    let mut errors = Vec::new();

    let departure_at = match NaiveDateTime::parse_from_str(field(3), DATE_FORMAT) {
        Ok(dt) => Some(dt),
        Err(_) => {
            errors.push(format!(
                "DepartureDate {:?} is not a valid yyyy-MM-dd HH:mm timestamp",
                field(3)
            ));
            None
        }
    };

    let price = match Decimal::from_str(field(6)) {
        Ok(price) => Some(price),
        Err(_) => {
            errors.push(format!("Price {:?} is not a valid number", field(6)));
            None
        }
    };

    let seats = match field(7).parse::<u32>() {
        Ok(seats) => Some(seats),
        Err(_) => {
            errors.push(format!(
                "AvailableSeats {:?} is not a valid non-negative integer",
                field(7)
            ));
            None
        }
    };

    let (Some(departure_at), Some(price), Some(seats)) = (departure_at, price, seats) else {
        return Err(errors);
    };

    let flight = Flight::new(
        field(0),
        field(1),
        field(2),
        field(4),
        field(5),
        departure_at,
        price,
        seats,
    );

    let constraint_errors = flight.validation_errors();
    if !constraint_errors.is_empty() {
        return Err(constraint_errors);
    }

    Ok(flight)
}
