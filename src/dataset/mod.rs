//! Venue dataset module
//!
//! Reads the recintos CSV file on demand and turns it into JSON-ready records:
//! - header names are trimmed (and de-duplicated)
//! - rows lacking any required coordinate column are dropped
//! - missing-value markers become `null`
//!
//! Nothing is cached: every call re-reads the backing file.

mod error;
mod reader;
mod record;

pub use error::DatasetError;
pub use reader::{load_dataset, read_dataset, Dataset, ReadOptions, DEFAULT_NA_VALUES};
pub use record::{FieldValue, VenueRecord};
