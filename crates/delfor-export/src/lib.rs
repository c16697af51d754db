//! # delfor-export
//!
//! Spreadsheet-compatible export of parsed delivery schedules.
//!
//! Rows are sorted by part number and date, annotated with their ISO week
//! and delivery location, and written as delimited text that opens directly
//! in a spreadsheet.
//!
//! ```rust
//! use delfor_export::{DeliveryWriter, ExportConfig, ExportOutcome};
//! use delfor_model::Dialect;
//!
//! let entities = delfor_edifact::parse(
//!     "LIN+1++3965432:IN'SCC+1'QTY+1:120'DTM+2:20240401:102'",
//!     Dialect::Cummins,
//! );
//! let writer = DeliveryWriter::new().with_config(ExportConfig::for_dialect(Dialect::Cummins));
//!
//! let mut output = Vec::new();
//! let outcome = writer.write(&mut output, &entities).unwrap();
//! assert_eq!(outcome, ExportOutcome::Written { rows: 1 });
//! ```

pub mod config;
pub mod errors;
pub mod writer;

pub use config::{ExportConfig, default_fallback_location};
pub use errors::{ExportError, ExportResult};
pub use writer::{DeliveryWriter, ExportOutcome, ExportRow, export_quantity, headers};
