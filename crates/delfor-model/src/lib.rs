#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]

//! # delfor-model
//!
//! Entity store for DELFOR delivery schedules.
//!
//! The parser in `delfor-edifact` fills an [`Entities`] value per
//! interchange: header attributes, trading partners, line items and the
//! delivery schedule rows. Exporters and reports only ever read it.

/// Trading-partner message dialects.
pub mod dialect;
/// Header, partner, line item and delivery row types.
pub mod entities;
/// Aggregate statistics over delivery rows.
pub mod summary;

pub use dialect::Dialect;
pub use entities::{DeliveryKey, DeliverySchedule, Entities, HeaderInfo, LineItem, PartnerInfo, PartyRole};
pub use summary::{Bucket, Summary};

use thiserror::Error;

/// Errors that can occur when working with the model
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unknown dialect '{name}', expected one of: {expected}")]
    UnknownDialect { name: String, expected: String },
}

impl Error {
    /// Build an unknown-dialect error listing the accepted names.
    pub fn unknown_dialect(name: impl Into<String>) -> Self {
        let expected = Dialect::ALL
            .iter()
            .map(|d| d.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self::UnknownDialect {
            name: name.into(),
            expected,
        }
    }
}

/// Crate-local result type for model operations.
pub type Result<T> = std::result::Result<T, Error>;
