//! # delfor-edifact
//!
//! DELFOR parsing engine.
//!
//! Raw interchange text is split into segments, each segment is classified
//! by tag, and a partner-specific [`PartnerStrategy`] reduces the segment
//! stream into [`delfor_model::Entities`]. Parsing is best-effort: short
//! segments, unknown codes and unreadable dates degrade gracefully and
//! never abort a parse. Only reading the input can fail.
//!
//! ```rust
//! use delfor_edifact::parse;
//! use delfor_model::Dialect;
//!
//! let entities = parse(
//!     "LIN+1++3965432:IN'SCC+1'QTY+1:120'DTM+2:20240401:102'",
//!     Dialect::Cummins,
//! );
//! assert_eq!(entities.deliveries[0].date, "01.04.2024");
//! ```

pub mod codes;
pub mod dates;
pub mod dialect;
pub mod segment;
pub mod syntax;
pub mod tokenizer;

pub use dates::{NormalizedDate, WeekNumber, iso_week, normalize_date};
pub use dialect::{PartnerStrategy, strategy_for};
pub use segment::Segment;
pub use syntax::Separators;
pub use tokenizer::{Tokenizer, tokenize};

use delfor_model::{Dialect, Entities};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading DELFOR interchanges
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot read interchange '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Parser bound to one dialect
#[derive(Debug, Clone, Copy)]
pub struct DelforParser {
    dialect: Dialect,
    separators: Separators,
}

impl DelforParser {
    /// Create a parser for a dialect with the default separators
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            separators: Separators::default(),
        }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Parse interchange text. Every call starts from an empty entity set.
    pub fn parse(&self, text: &str) -> Entities {
        let segments = segment::classify_all(text, self.separators);
        debug!(
            dialect = %self.dialect,
            segments = segments.len(),
            "Parsing DELFOR interchange"
        );
        strategy_for(self.dialect).parse_segments(&segments)
    }

    /// Parse raw bytes, replacing invalid UTF-8 sequences
    pub fn parse_bytes(&self, data: &[u8]) -> Entities {
        self.parse(&String::from_utf8_lossy(data))
    }

    /// Read and parse an interchange file
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Entities> {
        let text = read_interchange(path)?;
        Ok(self.parse(&text))
    }
}

/// Parse interchange text for a dialect
pub fn parse(text: &str, dialect: Dialect) -> Entities {
    DelforParser::new(dialect).parse(text)
}

/// Read an interchange file as text, replacing invalid UTF-8 sequences
pub fn read_interchange(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(decode_interchange(&data))
}

/// Decode interchange bytes, replacing invalid UTF-8 sequences
pub fn decode_interchange(data: &[u8]) -> String {
    String::from_utf8_lossy(data).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_idempotent() {
        let text = "UNB+UNOC:3+S+R+240315:0930+1'LIN+1++P:IN'SCC+4'QTY+1:5'DTM+2:20240401:102'";
        let parser = DelforParser::new(Dialect::Cummins);
        assert_eq!(parser.parse(text), parser.parse(text));
    }

    #[test]
    fn test_parse_bytes_replaces_invalid_utf8() {
        let mut data = b"NAD+SU+1++ACME ".to_vec();
        data.push(0xFF);
        data.extend_from_slice(b"'");
        let entities = DelforParser::new(Dialect::Cummins).parse_bytes(&data);
        let supplier = entities.partners.get(delfor_model::PartyRole::Supplier).unwrap();
        assert!(supplier.starts_with("ACME"));
        assert!(supplier.contains('\u{FFFD}'));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_interchange("/definitely/not/here.edi").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.edi"));
    }
}
