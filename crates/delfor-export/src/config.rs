//! Export configuration options

use delfor_model::Dialect;
use serde::{Deserialize, Serialize};

/// Delivery location used by Cummins schedules that name no delivery address
pub const CUMMINS_FALLBACK_LOCATION: &str = "Cummins Inc., 500 Jackson Street, Columbus, IN 47201, USA";

/// Delivery location used by the block dialects when none is given
pub const BLOCK_FALLBACK_LOCATION: &str =
    "XTREME PRESSURE INJECTION JUAREZ, REC LOC 372, EL PASO, 79927";

/// Historical default delivery location of a partner
pub fn default_fallback_location(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::Cummins => CUMMINS_FALLBACK_LOCATION,
        Dialect::Minebea | Dialect::TrwKoblenz => BLOCK_FALLBACK_LOCATION,
    }
}

/// Configuration for writing delivery rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Field delimiter (default: semicolon, which spreadsheet tools in
    /// comma-decimal locales open directly)
    pub delimiter: char,
    /// Whether a header row is written (default: true)
    pub has_header: bool,
    /// Delivery location for schedules without a delivery address
    pub fallback_location: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            has_header: true,
            fallback_location: String::new(),
        }
    }
}

impl ExportConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults plus the partner's historical fallback location
    pub fn for_dialect(dialect: Dialect) -> Self {
        Self::default().fallback_location(default_fallback_location(dialect))
    }

    /// Set the delimiter character
    #[must_use]
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Configure header presence
    #[must_use]
    pub fn has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the fallback delivery location
    #[must_use]
    pub fn fallback_location(mut self, location: impl Into<String>) -> Self {
        self.fallback_location = location.into();
        self
    }

    /// Delimiter as a byte for the csv crate; `None` for non-ASCII characters
    pub fn delimiter_u8(&self) -> Option<u8> {
        u8::try_from(self.delimiter).ok().filter(u8::is_ascii)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExportConfig::default();
        assert_eq!(config.delimiter, ';');
        assert!(config.has_header);
        assert!(config.fallback_location.is_empty());
    }

    #[test]
    fn test_config_builder() {
        let config = ExportConfig::new()
            .delimiter('\t')
            .has_header(false)
            .fallback_location("GATE 9");

        assert_eq!(config.delimiter_u8(), Some(b'\t'));
        assert!(!config.has_header);
        assert_eq!(config.fallback_location, "GATE 9");
    }

    #[test]
    fn test_dialect_fallbacks() {
        assert!(
            ExportConfig::for_dialect(Dialect::Cummins)
                .fallback_location
                .starts_with("Cummins Inc.")
        );
        assert_eq!(
            default_fallback_location(Dialect::TrwKoblenz),
            default_fallback_location(Dialect::Minebea)
        );
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        assert_eq!(ExportConfig::new().delimiter('§').delimiter_u8(), None);
    }
}
