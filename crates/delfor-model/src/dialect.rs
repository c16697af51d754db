//! Trading-partner dialect identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A partner-specific flavour of DELFOR.
///
/// Every partner sends the same segment vocabulary but orders and
/// qualifies it differently, so each one gets its own parsing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dialect {
    /// Schedule-driven messages: SCC blocks of QTY segments resolved by DTM+2.
    Cummins,
    /// Fixed QTY+113 / SCC / DTM+63 / DTM+64 blocks, deduplicated.
    Minebea,
    /// Fixed QTY+113 blocks like Minebea, without deduplication.
    #[serde(alias = "trw", alias = "trwkob")]
    TrwKoblenz,
}

impl Dialect {
    /// All supported dialects, in display order.
    pub const ALL: [Dialect; 3] = [Dialect::Cummins, Dialect::Minebea, Dialect::TrwKoblenz];

    /// Canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Cummins => "cummins",
            Dialect::Minebea => "minebea",
            Dialect::TrwKoblenz => "trw-koblenz",
        }
    }

    /// Whether delivery rows of this dialect carry part numbers.
    pub fn has_part_numbers(self) -> bool {
        matches!(self, Dialect::Cummins)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cummins" => Ok(Dialect::Cummins),
            "minebea" => Ok(Dialect::Minebea),
            "trw-koblenz" | "trw" | "trwkob" | "trw_koblenz" => Ok(Dialect::TrwKoblenz),
            _ => Err(crate::Error::unknown_dialect(s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialect_names() {
        assert_eq!("cummins".parse::<Dialect>().unwrap(), Dialect::Cummins);
        assert_eq!("MINEBEA".parse::<Dialect>().unwrap(), Dialect::Minebea);
        assert_eq!("trwkob".parse::<Dialect>().unwrap(), Dialect::TrwKoblenz);
        assert_eq!(" trw ".parse::<Dialect>().unwrap(), Dialect::TrwKoblenz);
    }

    #[test]
    fn test_unknown_dialect_lists_expected_names() {
        let err = "bosch".parse::<Dialect>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("bosch"));
        assert!(message.contains("cummins, minebea, trw-koblenz"));
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for dialect in Dialect::ALL {
            assert_eq!(dialect.to_string().parse::<Dialect>().unwrap(), dialect);
        }
    }

    #[test]
    fn test_serde_uses_kebab_case_and_aliases() {
        let json = serde_json::to_string(&Dialect::TrwKoblenz).unwrap();
        assert_eq!(json, "\"trw-koblenz\"");
        let parsed: Dialect = serde_json::from_str("\"trw\"").unwrap();
        assert_eq!(parsed, Dialect::TrwKoblenz);
    }
}
