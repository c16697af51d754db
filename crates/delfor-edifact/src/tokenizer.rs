//! Segment tokenizer
//!
//! Splits a raw interchange into segment strings on the segment
//! terminator. Pieces are trimmed, empty pieces are dropped, and the
//! input order is kept. Nothing here can fail: garbage in simply
//! yields fewer or odd-looking segments for the strategies to skip.

use crate::syntax::{Separators, UNA_LENGTH};
use tracing::trace;

/// Splits interchange text into segments
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    separators: Separators,
}

impl Tokenizer {
    /// Create a tokenizer with the default separators
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tokenizer with explicit separators
    pub fn with_separators(separators: Separators) -> Self {
        Self { separators }
    }

    /// Tokenize interchange text into trimmed, non-empty segment strings
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let body = skip_service_string_advice(text.trim_start());

        let segments: Vec<&str> = self
            .separators
            .split(body, self.separators.segment)
            .into_iter()
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .collect();

        trace!(segment_count = segments.len(), "Tokenized interchange");
        segments
    }
}

/// Tokenize with the default separators
pub fn tokenize(text: &str) -> Vec<&str> {
    Tokenizer::new().tokenize(text)
}

fn skip_service_string_advice(text: &str) -> &str {
    if text.starts_with("UNA") {
        if let Some(rest) = text.get(UNA_LENGTH..) {
            return rest;
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_empty_segments() {
        assert_eq!(tokenize("A'B''C'"), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_trims_line_breaks() {
        let text = "UNB+UNOA:3+S+R'\r\n  BGM+241+4711'\n\nUNZ+1+1'\n";
        assert_eq!(tokenize(text), vec!["UNB+UNOA:3+S+R", "BGM+241+4711", "UNZ+1+1"]);
    }

    #[test]
    fn test_keeps_released_terminator() {
        assert_eq!(
            tokenize("NAD+CN+1+O?'Brien'LIN+1"),
            vec!["NAD+CN+1+O?'Brien", "LIN+1"]
        );
    }

    #[test]
    fn test_skips_una_service_string() {
        let text = "UNA:+.? 'UNB+UNOC:3+SENDER'";
        assert_eq!(tokenize(text), vec!["UNB+UNOC:3+SENDER"]);
    }

    #[test]
    fn test_missing_final_terminator() {
        assert_eq!(tokenize("A'B"), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n ' '' ").is_empty());
    }
}
