//! EDIFACT syntax definitions and delimiter handling
//!
//! DELFOR files from the supported partners always use the default
//! service characters, so separators are fixed and a leading UNA service
//! string advice is skipped rather than interpreted.

use std::borrow::Cow;

/// Default EDIFACT separators
pub const DEFAULT_COMPONENT_SEPARATOR: u8 = b':';
pub const DEFAULT_ELEMENT_SEPARATOR: u8 = b'+';
pub const DEFAULT_RELEASE_CHARACTER: u8 = b'?';
pub const DEFAULT_SEGMENT_TERMINATOR: u8 = b'\'';

/// Length of a UNA service string advice, terminator included
pub const UNA_LENGTH: usize = 9;

/// Separators used for splitting EDIFACT text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    /// Component separator (default ':')
    pub component: u8,
    /// Element separator (default '+')
    pub element: u8,
    /// Release character (default '?')
    pub release: u8,
    /// Segment terminator (default '\'')
    pub segment: u8,
}

impl Default for Separators {
    fn default() -> Self {
        Self {
            component: DEFAULT_COMPONENT_SEPARATOR,
            element: DEFAULT_ELEMENT_SEPARATOR,
            release: DEFAULT_RELEASE_CHARACTER,
            segment: DEFAULT_SEGMENT_TERMINATOR,
        }
    }
}

impl Separators {
    /// Split `data` on `delimiter`, ignoring delimiters preceded by the
    /// release character. Pieces keep their release characters.
    pub fn split<'a>(&self, data: &'a str, delimiter: u8) -> Vec<&'a str> {
        let mut buffer = SyntaxBuffer::new(data, self.release);
        let mut pieces = Vec::new();
        while let Some(piece) = buffer.read_until(delimiter) {
            pieces.push(piece);
        }
        pieces
    }

    /// Remove release characters, keeping the characters they escape.
    pub fn unescape<'a>(&self, raw: &'a str) -> Cow<'a, str> {
        let release = char::from(self.release);
        if !raw.contains(release) {
            return Cow::Borrowed(raw);
        }

        let mut value = String::with_capacity(raw.len());
        let mut released = false;
        for ch in raw.chars() {
            if released {
                value.push(ch);
                released = false;
            } else if ch == release {
                released = true;
            } else {
                value.push(ch);
            }
        }
        Cow::Owned(value)
    }
}

/// Cursor over EDIFACT text with release character handling.
///
/// All separators are ASCII, so every split point is also a UTF-8 char
/// boundary and the returned pieces are plain `&str` slices.
pub struct SyntaxBuffer<'a> {
    data: &'a str,
    pos: usize,
    release: u8,
    exhausted: bool,
}

impl<'a> SyntaxBuffer<'a> {
    /// Create a buffer over `data`
    pub fn new(data: &'a str, release: u8) -> Self {
        Self {
            data,
            pos: 0,
            release,
            exhausted: false,
        }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if all input has been handed out
    pub fn is_empty(&self) -> bool {
        self.exhausted
    }

    /// Read up to the next unreleased `delimiter` and consume it.
    ///
    /// The remainder after the last delimiter is returned once as a final
    /// (possibly empty) piece; after that `None` is returned.
    pub fn read_until(&mut self, delimiter: u8) -> Option<&'a str> {
        if self.exhausted {
            return None;
        }

        let bytes = self.data.as_bytes();
        let start = self.pos;
        let mut released = false;

        while self.pos < bytes.len() {
            let byte = bytes[self.pos];
            if released {
                released = false;
            } else if byte == self.release {
                released = true;
            } else if byte == delimiter {
                let piece = &self.data[start..self.pos];
                self.pos += 1;
                return Some(piece);
            }
            self.pos += 1;
        }

        self.exhausted = true;
        Some(&self.data[start..])
    }
}
