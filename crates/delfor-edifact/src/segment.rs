//! Segment classification
//!
//! A segment is split on the element separator into fields. Field 0 is
//! the tag, so `field(1)` is the first data element, matching the way
//! segment layouts are usually written down (`QTY+113:250:PCE` has the
//! quantity composite in field 1). Absent fields read as empty strings;
//! callers check [`Segment::has_fields`] before relying on a position.

use crate::syntax::Separators;

/// A classified EDIFACT segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Segment tag, e.g. `QTY`
    pub tag: String,
    /// Raw fields with release characters intact; field 0 is the tag
    fields: Vec<String>,
    /// Zero-based index of the segment in the interchange
    pub index: usize,
    separators: Separators,
}

impl Segment {
    /// Classify one segment string. Never fails.
    pub fn classify(raw: &str, index: usize, separators: Separators) -> Self {
        let fields: Vec<String> = separators
            .split(raw, separators.element)
            .into_iter()
            .map(str::to_string)
            .collect();
        let tag = fields
            .first()
            .map(|tag| separators.unescape(tag.trim()).into_owned())
            .unwrap_or_default();

        Self {
            tag,
            fields,
            index,
            separators,
        }
    }

    /// Classify with the default separators
    pub fn parse(raw: &str) -> Self {
        Self::classify(raw, 0, Separators::default())
    }

    /// Whether this segment has the given tag
    pub fn is(&self, tag: &str) -> bool {
        self.tag == tag
    }

    /// Number of fields, tag included
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Whether at least `count` fields (tag included) are present
    pub fn has_fields(&self, count: usize) -> bool {
        self.fields.len() >= count
    }

    /// Raw field text, release characters intact; empty when absent
    pub fn raw_field(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", String::as_str)
    }

    /// Field value with release characters removed; empty when absent
    pub fn field(&self, index: usize) -> String {
        self.separators.unescape(self.raw_field(index)).into_owned()
    }

    /// Fields from `start` onwards, unescaped
    pub fn fields_from(&self, start: usize) -> Vec<String> {
        (start..self.fields.len()).map(|i| self.field(i)).collect()
    }

    /// Whether a field holds more than one component
    pub fn is_composite(&self, index: usize) -> bool {
        self.component_count(index) > 1
    }

    /// Number of components in a field (an absent field has one empty component)
    pub fn component_count(&self, index: usize) -> usize {
        self.separators
            .split(self.raw_field(index), self.separators.component)
            .len()
    }

    /// Components of a field, unescaped
    pub fn components(&self, index: usize) -> Vec<String> {
        self.separators
            .split(self.raw_field(index), self.separators.component)
            .into_iter()
            .map(|c| self.separators.unescape(c).into_owned())
            .collect()
    }

    /// One component of a field; empty when absent
    pub fn component(&self, index: usize, component: usize) -> String {
        self.components(index)
            .into_iter()
            .nth(component)
            .unwrap_or_default()
    }

    /// First component of field 1, the qualifier of most DELFOR segments
    pub fn qualifier(&self) -> String {
        self.component(1, 0)
    }

    /// Text of a field after skipping up to `max_leading` empty leading
    /// components, with the remaining components run together.
    ///
    /// `IMD+F++:::BRAKE CALIPER` yields `BRAKE CALIPER` for field 3.
    pub fn free_text(&self, index: usize, max_leading: usize) -> String {
        let components = self.components(index);
        let leading = components
            .iter()
            .take(max_leading)
            .take_while(|c| c.is_empty())
            .count();
        components[leading..].concat().trim().to_string()
    }
}

/// Tokenize and classify a whole interchange
pub fn classify_all(text: &str, separators: Separators) -> Vec<Segment> {
    crate::tokenizer::Tokenizer::with_separators(separators)
        .tokenize(text)
        .into_iter()
        .enumerate()
        .map(|(index, raw)| Segment::classify(raw, index, separators))
        .collect()
}
