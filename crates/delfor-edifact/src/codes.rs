//! Code translation tables
//!
//! Short DELFOR codes are rendered as readable labels. Unknown codes are
//! never dropped: each list has an explicit fallback that keeps the raw
//! code visible in the output.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Scheduling condition: firm delivery
pub const SCC_FIRM: &str = "1";
/// Scheduling condition: forecast
pub const SCC_FORECAST: &str = "4";
/// Scheduling condition: backlog
pub const SCC_BACKLOG: &str = "10";

/// Quantity qualifier used by the fixed delivery blocks
pub const QTY_TO_BE_DELIVERED: &str = "113";

/// What to render for a code missing from the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fallback {
    /// The raw code itself
    Raw,
    /// `"<prefix>: <raw>"`
    Labeled(String),
}

/// A lookup table from codes to labels
#[derive(Debug, Clone)]
pub struct CodeList {
    /// Name/identifier of the code list
    pub name: String,
    entries: HashMap<String, String>,
    /// Label used for an empty code, if any
    empty_label: Option<String>,
    fallback: Fallback,
}

impl CodeList {
    /// Create an empty code list that renders unknown codes raw
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
            empty_label: None,
            fallback: Fallback::Raw,
        }
    }

    /// Add a code and its label
    #[must_use]
    pub fn with_entry(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.entries.insert(code.into(), label.into());
        self
    }

    /// Set the label for an empty code
    #[must_use]
    pub fn with_empty_label(mut self, label: impl Into<String>) -> Self {
        self.empty_label = Some(label.into());
        self
    }

    /// Set the unknown-code policy
    #[must_use]
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Check if a code has a label of its own
    pub fn contains(&self, code: &str) -> bool {
        self.entries.contains_key(code.trim())
    }

    /// Label for a code, applying the fallback policy for unknown codes
    pub fn describe(&self, code: &str) -> String {
        let code = code.trim();
        if let Some(label) = self.entries.get(code) {
            return label.clone();
        }
        if code.is_empty() {
            if let Some(label) = &self.empty_label {
                return label.clone();
            }
        }
        match &self.fallback {
            Fallback::Raw => code.to_string(),
            Fallback::Labeled(prefix) => format!("{prefix}: {code}"),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Quantity qualifiers (UN/EDIFACT 6063, DELFOR subset)
pub static QUANTITY_TYPES: LazyLock<CodeList> = LazyLock::new(|| {
    CodeList::new("quantity-type")
        .with_entry("1", "Discrete quantity")
        .with_entry("3", "Cumulative quantity")
        .with_entry("12", "Despatch quantity")
        .with_entry("48", "Planned quantity")
        .with_entry("70", "Cumulative quantity received")
        .with_entry(QTY_TO_BE_DELIVERED, "Quantity to be delivered")
});

/// Scheduling conditions (UN/EDIFACT 4017, DELFOR subset)
pub static SCHEDULING_CONDITIONS: LazyLock<CodeList> = LazyLock::new(|| {
    CodeList::new("scheduling-condition")
        .with_entry(SCC_FIRM, "Firm")
        .with_entry(SCC_FORECAST, "Forecast")
        .with_entry(SCC_BACKLOG, "Backlog")
        .with_empty_label("Unknown")
        .with_fallback(Fallback::Labeled("Unknown code".to_string()))
});

/// Label for a quantity qualifier; unknown qualifiers pass through raw
pub fn describe_quantity_type(code: &str) -> String {
    QUANTITY_TYPES.describe(code)
}

/// Label for a scheduling condition; unknown codes are labeled
pub fn describe_condition(code: &str) -> String {
    SCHEDULING_CONDITIONS.describe(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_conditions() {
        assert_eq!(describe_condition("1"), "Firm");
        assert_eq!(describe_condition("4"), "Forecast");
        assert_eq!(describe_condition(" 10 "), "Backlog");
    }

    #[test]
    fn test_unknown_condition_keeps_code() {
        let label = describe_condition("99");
        assert_eq!(label, "Unknown code: 99");
        assert!(label.contains("99"));
        assert_eq!(describe_condition(""), "Unknown");
    }

    #[test]
    fn test_quantity_types_pass_unknown_through() {
        assert_eq!(describe_quantity_type("113"), "Quantity to be delivered");
        assert_eq!(describe_quantity_type("3"), "Cumulative quantity");
        assert_eq!(describe_quantity_type("79"), "79");
    }

    #[test]
    fn test_code_list_builder() {
        let list = CodeList::new("test")
            .with_entry("A", "Alpha")
            .with_entry("B", "Beta")
            .with_fallback(Fallback::Labeled("Other".to_string()));

        assert_eq!(list.len(), 2);
        assert!(list.contains("A"));
        assert!(!list.contains("C"));
        assert_eq!(list.describe("C"), "Other: C");
        assert_eq!(list.describe(""), "Other: ");
    }
}
