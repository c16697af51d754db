//! Entities produced by a single parse
#![allow(clippy::must_use_candidate)] // Accessors are obvious at call sites.

use crate::dialect::Dialect;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Interchange and message header attributes.
///
/// Each interchange carries one header, so repeated header segments simply
/// overwrite earlier values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderInfo {
    /// Interchange sender identification (UNB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,

    /// Interchange recipient identification (UNB)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_code: Option<String>,

    /// Recipient display name, resolved from the seller party
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,

    /// Interchange preparation date/time, normalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interchange_timestamp: Option<String>,

    /// Message reference number (UNH)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,

    /// Document number (BGM)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_number: Option<String>,

    /// Document date (DTM+137), normalized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_date: Option<String>,

    /// Line item number for single-item messages (LIN)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_item_number: Option<String>,

    /// Product identification for single-item messages (PIA)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_code: Option<String>,
}

/// Role a trading partner plays in the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Buyer,
    Seller,
    Supplier,
    ShipTo,
    DeliveryAddress,
}

impl PartyRole {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PartyRole::Buyer => "Buyer",
            PartyRole::Seller => "Seller",
            PartyRole::Supplier => "Supplier",
            PartyRole::ShipTo => "Ship to",
            PartyRole::DeliveryAddress => "Delivery address",
        }
    }
}

/// Trading partners keyed by role; one entry per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartnerInfo {
    parties: BTreeMap<PartyRole, String>,
}

impl PartnerInfo {
    /// Create an empty partner set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display string for a role, replacing any earlier value
    pub fn set(&mut self, role: PartyRole, display: impl Into<String>) {
        self.parties.insert(role, display.into());
    }

    /// Get the display string for a role
    pub fn get(&self, role: PartyRole) -> Option<&str> {
        self.parties.get(&role).map(String::as_str)
    }

    /// Iterate over all roles in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (PartyRole, &str)> {
        self.parties.iter().map(|(role, value)| (*role, value.as_str()))
    }

    /// Delivery address, if one was given and is not blank
    pub fn delivery_location(&self) -> Option<&str> {
        self.get(PartyRole::DeliveryAddress)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn len(&self) -> usize {
        self.parties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parties.is_empty()
    }
}

/// A line item, unique by part number within one parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub part_number: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    /// Reference qualifier → value (RFF)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub references: BTreeMap<String, String>,
}

impl LineItem {
    /// Create a line item for a part number
    pub fn new(part_number: impl Into<String>) -> Self {
        Self {
            part_number: part_number.into(),
            ..Self::default()
        }
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// One delivery quantity on one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Delivery date, or the start of the delivery period
    pub date: String,

    /// End of the delivery period, when the row covers a range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<String>,

    /// Quantity exactly as transmitted
    pub quantity: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Resolved quantity-type label
    pub quantity_type: String,

    /// Raw scheduling-condition code (SCC)
    #[serde(default)]
    pub condition_code: String,

    /// Resolved scheduling-condition label
    #[serde(default)]
    pub condition: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_number: Option<String>,
}

/// Key used to collapse redundant delivery rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeliveryKey {
    pub date: String,
    pub quantity: String,
    pub quantity_type: String,
    pub condition_code: String,
    pub unit: Option<String>,
}

impl DeliverySchedule {
    /// Composite key of (date, quantity, type, condition, unit)
    pub fn dedup_key(&self) -> DeliveryKey {
        DeliveryKey {
            date: self.date.clone(),
            quantity: self.quantity.clone(),
            quantity_type: self.quantity_type.clone(),
            condition_code: self.condition_code.clone(),
            unit: self.unit.clone(),
        }
    }
}

/// Everything one parse produced.
///
/// A fresh value is built for every parse, so nothing leaks between files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    pub dialect: Dialect,
    pub header: HeaderInfo,
    pub partners: PartnerInfo,
    pub line_items: Vec<LineItem>,
    pub deliveries: Vec<DeliverySchedule>,
}

impl Entities {
    /// Create an empty entity set for a dialect
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            header: HeaderInfo::default(),
            partners: PartnerInfo::default(),
            line_items: Vec::new(),
            deliveries: Vec::new(),
        }
    }

    /// Whether the parse yielded no delivery rows
    pub fn is_empty(&self) -> bool {
        self.deliveries.is_empty()
    }

    /// Position of the line item with this part number, if any
    pub fn line_item_index(&self, part_number: &str) -> Option<usize> {
        self.line_items
            .iter()
            .position(|item| item.part_number == part_number)
    }

    /// Return the index of the line item for `part_number`, appending a new
    /// one built by `create` when the part number has not been seen yet.
    pub fn ensure_line_item(
        &mut self,
        part_number: &str,
        create: impl FnOnce() -> LineItem,
    ) -> usize {
        if let Some(index) = self.line_item_index(part_number) {
            return index;
        }
        let mut item = create();
        item.part_number = part_number.to_string();
        self.line_items.push(item);
        self.line_items.len() - 1
    }

    /// Drop delivery rows whose (date, quantity, type, condition, unit) was
    /// already seen, keeping the first occurrence in place.
    pub fn dedup_deliveries(&mut self) -> usize {
        let before = self.deliveries.len();
        let mut seen = HashSet::new();
        self.deliveries
            .retain(|delivery| seen.insert(delivery.dedup_key()));
        let removed = before - self.deliveries.len();
        if removed > 0 {
            debug!(removed, kept = self.deliveries.len(), "Collapsed duplicate delivery rows");
        }
        removed
    }

    /// Replace the line items with the distinct (part number, description)
    /// pairs found in the delivery rows, in first-seen order. Rows without
    /// a part number contribute no line item.
    ///
    /// Order numbers, locations and references of an existing line item
    /// with the same part number are carried over.
    pub fn derive_line_items_from_deliveries(&mut self) {
        let mut previous = std::mem::take(&mut self.line_items);
        let mut derived: Vec<LineItem> = Vec::new();
        for delivery in &self.deliveries {
            let part_number = match delivery.part_number.as_deref() {
                Some(part_number) if !part_number.is_empty() => part_number.to_string(),
                _ => continue,
            };
            if derived.iter().any(|item| item.part_number == part_number) {
                continue;
            }
            let item = match previous.iter().position(|item| item.part_number == part_number) {
                Some(index) => previous.swap_remove(index),
                None => LineItem::new(part_number),
            };
            derived.push(item.with_description(delivery.description.clone().unwrap_or_default()));
        }
        self.line_items = derived;
    }
}
