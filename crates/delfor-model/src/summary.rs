//! Delivery statistics

use crate::entities::{DeliverySchedule, Entities};
use serde::Serialize;
use std::collections::HashSet;

/// Count and quantity total for one label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
    pub quantity: i64,
}

/// Aggregate view over the delivery rows of one parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub deliveries: usize,
    pub distinct_parts: usize,
    /// Sum over rows whose quantity is a whole number
    pub total_quantity: i64,
    /// Grouped by scheduling-condition label, first-seen order
    pub by_condition: Vec<Bucket>,
    /// Grouped by quantity-type label, first-seen order
    pub by_quantity_type: Vec<Bucket>,
}

impl Summary {
    /// Compute the summary for a parse result
    pub fn from_entities(entities: &Entities) -> Self {
        let deliveries = &entities.deliveries;
        let distinct_parts = deliveries
            .iter()
            .filter_map(|d| d.part_number.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<HashSet<_>>()
            .len();

        let total_quantity = deliveries.iter().filter_map(whole_quantity).sum();

        Self {
            deliveries: deliveries.len(),
            distinct_parts,
            total_quantity,
            by_condition: group_by(deliveries, |d| d.condition.as_str()),
            by_quantity_type: group_by(deliveries, |d| d.quantity_type.as_str()),
        }
    }
}

fn whole_quantity(delivery: &DeliverySchedule) -> Option<i64> {
    delivery.quantity.trim().trim_matches('\'').parse::<i64>().ok()
}

fn group_by<'a>(
    deliveries: &'a [DeliverySchedule],
    label: impl Fn(&'a DeliverySchedule) -> &'a str,
) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = Vec::new();
    for delivery in deliveries {
        let key = label(delivery);
        let index = match buckets.iter().position(|b| b.label == key) {
            Some(index) => index,
            None => {
                buckets.push(Bucket {
                    label: key.to_string(),
                    count: 0,
                    quantity: 0,
                });
                buckets.len() - 1
            }
        };
        let bucket = &mut buckets[index];
        bucket.count += 1;
        bucket.quantity += whole_quantity(delivery).unwrap_or(0);
    }
    buckets
}
