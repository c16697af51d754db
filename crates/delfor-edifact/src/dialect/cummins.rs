//! Cummins dialect: schedule-driven reducer
//!
//! Quantities are buffered inside an SCC block and resolved by the next
//! delivery date (DTM+2). Line items are re-derived from the emitted rows
//! once the whole interchange has been consumed.

use super::state::{ParseState, PendingQuantity};
use super::{PartnerStrategy, apply_interchange_header, apply_message_begin, skip_short};
use crate::codes::{describe_condition, describe_quantity_type};
use crate::dates::normalize_date;
use crate::segment::Segment;
use delfor_model::{DeliverySchedule, Dialect, Entities, LineItem, PartyRole};
use tracing::{debug, trace};

/// DTM qualifier for the document date
const DTM_DOCUMENT_DATE: &str = "137";
/// DTM qualifier for a delivery date
const DTM_DELIVERY_DATE: &str = "2";
/// Item number type for the buyer's internal part number
const ITEM_INTERNAL_NUMBER: &str = "IN";
/// RFF qualifier for an order number
const RFF_ORDER_NUMBER: &str = "ON";
/// RFF qualifier for a release number
const RFF_RELEASE_NUMBER: &str = "RE";

/// Parsing strategy for Cummins DELFOR
#[derive(Debug, Clone, Copy, Default)]
pub struct CumminsStrategy;

impl PartnerStrategy for CumminsStrategy {
    fn dialect(&self) -> Dialect {
        Dialect::Cummins
    }

    fn parse_segments(&self, segments: &[Segment]) -> Entities {
        let mut entities = Entities::new(Dialect::Cummins);
        let mut state = ParseState::new();

        for segment in segments {
            trace!(tag = %segment.tag, index = segment.index, "Reducing segment");
            match segment.tag.as_str() {
                "UNB" => apply_interchange_header(&mut entities.header, segment),
                "UNH" => on_message_header(&mut entities, segment),
                "BGM" => apply_message_begin(&mut entities.header, segment),
                "DTM" => on_date(&mut entities, &mut state, segment),
                "NAD" => on_party(&mut entities, segment),
                "LIN" => on_line_item(&mut entities, &mut state, segment),
                "IMD" => on_description(&mut state, segment),
                "LOC" => on_location(&mut state, segment),
                "RFF" => on_reference(&mut entities, &mut state, segment),
                "SCC" => on_condition(&mut state, segment),
                "QTY" => on_quantity(&mut state, segment),
                _ => {}
            }
        }

        if !state.pending().is_empty() {
            debug!(
                pending = state.pending().len(),
                "Quantities left without a delivery date"
            );
        }

        entities.derive_line_items_from_deliveries();
        debug!(
            deliveries = entities.deliveries.len(),
            line_items = entities.line_items.len(),
            "Finished Cummins parse"
        );
        entities
    }
}

fn on_message_header(entities: &mut Entities, segment: &Segment) {
    if !segment.has_fields(2) {
        skip_short(segment, 2);
        return;
    }
    entities.header.message_id = Some(segment.field(1));
}

/// Find the line item for the current part number, creating it from the
/// current state when it does not exist yet.
fn ensure_line_item(entities: &mut Entities, state: &mut ParseState) -> Option<usize> {
    if state.part_number.is_empty() {
        return None;
    }
    let index = entities.ensure_line_item(&state.part_number, || LineItem {
        description: state.description.clone(),
        order_number: non_empty(&state.order_number),
        location: non_empty(&state.location),
        ..LineItem::default()
    });
    state.line_item = Some(index);
    Some(index)
}

fn on_line_item(entities: &mut Entities, state: &mut ParseState, segment: &Segment) {
    if !state.part_number.is_empty() {
        ensure_line_item(entities, state);
    }
    if !segment.has_fields(4) {
        skip_short(segment, 4);
        return;
    }

    state.start_line_item();
    state.part_number = extract_part_number(segment);
    debug!(part_number = %state.part_number, index = segment.index, "Started line item");
}

/// Prefer an item id qualified `IN`, then the first composite item id,
/// then whatever the first item id field holds.
fn extract_part_number(segment: &Segment) -> String {
    let mut part_number = String::new();
    for index in 3..segment.field_count() {
        if !segment.is_composite(index) {
            continue;
        }
        let components = segment.components(index);
        if components.get(1).map(String::as_str) == Some(ITEM_INTERNAL_NUMBER) {
            return components[0].clone();
        }
        if part_number.is_empty() {
            part_number = components[0].clone();
        }
    }

    if part_number.is_empty() && segment.has_fields(4) {
        part_number = segment.component(3, 0);
    }
    part_number
}

fn on_description(state: &mut ParseState, segment: &Segment) {
    if !segment.has_fields(4) {
        skip_short(segment, 4);
        return;
    }
    state.description = segment.free_text(3, 3);
}

fn on_location(state: &mut ParseState, segment: &Segment) {
    if !segment.has_fields(3) {
        skip_short(segment, 3);
        return;
    }
    state.location = segment.field(2);
}

fn on_reference(entities: &mut Entities, state: &mut ParseState, segment: &Segment) {
    if segment.component_count(1) < 2 {
        skip_short(segment, 2);
        return;
    }
    let reference_type = segment.component(1, 0);
    let value = segment.component(1, 1);

    let line_item = match state.line_item {
        Some(index) => Some(index),
        None => ensure_line_item(entities, state),
    };
    if let Some(index) = line_item {
        entities.line_items[index]
            .references
            .insert(reference_type.clone(), value.clone());
    }

    match reference_type.as_str() {
        RFF_ORDER_NUMBER => {
            state.order_number = value;
            if let Some(index) = line_item {
                entities.line_items[index].order_number = non_empty(&state.order_number);
            }
        }
        RFF_RELEASE_NUMBER => {
            if !state.pending().is_empty() {
                debug!(
                    dropped = state.pending().len(),
                    release = %value,
                    "Release number discards quantities buffered before it"
                );
            }
            state.set_release(value);
        }
        _ => {}
    }
}

fn on_condition(state: &mut ParseState, segment: &Segment) {
    if !segment.has_fields(2) {
        skip_short(segment, 2);
        return;
    }
    state.start_condition(segment.field(1));
}

fn on_quantity(state: &mut ParseState, segment: &Segment) {
    if segment.component_count(1) < 2 {
        skip_short(segment, 2);
        return;
    }
    let components = segment.components(1);
    state.buffer_quantity(PendingQuantity {
        quantity: components[1].clone(),
        quantity_type: describe_quantity_type(&components[0]),
        unit: components.get(2).and_then(|unit| non_empty(unit)),
    });
}

fn on_party(entities: &mut Entities, segment: &Segment) {
    if !segment.has_fields(3) {
        skip_short(segment, 3);
        return;
    }
    match segment.field(1).as_str() {
        "SU" => {
            let name = party_name(segment);
            entities.partners.set(PartyRole::Supplier, name);
        }
        "ST" => {
            let name = party_name(segment);
            entities.partners.set(PartyRole::ShipTo, name);

            // Address lines run from field 5 up to the first qualified component.
            let address: Vec<String> = (5..segment.field_count())
                .take_while(|&index| !segment.is_composite(index))
                .map(|index| segment.field(index).trim().to_string())
                .filter(|line| !line.is_empty())
                .collect();
            if !address.is_empty() {
                entities
                    .partners
                    .set(PartyRole::DeliveryAddress, address.join(", "));
            }
        }
        _ => {}
    }
}

fn party_name(segment: &Segment) -> String {
    super::non_empty_fields(segment, 4).join(" ")
}

fn on_date(entities: &mut Entities, state: &mut ParseState, segment: &Segment) {
    if segment.component_count(1) < 3 {
        skip_short(segment, 2);
        return;
    }
    let components = segment.components(1);
    let date = normalize_date(&components[1], &components[2]).into_string();

    match components[0].as_str() {
        DTM_DOCUMENT_DATE => entities.header.document_date = Some(date),
        DTM_DELIVERY_DATE => resolve_pending(entities, state, &date),
        _ => {}
    }
}

/// Emit one row per pending quantity for `date`. Under backlog only the
/// first pending quantity is taken; the rest are discarded.
fn resolve_pending(entities: &mut Entities, state: &mut ParseState, date: &str) {
    let mut pending = state.take_pending();
    if pending.is_empty() {
        return;
    }

    if state.is_backlog() {
        ensure_line_item(entities, state);
        if pending.len() > 1 {
            debug!(
                discarded = pending.len() - 1,
                date, "Backlog keeps only the first quantity"
            );
        }
        pending.truncate(1);
    }

    let condition = describe_condition(&state.condition);
    for quantity in pending {
        entities.deliveries.push(DeliverySchedule {
            part_number: non_empty(&state.part_number),
            description: non_empty(&state.description),
            date: date.to_string(),
            date_to: None,
            quantity: quantity.quantity,
            unit: quantity.unit,
            quantity_type: quantity.quantity_type,
            condition_code: state.condition.clone(),
            condition: condition.clone(),
            release: non_empty(&state.release),
            order_number: non_empty(&state.order_number),
        });
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
