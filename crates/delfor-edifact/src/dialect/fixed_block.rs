//! Fixed delivery-block dialects (Minebea, TRW Koblenz)
//!
//! A delivery row is spelled out as four consecutive segments:
//!
//! ```text
//! QTY+113:<quantity>:<unit>'   quantity to be delivered
//! SCC+<condition>'             scheduling condition
//! DTM+63:<date>:<format>'      latest delivery date (period end)
//! DTM+64:<date>:<format>'      earliest delivery date (period start)
//! ```
//!
//! The block is consumed greedily: each step is taken only when the
//! previous one matched, and a row is kept only when it has both a
//! quantity and a start date. A block that breaks off early loses the
//! fields it did not reach; parsing resumes at the segment that broke it.

use super::{PartnerStrategy, apply_interchange_header, apply_message_begin, non_empty_fields, skip_short};
use crate::codes::{QTY_TO_BE_DELIVERED, describe_condition, describe_quantity_type};
use crate::dates::normalize_date;
use crate::segment::Segment;
use delfor_model::{DeliverySchedule, Dialect, Entities, HeaderInfo, PartyRole};
use tracing::{debug, trace};

const DTM_PERIOD_END: &str = "63";
const DTM_PERIOD_START: &str = "64";

/// Which seller parties name the interchange recipient
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientNaming {
    /// Every seller party
    Always,
    /// Only the seller whose party code equals the UNB recipient code
    WhenCodeMatches,
}

/// Parsing strategy for dialects built from fixed delivery blocks
#[derive(Debug, Clone, Copy)]
pub struct FixedBlockStrategy {
    dialect: Dialect,
    /// Collapse rows with the same (date, quantity, type, condition, unit)
    dedup: bool,
    /// Show the party code when a NAD carries no name
    name_falls_back_to_code: bool,
    recipient_naming: RecipientNaming,
}

/// Minebea: rows are deduplicated
pub static MINEBEA: FixedBlockStrategy = FixedBlockStrategy {
    dialect: Dialect::Minebea,
    dedup: true,
    name_falls_back_to_code: false,
    recipient_naming: RecipientNaming::WhenCodeMatches,
};

/// TRW Koblenz: every row is kept
pub static TRW_KOBLENZ: FixedBlockStrategy = FixedBlockStrategy {
    dialect: Dialect::TrwKoblenz,
    dedup: false,
    name_falls_back_to_code: true,
    recipient_naming: RecipientNaming::Always,
};

/// A delivery row under construction
#[derive(Debug, Default)]
struct DeliveryBlock {
    quantity: Option<String>,
    unit: Option<String>,
    condition_code: Option<String>,
    date_to: Option<String>,
    date_from: Option<String>,
}

impl DeliveryBlock {
    fn into_delivery(self) -> Option<DeliverySchedule> {
        let quantity = self.quantity?;
        let date = self.date_from?;
        let condition_code = self.condition_code.unwrap_or_default();
        Some(DeliverySchedule {
            date,
            date_to: self.date_to,
            quantity,
            unit: self.unit,
            quantity_type: describe_quantity_type(QTY_TO_BE_DELIVERED),
            condition: describe_condition(&condition_code),
            condition_code,
            ..DeliverySchedule::default()
        })
    }
}

impl FixedBlockStrategy {
    fn on_party(&self, entities: &mut Entities, segment: &Segment) {
        if !segment.has_fields(3) {
            skip_short(segment, 3);
            return;
        }
        let role = segment.field(1);
        let code = segment.field(2);
        let mut name = segment.field(4);
        if name.is_empty() && self.name_falls_back_to_code {
            name.clone_from(&code);
        }

        let address = non_empty_fields(segment, 5).join(", ");
        let display = if address.is_empty() {
            name.clone()
        } else {
            format!("{name}, {address}")
        };

        match role.as_str() {
            "BY" => entities.partners.set(PartyRole::Buyer, display),
            "SE" => {
                if self.names_recipient(&entities.header, &code) {
                    entities.header.recipient_name = Some(name);
                }
                entities.partners.set(PartyRole::Seller, display);
            }
            "CN" => entities.partners.set(PartyRole::DeliveryAddress, display),
            _ => {}
        }
    }

    fn names_recipient(&self, header: &HeaderInfo, code: &str) -> bool {
        match self.recipient_naming {
            RecipientNaming::Always => true,
            RecipientNaming::WhenCodeMatches => {
                header.recipient_code.as_deref().unwrap_or_default() == code
            }
        }
    }

    /// Read the quantity composite of a QTY+113 segment. Quantity and
    /// unit are taken together; without a unit the block gets no quantity.
    fn read_quantity(block: &mut DeliveryBlock, segment: &Segment) {
        if segment.component_count(1) < 3 {
            skip_short(segment, 2);
            return;
        }
        let mut components = segment.components(1).into_iter().skip(1);
        block.quantity = components.next();
        block.unit = components.next();
    }

    /// Consume the block starting at `segments[start]` (a QTY+113).
    /// Returns the block and the index of the first segment not consumed.
    fn assemble_block(&self, segments: &[Segment], start: usize) -> (DeliveryBlock, usize) {
        let mut block = DeliveryBlock::default();
        Self::read_quantity(&mut block, &segments[start]);
        let mut next = start + 1;

        let Some(segment) = segments.get(next).filter(|s| s.is("SCC")) else {
            return (block, next);
        };
        if segment.has_fields(2) {
            block.condition_code = Some(segment.field(1));
        }
        next += 1;

        let Some(segment) = segments.get(next).filter(|s| is_date(s, DTM_PERIOD_END)) else {
            return (block, next);
        };
        block.date_to = read_date(segment);
        next += 1;

        let Some(segment) = segments.get(next).filter(|s| is_date(s, DTM_PERIOD_START)) else {
            return (block, next);
        };
        block.date_from = read_date(segment);
        next += 1;

        (block, next)
    }
}

impl PartnerStrategy for FixedBlockStrategy {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn parse_segments(&self, segments: &[Segment]) -> Entities {
        let mut entities = Entities::new(self.dialect);
        let mut incomplete = 0usize;
        let mut index = 0;

        while index < segments.len() {
            let segment = &segments[index];
            trace!(tag = %segment.tag, index = segment.index, "Reducing segment");

            if segment.is("QTY") && segment.qualifier() == QTY_TO_BE_DELIVERED {
                let (block, next) = self.assemble_block(segments, index);
                match block.into_delivery() {
                    Some(delivery) => entities.deliveries.push(delivery),
                    None => incomplete += 1,
                }
                index = next;
                continue;
            }

            match segment.tag.as_str() {
                "UNB" => apply_interchange_header(&mut entities.header, segment),
                "BGM" => apply_message_begin(&mut entities.header, segment),
                "NAD" => self.on_party(&mut entities, segment),
                "LIN" => {
                    if segment.has_fields(4) {
                        entities.header.line_item_number = Some(segment.field(3));
                    } else {
                        skip_short(segment, 4);
                    }
                }
                "PIA" => {
                    if segment.has_fields(3) {
                        entities.header.product_code = Some(segment.field(2));
                    } else {
                        skip_short(segment, 3);
                    }
                }
                _ => {}
            }
            index += 1;
        }

        if incomplete > 0 {
            debug!(incomplete, dialect = %self.dialect, "Dropped incomplete delivery blocks");
        }
        if self.dedup {
            entities.dedup_deliveries();
        }
        debug!(
            deliveries = entities.deliveries.len(),
            dialect = %self.dialect,
            "Finished fixed-block parse"
        );
        entities
    }
}

fn is_date(segment: &Segment, qualifier: &str) -> bool {
    segment.is("DTM") && segment.qualifier() == qualifier
}

fn read_date(segment: &Segment) -> Option<String> {
    if segment.component_count(1) < 3 {
        skip_short(segment, 2);
        return None;
    }
    let components = segment.components(1);
    Some(normalize_date(&components[1], &components[2]).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::classify_all;
    use crate::syntax::Separators;

    fn parse(strategy: &FixedBlockStrategy, text: &str) -> Entities {
        strategy.parse_segments(&classify_all(text, Separators::default()))
    }

    const BLOCK: &str = "QTY+113:500:PCE'SCC+1'DTM+63:20240407:102'DTM+64:20240401:102'";

    #[test]
    fn test_full_block_becomes_row() {
        let entities = parse(&MINEBEA, BLOCK);
        assert_eq!(entities.deliveries.len(), 1);
        let row = &entities.deliveries[0];
        assert_eq!(row.quantity, "500");
        assert_eq!(row.unit.as_deref(), Some("PCE"));
        assert_eq!(row.date, "01.04.2024");
        assert_eq!(row.date_to.as_deref(), Some("07.04.2024"));
        assert_eq!(row.condition, "Firm");
        assert_eq!(row.quantity_type, "Quantity to be delivered");
        assert_eq!(row.part_number, None);
    }

    #[test]
    fn test_block_without_start_date_is_dropped() {
        let entities = parse(&MINEBEA, "QTY+113:500:PCE'SCC+1'DTM+63:20240407:102'");
        assert!(entities.deliveries.is_empty());
    }

    #[test]
    fn test_out_of_order_block_is_truncated() {
        // Start date before end date: the block stops at DTM+64 and the
        // following segments are parsed on their own.
        let entities = parse(
            &MINEBEA,
            "QTY+113:500:PCE'SCC+1'DTM+64:20240401:102'DTM+63:20240407:102'",
        );
        assert!(entities.deliveries.is_empty());
    }

    #[test]
    fn test_block_resumes_at_breaking_segment() {
        let text = format!("QTY+113:500:PCE'{BLOCK}");
        let entities = parse(&TRW_KOBLENZ, &text);
        assert_eq!(entities.deliveries.len(), 1);
        assert_eq!(entities.deliveries[0].quantity, "500");
    }

    #[test]
    fn test_minebea_deduplicates_rows() {
        let text = format!(
            "{BLOCK}QTY+113:200:PCE'SCC+4'DTM+63:20240414:102'DTM+64:20240408:102'{BLOCK}"
        );
        let entities = parse(&MINEBEA, &text);
        let quantities: Vec<&str> = entities.deliveries.iter().map(|d| d.quantity.as_str()).collect();
        assert_eq!(quantities, vec!["500", "200"]);
    }

    #[test]
    fn test_trw_keeps_duplicate_rows() {
        let text = format!("{BLOCK}{BLOCK}");
        assert_eq!(parse(&TRW_KOBLENZ, &text).deliveries.len(), 2);
    }

    #[test]
    fn test_quantity_without_unit_drops_block() {
        let text = "QTY+113:40'SCC+4'DTM+63:20240407:102'DTM+64:20240401:102'";
        assert!(parse(&MINEBEA, text).deliveries.is_empty());
        assert!(parse(&TRW_KOBLENZ, text).deliveries.is_empty());

        let followed = format!("{text}{BLOCK}");
        let trw = parse(&TRW_KOBLENZ, &followed);
        assert_eq!(trw.deliveries.len(), 1);
        assert_eq!(trw.deliveries[0].quantity, "500");
    }

    #[test]
    fn test_other_quantity_qualifiers_are_ignored() {
        let entities = parse(&MINEBEA, "QTY+1:500:PCE'SCC+1'DTM+63:20240407:102'DTM+64:20240401:102'");
        assert!(entities.deliveries.is_empty());
    }

    #[test]
    fn test_minebea_parties() {
        let entities = parse(
            &MINEBEA,
            "UNB+UNOC:3+MINEBEA+SUPP01+240315:0930+1'\
             NAD+BY+MB01++MINEBEA SLOVAKIA+PRIEMYSELNA 1++KOSICE'\
             NAD+SE+SUPP01++ACME PARTS+MAIN ST 5'\
             NAD+CN+CN01++XTREME PRESSURE INJECTION'",
        );
        assert_eq!(
            entities.partners.get(PartyRole::Buyer),
            Some("MINEBEA SLOVAKIA, PRIEMYSELNA 1, KOSICE")
        );
        assert_eq!(entities.partners.get(PartyRole::Seller), Some("ACME PARTS, MAIN ST 5"));
        assert_eq!(entities.header.recipient_name.as_deref(), Some("ACME PARTS"));
        assert_eq!(entities.partners.delivery_location(), Some("XTREME PRESSURE INJECTION"));
    }

    #[test]
    fn test_minebea_recipient_needs_matching_code() {
        let entities = parse(
            &MINEBEA,
            "UNB+UNOC:3+MINEBEA+SUPP01+240315:0930+1'NAD+SE+OTHER++ACME PARTS'",
        );
        assert_eq!(entities.header.recipient_name, None);
        assert_eq!(entities.partners.get(PartyRole::Seller), Some("ACME PARTS"));
    }

    #[test]
    fn test_trw_party_name_falls_back_to_code() {
        let entities = parse(&TRW_KOBLENZ, "NAD+SE+4711'NAD+CN+KOB1+++WERK 2");
        assert_eq!(entities.header.recipient_name.as_deref(), Some("4711"));
        assert_eq!(entities.partners.get(PartyRole::Seller), Some("4711"));
        assert_eq!(entities.partners.delivery_location(), Some("KOB1, WERK 2"));
    }

    #[test]
    fn test_single_item_header_fields() {
        let entities = parse(&TRW_KOBLENZ, "LIN+1++A2C123:IN'PIA+1+K-77:SA'BGM+241+DF-9'");
        assert_eq!(entities.header.line_item_number.as_deref(), Some("A2C123:IN"));
        assert_eq!(entities.header.product_code.as_deref(), Some("K-77:SA"));
        assert_eq!(entities.header.document_number.as_deref(), Some("DF-9"));
    }
}
