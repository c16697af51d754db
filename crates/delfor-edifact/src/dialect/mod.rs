//! Partner parsing strategies
//!
//! Each trading partner gets one [`PartnerStrategy`]. Strategies are
//! stateless unit values: all transient state lives in locals of a single
//! `parse_segments` call, so one strategy can serve any number of files,
//! concurrently or not, without results bleeding between them.

mod cummins;
mod fixed_block;
mod state;

pub use cummins::CumminsStrategy;
pub use fixed_block::{FixedBlockStrategy, MINEBEA, TRW_KOBLENZ};
pub use state::{ParseState, PendingQuantity};

use crate::dates::normalize_interchange_timestamp;
use crate::segment::Segment;
use delfor_model::{Dialect, Entities, HeaderInfo};
use tracing::debug;

/// Turns a classified segment sequence into entities for one dialect
pub trait PartnerStrategy: Send + Sync {
    /// Dialect handled by this strategy
    fn dialect(&self) -> Dialect;

    /// Consume the segments in arrival order and build the entity set.
    ///
    /// Never fails; segments that are too short to use are skipped.
    fn parse_segments(&self, segments: &[Segment]) -> Entities;
}

static CUMMINS: CumminsStrategy = CumminsStrategy;

/// Strategy for a dialect
pub fn strategy_for(dialect: Dialect) -> &'static dyn PartnerStrategy {
    match dialect {
        Dialect::Cummins => &CUMMINS,
        Dialect::Minebea => &MINEBEA,
        Dialect::TrwKoblenz => &TRW_KOBLENZ,
    }
}

/// UNB: sender, recipient code and preparation timestamp
pub(crate) fn apply_interchange_header(header: &mut HeaderInfo, segment: &Segment) {
    if !segment.has_fields(5) {
        skip_short(segment, 5);
        return;
    }
    header.sender = Some(segment.field(2));
    header.recipient_code = Some(segment.field(3));
    header.interchange_timestamp =
        Some(normalize_interchange_timestamp(&segment.field(4)).into_string());
}

/// BGM: document number
pub(crate) fn apply_message_begin(header: &mut HeaderInfo, segment: &Segment) {
    if !segment.has_fields(3) {
        skip_short(segment, 3);
        return;
    }
    header.document_number = Some(segment.field(2));
}

/// Non-empty fields from `start` onwards
pub(crate) fn non_empty_fields(segment: &Segment, start: usize) -> Vec<String> {
    segment
        .fields_from(start)
        .into_iter()
        .map(|field| field.trim().to_string())
        .filter(|field| !field.is_empty())
        .collect()
}

pub(crate) fn skip_short(segment: &Segment, required: usize) {
    debug!(
        tag = %segment.tag,
        index = segment.index,
        fields = segment.field_count(),
        required,
        "Skipping short segment"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_for_each_dialect() {
        for dialect in Dialect::ALL {
            assert_eq!(strategy_for(dialect).dialect(), dialect);
        }
    }

    #[test]
    fn test_interchange_header() {
        let mut header = HeaderInfo::default();
        apply_interchange_header(
            &mut header,
            &Segment::parse("UNB+UNOC:3+SENDER01:ZZ+RECV02:ZZ+240315:0930+77"),
        );
        assert_eq!(header.sender.as_deref(), Some("SENDER01:ZZ"));
        assert_eq!(header.recipient_code.as_deref(), Some("RECV02:ZZ"));
        assert_eq!(header.interchange_timestamp.as_deref(), Some("15.03.2024 09:30"));
    }

    #[test]
    fn test_short_header_is_ignored() {
        let mut header = HeaderInfo::default();
        apply_interchange_header(&mut header, &Segment::parse("UNB+UNOC:3+SENDER"));
        apply_message_begin(&mut header, &Segment::parse("BGM+241"));
        assert_eq!(header, HeaderInfo::default());
    }

    #[test]
    fn test_non_empty_fields() {
        let segment = Segment::parse("NAD+CN+1++NAME+ +STREET++CITY");
        assert_eq!(non_empty_fields(&segment, 5), vec!["STREET", "CITY"]);
    }
}
