//! Transient state of the schedule-driven reducer

/// A quantity waiting for the date that resolves it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingQuantity {
    pub quantity: String,
    pub quantity_type: String,
    pub unit: Option<String>,
}

/// What the reducer is accumulating between segments.
///
/// Threaded by `&mut` through every segment handler. Pending quantities
/// are dropped whenever a new line item or scheduling condition starts,
/// and after each resolving date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseState {
    pub part_number: String,
    pub description: String,
    pub location: String,
    pub order_number: String,
    pub condition: String,
    pub release: String,
    /// Index into `Entities::line_items` of the active line item
    pub line_item: Option<usize>,
    pending: Vec<PendingQuantity>,
}

impl ParseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a new LIN. Location and order number carry over.
    pub fn start_line_item(&mut self) {
        self.part_number.clear();
        self.description.clear();
        self.condition.clear();
        self.release.clear();
        self.line_item = None;
        self.pending.clear();
    }

    /// Enter a scheduling-condition block
    pub fn start_condition(&mut self, code: impl Into<String>) {
        self.condition = code.into();
        self.pending.clear();
        if self.condition == crate::codes::SCC_BACKLOG {
            self.release.clear();
        }
    }

    /// Record a new release number; quantities seen so far are dropped so
    /// the release only applies to quantities that follow it.
    pub fn set_release(&mut self, release: impl Into<String>) {
        self.release = release.into();
        self.pending.clear();
    }

    pub fn buffer_quantity(&mut self, quantity: PendingQuantity) {
        self.pending.push(quantity);
    }

    pub fn pending(&self) -> &[PendingQuantity] {
        &self.pending
    }

    /// Take all pending quantities, leaving the buffer empty
    pub fn take_pending(&mut self) -> Vec<PendingQuantity> {
        std::mem::take(&mut self.pending)
    }

    pub fn is_backlog(&self) -> bool {
        self.condition == crate::codes::SCC_BACKLOG
    }
}
