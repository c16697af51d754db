//! Delivery row writer

use crate::config::ExportConfig;
use crate::errors::{ExportError, ExportResult};
use chrono::NaiveDate;
use delfor_edifact::dates::parse_canonical;
use delfor_edifact::iso_week;
use delfor_model::{DeliverySchedule, Dialect, Entities};
use std::cmp::Ordering;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, trace};

const PART_HEADER: &str = "Part";
const ROW_HEADERS: [&str; 5] = ["Date", "Week", "Quantity", "Condition", "Delivery location"];

/// What an export call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Written { rows: usize },
    /// The schedule had no delivery rows; nothing was written
    NothingToExport,
}

/// One output row, ready to be rendered
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub part_number: Option<String>,
    pub date: String,
    /// ISO week, 0 when the date cannot be read
    pub week: u32,
    pub quantity: f64,
    pub condition: String,
    pub location: String,
    sort_date: Option<NaiveDate>,
}

impl ExportRow {
    fn from_delivery(delivery: &DeliverySchedule, location: &str) -> Self {
        Self {
            part_number: delivery.part_number.clone(),
            date: delivery.date.clone(),
            week: iso_week(&delivery.date).value().unwrap_or(0),
            quantity: export_quantity(&delivery.quantity),
            condition: delivery.condition.clone(),
            location: location.to_string(),
            sort_date: parse_canonical(&delivery.date),
        }
    }

    /// Render as CSV fields, with or without the part column
    pub fn to_record(&self, with_part: bool) -> Vec<String> {
        let mut record = Vec::with_capacity(ROW_HEADERS.len() + 1);
        if with_part {
            record.push(self.part_number.clone().unwrap_or_default());
        }
        record.push(self.date.clone());
        record.push(self.week.to_string());
        record.push(self.quantity.to_string());
        record.push(self.condition.clone());
        record.push(self.location.clone());
        record
    }
}

/// Quantity as a number: stray `'` removed, 0 when unreadable
pub fn export_quantity(raw: &str) -> f64 {
    raw.trim()
        .trim_matches('\'')
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Column headers for a dialect's export
pub fn headers(dialect: Dialect) -> Vec<&'static str> {
    let mut headers = Vec::with_capacity(ROW_HEADERS.len() + 1);
    if dialect.has_part_numbers() {
        headers.push(PART_HEADER);
    }
    headers.extend(ROW_HEADERS);
    headers
}

/// Writes delivery schedules as delimited text
#[derive(Debug, Clone, Default)]
pub struct DeliveryWriter {
    config: ExportConfig,
}

impl DeliveryWriter {
    /// Create a writer with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration
    #[must_use]
    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Build the output rows, sorted by part number and then date.
    ///
    /// Rows whose date cannot be read sort after the dated rows of the same
    /// part; ties keep their parse order.
    pub fn rows(&self, entities: &Entities) -> Vec<ExportRow> {
        let location = entities
            .partners
            .delivery_location()
            .unwrap_or(self.config.fallback_location.as_str());

        let mut rows: Vec<ExportRow> = entities
            .deliveries
            .iter()
            .map(|delivery| ExportRow::from_delivery(delivery, location))
            .collect();

        rows.sort_by(|a, b| {
            let part_a = a.part_number.as_deref().unwrap_or_default();
            let part_b = b.part_number.as_deref().unwrap_or_default();
            part_a
                .cmp(part_b)
                .then_with(|| compare_dates(a.sort_date, b.sort_date))
        });
        rows
    }

    /// Write the schedule to `writer`
    pub fn write<W: Write>(&self, writer: W, entities: &Entities) -> ExportResult<ExportOutcome> {
        if entities.is_empty() {
            debug!(dialect = %entities.dialect, "No delivery rows to export");
            return Ok(ExportOutcome::NothingToExport);
        }

        let delimiter = self.config.delimiter_u8().ok_or_else(|| {
            ExportError::config(format!(
                "delimiter '{}' is not a single ASCII character",
                self.config.delimiter
            ))
        })?;

        let mut csv_writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        let with_part = entities.dialect.has_part_numbers();
        if self.config.has_header {
            csv_writer.write_record(headers(entities.dialect))?;
        }

        let rows = self.rows(entities);
        for row in &rows {
            let record = row.to_record(with_part);
            csv_writer.write_record(&record)?;
            trace!(?record, "Wrote delivery row");
        }

        csv_writer.flush()?;
        debug!(dialect = %entities.dialect, rows = rows.len(), "Finished writing delivery rows");
        Ok(ExportOutcome::Written { rows: rows.len() })
    }

    /// Write the schedule to a file. No file is created when there is
    /// nothing to export.
    pub fn write_to_path(
        &self,
        path: impl AsRef<Path>,
        entities: &Entities,
    ) -> ExportResult<ExportOutcome> {
        if entities.is_empty() {
            return Ok(ExportOutcome::NothingToExport);
        }
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| ExportError::Create {
            path: path.to_path_buf(),
            source,
        })?;
        self.write(file, entities)
    }
}

fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
