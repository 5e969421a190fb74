use crate::classify::classify_record;
use crate::error::Result;
use crate::text::{self, normalize_cell};
use crate::types::{Cell, ClassifiedSite, RawRecord};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    /// Cancelled or not-applicable builds.
    pub excluded_rows: usize,
    /// Rows whose build is neither done nor in progress (headers included).
    pub dropped_rows: usize,
    pub read_errors: usize,
    pub kept_sites: usize,
}

/// What ingestion does with a row, judged on its construction status alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowDecision {
    Keep,
    Excluded,
    Dropped,
}

pub fn construction_decision(status: &Cell) -> RowDecision {
    let normalized = normalize_cell(status);
    if text::contains(&normalized, "annule") || text::equals_any(&normalized, &["na", "n/a", "so"]) {
        return RowDecision::Excluded;
    }
    if text::contains(&normalized, "realis") || text::contains(&normalized, "en cours") {
        RowDecision::Keep
    } else {
        RowDecision::Dropped
    }
}

/// The ingested rows together with the sites derived from them. Sites keep
/// the index of their source row for detail lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    pub records: Vec<RawRecord>,
    pub sites: Vec<ClassifiedSite>,
}

impl Batch {
    pub fn record(&self, site: &ClassifiedSite) -> Option<&RawRecord> {
        self.records.get(site.row)
    }

    /// Site by identifier, as shown in listings (`"<row>-<affair>"`).
    pub fn find(&self, id: &str) -> Option<&ClassifiedSite> {
        let id = id.trim();
        self.sites.iter().find(|s| s.id == id)
    }
}

/// Filter and classify an in-memory batch against the evaluation date.
pub fn classify_batch(records: &[RawRecord], today: NaiveDate) -> (Vec<ClassifiedSite>, LoadReport) {
    let mut report = LoadReport { total_rows: records.len(), ..LoadReport::default() };
    let mut sites = Vec::new();
    for (row, record) in records.iter().enumerate() {
        match construction_decision(&record.construction_status) {
            RowDecision::Keep => sites.push(classify_record(row, record, today)),
            RowDecision::Excluded => {
                debug!(row, status = %record.construction_status.text(), "row excluded");
                report.excluded_rows += 1;
            }
            RowDecision::Dropped => {
                debug!(row, status = %record.construction_status.text(), "row dropped");
                report.dropped_rows += 1;
            }
        }
    }
    report.kept_sites = sites.len();
    (sites, report)
}

/// Read the tracking sheet exported as CSV. Columns are positional (A..R),
/// so any header line is just another row that the status filter drops.
pub fn load_from_reader<R: Read>(reader: R, today: NaiveDate) -> Result<(Batch, LoadReport)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records: Vec<RawRecord> = Vec::new();
    let mut read_errors = 0usize;
    for result in rdr.records() {
        match result {
            Ok(rec) => {
                let fields: Vec<&str> = rec.iter().collect();
                records.push(RawRecord::from_fields(&fields));
            }
            Err(e) => {
                warn!("Skipping unreadable row: {}", e);
                read_errors += 1;
            }
        }
    }

    let (sites, mut report) = classify_batch(&records, today);
    report.read_errors = read_errors;
    report.total_rows += read_errors;
    info!(
        total = report.total_rows,
        kept = report.kept_sites,
        excluded = report.excluded_rows,
        dropped = report.dropped_rows,
        "Loaded tracking sheet"
    );
    Ok((Batch { records, sites }, report))
}

pub fn load_file(path: &Path, today: NaiveDate) -> Result<(Batch, LoadReport)> {
    info!("Loading CSV: {:?}", path);
    let file = std::fs::File::open(path)?;
    load_from_reader(file, today)
}
