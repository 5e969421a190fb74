use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tabled::Tabled;

static NUMERIC_CELL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("numeric cell pattern"));

/// One spreadsheet cell as it reaches the core: nothing, free text, or a
/// number (date cells arrive as spreadsheet serials). Numbers keep the text
/// they were read from so identifiers and phone numbers survive untouched.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64, String),
}

impl Cell {
    /// Classify one exported field. Pure digit fields (with an optional
    /// decimal part) are numeric, anything else non-blank is text.
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        if trimmed.is_empty() {
            return Cell::Empty;
        }
        if NUMERIC_CELL.is_match(trimmed) {
            if let Ok(n) = trimmed.parse::<f64>() {
                return Cell::Number(n, field.to_string());
            }
        }
        Cell::Text(field.to_string())
    }

    /// A zero or NaN serial carries no information, same as a blank cell.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(n, _) => *n == 0.0 || n.is_nan(),
        }
    }

    /// The cell as it was entered.
    pub fn text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) | Cell::Number(_, s) => s.clone(),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::from_field(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value, value.to_string())
    }
}

/// One row of the tracking sheet, columns A to R.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    /// A: Réalisé / En cours / NA / Annulé
    pub construction_status: Cell,
    /// B
    pub quote: Cell,
    /// C
    pub affair: Cell,
    /// D
    pub site: Cell,
    /// E
    pub address: Cell,
    /// F
    pub contact: Cell,
    /// G
    pub description: Cell,
    /// H
    pub brand: Cell,
    /// I
    pub terminals: Cell,
    /// J
    pub affair_date: Cell,
    /// K
    pub works_end_date: Cell,
    /// L: maintenance visit in year 2
    pub maintenance_1: Cell,
    /// M: maintenance visit in year 3
    pub maintenance_2: Cell,
    /// N
    pub invoice_date: Cell,
    /// O
    pub contract_date: Cell,
    /// P
    pub invoice: Cell,
    /// Q
    pub affair_ref: Cell,
    /// R: Oui / Non
    pub maintenance_flag: Cell,
}

impl RawRecord {
    pub const COLUMNS: usize = 18;

    /// Build a record from positional fields; missing trailing fields are
    /// left empty.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Self {
        let cell = |i: usize| {
            fields
                .get(i)
                .map(|f| Cell::from_field(f.as_ref()))
                .unwrap_or_default()
        };
        RawRecord {
            construction_status: cell(0),
            quote: cell(1),
            affair: cell(2),
            site: cell(3),
            address: cell(4),
            contact: cell(5),
            description: cell(6),
            brand: cell(7),
            terminals: cell(8),
            affair_date: cell(9),
            works_end_date: cell(10),
            maintenance_1: cell(11),
            maintenance_2: cell(12),
            invoice_date: cell(13),
            contract_date: cell(14),
            invoice: cell(15),
            affair_ref: cell(16),
            maintenance_flag: cell(17),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MaintenanceStatus {
    Done,
    Planned,
    NotApplicable,
    Unknown,
}

impl MaintenanceStatus {
    pub fn label(self) -> &'static str {
        match self {
            MaintenanceStatus::Done => "Réalisée",
            MaintenanceStatus::Planned => "À planifier",
            MaintenanceStatus::NotApplicable => "Sans objet",
            MaintenanceStatus::Unknown => "Non renseignée",
        }
    }

    /// Done or not applicable: nothing left to schedule for this period.
    pub fn is_settled(self) -> bool {
        matches!(self, MaintenanceStatus::Done | MaintenanceStatus::NotApplicable)
    }
}

impl fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContractStage {
    Active,
    RenewalDue,
    Expired,
    Completed,
    NotApplicable,
    NeedsData,
}

impl ContractStage {
    pub const ALL: [ContractStage; 6] = [
        ContractStage::Active,
        ContractStage::RenewalDue,
        ContractStage::Expired,
        ContractStage::Completed,
        ContractStage::NotApplicable,
        ContractStage::NeedsData,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ContractStage::Active => "En cours",
            ContractStage::RenewalDue => "Reconduction",
            ContractStage::Expired => "Expiré",
            ContractStage::Completed => "Terminé",
            ContractStage::NotApplicable => "Sans Objet",
            ContractStage::NeedsData => "À renseigner",
        }
    }
}

impl fmt::Display for ContractStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked charging site after classification. Built once per load and
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedSite {
    pub id: String,
    /// Position of the source row in the loaded batch.
    pub row: usize,
    pub construction_status: String,
    pub has_maintenance_contract: bool,
    pub site_name: String,
    pub address: String,
    pub description: String,
    pub terminals_raw: String,
    pub contact: String,
    pub brand: String,
    pub affair_date: Option<NaiveDate>,
    pub contract_start: Option<NaiveDate>,
    pub works_end_date: Option<NaiveDate>,
    /// Period cells for display: serial dates as dd/mm/yyyy, anything else
    /// as entered.
    pub maintenance_1_text: String,
    pub maintenance_2_text: String,
    pub maintenance_1: MaintenanceStatus,
    pub maintenance_2: MaintenanceStatus,
    pub contract_age_years: i32,
    pub contract_stage: ContractStage,
    /// 0 or 1: whether any visit is waiting to be scheduled on this line.
    pub maintenance_needed: u8,
    pub is_late: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryView {
    pub with_maintenance: usize,
    pub without_maintenance: usize,
    pub total_sites: usize,
    /// Sum of the per-line 0/1 flag.
    pub maintenance_needed: u32,
    /// Every planned period, both columns, uncapped.
    pub maintenance_planned_total: u32,
    pub maintenance_done_total: u32,
    pub renewal_due: usize,
    pub expired: usize,
    pub late: usize,
    pub total_terminals: u32,
    pub terminals_by_region: BTreeMap<String, u32>,
    pub sites_by_type: BTreeMap<String, usize>,
    pub terminals_by_year: BTreeMap<i32, u32>,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RegionRow {
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Terminals")]
    #[tabled(rename = "Terminals")]
    pub terminals: u32,
    #[serde(rename = "MapX")]
    #[tabled(rename = "MapX")]
    pub map_x: String,
    #[serde(rename = "MapY")]
    #[tabled(rename = "MapY")]
    pub map_y: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TypeRow {
    #[serde(rename = "TerminalType")]
    #[tabled(rename = "TerminalType")]
    pub terminal_type: String,
    #[serde(rename = "Sites")]
    #[tabled(rename = "Sites")]
    pub sites: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct YearRow {
    #[serde(rename = "Year")]
    #[tabled(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Terminals")]
    #[tabled(rename = "Terminals")]
    pub terminals: u32,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PlanningRow {
    #[serde(rename = "ID")]
    #[tabled(rename = "ID")]
    pub id: String,
    #[serde(rename = "Site")]
    #[tabled(rename = "Site")]
    pub site: String,
    #[serde(rename = "Contract")]
    #[tabled(rename = "Contract")]
    pub contract_stage: String,
    #[serde(rename = "ContractStart")]
    #[tabled(rename = "ContractStart")]
    pub contract_start: String,
    #[serde(rename = "Year2")]
    #[tabled(rename = "Year2")]
    pub maintenance_1: String,
    #[serde(rename = "Year3")]
    #[tabled(rename = "Year3")]
    pub maintenance_2: String,
    #[serde(rename = "Late")]
    #[tabled(rename = "Late")]
    pub late: String,
}

/// One site in a filtered listing.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct SiteRow {
    #[serde(rename = "ID")]
    #[tabled(rename = "ID")]
    pub id: String,
    #[serde(rename = "Site")]
    #[tabled(rename = "Site")]
    pub site: String,
    #[serde(rename = "Department")]
    #[tabled(rename = "Department")]
    pub department: String,
    #[serde(rename = "Maintenance")]
    #[tabled(rename = "Maintenance")]
    pub maintenance_contract: String,
    #[serde(rename = "Contract")]
    #[tabled(rename = "Contract")]
    pub contract_stage: String,
    #[serde(rename = "ToSchedule")]
    #[tabled(rename = "ToSchedule")]
    pub action: String,
    #[serde(rename = "Late")]
    #[tabled(rename = "Late")]
    pub late: String,
}

/// One labelled line of the single-site detail view.
#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct DetailRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

/// Flat export layout, one column per human-readable label.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ExportRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Site")]
    pub site: String,
    #[serde(rename = "Adresse")]
    pub address: String,
    #[serde(rename = "Interlocuteur")]
    pub contact: String,
    #[serde(rename = "Bornes")]
    pub terminals: String,
    #[serde(rename = "Marque")]
    pub brand: String,
    #[serde(rename = "Statut Construction")]
    pub construction_status: String,
    #[serde(rename = "Date Fin Chantier")]
    pub works_end_date: String,
    #[serde(rename = "Contrat Maintenance")]
    pub maintenance_contract: String,
    #[serde(rename = "Date Début Contrat")]
    pub contract_start: String,
    #[serde(rename = "Statut Contrat (Calculé)")]
    pub contract_stage: String,
    #[serde(rename = "Maintenance An 2")]
    pub maintenance_1: String,
    #[serde(rename = "Date Maint. An 2")]
    pub maintenance_1_date: String,
    #[serde(rename = "Maintenance An 3")]
    pub maintenance_2: String,
    #[serde(rename = "Date Maint. An 3")]
    pub maintenance_2_date: String,
    #[serde(rename = "Action Requise")]
    pub action: String,
    #[serde(rename = "Retard")]
    pub late: String,
}
