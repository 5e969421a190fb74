// Per-row derivation: maintenance period statuses, contract start date,
// contract stage, lateness and the "action needed" flag.
//
// Everything here is a pure function of one `RawRecord` and the evaluation
// date; nothing reads the clock.
use chrono::NaiveDate;

use crate::dates;
use crate::text::{self, normalize_cell};
use crate::types::{Cell, ClassifiedSite, ContractStage, MaintenanceStatus, RawRecord};

/// Contract age at which a renewal has to be negotiated.
pub const RENEWAL_AFTER_YEARS: i32 = 3;
/// Contract age past which the contract is considered over.
pub const EXPIRED_AFTER_YEARS: i32 = 5;

/// Rules for reading a maintenance period cell, tried in `ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRule {
    Blank,
    ToSchedule,
    NotApplicable,
    Handled,
    Fallback,
}

impl StatusRule {
    pub const ORDER: [StatusRule; 5] = [
        StatusRule::Blank,
        StatusRule::ToSchedule,
        StatusRule::NotApplicable,
        StatusRule::Handled,
        StatusRule::Fallback,
    ];

    fn matches(self, cell: &Cell, normalized: &str) -> bool {
        match self {
            StatusRule::Blank => cell.is_empty(),
            StatusRule::ToSchedule => text::contains(normalized, "a planifier"),
            StatusRule::NotApplicable => {
                text::equals_any(normalized, &["na", "n/a", "so", "s.o"])
            }
            // A date, an "RDM ..." note (report de maintenance) or any longer
            // remark means the visit is no longer waiting to be planned.
            StatusRule::Handled => {
                text::contains(normalized, "rdm")
                    || dates::parse_cell(cell).is_some()
                    || cell.text().trim().chars().count() > 5
            }
            StatusRule::Fallback => true,
        }
    }

    pub fn status(self) -> MaintenanceStatus {
        match self {
            StatusRule::Blank | StatusRule::Fallback => MaintenanceStatus::Unknown,
            StatusRule::ToSchedule => MaintenanceStatus::Planned,
            StatusRule::NotApplicable => MaintenanceStatus::NotApplicable,
            StatusRule::Handled => MaintenanceStatus::Done,
        }
    }
}

/// First rule matching the cell. `Fallback` always matches.
pub fn matching_status_rule(cell: &Cell) -> StatusRule {
    let normalized = normalize_cell(cell);
    StatusRule::ORDER
        .into_iter()
        .find(|rule| rule.matches(cell, &normalized))
        .unwrap_or(StatusRule::Fallback)
}

pub fn maintenance_status(cell: &Cell) -> MaintenanceStatus {
    matching_status_rule(cell).status()
}

/// Contract start: column O, falling back to the invoice date (N) for sites
/// under contract when O is blank, unreadable or says "pas de contrat".
pub fn resolve_contract_start(record: &RawRecord, has_contract: bool) -> Option<NaiveDate> {
    let from_contract = dates::parse_cell(&record.contract_date);
    let no_contract_note = text::contains(&normalize_cell(&record.contract_date), "pas de contrat");
    if has_contract && (from_contract.is_none() || no_contract_note) {
        if let Some(invoice) = dates::parse_cell(&record.invoice_date) {
            return Some(invoice);
        }
    }
    from_contract
}

pub fn contract_stage(
    has_contract: bool,
    start: Option<NaiveDate>,
    period_1: MaintenanceStatus,
    period_2: MaintenanceStatus,
    today: NaiveDate,
) -> ContractStage {
    if !has_contract {
        return ContractStage::NotApplicable;
    }
    let Some(start) = start else {
        return ContractStage::NeedsData;
    };
    let age = dates::whole_years(start, today);
    if age >= EXPIRED_AFTER_YEARS {
        ContractStage::Expired
    } else if age >= RENEWAL_AFTER_YEARS {
        ContractStage::RenewalDue
    } else if period_1.is_settled() && period_2.is_settled() {
        ContractStage::Completed
    } else {
        ContractStage::Active
    }
}

/// Year-2 visit still to schedule more than a year after start, or year-3
/// visit still to schedule more than two years after start.
pub fn is_late(
    start: Option<NaiveDate>,
    period_1: MaintenanceStatus,
    period_2: MaintenanceStatus,
    today: NaiveDate,
) -> bool {
    let Some(start) = start else {
        return false;
    };
    let overdue = |years: u32| dates::add_years(start, years).is_some_and(|due| due < today);
    (period_1 == MaintenanceStatus::Planned && overdue(1))
        || (period_2 == MaintenanceStatus::Planned && overdue(2))
}

/// 1 when either period is waiting to be scheduled, capped at one per line.
pub fn maintenance_needed(period_1: MaintenanceStatus, period_2: MaintenanceStatus) -> u8 {
    if period_1 == MaintenanceStatus::Planned || period_2 == MaintenanceStatus::Planned {
        1
    } else {
        0
    }
}

/// Derive the classified site for the record at position `row`. The caller
/// is expected to have applied the construction-status filter already.
pub fn classify_record(row: usize, record: &RawRecord, today: NaiveDate) -> ClassifiedSite {
    let has_contract = text::is_yes(&record.maintenance_flag);
    let contract_start = resolve_contract_start(record, has_contract);
    let maintenance_1 = maintenance_status(&record.maintenance_1);
    let maintenance_2 = maintenance_status(&record.maintenance_2);
    let contract_stage =
        contract_stage(has_contract, contract_start, maintenance_1, maintenance_2, today);
    let contract_age_years = match (has_contract, contract_start) {
        (true, Some(start)) => dates::whole_years(start, today),
        _ => 0,
    };

    let affair = record.affair.text();
    let id = if affair.trim().is_empty() {
        format!("{row}-no-id")
    } else {
        format!("{row}-{}", affair.trim())
    };

    ClassifiedSite {
        id,
        row,
        construction_status: record.construction_status.text().trim().to_string(),
        has_maintenance_contract: has_contract,
        site_name: record.site.text(),
        address: record.address.text(),
        description: record.description.text(),
        terminals_raw: record.terminals.text(),
        contact: record.contact.text(),
        brand: record.brand.text(),
        affair_date: dates::parse_cell(&record.affair_date),
        contract_start,
        works_end_date: dates::parse_cell(&record.works_end_date),
        maintenance_1_text: dates::display_cell(&record.maintenance_1),
        maintenance_2_text: dates::display_cell(&record.maintenance_2),
        maintenance_1,
        maintenance_2,
        contract_age_years,
        contract_stage,
        maintenance_needed: maintenance_needed(maintenance_1, maintenance_2),
        is_late: is_late(contract_start, maintenance_1, maintenance_2, today),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MaintenanceStatus::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn text(s: &str) -> Cell {
        Cell::Text(s.to_string())
    }

    const TODAY: (i32, u32, u32) = (2025, 6, 1);

    fn today() -> NaiveDate {
        d(TODAY.0, TODAY.1, TODAY.2)
    }

    #[test]
    fn test_rule_blank() {
        assert_eq!(matching_status_rule(&Cell::Empty), StatusRule::Blank);
        assert_eq!(maintenance_status(&text("   ")), Unknown);
    }

    #[test]
    fn test_rule_to_schedule_ignores_accents() {
        assert_eq!(maintenance_status(&text("à planifier")), Planned);
        assert_eq!(maintenance_status(&text("a planifier")), Planned);
        assert_eq!(maintenance_status(&text("A PLANIFIER en 2025")), Planned);
    }

    #[test]
    fn test_rule_not_applicable() {
        for value in ["NA", "n/a", "SO", "s.o", " so "] {
            assert_eq!(maintenance_status(&text(value)), NotApplicable, "{value}");
        }
    }

    #[test]
    fn test_rule_handled() {
        assert_eq!(matching_status_rule(&text("RDM OK")), StatusRule::Handled);
        assert_eq!(maintenance_status(&text("rdm")), Done);
        assert_eq!(maintenance_status(&text("12/04/2023")), Done);
        assert_eq!(maintenance_status(&Cell::from(45000.0)), Done);
        assert_eq!(maintenance_status(&text("faite le mois dernier")), Done);
    }

    #[test]
    fn test_rule_fallback() {
        assert_eq!(matching_status_rule(&text("ok")), StatusRule::Fallback);
        assert_eq!(maintenance_status(&text("12345")), Unknown);
    }

    #[test]
    fn test_planned_wins_over_long_text() {
        // Long enough to count as handled, but the planning keyword comes first.
        assert_eq!(maintenance_status(&text("Maintenance à planifier")), Planned);
    }

    #[test]
    fn test_start_prefers_contract_date() {
        let rec = RawRecord::from_fields(&[
            "Réalisé", "", "", "", "", "", "", "", "", "", "", "", "", "01/02/2021", "15/03/2021",
        ]);
        assert_eq!(resolve_contract_start(&rec, true), Some(d(2021, 3, 15)));
    }

    #[test]
    fn test_start_falls_back_to_invoice() {
        let mut rec = RawRecord::default();
        rec.invoice_date = text("10/01/2022");
        assert_eq!(resolve_contract_start(&rec, true), Some(d(2022, 1, 10)));

        rec.contract_date = text("Pas de contrat");
        assert_eq!(resolve_contract_start(&rec, true), Some(d(2022, 1, 10)));
    }

    #[test]
    fn test_start_no_fallback_without_contract() {
        let mut rec = RawRecord::default();
        rec.invoice_date = text("10/01/2022");
        assert_eq!(resolve_contract_start(&rec, false), None);
    }

    #[test]
    fn test_stage_without_contract_ignores_dates() {
        let stage = contract_stage(false, Some(d(2010, 1, 1)), Planned, Planned, today());
        assert_eq!(stage, ContractStage::NotApplicable);
    }

    #[test]
    fn test_stage_needs_data() {
        assert_eq!(contract_stage(true, None, Done, Done, today()), ContractStage::NeedsData);
    }

    #[test]
    fn test_stage_thresholds() {
        let now = today();
        assert_eq!(contract_stage(true, Some(d(2021, 6, 1)), Unknown, Unknown, now), ContractStage::RenewalDue);
        assert_eq!(contract_stage(true, Some(d(2019, 6, 1)), Unknown, Unknown, now), ContractStage::Expired);
        assert_eq!(contract_stage(true, Some(d(2020, 6, 1)), Done, Done, now), ContractStage::Expired);
        assert_eq!(contract_stage(true, Some(d(2022, 6, 1)), Unknown, Unknown, now), ContractStage::RenewalDue);
        assert_eq!(contract_stage(true, Some(d(2024, 6, 1)), Done, NotApplicable, now), ContractStage::Completed);
        assert_eq!(contract_stage(true, Some(d(2024, 6, 1)), Unknown, Done, now), ContractStage::Active);
        assert_eq!(contract_stage(true, Some(d(2024, 6, 1)), Done, Planned, now), ContractStage::Active);
    }

    #[test]
    fn test_late_first_period() {
        let now = today();
        assert!(is_late(Some(d(2024, 5, 31)), Planned, Unknown, now));
        assert!(!is_late(Some(d(2024, 6, 1)), Planned, Unknown, now));
        assert!(!is_late(Some(d(2020, 1, 1)), Done, Done, now));
    }

    #[test]
    fn test_late_second_period() {
        let now = today();
        assert!(is_late(Some(d(2023, 1, 1)), Done, Planned, now));
        assert!(!is_late(Some(d(2024, 1, 1)), Done, Planned, now));
    }

    #[test]
    fn test_late_on_anniversary_day() {
        let now = today();
        // Due dates falling on today are not late yet, the day after they are.
        assert!(!is_late(Some(d(2024, 6, 1)), Planned, Done, now));
        assert!(is_late(Some(d(2024, 5, 31)), Planned, Done, now));
        assert!(!is_late(Some(d(2023, 6, 1)), Done, Planned, now));
        assert!(is_late(Some(d(2023, 5, 31)), Done, Planned, now));
    }

    #[test]
    fn test_late_requires_start() {
        assert!(!is_late(None, Planned, Planned, today()));
    }

    #[test]
    fn test_needed_is_capped() {
        assert_eq!(maintenance_needed(Planned, Planned), 1);
        assert_eq!(maintenance_needed(Done, Planned), 1);
        assert_eq!(maintenance_needed(Planned, Unknown), 1);
        assert_eq!(maintenance_needed(Done, NotApplicable), 0);
    }

    #[test]
    fn test_classify_record_fallback_scenario() {
        let rec = RawRecord::from_fields(&[
            "Réalisé", "DV-1", "AF-7", "Parking Mairie", "12 Rue de Paris, 75015 Paris", "M. Martin",
            "", "Wallbox", "2x22kW", "", "", "a planifier", "", "10/01/2022", "", "", "", "Oui",
        ]);
        let site = classify_record(3, &rec, today());
        assert_eq!(site.id, "3-AF-7");
        assert!(site.has_maintenance_contract);
        assert_eq!(site.contract_start, Some(d(2022, 1, 10)));
        assert_eq!(site.contract_stage, ContractStage::RenewalDue);
        assert_eq!(site.contract_age_years, 3);
        assert_eq!(site.maintenance_needed, 1);
        assert!(site.is_late);
    }

    #[test]
    fn test_classify_record_without_affair() {
        let rec = RawRecord::from_fields(&["En cours"]);
        let site = classify_record(0, &rec, today());
        assert_eq!(site.id, "0-no-id");
        assert!(!site.has_maintenance_contract);
        assert_eq!(site.contract_stage, ContractStage::NotApplicable);
        assert_eq!(site.contract_age_years, 0);
    }

    #[test]
    fn test_classify_record_keeps_numeric_text() {
        let rec = RawRecord::from_fields(&[
            "Réalisé", "", "007", "Gare", "", "0612345678", "", "", "", "", "", "44197", "a planifier",
        ]);
        let site = classify_record(0, &rec, today());
        assert_eq!(site.id, "0-007");
        assert_eq!(site.contact, "0612345678");
        assert_eq!(site.maintenance_1, Done);
        assert_eq!(site.maintenance_1_text, "01/01/2021");
        assert_eq!(site.maintenance_2_text, "a planifier");
    }
}
