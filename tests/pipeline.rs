use chrono::NaiveDate;
use ev_site_report::loader::{classify_batch, load_from_reader};
use ev_site_report::reports::{summarize, year_report};
use ev_site_report::types::{ContractStage, MaintenanceStatus, RawRecord};

fn pinned_today() -> NaiveDate {
    // About 3.4 years after 2022-01-10.
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

const SHEET: &str = "\
Statut,Devis,Affaire,Site,Adresse,Interlocuteur,Descriptif,Marque,Bornes,Date Affaire,Date Fin,Maint 1,Maint 2,Date Facture,Date Contrat,Facture,Ref,Maintenance
Réalisé,DV-1,AF-1,Mairie,\"12 Rue de Paris, 75015 Paris\",M. Martin,Pose,Hager,2x22kW,,,a planifier,,10/01/2022,,F-1,R-1,Oui
Annulé,DV-2,AF-2,Gare,\"1 av, 69001 Lyon\",,,,Double 22kW,05/05/2021,,a planifier,a planifier,10/01/2022,,,,Oui
En cours,DV-3,AF-3,Camping,\"Route, 13000 Marseille\",,,,3x22kW + 1x7.4kW,12/03/2020,,,,,,,,Non
Realise,DV-4,AF-4,Hôtel,\"2 quai, 33000 Bordeaux\",,,,7kW,,44197,RDM OK,NA,,15/06/2024,,,OUI
NA,,,,,,,,,,,,,,,,,
";

#[test]
fn end_to_end_invoice_fallback() {
    let (batch, _) = load_from_reader(SHEET.as_bytes(), pinned_today()).unwrap();
    let site = batch.sites.iter().find(|s| s.id.ends_with("AF-1")).unwrap();

    assert!(site.has_maintenance_contract);
    assert_eq!(site.contract_start, NaiveDate::from_ymd_opt(2022, 1, 10));
    assert_eq!(site.contract_stage, ContractStage::RenewalDue);
    assert_eq!(site.maintenance_1, MaintenanceStatus::Planned);
    assert_eq!(site.maintenance_2, MaintenanceStatus::Unknown);
    assert_eq!(site.maintenance_needed, 1);
    assert!(site.is_late);
}

#[test]
fn cancelled_rows_are_absent_everywhere() {
    let (batch, report) = load_from_reader(SHEET.as_bytes(), pinned_today()).unwrap();

    assert!(batch.sites.iter().all(|s| !s.id.ends_with("AF-2")));
    assert_eq!(report.excluded_rows, 2);
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(report.kept_sites, 3);

    let view = summarize(&batch.sites);
    assert_eq!(view.total_sites, 3);
    // The cancelled Lyon row would have added two planned visits and a "69" key.
    assert_eq!(view.maintenance_planned_total, 1);
    assert!(!view.terminals_by_region.contains_key("69"));
    assert_eq!(view.total_terminals, 2 + 4 + 1);
}

#[test]
fn serial_dates_and_completed_contract() {
    let (batch, _) = load_from_reader(SHEET.as_bytes(), pinned_today()).unwrap();
    let site = batch.sites.iter().find(|s| s.id.ends_with("AF-4")).unwrap();

    assert_eq!(site.works_end_date, NaiveDate::from_ymd_opt(2021, 1, 1));
    assert_eq!(site.contract_stage, ContractStage::Completed);
    assert_eq!(site.maintenance_needed, 0);
    assert!(!site.is_late);
}

#[test]
fn contract_flag_is_exactly_oui() {
    let (batch, _) = load_from_reader(SHEET.as_bytes(), pinned_today()).unwrap();
    let flags: Vec<(String, bool)> = batch
        .sites
        .iter()
        .map(|s| (s.id.clone(), s.has_maintenance_contract))
        .collect();
    assert_eq!(
        flags,
        vec![
            ("1-AF-1".to_string(), true),
            ("3-AF-3".to_string(), false),
            ("4-AF-4".to_string(), true),
        ]
    );
}

#[test]
fn rerun_is_identical() {
    let first = load_from_reader(SHEET.as_bytes(), pinned_today()).unwrap();
    let second = load_from_reader(SHEET.as_bytes(), pinned_today()).unwrap();
    assert_eq!(first, second);
    assert_eq!(summarize(&first.0.sites), summarize(&second.0.sites));
}

#[test]
fn year_keys_are_ascending() {
    let (batch, _) = load_from_reader(SHEET.as_bytes(), pinned_today()).unwrap();
    let mut sites = batch.sites.clone();
    sites.reverse();
    let years: Vec<i32> = year_report(&summarize(&sites)).iter().map(|r| r.year).collect();
    // AF-1: contract start 2022; AF-3: affair date 2020; AF-4: end of works 2021.
    assert_eq!(years, vec![2020, 2021, 2022]);
}

#[test]
fn stage_thresholds_against_pinned_date() {
    let today = pinned_today();
    let record = |start: &str, l: &str, m: &str| {
        let mut fields = vec![""; 18];
        fields[0] = "Réalisé";
        fields[11] = l;
        fields[12] = m;
        fields[14] = start;
        fields[17] = "Oui";
        RawRecord::from_fields(&fields)
    };
    let records = vec![
        record("01/06/2021", "", ""),
        record("01/06/2019", "", ""),
        record("01/06/2024", "RDM OK", "NA"),
        record("01/06/2024", "", "RDM OK"),
    ];
    let (sites, _) = classify_batch(&records, today);
    let stages: Vec<ContractStage> = sites.iter().map(|s| s.contract_stage).collect();
    assert_eq!(
        stages,
        vec![
            ContractStage::RenewalDue,
            ContractStage::Expired,
            ContractStage::Completed,
            ContractStage::Active,
        ]
    );
}
