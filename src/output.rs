use crate::error::Result;
use crate::dates;
use crate::types::{ClassifiedSite, DetailRow, ExportRow, RawRecord};
use crate::util::{format_date, site_name_or_default, yes_no};
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_csv_to<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_csv_to(file, rows)
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}\n", table_str);
}

/// Flatten a site into the labelled export layout.
pub fn export_row(site: &ClassifiedSite) -> ExportRow {
    ExportRow {
        id: site.id.clone(),
        site: site_name_or_default(&site.site_name).to_string(),
        address: site.address.clone(),
        contact: site.contact.clone(),
        terminals: site.terminals_raw.clone(),
        brand: site.brand.clone(),
        construction_status: site.construction_status.clone(),
        works_end_date: format_date(site.works_end_date),
        maintenance_contract: yes_no(site.has_maintenance_contract).to_string(),
        contract_start: format_date(site.contract_start),
        contract_stage: site.contract_stage.to_string(),
        maintenance_1: site.maintenance_1.to_string(),
        maintenance_1_date: site.maintenance_1_text.clone(),
        maintenance_2: site.maintenance_2.to_string(),
        maintenance_2_date: site.maintenance_2_text.clone(),
        action: if site.maintenance_needed > 0 { "À PLANIFIER" } else { "AUCUNE" }.to_string(),
        late: yes_no(site.is_late).to_string(),
    }
}

pub fn export_rows<'a, I>(sites: I) -> Vec<ExportRow>
where
    I: IntoIterator<Item = &'a ClassifiedSite>,
{
    sites.into_iter().map(export_row).collect()
}

/// Field/value lines for one site: the classified view plus the source
/// columns that only matter when looking at a single site.
pub fn site_detail(site: &ClassifiedSite, record: &RawRecord) -> Vec<DetailRow> {
    let line = |field: &str, value: String| DetailRow { field: field.to_string(), value };
    vec![
        line("ID", site.id.clone()),
        line("Site", site_name_or_default(&site.site_name).to_string()),
        line("Adresse", site.address.clone()),
        line("Interlocuteur", site.contact.clone()),
        line("Marque", site.brand.clone()),
        line("Bornes", site.terminals_raw.clone()),
        line("Descriptif", site.description.clone()),
        line("Devis", record.quote.text()),
        line("Affaire", record.affair.text()),
        line("Date Affaire", dates::display_cell(&record.affair_date)),
        line("Statut Construction", site.construction_status.clone()),
        line("Date Fin Chantier", dates::display_cell(&record.works_end_date)),
        line("Facture", record.invoice.text()),
        line("Date Facture", dates::display_cell(&record.invoice_date)),
        line("Réf. Affaire", record.affair_ref.text()),
        line("Contrat Maintenance", yes_no(site.has_maintenance_contract).to_string()),
        line("Date Début Contrat", format_date(site.contract_start)),
        line("Statut Contrat", site.contract_stage.to_string()),
        line("Maintenance An 2", format!("{} ({})", site.maintenance_1, site.maintenance_1_text)),
        line("Maintenance An 3", format!("{} ({})", site.maintenance_2, site.maintenance_2_text)),
        line("Retard", yes_no(site.is_late).to_string()),
    ]
}
