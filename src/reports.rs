use crate::region;
use crate::terminals;
use crate::types::{
    ClassifiedSite, ContractStage, MaintenanceStatus, PlanningRow, RegionRow, SiteRow, SummaryView,
    TypeRow, YearRow,
};
use crate::util::{format_date, site_name_or_default, yes_no};
use chrono::Datelike;
use std::cmp::Ordering;
use tracing::debug;

/// Fold classified sites into the dashboard counters and groupings.
///
/// Accepts any iterator so the same summary can be computed on a filtered
/// subset without cloning sites.
pub fn summarize<'a, I>(sites: I) -> SummaryView
where
    I: IntoIterator<Item = &'a ClassifiedSite>,
{
    let mut view = SummaryView::default();
    for site in sites {
        view.total_sites += 1;
        if site.has_maintenance_contract {
            view.with_maintenance += 1;
        } else {
            view.without_maintenance += 1;
        }

        view.maintenance_needed += u32::from(site.maintenance_needed);
        for status in [site.maintenance_1, site.maintenance_2] {
            match status {
                MaintenanceStatus::Planned => view.maintenance_planned_total += 1,
                MaintenanceStatus::Done => view.maintenance_done_total += 1,
                MaintenanceStatus::NotApplicable | MaintenanceStatus::Unknown => {}
            }
        }

        match site.contract_stage {
            ContractStage::RenewalDue => view.renewal_due += 1,
            ContractStage::Expired => view.expired += 1,
            _ => {}
        }
        if site.is_late {
            view.late += 1;
        }

        let count = terminals::quantity(&site.terminals_raw);
        view.total_terminals = view.total_terminals.saturating_add(count);
        let in_region = view
            .terminals_by_region
            .entry(region::department(&site.address))
            .or_insert(0);
        *in_region = in_region.saturating_add(count);
        *view
            .sites_by_type
            .entry(terminals::type_label(&site.terminals_raw))
            .or_insert(0) += 1;
        if let Some(year) = reference_year(site) {
            let in_year = view.terminals_by_year.entry(year).or_insert(0);
            *in_year = in_year.saturating_add(count);
        }
    }
    debug!(sites = view.total_sites, terminals = view.total_terminals, "summary computed");
    view
}

/// Year a site is counted under: affair date, else end of works, else
/// contract start.
pub fn reference_year(site: &ClassifiedSite) -> Option<i32> {
    site.affair_date
        .or(site.works_end_date)
        .or(site.contract_start)
        .map(|d| d.year())
}

/// Terminals per department, largest first, with map coordinates when the
/// department is on the reference map.
pub fn region_report(view: &SummaryView) -> Vec<RegionRow> {
    let mut rows: Vec<RegionRow> = view
        .terminals_by_region
        .iter()
        .map(|(dept, terminals)| {
            let point = region::map_point(dept);
            RegionRow {
                department: dept.clone(),
                terminals: *terminals,
                map_x: point.map(|p| p.x.to_string()).unwrap_or_else(|| "-".to_string()),
                map_y: point.map(|p| p.y.to_string()).unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.terminals
            .cmp(&a.terminals)
            .then_with(|| a.department.cmp(&b.department))
    });
    rows
}

pub fn type_report(view: &SummaryView) -> Vec<TypeRow> {
    let mut rows: Vec<TypeRow> = view
        .sites_by_type
        .iter()
        .map(|(label, sites)| TypeRow { terminal_type: label.clone(), sites: *sites })
        .collect();
    rows.sort_by(|a, b| b.sites.cmp(&a.sites).then_with(|| a.terminal_type.cmp(&b.terminal_type)));
    rows
}

/// Ascending by year.
pub fn year_report(view: &SummaryView) -> Vec<YearRow> {
    view.terminals_by_year
        .iter()
        .map(|(year, terminals)| YearRow { year: *year, terminals: *terminals })
        .collect()
}

/// Sites with a visit to schedule: late ones first, then oldest contract
/// first, sites without a start date last.
pub fn planning_report<'a, I>(sites: I) -> Vec<PlanningRow>
where
    I: IntoIterator<Item = &'a ClassifiedSite>,
{
    let mut pending: Vec<&ClassifiedSite> = sites
        .into_iter()
        .filter(|s| s.maintenance_needed > 0)
        .collect();
    pending.sort_by(|a, b| {
        b.is_late
            .cmp(&a.is_late)
            .then_with(|| match (a.contract_start, b.contract_start) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
    });
    pending
        .into_iter()
        .map(|s| PlanningRow {
            id: s.id.clone(),
            site: site_name_or_default(&s.site_name).to_string(),
            contract_stage: s.contract_stage.to_string(),
            contract_start: format_date(s.contract_start),
            maintenance_1: s.maintenance_1.to_string(),
            maintenance_2: s.maintenance_2.to_string(),
            late: yes_no(s.is_late).to_string(),
        })
        .collect()
}

/// One listing line per site, in input order.
pub fn site_rows<'a, I>(sites: I) -> Vec<SiteRow>
where
    I: IntoIterator<Item = &'a ClassifiedSite>,
{
    sites
        .into_iter()
        .map(|s| SiteRow {
            id: s.id.clone(),
            site: site_name_or_default(&s.site_name).to_string(),
            department: region::department(&s.address),
            maintenance_contract: yes_no(s.has_maintenance_contract).to_string(),
            contract_stage: s.contract_stage.to_string(),
            action: if s.maintenance_needed > 0 { "À PLANIFIER" } else { "AUCUNE" }.to_string(),
            late: yes_no(s.is_late).to_string(),
        })
        .collect()
}
