// Entry point and interactive CLI flow.
//
// - Option [1] loads the tracking sheet (CSV export, columns A..R), filters
//   and classifies the rows, and prints load diagnostics.
// - Option [2] writes the summary, the grouped reports and the labelled
//   export, and previews each report.
// - Option [3] lists the sites whose maintenance is late.
// - Option [4] shows one site in detail, source columns included.
// - Option [5] lists the sites matching a set of filter answers.
use ev_site_report::config::Settings;
use ev_site_report::filter::{self, SiteFilter};
use ev_site_report::loader::{self, Batch};
use ev_site_report::{output, reports, util};
use std::io::{self, Write};
use tracing::{error, info};

/// Everything loaded in this session. Reports are recomputed from `batch`
/// on every request.
struct AppState {
    settings: Settings,
    batch: Option<Batch>,
}

/// `None` once stdin is closed.
fn read_choice() -> Option<String> {
    prompt("Enter choice: ")
}

fn prompt(label: &str) -> Option<String> {
    print!("{}", label);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        if io::stdin().read_line(&mut buf).unwrap_or(0) == 0 {
            return false;
        }
        match buf.trim().to_uppercase().as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

fn handle_load(state: &mut AppState) {
    let today = state.settings.evaluation_date();
    match loader::load_file(&state.settings.input, today) {
        Ok((batch, load_report)) => {
            println!(
                "Processing sheet... ({} rows read, {} sites kept, evaluated on {})",
                util::format_int(load_report.total_rows),
                util::format_int(load_report.kept_sites),
                util::format_date(Some(today))
            );
            println!(
                "Note: {} rows cancelled or not applicable, {} rows without a done/in-progress status.",
                util::format_int(load_report.excluded_rows),
                util::format_int(load_report.dropped_rows)
            );
            if load_report.read_errors > 0 {
                println!(
                    "Warning: {} unreadable rows skipped.",
                    util::format_int(load_report.read_errors)
                );
            }
            println!();
            state.batch = Some(batch);
        }
        Err(e) => {
            error!(error = %e, input = %state.settings.input.display(), "load failed");
            eprintln!("Failed to load file: {}\n", e);
        }
    }
}

fn write_or_log<F>(file: &str, write: F)
where
    F: FnOnce() -> ev_site_report::Result<()>,
{
    if let Err(e) = write() {
        error!(error = %e, file, "write failed");
        eprintln!("Write error: {}", e);
    }
}

fn handle_generate_reports(state: &AppState) {
    let Some(batch) = &state.batch else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let settings = &state.settings;

    println!("Generating reports...");
    let summary = reports::summarize(&batch.sites);

    let summary_file = settings.output_path("summary.json");
    write_or_log("summary.json", || output::write_json(&summary_file, &summary));
    println!("Summary (summary.json):");
    println!(
        "  sites: {} (maintenance: {} yes / {} no)",
        util::format_int(summary.total_sites),
        util::format_int(summary.with_maintenance),
        util::format_int(summary.without_maintenance)
    );
    println!(
        "  to schedule: {} lines, {} visits; done: {}",
        util::format_int(summary.maintenance_needed),
        util::format_int(summary.maintenance_planned_total),
        util::format_int(summary.maintenance_done_total)
    );
    println!(
        "  renewals: {}, expired: {}, late: {}, terminals: {}\n",
        util::format_int(summary.renewal_due),
        util::format_int(summary.expired),
        util::format_int(summary.late),
        util::format_int(summary.total_terminals)
    );

    let r1 = reports::region_report(&summary);
    let file1 = "report1_terminals_by_department.csv";
    write_or_log(file1, || output::write_csv(&settings.output_path(file1), &r1));
    println!("Report 1: Terminals by Department\n");
    output::preview_table_rows(&r1, 5);
    println!("(Full table exported to {})\n", file1);

    let r2 = reports::type_report(&summary);
    let file2 = "report2_sites_by_type.csv";
    write_or_log(file2, || output::write_csv(&settings.output_path(file2), &r2));
    println!("Report 2: Sites by Terminal Type\n");
    output::preview_table_rows(&r2, 5);
    println!("(Full table exported to {})\n", file2);

    let r3 = reports::year_report(&summary);
    let file3 = "report3_terminals_by_year.csv";
    write_or_log(file3, || output::write_csv(&settings.output_path(file3), &r3));
    println!("Report 3: Terminals Installed per Year\n");
    output::preview_table_rows(&r3, r3.len());
    println!("(Full table exported to {})\n", file3);

    let r4 = reports::planning_report(&batch.sites);
    let file4 = "report4_planning.csv";
    write_or_log(file4, || output::write_csv(&settings.output_path(file4), &r4));
    println!("Report 4: Maintenance to Schedule\n");
    output::preview_table_rows(&r4, 5);
    println!("(Full table exported to {})\n", file4);

    let export = output::export_rows(&batch.sites);
    let export_file = format!("suivi_bornes_global_{}.csv", settings.evaluation_date().format("%Y-%m-%d"));
    write_or_log(&export_file, || output::write_csv(&settings.output_path(&export_file), &export));
    println!("Consolidated export saved to {}\n", export_file);
    info!(sites = batch.sites.len(), "reports generated");
}

fn handle_late_sites(state: &AppState) {
    let Some(batch) = &state.batch else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let late = SiteFilter::late().apply(&batch.sites);
    println!("Late maintenance: {} sites\n", util::format_int(late.len()));
    let rows = reports::planning_report(late);
    output::preview_table_rows(&rows, rows.len());
}

fn handle_site_detail(state: &AppState) {
    let Some(batch) = &state.batch else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    let Some(id) = prompt("Site ID (as listed, e.g. 12-AF-0042): ") else {
        return;
    };
    let Some(site) = batch.find(&id) else {
        println!("No site with ID {}.\n", id);
        return;
    };
    let Some(record) = batch.record(site) else {
        error!(id = %site.id, row = site.row, "source row missing");
        return;
    };
    let rows = output::site_detail(site, record);
    output::preview_table_rows(&rows, rows.len());
}

fn handle_filtered_list(state: &AppState) {
    let Some(batch) = &state.batch else {
        println!("Error: No data loaded. Please load the CSV file first (option 1).\n");
        return;
    };
    println!("Leave blank to accept any value.");
    let ask = |label: &str| prompt(label).unwrap_or_default();

    let contract = ask("Maintenance contract (oui/non): ");
    let stage = ask("Contract status (En cours, Reconduction, Expiré, Terminé, Sans Objet, À renseigner): ");
    let stage = if stage.trim().is_empty() {
        None
    } else {
        let parsed = filter::stage_from_label(&stage);
        if parsed.is_none() {
            println!("Unknown contract status \"{}\", ignored.", stage.trim());
        }
        parsed
    };
    let action = ask("Maintenance to schedule (oui/non): ");
    let late = ask("Late only (oui/non): ");
    let department = ask("Department (e.g. 75): ");
    let search = ask("Search (name, address, contact, brand): ");

    let site_filter = SiteFilter {
        maintenance_contract: filter::yes_no_answer(&contract),
        stage,
        action_needed: filter::yes_no_answer(&action),
        late_only: filter::yes_no_answer(&late).unwrap_or(false),
        department: Some(department.trim().to_string()).filter(|d| !d.is_empty()),
        search: Some(search.trim().to_string()).filter(|q| !q.is_empty()),
    };
    let found = site_filter.apply(&batch.sites);
    println!("\n{} of {} sites match\n", util::format_int(found.len()), util::format_int(batch.sites.len()));
    let summary = reports::summarize(found.iter().copied());
    println!(
        "  to schedule: {}, late: {}, terminals: {}\n",
        util::format_int(summary.maintenance_needed),
        util::format_int(summary.late),
        util::format_int(summary.total_terminals)
    );
    let rows = reports::site_rows(found);
    output::preview_table_rows(&rows, rows.len());
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "invalid settings");
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let mut state = AppState { settings, batch: None };

    loop {
        println!("EV Charging Sites - Maintenance Tracking");
        println!("[1] Load the file");
        println!("[2] Generate Reports");
        println!("[3] Late Maintenance");
        println!("[4] Site Detail");
        println!("[5] Filter Sites\n");
        let Some(choice) = read_choice() else {
            break;
        };
        match choice.as_str() {
            "1" => {
                handle_load(&mut state);
            }
            "2" => {
                println!();
                handle_generate_reports(&state);
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            "3" => {
                println!();
                handle_late_sites(&state);
            }
            "4" => {
                println!();
                handle_site_detail(&state);
            }
            "5" => {
                println!();
                handle_filtered_list(&state);
            }
            _ => {
                println!("Invalid choice. Please enter 1 to 5.\n");
            }
        }
    }
}
