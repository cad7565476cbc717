use colored::Colorize;
use dyncli_gslb::{DesiredConfig, ReconcileReport, RegionFailure};
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn report_table(desired: &DesiredConfig, report: &ReconcileReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Region", "Serve mode", "Result"]);
    for region in &report.updated {
        builder.push_record([
            region.as_str(),
            desired.serve_mode.as_str(),
            "updated",
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn print_report(desired: &DesiredConfig, report: &ReconcileReport) {
    println!(
        "{}: {}",
        "GSLB service".cyan(),
        desired.resource.to_string().cyan()
    );
    println!("{}: {}", "Label pattern".cyan(), desired.label_pattern);
    if report.is_noop() {
        println!(
            "No pools needed an update ({} regions checked).",
            report.regions_read
        );
        return;
    }
    println!("{}", report_table(desired, report));
    println!("Updated: {}/{}", report.updated.len(), report.regions_read);
}

pub fn failure_table(failures: &[RegionFailure]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Region", "Path", "Error"]);
    for failure in failures {
        builder.push_record([
            failure.region.as_str(),
            failure.path.as_str(),
            failure.reason.as_str(),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn print_region_failures(failures: &[RegionFailure]) {
    eprintln!("{}", failure_table(failures));
}
