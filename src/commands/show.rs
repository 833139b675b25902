//! `mantis-updater show` command.

use std::path::Path;

use crate::build::{BuildReport, CarryOverRecord};
use crate::context::ServiceContext;
use crate::store::BuildStore;

/// Execute the `show` command for one stored build.
///
/// # Errors
///
/// Returns an error string if the build is not stored or unreadable.
pub fn run(store_root: &Path, job: &str, number: u32) -> Result<(), String> {
    let ctx = ServiceContext::filesystem_only();
    let store = BuildStore::new(&ctx, store_root);

    let build = store.load(job, number).map_err(|e| e.to_string())?;
    let report = store.read_report(job, number).map_err(|e| e.to_string())?;
    let carry_over = store.read_carry_over(job, number).map_err(|e| e.to_string())?;

    println!("Build: {job} #{number}");
    println!("URL: {}", build.url);
    println!(
        "Result: {}",
        build.result.map_or_else(|| "in progress".to_string(), |r| r.to_string())
    );
    print_report(report.as_ref());
    print_carry_over(carry_over.as_ref());
    Ok(())
}

fn print_report(report: Option<&BuildReport>) {
    let Some(report) = report else {
        println!("\nNo ticket report recorded.");
        return;
    };
    println!("\nTickets updated (pattern {}):", report.pattern);
    if report.outcomes.is_empty() {
        println!("  none");
    }
    for outcome in &report.outcomes {
        let status = outcome.issue.status.as_deref().unwrap_or("unknown");
        println!("  #{} [{status}] {}", outcome.ticket_id, outcome.issue.summary);
    }
}

fn print_carry_over(carry_over: Option<&CarryOverRecord>) {
    let Some(record) = carry_over.filter(|r| !r.change_sets.is_empty()) else {
        return;
    };
    println!("\nDeferred to next build:");
    for set in &record.change_sets {
        let revision = set.change.revision.as_deref().unwrap_or("unknown");
        println!("  #{} ({revision})", set.ticket_id);
    }
}
