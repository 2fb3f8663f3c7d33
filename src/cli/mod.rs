//! CLI command implementations for the optiview console.
//!
//! Provides subcommand handlers for:
//! - `optiview status` — full reconciled dashboard view
//! - `optiview namespaces` / `optiview workloads` — filtered, paginated tables
//! - `optiview diff` — pending profile/layer updates
//! - `optiview install` / `optiview update` — remote mutating operations
//! - `optiview watch` — periodic refresh loop

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use colored::Colorize;

use crate::client::HttpOptimizerClient;
use crate::config;
use crate::model::{HealthState, ProfileRef};
use crate::session::{Session, UpdateOutcome};
use crate::view::DashboardView;

/// Output format for data commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            _ => Self::Table,
        }
    }
}

/// Build a session against the configured service endpoint. The show-all
/// toggle is set before the first trigger so it costs no extra scan.
fn new_session(show_all: bool) -> Session<HttpOptimizerClient> {
    let config = config::load();
    Session::new(HttpOptimizerClient::from_config(&config)).with_show_all(show_all)
}

// ---------------------------------------------------------------------------
// optiview status
// ---------------------------------------------------------------------------

/// Fetch everything and render the reconciled dashboard.
pub fn run_status(format: OutputFormat, show_all: bool) -> Result<()> {
    let mut session = new_session(show_all);
    session.start();

    let view = session.view();
    match format {
        OutputFormat::Json => print_json(&view)?,
        OutputFormat::Table => print_dashboard(&view),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// optiview namespaces / workloads
// ---------------------------------------------------------------------------

/// Render the namespaces table with filter and pagination applied.
pub fn run_namespaces(
    filter: &str,
    page: usize,
    page_size: usize,
    format: OutputFormat,
    show_all: bool,
) -> Result<()> {
    let mut session = new_session(show_all);
    session.refresh_scan();

    session.namespaces_table.set_query(filter);
    session.namespaces_table.set_page_size(page_size);
    session.namespaces_table.set_page(page);

    let view = session.view();
    match format {
        OutputFormat::Json => print_json(&view.namespaces)?,
        OutputFormat::Table => print_namespace_table(&view),
    }
    Ok(())
}

/// Render the workloads table with text filter, label filter, and
/// pagination applied.
pub fn run_workloads(
    filter: &str,
    labels: &str,
    page: usize,
    page_size: usize,
    format: OutputFormat,
    show_all: bool,
) -> Result<()> {
    let mut session = new_session(show_all);
    // Health supplies the datasource used in container experiment links.
    session.refresh();

    session.workloads_table.set_query(filter);
    session.workloads_table.set_label_query(labels);
    session.workloads_table.set_page_size(page_size);
    session.workloads_table.set_page(page);

    let view = session.view();
    match format {
        OutputFormat::Json => print_json(&view.workloads)?,
        OutputFormat::Table => print_workload_table(&view),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// optiview diff
// ---------------------------------------------------------------------------

/// Show pending profile/layer updates.
pub fn run_diff(format: OutputFormat) -> Result<()> {
    let mut session = new_session(false);
    session.refresh_diff();

    let Some(diff) = session.diff() else {
        anyhow::bail!("could not fetch the profile diff");
    };

    match format {
        OutputFormat::Json => print_json(diff)?,
        OutputFormat::Table => {
            if !diff.has_updates() {
                println!("{}", "All profiles and layers are up to date.".green());
                return Ok(());
            }
            println!("{}", "Pending updates".bold().cyan());
            print_profile_list("Metadata profiles", &diff.metadata_profiles);
            print_profile_list("Metric profiles", &diff.metric_profiles);
            print_profile_list("Layers", &diff.layers);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// optiview install / update
// ---------------------------------------------------------------------------

/// Trigger installation of missing profiles/layers, then show the refreshed
/// health state.
pub fn run_install(assume_yes: bool) -> Result<()> {
    if !assume_yes && !confirm("Attempt to install missing profiles via the service API?")? {
        println!("Aborted.");
        return Ok(());
    }

    let mut session = new_session(false);
    session
        .install_profiles()
        .context("profile installation failed")?;

    println!("{}", "Installation request accepted.".green());
    print_post_mutation_summary(&session.view());
    Ok(())
}

/// Apply every pending item from the profile diff, then show the refreshed
/// health state.
pub fn run_update(assume_yes: bool) -> Result<()> {
    let mut session = new_session(false);
    session.refresh_diff();

    match session.diff() {
        Some(diff) if diff.has_updates() => {
            let total = diff.metadata_profiles.len() + diff.metric_profiles.len() + diff.layers.len();
            if !assume_yes && !confirm(&format!("Apply {total} pending update(s)?"))? {
                println!("Aborted.");
                return Ok(());
            }
        }
        Some(_) => {
            println!("{}", "All profiles and layers are up to date.".green());
            return Ok(());
        }
        None => {
            anyhow::bail!("could not fetch the profile diff; not sending an update");
        }
    }

    match session.update_profiles().context("profile update failed")? {
        UpdateOutcome::Applied => {
            println!("{}", "Update request accepted.".green());
            print_post_mutation_summary(&session.view());
        }
        UpdateOutcome::NoDiffLoaded => println!("No diff loaded; nothing to update."),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// optiview watch
// ---------------------------------------------------------------------------

/// Re-render the dashboard every `interval_secs` seconds until interrupted.
pub fn run_watch(interval_secs: u64, show_all: bool) -> Result<()> {
    let mut session = new_session(show_all);
    session.start();

    loop {
        print_dashboard(&session.view());
        if let Some(at) = session.last_refreshed_at() {
            let local: DateTime<Local> = at.into();
            println!(
                "{}",
                format!("refreshed {} (next in {interval_secs}s)", local.format("%H:%M:%S"))
                    .dimmed()
            );
        }
        thread::sleep(Duration::from_secs(interval_secs));
        session.refresh();
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn print_dashboard(view: &DashboardView) {
    println!("{}", "Kruize Optimizer Console".bold().cyan());
    println!("{}", "=".repeat(60));

    let status = match &view.status {
        Some(HealthState::Healthy) => "HEALTHY".green().bold(),
        Some(HealthState::Unhealthy) => "UNHEALTHY".red().bold(),
        Some(HealthState::Other(raw)) => raw.as_str().yellow().bold(),
        None => "PENDING".dimmed(),
    };
    println!("  {} {status}", "Status:      ".bold());
    println!(
        "  {} {}",
        "Last checked:".bold(),
        view.last_checked_at.as_deref().map_or_else(
            || "-".to_string(),
            |raw| format_timestamp(raw)
        )
    );
    println!(
        "  {} {}",
        "Datasources: ".bold(),
        if view.datasources.is_empty() {
            "-".to_string()
        } else {
            view.datasources.join(", ")
        }
    );
    println!();

    print_profile_list("Metadata profiles", &view.metadata_profiles);
    print_profile_list("Metric profiles", &view.metric_profiles);
    print_profile_list("Layers", &view.layers);
    print_profile_list("RuleSets", &view.rulesets);

    println!(
        "  {} jobs {} | experiments {} | processed {}",
        "Totals:".bold(),
        view.stats.total_jobs_created,
        view.stats.total_experiments_created,
        view.stats.total_experiments_processed,
    );
    println!();

    if view.issues_visible {
        println!("{}", "Issues".bold().red());
        for issue in &view.issues {
            println!("  - {}", issue.red());
        }
        println!();
    }

    if view.updates_available {
        println!(
            "{}",
            "Updates are available. Run `optiview diff` for details.".yellow()
        );
        println!();
    }

    print_namespace_table(view);
    println!();
    print_workload_table(view);
}

fn print_profile_list(title: &str, items: &[ProfileRef]) {
    if items.is_empty() {
        return;
    }
    let rendered: Vec<String> = items
        .iter()
        .map(|item| match &item.version {
            Some(version) => format!("{} v{version}", item.name),
            None => item.name.clone(),
        })
        .collect();
    println!("  {} {}", format!("{title}:").bold(), rendered.join(", "));
}

fn print_namespace_table(view: &DashboardView) {
    let table = &view.namespaces;
    println!(
        "{} {}",
        "Namespaces".bold().cyan(),
        format!(
            "(page {}, showing {} of {})",
            table.page,
            table.rows.len(),
            table.total
        )
        .dimmed()
    );
    if table.rows.is_empty() {
        println!("  {}", "No namespaces found".dimmed());
        return;
    }
    println!("  {:<40} Optimized", "Namespace");
    println!("  {}", "-".repeat(52));
    for ns in &table.rows {
        let optimized = if ns.optimized {
            "yes".green()
        } else {
            "no".red()
        };
        println!("  {:<40} {optimized}", truncate(&ns.name, 40));
    }
}

fn print_workload_table(view: &DashboardView) {
    let table = &view.workloads;
    println!(
        "{} {}",
        "Workloads".bold().cyan(),
        format!(
            "(page {}, showing {} of {})",
            table.page,
            table.rows.len(),
            table.total
        )
        .dimmed()
    );
    if table.rows.is_empty() {
        println!("  {}", "No workloads found".dimmed());
        return;
    }
    println!(
        "  {:<20} {:<24} {:<12} Optimized",
        "Namespace", "Workload", "Type"
    );
    println!("  {}", "-".repeat(68));
    for workload in &table.rows {
        let optimized = if workload.optimized {
            "yes".green()
        } else {
            "no".red()
        };
        println!(
            "  {:<20} {:<24} {:<12} {optimized}",
            truncate(&workload.namespace, 20),
            truncate(&workload.name, 24),
            truncate(&workload.kind, 12),
        );
        for container in &workload.containers {
            println!(
                "      {} ({})  {}",
                container.name.bold(),
                container.image.dimmed(),
                container.experiment_url.dimmed()
            );
        }
    }
}

fn print_post_mutation_summary(view: &DashboardView) {
    let status = view
        .status
        .as_ref()
        .map_or_else(|| "unknown".to_string(), ToString::to_string);
    println!("Service status after refresh: {status}");
    if view.updates_available {
        println!("{}", "Updates are still pending.".yellow());
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).context("failed to serialize JSON output")?
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Render a service timestamp in local time, falling back to the raw string
/// when it is not RFC 3339.
fn format_timestamp(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw).map_or_else(
        |_| raw.to_string(),
        |parsed| {
            parsed
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        },
    )
}

/// Ask for a yes/no confirmation on stdin.
fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().context("failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read confirmation")?;
    Ok(matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_format_defaults_to_table() {
        assert_eq!(OutputFormat::from_str_opt(None), OutputFormat::Table);
        assert_eq!(OutputFormat::from_str_opt(Some("json")), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str_opt(Some("table")),
            OutputFormat::Table
        );
        assert_eq!(OutputFormat::from_str_opt(Some("bogus")), OutputFormat::Table);
    }

    #[test]
    fn format_timestamp_passes_through_non_rfc3339() {
        assert_eq!(format_timestamp("just now"), "just now");
    }

    #[test]
    fn truncate_keeps_short_strings() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly-ten", 11), "exactly-ten");
    }

    #[test]
    fn truncate_shortens_long_strings() {
        let out = truncate("a-very-long-namespace-name", 10);
        assert_eq!(out.chars().count(), 10);
        assert!(out.ends_with('…'));
    }
}
