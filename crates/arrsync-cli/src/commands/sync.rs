use super::config::{load_config, ConfigPaths};
use super::sync_ui::SyncUI;
use crate::output::Output;
use arrsync_config::{Config, EnvironmentConfig};
use arrsync_core::{Pipeline, RunReport};
use arrsync_models::{EntryOutcome, ShowIdStrategy};
use arrsync_sources::create_services;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use serde_json::{json, Value};
use std::sync::Arc;

pub struct SyncArgs {
    pub environments: Vec<String>,
    pub dry_run: bool,
    pub show_id_strategy: Option<ShowIdStrategy>,
}

pub async fn run_sync(paths: &ConfigPaths, args: SyncArgs, output: &Output) -> Result<()> {
    tracing::debug!("Sync command started");

    let mut config = load_config(paths)?;
    config
        .validate()
        .map_err(|e| eyre!("Configuration validation failed: {}", e))?;

    if let Some(strategy) = args.show_id_strategy {
        for env in &mut config.environments {
            if let Some(sonarr) = env.sonarr.as_mut() {
                sonarr.id_strategy = strategy;
            }
        }
    }

    let selected = config
        .select_environments(&args.environments)
        .map_err(|e| eyre!("{}", e))?;

    let (reports, failed) = sync_environments(&config, &selected, args.dry_run, output).await;

    if !output.is_human() {
        let reports: Vec<_> = reports
            .iter()
            .map(|report| json!({ "report": report, "summary": report.summary() }))
            .collect();
        output.json(&json!({
            "success": failed.is_empty(),
            "dry_run": args.dry_run,
            "environments": reports,
            "failed": failed,
        }));
    }

    if !failed.is_empty() {
        return Err(eyre!("{} environment(s) failed to sync", failed.len()));
    }

    Ok(())
}

/// Run every selected environment in turn. A failing environment is recorded and the rest still run.
async fn sync_environments(
    config: &Config,
    selected: &[&EnvironmentConfig],
    dry_run: bool,
    output: &Output,
) -> (Vec<RunReport>, Vec<Value>) {
    let mut reports = Vec::with_capacity(selected.len());
    let mut failed = Vec::new();

    for &environment in selected {
        let services = match create_services(config, environment) {
            Ok(services) => services,
            Err(e) => {
                output.error(format!("{}: failed to create services: {}", environment.name, e));
                failed.push(json!({ "environment": environment.name, "error": e.to_string() }));
                continue;
            }
        };

        let ui = Arc::new(SyncUI::new(&environment.name, output.is_human() && !output.is_quiet()));
        let pipeline = Pipeline::from_services(environment, services, dry_run).with_observer(ui.clone());
        let result = pipeline.run().await;
        ui.finish();

        match result {
            Ok(report) => {
                if output.is_human() {
                    print_report(&report, output);
                }
                reports.push(report);
            }
            Err(e) => {
                output.error(format!("{}: watchlist sync aborted: {}", environment.name, e));
                failed.push(json!({ "environment": environment.name, "error": e.to_string() }));
            }
        }
    }

    (reports, failed)
}

fn print_report(report: &RunReport, output: &Output) {
    if output.is_quiet() {
        return;
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec![
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Type").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("ID").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Outcome").add_attribute(comfy_table::Attribute::Bold),
    ]);

    for entry in &report.entries {
        let id = entry.external_id.map(|id| id.to_string()).unwrap_or_default();
        table.add_row(vec![
            Cell::new(&entry.entry.title),
            Cell::new(entry.entry.media_type.to_string()),
            Cell::new(id),
            Cell::new(&entry.outcome).fg(outcome_color(&entry.outcome)),
        ]);
    }

    let summary = report.summary();
    let mode = if report.dry_run { " (dry run)" } else { "" };
    output.info(format!("\nEnvironment '{}'{}", report.environment, mode));
    if !report.entries.is_empty() {
        println!("{}", table);
    }

    let message = if report.dry_run {
        format!(
            "{}: {} planned, {} not found, {} failed, {} skipped of {} in {} ms",
            report.environment,
            summary.planned,
            summary.not_found,
            summary.failures(),
            summary.skipped,
            summary.total,
            report.duration_ms
        )
    } else {
        format!(
            "{}: {} added, {} rejected, {} not found, {} failed, {} skipped of {} in {} ms",
            report.environment,
            summary.added,
            summary.rejected,
            summary.not_found,
            summary.transport_failed + summary.resolve_failed,
            summary.skipped,
            summary.total,
            report.duration_ms
        )
    };

    if summary.failures() == 0 {
        output.success(message);
    } else {
        output.warn(message);
    }
}

fn outcome_color(outcome: &EntryOutcome) -> Color {
    match outcome {
        EntryOutcome::Dispatched { outcome } if outcome.is_added() => Color::Green,
        EntryOutcome::Planned { .. } => Color::Cyan,
        EntryOutcome::Skipped { .. } | EntryOutcome::NotFound => Color::DarkGrey,
        _ => Color::Red,
    }
}
