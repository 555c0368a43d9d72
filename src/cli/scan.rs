//! Scan command implementation.
//!
//! Validates every input, then scans each target in turn and hands the
//! summary to the reporter and the CSV exporter.

use super::{Cli, SaveTarget};
use crate::config::AppSettings;
use crate::error::CliError;
use crate::output::{save_csv, ExportKind, Reporter};
use crate::scanner::{run_scan, ScanEngine, ScanSummary};
use crate::types::{expand_targets, DnsResolver};
use anyhow::{Context, Result};
use tracing::info;

/// Run a scan as described by the command line and the loaded `settings`.
pub async fn execute(cli: &Cli, settings: &AppSettings) -> Result<()> {
    // Ports are checked first so bad input never triggers a DNS lookup.
    let options = cli.resolve(settings)?;
    let resolver = DnsResolver::new();
    let targets = expand_targets(&cli.target, &resolver)
        .await
        .map_err(CliError::from)?;

    info!(
        hosts = targets.len(),
        ports = options.ports.len(),
        workers = options.workers,
        timeout_ms = options.timeout.as_millis() as u64,
        "starting scan"
    );

    let engine = ScanEngine::tcp(options.workers, options.timeout);
    let reporter = Reporter::new(options.color && console::colors_enabled(), options.silent);
    let summary = run_scan(&engine, &resolver, &targets, &options.ports, &reporter).await;
    reporter.print_summary(&summary);

    if let Some(target) = &options.save_open {
        export(&reporter, &summary, ExportKind::OpenOnly, target)?;
    }
    if let Some(target) = &options.save_all {
        export(&reporter, &summary, ExportKind::Full, target)?;
    }

    Ok(())
}

fn export(
    reporter: &Reporter,
    summary: &ScanSummary,
    kind: ExportKind,
    target: &SaveTarget,
) -> Result<()> {
    let written = save_csv(summary, kind, target.path())
        .with_context(|| format!("failed to save {} CSV", kind.label()))?;
    reporter.print_saved(kind.label(), &written);
    Ok(())
}
