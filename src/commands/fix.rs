use super::{ReportFormat, prepare};
use crate::config::{AppConfig, Overrides};
use crate::fixer::{FixOutcome, fix_source};
use crate::report::{FileReport, render_json, render_text, totals};
use crate::resolve::Resolver;
use crate::resolve::naming::NamingPolicy;
use crate::utils::{format_diff, write_atomic};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Execute the fix command
pub fn fix(
    config: Option<&str>,
    overrides: Overrides,
    format: Option<ReportFormat>,
    dry_run: bool,
) -> Result<()> {
    let cfg = AppConfig::load(config.map(Path::new), overrides).context("failed to load config")?;
    tracing::info!(root = %cfg.root.display(), threshold = cfg.threshold, dry_run, "fix start");

    let (index, targets) = prepare(&cfg)?;
    let naming = NamingPolicy::new(&cfg.naming);
    let resolver = Resolver::new(&index, &naming, cfg.threshold);

    let outcomes: Vec<FixOutcome> = targets
        .iter()
        .map(|t| fix_source(&resolver, &t.path, &t.from_dir, &t.source))
        .collect();

    if dry_run {
        for (target, outcome) in targets.iter().zip(&outcomes) {
            if outcome.report.totals().changes() > 0 {
                print!("{}", format_diff(&target.path, &target.source, &outcome.output));
            }
        }
        let reports: Vec<FileReport> = outcomes.into_iter().map(|o| o.report).collect();
        let rendered = render(&cfg.report, format, &reports)?;
        print!("{}", rendered);
        if !rendered.ends_with('\n') {
            println!();
        }
        return Ok(());
    }

    let total = outcomes.len();
    let (reports, failure) = write_targets(outcomes, write_atomic);
    let rendered = render(&cfg.report, format, &reports)?;
    fs::write(&cfg.report, rendered)
        .with_context(|| format!("failed to write {}", cfg.report.display()))?;
    tracing::info!("report written to {}", cfg.report.display());

    if let Some(err) = failure {
        return Err(err.context(format!(
            "stopped after {} of {} targets; the report covers those",
            reports.len(),
            total
        )));
    }

    let t = totals(&reports);
    tracing::info!(
        "done: {} files, {} fixed, {} removed",
        reports.len(),
        t.fixed,
        t.removed
    );
    Ok(())
}

/// Write every changed target in order. Stops at the first failure and
/// returns the reports of the targets handled before it.
fn write_targets<W>(outcomes: Vec<FixOutcome>, mut write: W) -> (Vec<FileReport>, Option<anyhow::Error>)
where
    W: FnMut(&Path, &[u8]) -> Result<()>,
{
    let mut reports = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let file = outcome.report.file.clone();
        let t = outcome.report.totals();
        if t.changes() > 0 {
            if let Err(err) = write(&file, outcome.output.as_bytes()) {
                tracing::error!(file = %file.display(), "rewrite failed: {:#}", err);
                return (reports, Some(err));
            }
        }
        tracing::info!(
            file = %file.display(),
            "fixed={} removed={} unchanged={}",
            t.fixed,
            t.removed,
            t.unchanged
        );
        reports.push(outcome.report);
    }
    (reports, None)
}

fn render(path: &Path, format: Option<ReportFormat>, reports: &[FileReport]) -> Result<String> {
    Ok(match ReportFormat::for_path(format, path) {
        ReportFormat::Text => render_text(reports),
        ReportFormat::Json => render_json(reports)?,
    })
}
