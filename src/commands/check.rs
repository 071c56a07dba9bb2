use super::{ReportFormat, prepare};
use crate::config::{AppConfig, Overrides};
use crate::fixer::fix_source;
use crate::report::{render_json, render_text, totals};
use crate::resolve::Resolver;
use crate::resolve::naming::NamingPolicy;
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Execute the check command: resolve and report, never write.
pub fn check(config: Option<&str>, overrides: Overrides, format: Option<ReportFormat>) -> Result<()> {
    let cfg = AppConfig::load(config.map(Path::new), overrides).context("failed to load config")?;
    let (index, targets) = prepare(&cfg)?;
    let naming = NamingPolicy::new(&cfg.naming);
    let resolver = Resolver::new(&index, &naming, cfg.threshold);

    let reports: Vec<_> = targets
        .iter()
        .map(|t| fix_source(&resolver, &t.path, &t.from_dir, &t.source).report)
        .collect();

    match format.unwrap_or(ReportFormat::Text) {
        ReportFormat::Text => print!("{}", render_text(&reports)),
        ReportFormat::Json => println!("{}", render_json(&reports)?),
    }

    let t = totals(&reports);
    if t.changes() > 0 {
        bail!(
            "{} imports need fixing ({} fixable, {} unresolvable); run `fix` to apply",
            t.changes(),
            t.fixed,
            t.removed
        );
    }
    tracing::info!("all {} imports resolve", t.unchanged);
    Ok(())
}
