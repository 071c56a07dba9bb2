pub mod check;
pub mod fix;
pub mod index;

pub use check::check;
pub use fix::fix;
pub use index::index;

use crate::config::AppConfig;
use crate::error::ConfigurationError;
use crate::resolve::index::ModuleIndex;
use anyhow::{Context, Result};
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    /// `.json` report paths get JSON unless a format was asked for.
    pub fn for_path(explicit: Option<ReportFormat>, path: &Path) -> Self {
        explicit.unwrap_or_else(|| {
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                ReportFormat::Json
            } else {
                ReportFormat::Text
            }
        })
    }
}

/// A target file read into memory before anything is written.
pub(crate) struct Target {
    pub path: PathBuf,
    /// Canonical directory the file's specifiers are relative to.
    pub from_dir: PathBuf,
    pub source: String,
}

/// Build the index and read every target. Any failure here happens before
/// a single byte is written.
pub(crate) fn prepare(cfg: &AppConfig) -> Result<(ModuleIndex, Vec<Target>)> {
    let root = fs::canonicalize(&cfg.root).map_err(|source| ConfigurationError::RootUnreadable {
        path: cfg.root.clone(),
        source,
    })?;
    let index = ModuleIndex::build(&root, &cfg.index).context("failed to index module root")?;
    tracing::info!(
        root = %root.display(),
        "indexed {} directories, {} files",
        index.dir_count(),
        index.file_count()
    );

    let mut targets = Vec::new();
    for path in expand_targets(&cfg.targets)? {
        let read_err = |source| ConfigurationError::TargetUnreadable {
            path: path.clone(),
            source,
        };
        let source = fs::read_to_string(&path).map_err(read_err)?;
        let canonical = fs::canonicalize(&path).map_err(read_err)?;
        let from_dir = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| canonical.clone());
        targets.push(Target {
            path,
            from_dir,
            source,
        });
    }
    Ok((index, targets))
}

/// Expand glob patterns; a literal path that does not exist is an error.
fn expand_targets(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        if !pattern.contains(['*', '?', '[']) {
            let p = PathBuf::from(pattern);
            if !p.is_file() {
                return Err(ConfigurationError::TargetUnreadable {
                    path: p,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
                }
                .into());
            }
            if !paths.contains(&p) {
                paths.push(p);
            }
            continue;
        }
        let entries = glob::glob(pattern).map_err(|source| ConfigurationError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;
        for entry in entries {
            match entry {
                Ok(p) if p.is_file() => {
                    if !paths.contains(&p) {
                        paths.push(p);
                    }
                }
                Ok(_) => {}
                Err(err) => tracing::warn!("skipping unreadable glob match: {}", err),
            }
        }
    }
    if paths.is_empty() {
        return Err(ConfigurationError::NoTargets {
            patterns: patterns.to_vec(),
        }
        .into());
    }
    Ok(paths)
}
