use crate::config::{AppConfig, Overrides};
use crate::error::ConfigurationError;
use crate::resolve::index::ModuleIndex;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Execute the index command: print what the resolver would see.
pub fn index(config: Option<&str>, overrides: Overrides) -> Result<()> {
    let cfg = AppConfig::load(config.map(Path::new), overrides).context("failed to load config")?;
    let root = fs::canonicalize(&cfg.root).map_err(|source| ConfigurationError::RootUnreadable {
        path: cfg.root.clone(),
        source,
    })?;
    let index = ModuleIndex::build(&root, &cfg.index).context("failed to index module root")?;
    print!("{}", describe(&index));
    Ok(())
}

fn describe(index: &ModuleIndex) -> String {
    let mut out = String::new();
    out.push_str(&format!("root        : {}\n", index.root().display()));
    out.push_str(&format!("directories : {}\n", index.dir_count()));
    out.push_str(&format!("files       : {}\n", index.file_count()));
    out.push_str("== Module names ==\n");
    for name in index.all_names() {
        let paths: Vec<String> = index.locate(name).iter().map(|p| p.join("/")).collect();
        out.push_str(&format!("{:<32} {}\n", name, paths.join(", ")));
    }
    out
}
