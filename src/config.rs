use crate::error::ConfigurationError;
use crate::resolve::DEFAULT_THRESHOLD;
use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "import-fixer.toml";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub root: PathBuf,
    pub targets: Vec<String>,
    pub report: PathBuf,
    pub threshold: f32,
    pub index: IndexOptions,
    pub naming: NamingOptions,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexOptions {
    pub extensions: Vec<String>,
    pub entry_files: Vec<String>,
    pub exclude_dirs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingOptions {
    pub module_suffix: String,
    pub suffix_aliases: Vec<String>,
    pub file_stems: Vec<String>,
}

/// Values given on the command line; each one wins over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub targets: Vec<String>,
    pub report: Option<PathBuf>,
    pub threshold: Option<f32>,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            extensions: strings(&["ts", "tsx", "js", "jsx"]),
            entry_files: strings(&["index.ts", "index.tsx", "index.js", "index.jsx"]),
            exclude_dirs: strings(&["node_modules", ".git"]),
        }
    }
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            module_suffix: "calculator".into(),
            suffix_aliases: strings(&["calc"]),
            file_stems: strings(&[
                "formulas",
                "validation",
                "quickValidation",
                "register",
                "types",
                "index",
            ]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// --- Raw TOML structures ---
#[derive(Deserialize, Default)]
struct ConfigFile {
    import_fixer: Option<FixerRoot>,
}

#[derive(Deserialize)]
struct FixerRoot {
    root: Option<String>,
    targets: Option<Vec<String>>,
    report: Option<String>,
    threshold: Option<f32>,
    index: Option<IndexToml>,
    naming: Option<NamingToml>,
}

#[derive(Deserialize)]
struct IndexToml {
    extensions: Option<Vec<String>>,
    entry_files: Option<Vec<String>>,
    exclude_dirs: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct NamingToml {
    module_suffix: Option<String>,
    suffix_aliases: Option<Vec<String>>,
    file_stems: Option<Vec<String>>,
}

impl AppConfig {
    /// Load `config_path`, or `import-fixer.toml` when none is given.
    /// A missing default file is not an error; everything falls back to defaults.
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let content = match config_path {
            Some(p) => Some(fs::read_to_string(p).map_err(|source| {
                ConfigurationError::ConfigUnreadable {
                    path: p.to_path_buf(),
                    source,
                }
            })?),
            None => {
                let p = Path::new(DEFAULT_CONFIG_FILE);
                if p.exists() {
                    Some(fs::read_to_string(p).map_err(|source| {
                        ConfigurationError::ConfigUnreadable {
                            path: p.to_path_buf(),
                            source,
                        }
                    })?)
                } else {
                    tracing::debug!("{} not found, using defaults", DEFAULT_CONFIG_FILE);
                    None
                }
            }
        };

        let file: ConfigFile = match content {
            Some(text) => toml::from_str(&text).map_err(|source| {
                ConfigurationError::ConfigInvalid {
                    path: config_path
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE)),
                    source,
                }
            })?,
            None => ConfigFile::default(),
        };

        Self::from_file(file, overrides)
    }

    fn from_file(file: ConfigFile, overrides: Overrides) -> Result<Self> {
        let fixer = file.import_fixer.unwrap_or(FixerRoot {
            root: None,
            targets: None,
            report: None,
            threshold: None,
            index: None,
            naming: None,
        });

        let root = overrides
            .root
            .or_else(|| fixer.root.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("src/calculators"));

        let mut targets = if overrides.targets.is_empty() {
            fixer.targets.unwrap_or_default()
        } else {
            overrides.targets
        };
        // If no target is configured, use the registry index of the root
        if targets.is_empty() {
            targets.push(root.join("index.ts").to_string_lossy().into_owned());
        }

        let report = overrides
            .report
            .or_else(|| fixer.report.map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from("import-fix-report.txt"));

        let threshold = overrides
            .threshold
            .or(fixer.threshold)
            .unwrap_or(DEFAULT_THRESHOLD);
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigurationError::ThresholdOutOfRange(threshold).into());
        }

        let defaults = IndexOptions::default();
        let index = match fixer.index {
            Some(ix) => IndexOptions {
                extensions: ix.extensions.unwrap_or(defaults.extensions),
                entry_files: ix.entry_files.unwrap_or(defaults.entry_files),
                exclude_dirs: ix.exclude_dirs.unwrap_or(defaults.exclude_dirs),
            },
            None => defaults,
        };

        let defaults = NamingOptions::default();
        let naming = match fixer.naming {
            Some(n) => NamingOptions {
                module_suffix: n.module_suffix.unwrap_or(defaults.module_suffix),
                suffix_aliases: n.suffix_aliases.unwrap_or(defaults.suffix_aliases),
                file_stems: n.file_stems.unwrap_or(defaults.file_stems),
            },
            None => defaults,
        };

        Ok(Self {
            root,
            targets,
            report,
            threshold,
            index,
            naming,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_config_file() {
        let cfg = AppConfig::from_file(ConfigFile::default(), Overrides::default()).unwrap();
        assert_eq!(cfg.root, PathBuf::from("src/calculators"));
        assert_eq!(cfg.targets, vec!["src/calculators/index.ts".to_string()]);
        assert_eq!(cfg.report, PathBuf::from("import-fix-report.txt"));
        assert!((cfg.threshold - 0.6).abs() < f32::EPSILON);
        assert_eq!(cfg.index, IndexOptions::default());
        assert_eq!(cfg.naming.module_suffix, "calculator");
    }

    #[test]
    fn file_values_and_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fixer.toml");
        fs::write(
            &path,
            r#"[import_fixer]
root = "modules"
targets = ["modules/*.ts"]
threshold = 0.75

[import_fixer.naming]
module_suffix = "widget"
"#,
        )
        .unwrap();

        let cfg = AppConfig::load(
            Some(&path),
            Overrides {
                report: Some(PathBuf::from("out.json")),
                ..Overrides::default()
            },
        )
        .unwrap();
        assert_eq!(cfg.root, PathBuf::from("modules"));
        assert_eq!(cfg.targets, vec!["modules/*.ts".to_string()]);
        assert_eq!(cfg.report, PathBuf::from("out.json"));
        assert!((cfg.threshold - 0.75).abs() < f32::EPSILON);
        assert_eq!(cfg.naming.module_suffix, "widget");
        assert_eq!(cfg.naming.suffix_aliases, vec!["calc".to_string()]);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let err = AppConfig::load(Some(Path::new("no/such/fixer.toml")), Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("not readable"));
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let err = AppConfig::from_file(
            ConfigFile::default(),
            Overrides {
                threshold: Some(1.5),
                ..Overrides::default()
            },
        )
        .unwrap_err();
        assert!(err.to_string().contains("threshold"));
    }
}
