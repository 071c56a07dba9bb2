use crate::config::IndexOptions;
use crate::error::ConfigurationError;
use anyhow::Result;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Snapshot of the module tree, keyed by root-relative directory path.
///
/// The root itself is stored under the empty key. Built once, then only read.
#[derive(Debug)]
pub struct ModuleIndex {
    root: PathBuf,
    dirs: BTreeMap<String, BTreeSet<String>>,
    by_name: HashMap<String, Vec<String>>,
    names: Vec<String>,
    options: IndexOptions,
}

impl ModuleIndex {
    pub fn build(root: &Path, options: &IndexOptions) -> Result<Self> {
        let meta = fs::metadata(root).map_err(|source| ConfigurationError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(ConfigurationError::RootNotDirectory {
                path: root.to_path_buf(),
            }
            .into());
        }
        fs::read_dir(root).map_err(|source| ConfigurationError::RootUnreadable {
            path: root.to_path_buf(),
            source,
        })?;

        let mut index = Self {
            root: root.to_path_buf(),
            dirs: BTreeMap::new(),
            by_name: HashMap::new(),
            names: Vec::new(),
            options: options.clone(),
        };
        index.dirs.insert(String::new(), BTreeSet::new());

        let exclude = &options.exclude_dirs;
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0
                    || !e.file_type().is_dir()
                    || !exclude.iter().any(|x| e.file_name().to_str() == Some(x.as_str()))
            });

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    tracing::warn!("skipping unreadable entry: {}", err);
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            let key = rel_key(rel);
            if entry.file_type().is_dir() {
                let name = entry.file_name().to_string_lossy().into_owned();
                index.dirs.entry(key.clone()).or_default();
                let paths = index.by_name.entry(name.clone()).or_default();
                if paths.is_empty() {
                    index.names.push(name);
                }
                paths.push(key);
            } else {
                let parent = rel.parent().map(rel_key).unwrap_or_default();
                let file = entry.file_name().to_string_lossy().into_owned();
                index.dirs.entry(parent).or_default().insert(file);
            }
        }

        tracing::debug!(
            root = %index.root.display(),
            dirs = index.dir_count(),
            files = index.file_count(),
            "module index built"
        );
        Ok(index)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// True if `segments` names a source file (with or without extension),
    /// any file spelled out with its extension, or a directory holding an
    /// entry-point file.
    pub fn exists(&self, segments: &[String]) -> bool {
        let Some((leaf, parent)) = segments.split_last() else {
            return self.has_entry_point("");
        };
        if self.has_entry_point(&segments.join("/")) {
            return true;
        }
        let Some(files) = self.dirs.get(&parent.join("/")) else {
            return false;
        };
        // named exactly as written, e.g. `./data.json`
        if leaf.contains('.') && files.contains(leaf) {
            return true;
        }
        self.options
            .extensions
            .iter()
            .any(|ext| files.contains(&format!("{}.{}", leaf, ext)))
    }

    /// A file in `dir` spelled like `file` up to ASCII case, e.g.
    /// `SelfStorageFacilityRoiCalculator` for `SelfStorageFacilityROICalculator.ts`.
    /// Without an extension in `file` source files match by stem and the
    /// actual stem is returned.
    pub fn find_file_ignore_case(&self, dir: &[String], file: &str) -> Option<String> {
        let files = self.dirs.get(&dir.join("/"))?;
        files.iter().find_map(|actual| {
            if actual.eq_ignore_ascii_case(file) {
                return Some(actual.clone());
            }
            let (stem, ext) = actual.rsplit_once('.')?;
            let is_source = self.options.extensions.iter().any(|x| x == ext);
            (is_source && stem.eq_ignore_ascii_case(file)).then(|| stem.to_string())
        })
    }

    /// True if `segments` is a directory known to the index.
    pub fn is_dir(&self, segments: &[String]) -> bool {
        self.dirs.contains_key(&segments.join("/"))
    }

    /// Terminal directory names in first-seen enumeration order.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Every directory whose terminal name is `name`, in enumeration order.
    pub fn locate(&self, name: &str) -> Vec<Vec<String>> {
        self.by_name
            .get(name)
            .map(|paths| {
                paths
                    .iter()
                    .map(|p| p.split('/').map(str::to_string).collect())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn dir_count(&self) -> usize {
        self.dirs.len() - 1
    }

    pub fn file_count(&self) -> usize {
        self.dirs.values().map(BTreeSet::len).sum()
    }

    pub fn has_source_extension(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.options.extensions.iter().any(|x| x == e))
    }

    fn has_entry_point(&self, key: &str) -> bool {
        self.dirs
            .get(key)
            .is_some_and(|files| self.options.entry_files.iter().any(|f| files.contains(f)))
    }
}

fn rel_key(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
