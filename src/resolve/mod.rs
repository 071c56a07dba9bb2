//! Import target resolution against a [`ModuleIndex`] snapshot.
//!
//! Steps run in a fixed order and the first one that succeeds wins: exact
//! lookup, name normalization, fuzzy directory matching, then recombination
//! of the accepted directory with a file segment. Nothing here touches the
//! filesystem; the index is the only source of truth.

pub mod index;
pub mod naming;
pub mod similarity;

use crate::utils::{normalize_lexically, relative_specifier, segments_under};
use index::ModuleIndex;
use naming::NamingPolicy;
use serde::Serialize;
use std::path::Path;

pub const DEFAULT_THRESHOLD: f32 = 0.6;

/// How a corrected target was found. Exact hits are never corrected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "score", rename_all = "snake_case")]
pub enum Confidence {
    Normalized,
    Fuzzy(f32),
}

/// A root-relative target found for a broken import.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub segments: Vec<String>,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Exact,
    Corrected(Candidate),
    Unresolved,
}

/// What to do with one import specifier as written in a file.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportDecision {
    /// Bare package specifier; not ours to check.
    External,
    /// Relative path that leaves the module root.
    OutsideRoot,
    Exact,
    Corrected {
        specifier: String,
        confidence: Confidence,
    },
    Unresolved,
}

/// A target split into the directory segment and an optional file segment.
#[derive(Debug)]
struct ModulePath<'t> {
    parent: &'t [String],
    dir: &'t str,
    file: Option<&'t str>,
}

pub struct Resolver<'a> {
    index: &'a ModuleIndex,
    naming: &'a NamingPolicy,
    threshold: f32,
}

impl<'a> Resolver<'a> {
    pub fn new(index: &'a ModuleIndex, naming: &'a NamingPolicy, threshold: f32) -> Self {
        Self {
            index,
            naming,
            threshold,
        }
    }

    /// Decide on `specifier` as imported from a file living in `from_dir`.
    /// `from_dir` must be absolute and lexically normalized, like the index root.
    pub fn resolve_import(&self, from_dir: &Path, specifier: &str) -> ImportDecision {
        if !is_relative(specifier) {
            return ImportDecision::External;
        }
        let target = normalize_lexically(&from_dir.join(specifier));
        let Some(segments) = segments_under(self.index.root(), &target) else {
            return ImportDecision::OutsideRoot;
        };

        match self.resolve(&segments) {
            Resolution::Exact => ImportDecision::Exact,
            Resolution::Unresolved => ImportDecision::Unresolved,
            Resolution::Corrected(candidate) => {
                let mut abs = self.index.root().to_path_buf();
                abs.extend(&candidate.segments);
                ImportDecision::Corrected {
                    specifier: relative_specifier(from_dir, &abs),
                    confidence: candidate.confidence,
                }
            }
        }
    }

    /// Resolve a root-relative target path.
    pub fn resolve(&self, target: &[String]) -> Resolution {
        if self.index.exists(target) {
            return Resolution::Exact;
        }
        let Some(path) = self.split(target) else {
            return Resolution::Unresolved;
        };

        let normalized = self.normalized_dirs(&path);
        if !normalized.is_empty() {
            tracing::trace!(dir = path.dir, found = normalized.len(), "normalized directory match");
            return self.first_recombined(&normalized, &path, Confidence::Normalized);
        }

        if let Some((name, score)) = self.fuzzy_name(&path) {
            tracing::trace!(dir = path.dir, name, score, "fuzzy directory match");
            let dirs = self.index.locate(name);
            return self.first_recombined(&dirs, &path, Confidence::Fuzzy(score));
        }

        Resolution::Unresolved
    }

    fn split<'t>(&self, target: &'t [String]) -> Option<ModulePath<'t>> {
        let n = target.len();
        if n >= 2
            && (self.index.has_source_extension(&target[n - 1])
                || self.naming.looks_like_file(&target[n - 1]))
        {
            return Some(ModulePath {
                parent: &target[..n - 2],
                dir: &target[n - 2],
                file: Some(&target[n - 1]),
            });
        }
        let (dir, parent) = target.split_last()?;
        Some(ModulePath {
            parent,
            dir,
            file: None,
        })
    }

    /// Existing directories reachable through a normalized spelling of the
    /// directory segment: same parent first, then anywhere by terminal name.
    fn normalized_dirs(&self, path: &ModulePath<'_>) -> Vec<Vec<String>> {
        let mut found: Vec<Vec<String>> = Vec::new();
        for form in self.naming.dir_forms(path.dir) {
            let mut local = path.parent.to_vec();
            local.push(form.clone());
            if self.index.is_dir(&local) && !found.contains(&local) {
                found.push(local);
            }
            for located in self.index.locate(&form) {
                if !found.contains(&located) {
                    found.push(located);
                }
            }
        }
        found
    }

    fn fuzzy_name(&self, path: &ModulePath<'_>) -> Option<(&'a str, f32)> {
        let mut queries: Vec<String> = Vec::new();
        for form in self.naming.dir_forms(path.dir) {
            let stem = self.naming.stem(&form);
            if !queries.contains(&stem) {
                queries.push(stem);
            }
        }
        let naming = self.naming;
        let pool = self.index.all_names().map(|n| (n, naming.stem(n)));
        similarity::best_match(&queries, pool, self.threshold)
    }

    fn first_recombined(
        &self,
        dirs: &[Vec<String>],
        path: &ModulePath<'_>,
        confidence: Confidence,
    ) -> Resolution {
        for dir in dirs {
            if let Some(segments) = self.recombine(dir, path) {
                return Resolution::Corrected(Candidate {
                    segments,
                    confidence,
                });
            }
        }
        Resolution::Unresolved
    }

    /// Retry the file segment under `dir`: original name, normalized names,
    /// then the directory name reused as the file base name. When no spelling
    /// exists exactly, the same list is matched ignoring case.
    fn recombine(&self, dir: &[String], path: &ModulePath<'_>) -> Option<Vec<String>> {
        let dir_name = dir.last()?;
        let mut files: Vec<String> = Vec::new();
        match path.file {
            None => {
                if self.index.exists(dir) {
                    return Some(dir.to_vec());
                }
                files.push(self.naming.module_file_base(dir_name));
            }
            Some(file) => {
                let (stem, ext) = split_extension(file);
                files.push(file.to_string());
                for form in self.naming.file_forms(stem) {
                    files.push(with_extension(form, ext));
                }
                files.push(with_extension(self.naming.module_file_base(dir_name), ext));
            }
        }

        let joined = |file: String| {
            let mut segments = dir.to_vec();
            segments.push(file);
            segments
        };
        if let Some(found) = files
            .iter()
            .map(|file| joined(file.clone()))
            .find(|segments| self.index.exists(segments))
        {
            return Some(found);
        }
        // generated names keep acronyms upper-cased (`...ROICalculator`)
        files
            .iter()
            .find_map(|file| self.index.find_file_ignore_case(dir, file))
            .map(joined)
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

fn split_extension(file: &str) -> (&str, Option<&str>) {
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (file, None),
    }
}

fn with_extension(stem: String, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}
