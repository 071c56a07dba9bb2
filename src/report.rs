//! Change records and their rendering.
//!
//! Rendering is a pure function of the records; writing the result
//! anywhere is left to the caller.

use crate::resolve::Confidence;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

pub const NO_MATCHING_MODULE: &str = "no matching module";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChangeRecord {
    Fixed {
        line_no: usize,
        original: String,
        from: String,
        to: String,
        confidence: Confidence,
    },
    Removed {
        line_no: usize,
        original: String,
        path: String,
        reason: String,
    },
    Unchanged {
        line_no: usize,
        path: String,
    },
}

/// A line that starts like an import but was left alone because it does
/// not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ambiguity {
    pub line_no: usize,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileReport {
    pub file: PathBuf,
    pub records: Vec<ChangeRecord>,
    pub ambiguities: Vec<Ambiguity>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub fixed: usize,
    pub removed: usize,
    pub unchanged: usize,
    pub errors: usize,
}

impl Totals {
    fn add(&mut self, other: Totals) {
        self.fixed += other.fixed;
        self.removed += other.removed;
        self.unchanged += other.unchanged;
        self.errors += other.errors;
    }

    /// Fixed or removed imports, i.e. the file content changes.
    pub fn changes(&self) -> usize {
        self.fixed + self.removed
    }
}

impl FileReport {
    pub fn new(file: PathBuf) -> Self {
        Self {
            file,
            records: Vec::new(),
            ambiguities: Vec::new(),
        }
    }

    pub fn totals(&self) -> Totals {
        let mut t = Totals {
            errors: self.ambiguities.len(),
            ..Totals::default()
        };
        for record in &self.records {
            match record {
                ChangeRecord::Fixed { .. } => t.fixed += 1,
                ChangeRecord::Removed { .. } => t.removed += 1,
                ChangeRecord::Unchanged { .. } => t.unchanged += 1,
            }
        }
        t
    }
}

pub fn totals(reports: &[FileReport]) -> Totals {
    let mut t = Totals::default();
    for r in reports {
        t.add(r.totals());
    }
    t
}

fn confidence_label(c: &Confidence) -> String {
    match c {
        Confidence::Normalized => "normalized".into(),
        Confidence::Fuzzy(score) => format!("fuzzy {:.2}", score),
    }
}

/// Human-readable summary grouped by outcome.
pub fn render_text(reports: &[FileReport]) -> String {
    let mut out = String::new();
    out.push_str("Import fix report\n");
    out.push_str("=================\n");

    for report in reports {
        let t = report.totals();
        out.push('\n');
        out.push_str(&format!("{}\n", report.file.display()));

        out.push_str(&format!("  Fixed ({})\n", t.fixed));
        for record in &report.records {
            if let ChangeRecord::Fixed {
                line_no,
                original,
                from,
                to,
                confidence,
            } = record
            {
                out.push_str(&format!("    line {}: {}\n", line_no, original));
                out.push_str(&format!(
                    "      {} -> {} ({})\n",
                    from,
                    to,
                    confidence_label(confidence)
                ));
            }
        }

        out.push_str(&format!("  Removed ({})\n", t.removed));
        for record in &report.records {
            if let ChangeRecord::Removed {
                line_no,
                original,
                reason,
                ..
            } = record
            {
                out.push_str(&format!("    line {}: {}\n", line_no, original));
                out.push_str(&format!("      {}\n", reason));
            }
        }

        out.push_str(&format!("  Unchanged ({})\n", t.unchanged));
        for record in &report.records {
            if let ChangeRecord::Unchanged { line_no, path } = record {
                out.push_str(&format!("    line {}: {}\n", line_no, path));
            }
        }

        out.push_str(&format!("  Errors ({})\n", t.errors));
        for a in &report.ambiguities {
            out.push_str(&format!(
                "    line {}: unrecognized import syntax: {}\n",
                a.line_no, a.text
            ));
        }
    }

    let t = totals(reports);
    out.push('\n');
    out.push_str(&format!(
        "Totals: files={} fixed={} removed={} unchanged={} errors={}\n",
        reports.len(),
        t.fixed,
        t.removed,
        t.unchanged,
        t.errors
    ));
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    totals: Totals,
}

pub fn render_json(reports: &[FileReport]) -> Result<String> {
    let doc = JsonReport {
        files: reports,
        totals: totals(reports),
    };
    serde_json::to_string_pretty(&doc).context("failed to serialize report")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FileReport {
        FileReport {
            file: PathBuf::from("src/calculators/index.ts"),
            records: vec![
                ChangeRecord::Fixed {
                    line_no: 1,
                    original: "import { m } from './mortgage_calculator';".into(),
                    from: "./mortgage_calculator".into(),
                    to: "./finance/mortgage-calculator".into(),
                    confidence: Confidence::Normalized,
                },
                ChangeRecord::Removed {
                    line_no: 2,
                    original: "import { g } from './ghost-calc';".into(),
                    path: "./ghost-calc".into(),
                    reason: NO_MATCHING_MODULE.into(),
                },
                ChangeRecord::Unchanged {
                    line_no: 3,
                    path: "./health/bmi-calculator".into(),
                },
            ],
            ambiguities: vec![Ambiguity {
                line_no: 4,
                text: "import type { T } from './types';".into(),
            }],
        }
    }

    #[test]
    fn text_report_groups_by_outcome() {
        let text = render_text(&[sample()]);
        assert!(text.contains("  Fixed (1)\n    line 1: import { m } from './mortgage_calculator';\n"));
        assert!(text.contains("./mortgage_calculator -> ./finance/mortgage-calculator (normalized)"));
        assert!(text.contains("  Removed (1)\n    line 2: import { g } from './ghost-calc';\n      no matching module\n"));
        assert!(text.contains("  Unchanged (1)\n    line 3: ./health/bmi-calculator\n"));
        assert!(text.contains("  Errors (1)\n"));
        assert!(text.ends_with("Totals: files=1 fixed=1 removed=1 unchanged=1 errors=1\n"));

        let fixed = text.find("Fixed (").unwrap();
        let removed = text.find("Removed (").unwrap();
        let unchanged = text.find("Unchanged (").unwrap();
        assert!(fixed < removed && removed < unchanged);
    }

    #[test]
    fn json_report_carries_outcomes_and_totals() {
        let json = render_json(&[sample()]).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(v["totals"]["fixed"], 1);
        assert_eq!(v["totals"]["errors"], 1);
        let records = &v["files"][0]["records"];
        assert_eq!(records[0]["outcome"], "fixed");
        assert_eq!(records[0]["confidence"]["kind"], "normalized");
        assert_eq!(records[1]["reason"], NO_MATCHING_MODULE);
    }

    #[test]
    fn empty_report_has_zero_totals() {
        let text = render_text(&[]);
        assert!(text.contains("Totals: files=0 fixed=0 removed=0 unchanged=0 errors=0"));
        assert_eq!(totals(&[]).changes(), 0);
    }
}
