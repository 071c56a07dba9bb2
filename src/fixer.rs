use crate::imports::{LineEdit, Record, parse, rewrite};
use crate::report::{Ambiguity, ChangeRecord, FileReport, NO_MATCHING_MODULE};
use crate::resolve::{ImportDecision, Resolver};
use std::collections::BTreeMap;
use std::path::Path;

pub struct FixOutcome {
    pub output: String,
    pub report: FileReport,
}

/// Resolve every import in `source` and build the corrected text.
///
/// `from_dir` is the canonical directory of `file`; specifiers are resolved
/// against it. Nothing is written here.
pub fn fix_source(resolver: &Resolver<'_>, file: &Path, from_dir: &Path, source: &str) -> FixOutcome {
    let mut report = FileReport::new(file.to_path_buf());
    let mut edits: BTreeMap<usize, LineEdit> = BTreeMap::new();

    for record in parse(source) {
        let import = match record {
            Record::Import(import) => import,
            Record::Passthrough(line) => {
                if line.ambiguous {
                    report.ambiguities.push(Ambiguity {
                        line_no: line.line_no,
                        text: trim_eol(line.text).to_string(),
                    });
                }
                continue;
            }
        };

        let original = trim_eol(import.text).to_string();
        match resolver.resolve_import(from_dir, import.path) {
            ImportDecision::External | ImportDecision::OutsideRoot | ImportDecision::Exact => {
                report.records.push(ChangeRecord::Unchanged {
                    line_no: import.line_no,
                    path: import.path.to_string(),
                });
            }
            ImportDecision::Corrected {
                specifier,
                confidence,
            } => {
                tracing::debug!(
                    line = import.line_no,
                    from = import.path,
                    to = %specifier,
                    ?confidence,
                    "import fixed"
                );
                edits.insert(import.line_no, LineEdit::Replace(specifier.clone()));
                report.records.push(ChangeRecord::Fixed {
                    line_no: import.line_no,
                    original,
                    from: import.path.to_string(),
                    to: specifier,
                    confidence,
                });
            }
            ImportDecision::Unresolved => {
                tracing::warn!(
                    file = %file.display(),
                    line = import.line_no,
                    "removing unresolvable import {}",
                    import.path
                );
                edits.insert(import.line_no, LineEdit::Drop);
                report.records.push(ChangeRecord::Removed {
                    line_no: import.line_no,
                    original,
                    path: import.path.to_string(),
                    reason: NO_MATCHING_MODULE.to_string(),
                });
            }
        }
    }

    let output = if edits.is_empty() {
        source.to_string()
    } else {
        rewrite(parse(source), &edits)
    };
    FixOutcome { output, report }
}

fn trim_eol(text: &str) -> &str {
    text.trim_end_matches(['\n', '\r'])
}
