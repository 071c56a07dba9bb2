use super::parser::Record;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEdit {
    /// Swap the import's path for this specifier.
    Replace(String),
    Drop,
}

/// Reassemble the text in one forward pass, applying `edits` keyed by line number.
///
/// Only the path span of a replaced import changes; passthrough lines and
/// lines without an edit are copied untouched.
pub fn rewrite<'s, I>(records: I, edits: &BTreeMap<usize, LineEdit>) -> String
where
    I: IntoIterator<Item = Record<'s>>,
{
    let mut out = String::new();
    for record in records {
        match record {
            Record::Import(import) => match edits.get(&import.line_no) {
                Some(LineEdit::Drop) => {}
                Some(LineEdit::Replace(specifier)) => {
                    out.push_str(&import.text[..import.path_span.start]);
                    out.push_str(specifier);
                    out.push_str(&import.text[import.path_span.end..]);
                }
                None => out.push_str(import.text),
            },
            Record::Passthrough(line) => out.push_str(line.text),
        }
    }
    out
}
