use regex::Regex;
use std::ops::Range;
use std::sync::LazyLock;

static LOOKS_LIKE_IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*import\b").expect("valid import regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedBinding {
    pub name: String,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bindings {
    /// `import x from ...`
    Default(String),
    /// `import { a, b as c } from ...`
    Named(Vec<NamedBinding>),
    /// `import * as ns from ...`
    Namespace(String),
    /// `import x, { a } from ...`
    DefaultAndNamed(String, Vec<NamedBinding>),
}

impl Bindings {
    /// Names introduced into scope, aliases taking precedence.
    pub fn local_names(&self) -> Vec<&str> {
        fn named(list: &[NamedBinding]) -> impl Iterator<Item = &str> {
            list.iter()
                .map(|b| b.alias.as_deref().unwrap_or(b.name.as_str()))
        }
        match self {
            Bindings::Default(n) | Bindings::Namespace(n) => vec![n.as_str()],
            Bindings::Named(list) => named(list).collect(),
            Bindings::DefaultAndNamed(d, list) => {
                std::iter::once(d.as_str()).chain(named(list)).collect()
            }
        }
    }
}

/// One import statement, borrowed from the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord<'s> {
    /// 1-based
    pub line_no: usize,
    /// The whole physical line including its terminator.
    pub text: &'s str,
    pub bindings: Bindings,
    pub quote: char,
    pub path: &'s str,
    /// Byte range of `path` inside `text`.
    pub path_span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassthroughRecord<'s> {
    pub line_no: usize,
    pub text: &'s str,
    /// Starts with `import` but does not match the grammar.
    pub ambiguous: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record<'s> {
    Import(ImportRecord<'s>),
    Passthrough(PassthroughRecord<'s>),
}

impl<'s> Record<'s> {
    pub fn text(&self) -> &'s str {
        match self {
            Record::Import(r) => r.text,
            Record::Passthrough(r) => r.text,
        }
    }
}

/// Lazily parse `source` one physical line at a time.
///
/// Every line, terminator included, comes back as exactly one record, so
/// concatenating `Record::text` reproduces `source` byte for byte.
pub fn parse(source: &str) -> Records<'_> {
    Records {
        lines: source.split_inclusive('\n'),
        line_no: 0,
    }
}

#[derive(Clone)]
pub struct Records<'s> {
    lines: std::str::SplitInclusive<'s, char>,
    line_no: usize,
}

impl<'s> Iterator for Records<'s> {
    type Item = Record<'s>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.lines.next()?;
        self.line_no += 1;
        Some(parse_line(self.line_no, text))
    }
}

fn parse_line(line_no: usize, text: &str) -> Record<'_> {
    let body = text
        .strip_suffix('\n')
        .map(|t| t.strip_suffix('\r').unwrap_or(t))
        .unwrap_or(text);

    if !LOOKS_LIKE_IMPORT.is_match(body) {
        return Record::Passthrough(PassthroughRecord {
            line_no,
            text,
            ambiguous: false,
        });
    }

    match Cursor::new(body).import_statement() {
        Some((bindings, quote, path_span)) => Record::Import(ImportRecord {
            line_no,
            text,
            bindings,
            quote,
            path: &text[path_span.clone()],
            path_span,
        }),
        None => {
            tracing::trace!(line_no, "import-like line does not match the grammar");
            Record::Passthrough(PassthroughRecord {
                line_no,
                text,
                ambiguous: true,
            })
        }
    }
}

struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    fn rest(&self) -> &'s str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    fn skip_ws(&mut self) -> usize {
        let start = self.pos;
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.pos += c.len_utf8();
        }
        self.pos - start
    }

    /// `word` not directly followed by another identifier character.
    fn keyword(&mut self, word: &str) -> bool {
        let rest = self.rest();
        if !rest.starts_with(word) {
            return false;
        }
        if rest[word.len()..].chars().next().is_some_and(is_ident_char) {
            return false;
        }
        self.pos += word.len();
        true
    }

    fn ident(&mut self) -> Option<String> {
        let rest = self.rest();
        let first = rest.chars().next()?;
        if !(first.is_alphabetic() || first == '_' || first == '$') {
            return None;
        }
        let len = rest
            .char_indices()
            .find(|&(_, c)| !is_ident_char(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        self.pos += len;
        Some(rest[..len].to_string())
    }

    fn import_statement(mut self) -> Option<(Bindings, char, Range<usize>)> {
        self.skip_ws();
        if !self.keyword("import") || (self.skip_ws() == 0 && self.peek() != Some('{')) {
            return None;
        }
        let bindings = self.bindings()?;
        self.skip_ws();
        if !self.keyword("from") {
            return None;
        }
        self.skip_ws();
        let (quote, span) = self.string_literal()?;
        self.skip_ws();
        self.eat(';');
        self.skip_ws();
        if !self.rest().is_empty() {
            return None;
        }
        Some((bindings, quote, span))
    }

    fn bindings(&mut self) -> Option<Bindings> {
        if self.peek() == Some('{') {
            return self.named_list().map(Bindings::Named);
        }
        if self.eat('*') {
            self.skip_ws();
            if !self.keyword("as") || self.skip_ws() == 0 {
                return None;
            }
            return self.ident().map(Bindings::Namespace);
        }
        let default = self.ident()?;
        if is_reserved(&default) {
            return None;
        }
        let save = self.pos;
        self.skip_ws();
        if self.eat(',') {
            self.skip_ws();
            let list = self.named_list()?;
            return Some(Bindings::DefaultAndNamed(default, list));
        }
        self.pos = save;
        // a default binding must be separated from `from`
        if !self.peek().is_some_and(char::is_whitespace) {
            return None;
        }
        Some(Bindings::Default(default))
    }

    fn named_list(&mut self) -> Option<Vec<NamedBinding>> {
        if !self.eat('{') {
            return None;
        }
        let mut list = Vec::new();
        loop {
            self.skip_ws();
            if self.eat('}') {
                break;
            }
            let name = self.ident()?;
            let save = self.pos;
            let mut alias = None;
            if self.skip_ws() > 0 && self.keyword("as") {
                if self.skip_ws() == 0 {
                    return None;
                }
                alias = Some(self.ident()?);
            } else {
                self.pos = save;
            }
            list.push(NamedBinding { name, alias });
            self.skip_ws();
            if self.eat(',') {
                continue;
            }
            self.skip_ws();
            if self.eat('}') {
                break;
            }
            return None;
        }
        if list.is_empty() { None } else { Some(list) }
    }

    fn string_literal(&mut self) -> Option<(char, Range<usize>)> {
        let quote = self.peek().filter(|c| *c == '\'' || *c == '"')?;
        self.pos += 1;
        let start = self.pos;
        let len = self.rest().find(quote)?;
        let path = &self.rest()[..len];
        if path.is_empty() || path.contains('\\') {
            return None;
        }
        self.pos += len + 1;
        Some((quote, start..start + len))
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn is_reserved(word: &str) -> bool {
    matches!(word, "type" | "typeof" | "from")
}
