//! Name normalization.
//!
//! Directory names in the module tree are kebab-case (`mortgage-calculator`),
//! component files are PascalCase (`MortgageCalculator.ts`), and names that
//! begin with digits get them spelled out when they become identifiers
//! (`401k` -> `FourZeroOneKCalculator`). Broken imports usually differ from
//! the real target only in one of these conventions.

use super::similarity::ratio;
use crate::config::NamingOptions;

/// A trailing word this close to a suffix token counts as a misspelling of it.
const SUFFIX_TYPO_RATIO: f32 = 0.8;

const DIGIT_WORDS: [&str; 10] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

#[derive(Debug, Clone)]
pub struct NamingPolicy {
    suffix: String,
    suffix_tokens: Vec<String>,
    file_stems: Vec<String>,
}

impl NamingPolicy {
    pub fn new(options: &NamingOptions) -> Self {
        let suffix = options.module_suffix.to_lowercase();
        let mut suffix_tokens = vec![suffix.clone()];
        suffix_tokens.extend(options.suffix_aliases.iter().map(|s| s.to_lowercase()));
        Self {
            suffix,
            suffix_tokens,
            file_stems: options.file_stems.clone(),
        }
    }

    /// Directory spellings to try, most faithful first.
    pub fn dir_forms(&self, name: &str) -> Vec<String> {
        let words = split_words(name);
        let collapsed = self.collapse(&words);
        let expanded = self.expand_alias(&collapsed);
        let toggled = self.toggle_suffix(&collapsed);
        let mut forms = Vec::new();
        push_unique(&mut forms, name.to_string());
        push_unique(&mut forms, kebab(&words));
        push_unique(&mut forms, kebab(&collapsed));
        push_unique(&mut forms, kebab(&expanded));
        push_unique(&mut forms, kebab(&toggled));
        forms.retain(|f| !f.is_empty());
        forms
    }

    /// File-name spellings to try for a file segment given without extension.
    pub fn file_forms(&self, name: &str) -> Vec<String> {
        let words = split_words(name);
        let collapsed = self.collapse(&words);
        let expanded = self.expand_alias(&collapsed);
        let toggled = self.toggle_suffix(&collapsed);
        let mut base = Vec::new();
        push_unique(&mut base, name.to_string());
        push_unique(&mut base, pascal(&words));
        push_unique(&mut base, camel(&words));
        push_unique(&mut base, pascal(&collapsed));
        push_unique(&mut base, pascal(&expanded));
        push_unique(&mut base, pascal(&toggled));

        let mut forms = base.clone();
        for form in &base {
            push_unique(&mut forms, spell_leading_digits(form));
        }
        forms.retain(|f| !f.is_empty());
        forms
    }

    /// The component file a generated module directory is expected to hold:
    /// `401k-plan` -> `FourZeroOneKPlanCalculator`.
    pub fn module_file_base(&self, dir_name: &str) -> String {
        let words = self.collapse(&split_words(dir_name));
        let words = if self.ends_with_suffix(&words) {
            words
        } else {
            let mut w = words;
            w.push(self.suffix.clone());
            w
        };
        spell_leading_digits(&pascal(&words))
    }

    /// Kebab-case name with every trailing suffix token removed; the unit of
    /// fuzzy comparison, so a shared `-calculator` tail adds nothing to a score.
    /// Misspelled suffixes (`calcualtor`, `calcs`) are removed too.
    pub fn stem(&self, name: &str) -> String {
        let mut words = split_words(name);
        while words.len() > 1 && words.last().is_some_and(|w| self.is_suffix_like(w)) {
            words.pop();
        }
        kebab(&words)
    }

    /// True for segments that name a file rather than a module directory.
    pub fn looks_like_file(&self, segment: &str) -> bool {
        segment.chars().any(char::is_uppercase) || self.file_stems.iter().any(|s| s == segment)
    }

    fn collapse(&self, words: &[String]) -> Vec<String> {
        let run = words
            .iter()
            .rev()
            .take_while(|w| self.is_suffix_token(Some(*w)))
            .count();
        if run < 2 || run == words.len() {
            return words.to_vec();
        }
        let mut out = words[..words.len() - run].to_vec();
        out.push(words[words.len() - 1].clone());
        out
    }

    /// `bmi-calc` -> `bmi-calculator`
    fn expand_alias(&self, words: &[String]) -> Vec<String> {
        let mut out = words.to_vec();
        if let Some(last) = out.last_mut() {
            if self.is_suffix_token(Some(&*last)) && !last.eq_ignore_ascii_case(&self.suffix) {
                *last = self.suffix.clone();
            }
        }
        out
    }

    fn toggle_suffix(&self, words: &[String]) -> Vec<String> {
        if self.ends_with_suffix(words) {
            if words.len() > 1 {
                words[..words.len() - 1].to_vec()
            } else {
                words.to_vec()
            }
        } else {
            let mut out = words.to_vec();
            out.push(self.suffix.clone());
            out
        }
    }

    fn ends_with_suffix(&self, words: &[String]) -> bool {
        words
            .last()
            .is_some_and(|w| w.eq_ignore_ascii_case(&self.suffix))
    }

    fn is_suffix_like(&self, word: &str) -> bool {
        let word = word.to_lowercase();
        self.suffix_tokens
            .iter()
            .any(|t| *t == word || ratio(&word, t) >= SUFFIX_TYPO_RATIO)
    }

    fn is_suffix_token(&self, word: Option<&String>) -> bool {
        word.is_some_and(|w| self.suffix_tokens.iter().any(|t| w.eq_ignore_ascii_case(t)))
    }
}

fn push_unique(forms: &mut Vec<String>, form: String) {
    if !forms.contains(&form) {
        forms.push(form);
    }
}

/// Split on `-`, `_`, spaces, dots and camel-case boundaries.
/// Acronyms stay together: `ROICalculator` -> `ROI`, `Calculator`.
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();
    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '_' | ' ' | '.') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower)
            {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

pub fn kebab(words: &[String]) -> String {
    words
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn pascal(words: &[String]) -> String {
    words.iter().map(|w| capitalize(w)).collect()
}

pub fn camel(words: &[String]) -> String {
    let p = pascal(words);
    let mut chars = p.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn capitalize(word: &str) -> String {
    // keep acronyms such as ROI intact
    if word.len() > 1 && word.chars().all(|c| c.is_uppercase() || c.is_ascii_digit()) {
        return word.to_string();
    }
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `401kCalculator` -> `FourZeroOneKCalculator`. Names without a leading
/// digit are returned unchanged.
pub fn spell_leading_digits(name: &str) -> String {
    let digits: String = name.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return name.to_string();
    }
    let mut out: String = digits
        .bytes()
        .map(|d| DIGIT_WORDS[(d - b'0') as usize])
        .collect();
    out.push_str(&capitalize(&name[digits.len()..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> NamingPolicy {
        NamingPolicy::new(&NamingOptions::default())
    }

    #[test]
    fn split_words_handles_conventions() {
        assert_eq!(split_words("mortgage_calculator"), vec!["mortgage", "calculator"]);
        assert_eq!(split_words("mortgageCalculator"), vec!["mortgage", "Calculator"]);
        assert_eq!(split_words("ROICalculator"), vec!["ROI", "Calculator"]);
        assert_eq!(split_words("401k-plan"), vec!["401k", "plan"]);
        assert_eq!(split_words("401kCalculator"), vec!["401k", "Calculator"]);
    }

    #[test]
    fn dir_forms_convert_to_kebab_and_toggle_suffix() {
        let p = policy();
        assert_eq!(
            p.dir_forms("mortgage_calculator"),
            vec!["mortgage_calculator", "mortgage-calculator", "mortgage"]
        );
        assert_eq!(
            p.dir_forms("roi-calculator-calculator"),
            vec!["roi-calculator-calculator", "roi-calculator", "roi"]
        );
        assert_eq!(
            p.dir_forms("BmiCalc"),
            vec!["BmiCalc", "bmi-calc", "bmi-calculator", "bmi-calc-calculator"]
        );
    }

    #[test]
    fn file_forms_include_pascal_and_spelled_digits() {
        let p = policy();
        let forms = p.file_forms("mortgage-calculator");
        assert_eq!(forms[0], "mortgage-calculator");
        assert_eq!(forms[1], "MortgageCalculator");
        assert!(forms.contains(&"Mortgage".to_string()));

        let forms = p.file_forms("401kCalculator");
        assert!(forms.contains(&"FourZeroOneKCalculator".to_string()));

        let forms = p.file_forms("MortgageCalculatorCalculator");
        assert!(forms.contains(&"MortgageCalculator".to_string()));
    }

    #[test]
    fn module_file_base_matches_generated_names() {
        let p = policy();
        assert_eq!(p.module_file_base("mortgage-calculator"), "MortgageCalculator");
        assert_eq!(p.module_file_base("401k"), "FourZeroOneKCalculator");
        assert_eq!(p.module_file_base("payback-period"), "PaybackPeriodCalculator");
    }

    #[test]
    fn stem_drops_suffix_tokens() {
        let p = policy();
        assert_eq!(p.stem("ghost-calc"), "ghost");
        assert_eq!(p.stem("bmi-calculator"), "bmi");
        assert_eq!(p.stem("mortgage_calculator"), "mortgage");
        assert_eq!(p.stem("calculator"), "calculator");
        assert_eq!(p.stem("finance"), "finance");
        assert_eq!(p.stem("mortgage-calcualtor"), "mortgage");
        assert_eq!(p.stem("bmi-calcs"), "bmi");
        assert_eq!(p.stem("bmi-calculato"), "bmi");
        // not close enough to either suffix
        assert_eq!(p.stem("tax-calendar"), "tax-calendar");
    }

    #[test]
    fn looks_like_file_uses_case_and_known_stems() {
        let p = policy();
        assert!(p.looks_like_file("MortgageCalculator"));
        assert!(p.looks_like_file("formulas"));
        assert!(p.looks_like_file("quickValidation"));
        assert!(!p.looks_like_file("mortgage-calculator"));
    }
}
