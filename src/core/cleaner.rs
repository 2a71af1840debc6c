//! Meaning cleanup for CC-CEDICT style definitions.
//!
//! Definitions pulled from the dictionary carry annotation noise: classifier
//! notes, bracketed pinyin, simplified|traditional pairs and stray Chinese
//! characters. The cleaner strips that noise with an ordered list of
//! substitution rules. Order matters: later rules assume earlier ones have
//! already removed competing matches.

use std::collections::BTreeMap;

use regex::Regex;

/// CJK Unified Ideographs plus Extension A
const CJK: &str = r"[\x{4e00}-\x{9fff}\x{3400}-\x{4dbf}]";

/// Characters trimmed from both ends of a cleaned meaning
const TRIM_CHARS: [char; 3] = [' ', ';', ','];

/// A single substitution rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Short name used in logs and tests
    pub name: &'static str,

    /// Why the rule exists
    pub rationale: &'static str,

    pattern: Regex,
    replacement: &'static str,
}

impl Rule {
    fn new(
        name: &'static str,
        pattern: &str,
        replacement: &'static str,
        rationale: &'static str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name,
            rationale,
            pattern: Regex::new(pattern)?,
            replacement,
        })
    }

    /// Apply this rule to every non-overlapping match
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement)
            .into_owned()
    }
}

/// The rule set in application order
pub fn default_rules() -> Result<Vec<Rule>, regex::Error> {
    Ok(vec![
        Rule::new(
            "classifier",
            r";\s*CL:[^;]+",
            "",
            "measure-word notes run from `CL:` to the next separator",
        )?,
        Rule::new(
            "pinyin",
            r"\[[a-zāáǎàēéěèīíǐìōóǒòūúǔùǖǘǚǜü\s]+\]",
            "",
            "pronunciation guides are shown elsewhere on the card",
        )?,
        Rule::new(
            "script-pair",
            &format!(r"{CJK}+\|{CJK}+"),
            "",
            "traditional|simplified equivalence notes; must run before bare CJK removal",
        )?,
        Rule::new(
            "cjk",
            &format!(r"{CJK}+"),
            "",
            "the meaning field should only contain English",
        )?,
        Rule::new(
            "variant-of",
            r"variant of\s*;?\s*",
            "",
            "lead-in left dangling once its CJK target is gone",
        )?,
        Rule::new(
            "abbreviation-of",
            r"abbr\. of\s*;?",
            "",
            "lead-in left dangling once its CJK target is gone",
        )?,
        Rule::new(
            "also-pronounced",
            r"also pr\.\s*;?",
            "",
            "lead-in left dangling once its pinyin target is gone",
        )?,
        Rule::new(
            "double-separator",
            r";\s*;",
            ";",
            "removals above leave empty fields between separators",
        )?,
        Rule::new(
            "empty-parens",
            r"\(\s*\)",
            "",
            "removals above leave empty parenthetical groups",
        )?,
        Rule::new(
            "whitespace",
            r"\s{2,}",
            " ",
            "removals above leave runs of whitespace",
        )?,
    ])
}

/// Hand-curated meanings for headwords the rules cannot fix
pub fn default_overrides() -> BTreeMap<String, String> {
    [
        ("个", "(general measure word)"),
        ("怎么", "how; why; what"),
    ]
    .into_iter()
    .map(|(word, meaning)| (word.to_string(), meaning.to_string()))
    .collect()
}

/// Applies the rule pipeline and the override fallback
#[derive(Debug, Clone)]
pub struct MeaningCleaner {
    rules: Vec<Rule>,
    overrides: BTreeMap<String, String>,
}

impl MeaningCleaner {
    /// Cleaner with the built-in rules and overrides
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            rules: default_rules()?,
            overrides: default_overrides(),
        })
    }

    /// Add or replace override meanings
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.overrides.extend(overrides);
        self
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn overrides(&self) -> &BTreeMap<String, String> {
        &self.overrides
    }

    /// Run every rule once, in order, then trim
    fn pass(&self, input: &str) -> String {
        let mut out = input.to_string();
        for rule in &self.rules {
            out = rule.apply(&out);
        }
        out.trim_matches(TRIM_CHARS.as_slice()).to_string()
    }

    /// Clean a meaning string.
    ///
    /// Empty input is returned unchanged. The pipeline is repeated until the
    /// output stops changing, so cleaning a cleaned string is a no-op. A pass
    /// that changes anything makes the string strictly shorter, so the loop
    /// terminates.
    pub fn clean(&self, meaning: &str) -> String {
        if meaning.is_empty() {
            return String::new();
        }

        let mut current = meaning.to_string();
        loop {
            let next = self.pass(&current);
            if next == current {
                return current;
            }
            current = next;
        }
    }

    /// Clean the meaning of one entry, falling back to an override when the
    /// rules produced nothing or nothing new.
    pub fn clean_entry(&self, headword: &str, meaning: &str) -> String {
        let cleaned = self.clean(meaning);
        match self.overrides.get(headword) {
            Some(fixed) if cleaned.is_empty() || cleaned == meaning => fixed.clone(),
            _ => cleaned,
        }
    }
}
