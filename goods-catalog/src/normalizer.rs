//! Description normalization and entity extraction
//!
//! The linguistic model sits behind [`TextAnalyzer`] so a heavier backend can
//! be swapped in. [`RuleBasedAnalyzer`] is the built-in implementation:
//! regex tokenization, an English stop-word list, suffix-rule lemmatization and
//! pattern-based entity tagging.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use goods_core::Entity;
use regex::Regex;
use thiserror::Error;

/// Output of analyzing one cleaned description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextAnalysis {
    /// Lemmas joined by single spaces
    pub normalized: String,
    /// Distinct entities in order of first appearance
    pub entities: Vec<Entity>,
}

#[derive(Debug, Error)]
pub enum NormalizerError {
    #[error("Linguistic model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Analysis failed: {0}")]
    Analysis(String),
}

/// Linguistic model used to normalize descriptions
pub trait TextAnalyzer: Send + Sync {
    fn analyze(&self, text: &str) -> Result<TextAnalysis, NormalizerError>;
}

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\w+(?:[-'’]\w+)*|[^\w\s]+").expect("Invalid token regex")
});

static NUMERIC_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        (?P<money>[$€£]\s?\d+(?:[.,]\d+)*|\d+(?:\.\d+)?\s?(?i:usd|eur|gbp|dollars?|euros?)\b)
        |(?P<percent>\d+(?:\.\d+)?\s?(?:%|(?i:percent)\b))
        |(?P<quantity>\d+(?:\.\d+)?\s?(?i:fl\.?\s?oz|ml|mg|kg|lbs?|oz|cm|mm|g|l|m|inch(?:es)?|pcs|pieces|pack)\b)
        |(?P<cardinal>\b\d+(?:[.,]\d+)*\b)",
    )
    .expect("Invalid entity regex")
});

static CAPITALIZED_RUN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b\p{Lu}[\w&'’-]*(?:[ \t]+\p{Lu}[\w&'’-]*)*").expect("Invalid name regex")
});

static STOP_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "almost", "also", "am",
        "among", "an", "and", "any", "are", "around", "as", "at", "be", "because", "been",
        "before", "being", "below", "between", "both", "but", "by", "can", "cannot", "could",
        "did", "do", "does", "doing", "done", "down", "during", "each", "either", "enough",
        "even", "every", "few", "for", "from", "further", "get", "had", "has", "have", "having",
        "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "however", "i",
        "if", "in", "into", "is", "it", "its", "itself", "just", "last", "least", "less", "made",
        "make", "many", "may", "me", "might", "more", "most", "much", "must", "my", "myself",
        "neither", "never", "no", "nor", "not", "now", "of", "off", "often", "on", "once",
        "one", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "per",
        "please", "quite", "rather", "really", "same", "say", "see", "several", "she", "should",
        "since", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
        "themselves", "then", "there", "these", "they", "this", "those", "though", "through",
        "thus", "to", "together", "too", "top", "under", "until", "up", "upon", "us", "use",
        "used", "using", "various", "very", "via", "was", "we", "well", "were", "what",
        "whatever", "when", "where", "whether", "which", "while", "who", "whole", "whom",
        "whose", "why", "will", "with", "within", "without", "would", "yet", "you", "your",
        "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

static IRREGULAR_LEMMAS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("children", "child"),
        ("men", "man"),
        ("women", "woman"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("people", "person"),
        ("leaves", "leaf"),
        ("knives", "knife"),
        ("lives", "life"),
        ("shelves", "shelf"),
        ("halves", "half"),
        ("better", "good"),
        ("best", "good"),
        ("built", "build"),
        ("kept", "keep"),
        ("felt", "feel"),
        ("sold", "sell"),
        ("bought", "buy"),
        ("brought", "bring"),
        ("grown", "grow"),
        ("given", "give"),
        ("taken", "take"),
        ("worn", "wear"),
        ("left", "leave"),
        ("found", "find"),
    ]
    .into_iter()
    .collect()
});

/// Nouns ending in -ing that are not verb forms
static ING_NOUNS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "anything", "bearing", "bedding", "building", "casing", "ceiling", "clothing",
        "coating", "darling", "drawing", "dressing", "dumpling", "duckling", "earring",
        "evening", "everything", "filling", "fitting", "flooring", "frosting", "housing",
        "keyring", "legging", "lighting", "lining", "morning", "nothing", "packaging",
        "padding", "painting", "pudding", "railing", "roofing", "sapling", "seasoning",
        "seedling", "setting", "sibling", "siding", "something", "sterling", "stocking",
        "stuffing", "topping", "tubing", "wedding", "wiring",
    ]
    .into_iter()
    .collect()
});

/// Built-in rule-based linguistic model
#[derive(Debug, Clone, Default)]
pub struct RuleBasedAnalyzer;

impl RuleBasedAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Lemmatize and filter a description
    pub fn normalize(&self, text: &str) -> String {
        TOKEN_RE
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|token| token.chars().any(char::is_alphanumeric))
            .map(str::to_lowercase)
            .filter(|token| !is_stop_word(token))
            .map(|token| lemmatize(&token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Tag numeric and proper-name spans, in text order
    pub fn extract_entities(&self, text: &str) -> Vec<Entity> {
        let mut spans: Vec<(usize, Entity)> = Vec::new();

        for caps in NUMERIC_ENTITY_RE.captures_iter(text) {
            let (label, m) = if let Some(m) = caps.name("money") {
                ("MONEY", m)
            } else if let Some(m) = caps.name("percent") {
                ("PERCENT", m)
            } else if let Some(m) = caps.name("quantity") {
                ("QUANTITY", m)
            } else if let Some(m) = caps.name("cardinal") {
                ("CARDINAL", m)
            } else {
                continue;
            };
            spans.push((m.start(), Entity::new(m.as_str(), label)));
        }

        for m in CAPITALIZED_RUN_RE.find_iter(text) {
            if let Some((offset, name)) = proper_name(text, m.start(), m.as_str()) {
                spans.push((offset, Entity::new(name, "ORG")));
            }
        }

        spans.sort_by_key(|(start, _)| *start);

        let mut seen = HashSet::new();
        spans
            .into_iter()
            .map(|(_, entity)| entity)
            .filter(|entity| seen.insert(entity.clone()))
            .collect()
    }
}

impl TextAnalyzer for RuleBasedAnalyzer {
    fn analyze(&self, text: &str) -> Result<TextAnalysis, NormalizerError> {
        Ok(TextAnalysis {
            normalized: self.normalize(text),
            entities: self.extract_entities(text),
        })
    }
}

fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(token)
}

/// Trim leading stop words from a capitalized run and decide whether it names something
///
/// A lone capitalized word at the start of a sentence is ordinary prose.
fn proper_name(text: &str, start: usize, run: &str) -> Option<(usize, String)> {
    let mut offset = start;
    let mut words: Vec<&str> = Vec::new();
    let mut leading = true;

    for word in run.split_whitespace() {
        if leading && is_stop_word(&word.to_lowercase()) {
            offset = start + run.find(word).unwrap_or(0) + word.len();
            continue;
        }
        leading = false;
        words.push(word);
    }

    match words.len() {
        0 => None,
        1 if sentence_start(text, start) && offset == start => None,
        _ => {
            let name = words.join(" ");
            Some((offset, name))
        }
    }
}

fn sentence_start(text: &str, start: usize) -> bool {
    match text[..start].trim_end().chars().last() {
        None => true,
        Some(c) => matches!(c, '.' | '!' | '?' | ':' | ';' | '•' | '-' | '–'),
    }
}

/// Reduce an inflected lower-case word to its base form
fn lemmatize(word: &str) -> String {
    if let Some(lemma) = IRREGULAR_LEMMAS.get(word) {
        return lemma.to_string();
    }
    if word.len() <= 3 || !word.chars().all(|c| c.is_alphabetic()) {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix("ies") {
        if word.len() > 4 {
            return format!("{}y", stem);
        }
    }
    if let Some(stem) = word.strip_suffix("sses") {
        return format!("{}ss", stem);
    }
    for suffix in ["shes", "ches", "xes", "zzes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.len() > 5 && !ING_NOUNS.contains(word) {
        if let Some(stem) = word.strip_suffix("ing") {
            // "string", "spring": no vowel left, so not an inflection
            let base = restore_stem(stem);
            if base.len() >= 3 && base.chars().any(|c| is_vowel(c) || c == 'y') {
                return base;
            }
        }
    }
    if word.len() > 4 && !word.ends_with("eed") {
        if let Some(stem) = word.strip_suffix("ied") {
            return format!("{}y", stem);
        }
        if let Some(stem) = word.strip_suffix("ed") {
            return restore_stem(stem);
        }
    }
    if word.ends_with('s') && !["ss", "us", "is", "ous"].iter().any(|s| word.ends_with(s)) {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Undo consonant doubling or restore a dropped silent e
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    if n < 2 {
        return stem.to_string();
    }

    let last = chars[n - 1];
    let prev = chars[n - 2];
    if last == prev && !is_vowel(last) && !matches!(last, 'l' | 's' | 'z') {
        return chars[..n - 1].iter().collect();
    }

    if n >= 3
        && !is_vowel(last)
        && matches!(last, 'k' | 't' | 'z' | 'v' | 'c' | 's' | 'g' | 'd')
        && is_vowel(prev)
        && !is_vowel(chars[n - 3])
    {
        return format!("{}e", stem);
    }

    stem.to_string()
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}
