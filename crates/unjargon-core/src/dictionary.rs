//! Jargon dictionary and term lookup.
//!
//! A dictionary is an ordered table of jargon terms plus a fixed list of
//! case-insensitive regex patterns used as a last-resort tier. Lookup runs
//! four tiers and returns the first hit:
//!
//! 1. exact key (case-sensitive)
//! 2. key compared case-insensitively
//! 3. a key longer than three characters contained in the text
//! 4. the first matching pattern
//!
//! # Source format
//!
//! Dictionaries are JSON objects mapping a term to its entry:
//!
//! ```json
//! {
//!   "Contact Sales": {
//!     "translation": "Hidden pricing (have to ask)",
//!     "severity": "warning",
//!     "explanation": "Price not publicly listed",
//!     "category": "pricing"
//!   }
//! }
//! ```
//!
//! Key order is kept. When a key appears twice, the later value replaces the
//! earlier one at the earlier position.
//!
//! Loading fails open: [`Dictionary::load`] never errors and substitutes a
//! small built-in subset when the requested source is unusable.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use aho_corasick::AhoCorasick;
use camino::{Utf8Path, Utf8PathBuf};
use regex::{NoExpand, Regex, RegexBuilder};
use schemars::JsonSchema;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

use crate::error::{DictionaryError, DictionaryResult};

/// The glossary shipped with the library.
pub const BUNDLED_GLOSSARY: &str = include_str!("../data/glossary.json");

/// Minimum key length (in characters) for the substring tier.
const PARTIAL_MIN_KEY_CHARS: usize = 4;

/// Whether a term favors or disadvantages the reader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Severity {
    /// Works in the reader's favor.
    Good,
    /// Informational.
    #[default]
    Neutral,
    /// Hides a cost or a limit.
    Warning,
}

impl Severity {
    /// Lowercase name, also used as the marker's styling class.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Neutral => "neutral",
            Self::Warning => "warning",
        }
    }

    /// Icon shown next to the explanation.
    pub const fn icon(&self) -> &'static str {
        match self {
            Self::Good => "\u{2705}",
            Self::Neutral => "\u{2139}\u{fe0f}",
            Self::Warning => "\u{26a0}\u{fe0f}",
        }
    }

    /// Parse a styling class back into a severity.
    pub fn from_class(class: &str) -> Option<Self> {
        match class {
            "good" => Some(Self::Good),
            "neutral" => Some(Self::Neutral),
            "warning" => Some(Self::Warning),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the dictionary source document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct EntrySource {
    /// Plain-language replacement shown to the reader.
    pub translation: String,
    /// Whether the term favors or disadvantages the reader.
    #[serde(default)]
    pub severity: Severity,
    /// Longer explanation shown under the replacement.
    #[serde(default)]
    pub explanation: String,
    /// Free-form grouping (pricing, features, support, ...).
    #[serde(default)]
    pub category: String,
}

/// Ordered contents of a dictionary source document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DictionarySource(Vec<(String, EntrySource)>);

impl DictionarySource {
    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the document had no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert a key, replacing an existing value in place.
    fn insert(&mut self, key: String, value: EntrySource) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => {
                tracing::debug!(key = %key, "duplicate dictionary key, later entry wins");
                slot.1 = value;
            }
            None => self.0.push((key, value)),
        }
    }
}

impl<'de> Deserialize<'de> for DictionarySource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SourceVisitor;

        impl<'de> Visitor<'de> for SourceVisitor {
            type Value = DictionarySource;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from jargon term to entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut source = DictionarySource(Vec::with_capacity(map.size_hint().unwrap_or(0)));
                while let Some((key, value)) = map.next_entry::<String, EntrySource>()? {
                    source.insert(key, value);
                }
                Ok(source)
            }
        }

        deserializer.deserialize_map(SourceVisitor)
    }
}

/// JSON Schema describing the dictionary source format.
pub fn source_schema() -> schemars::Schema {
    schemars::schema_for!(std::collections::BTreeMap<String, EntrySource>)
}

/// A resolved dictionary entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    /// The term as written in the source (case preserved). For pattern
    /// entries this is the pattern source.
    pub key: String,
    /// Plain-language replacement.
    pub replacement: String,
    /// Severity tag.
    pub severity: Severity,
    /// Longer explanation, possibly empty.
    pub explanation: String,
    /// Grouping category.
    pub category: String,
}

impl DictionaryEntry {
    fn from_source(key: String, source: EntrySource) -> Self {
        Self {
            key,
            replacement: source.translation,
            severity: source.severity,
            explanation: source.explanation,
            category: source.category,
        }
    }

    fn from_static(
        key: &str,
        replacement: &str,
        severity: Severity,
        explanation: &str,
        category: &str,
    ) -> Self {
        Self {
            key: key.to_string(),
            replacement: replacement.to_string(),
            severity,
            explanation: explanation.to_string(),
            category: category.to_string(),
        }
    }
}

/// Which lookup tier produced a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    /// Exact, case-sensitive key.
    Exact,
    /// Key equal ignoring case.
    CaseInsensitive,
    /// Key contained in the text.
    Partial,
    /// Fallback regex pattern.
    Pattern,
}

impl MatchTier {
    /// Kebab-case name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::CaseInsensitive => "case-insensitive",
            Self::Partial => "partial",
            Self::Pattern => "pattern",
        }
    }
}

/// Where a dictionary's entries came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryOrigin {
    /// The glossary compiled into the library.
    Bundled,
    /// A JSON file on disk.
    File(Utf8PathBuf),
    /// The built-in fallback subset.
    Fallback,
    /// Built in memory by the caller.
    Inline,
}

impl fmt::Display for DictionaryOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bundled => f.write_str("bundled"),
            Self::File(path) => write!(f, "file:{path}"),
            Self::Fallback => f.write_str("fallback"),
            Self::Inline => f.write_str("inline"),
        }
    }
}

/// The outcome of translating a piece of page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation<'a> {
    /// The text as it appeared on the page.
    pub original: String,
    /// Text to show the reader.
    pub replacement: String,
    /// The entry that produced the hit.
    pub entry: &'a DictionaryEntry,
    /// Which tier produced the hit.
    pub tier: MatchTier,
}

impl Translation<'_> {
    /// Returns `true` if the translation says something other than the
    /// original text.
    pub fn changes_text(&self) -> bool {
        self.replacement != self.original
    }
}

#[derive(Debug, Clone)]
struct PatternEntry {
    regex: Regex,
    entry: DictionaryEntry,
}

/// Pattern tier: (pattern, translation, severity, explanation, category).
const PATTERN_TABLE: &[(&str, &str, Severity, &str, &str)] = &[
    (r"contact\s+sales", "Hidden pricing (have to ask)", Severity::Warning, "Price not publicly listed", "pricing"),
    (r"custom\s+pricing", "Pricing varies by company size", Severity::Warning, "They'll charge what they think you can afford", "pricing"),
    (r"request\s+a\s+quote", "Fill out forms for pricing", Severity::Warning, "Sales team will call you", "pricing"),
    (r"unlimited\s*\*", "Has hidden limits (check terms)", Severity::Warning, "Never truly unlimited", "features"),
    (r"unlimited\s+users", "No user limit (but expensive)", Severity::Neutral, "Scales with your team", "features"),
    (r"unlimited\s+storage", "Storage with fair use policy", Severity::Neutral, "Soft caps exist", "features"),
    (r"advanced\s+analytics", "Analytics (details unclear)", Severity::Neutral, "Vague marketing term", "features"),
    (r"enterprise-grade", "Built for large companies", Severity::Neutral, "Usually means expensive", "features"),
    (r"ai-powered", "Uses some AI (probably basic)", Severity::Neutral, "Marketing term for automation", "features"),
    (r"24/7\s+support", "Always available (response time varies)", Severity::Neutral, "Check actual response time", "support"),
    (r"priority\s+support", "Faster than basic support", Severity::Good, "Jump the queue", "support"),
    (r"dedicated\s+support", "Assigned support person", Severity::Good, "Personal help", "support"),
    (r"api\s+access", "For developer integrations", Severity::Good, "Useful for automation", "technical"),
    (r"webhook\s+support", "Real-time event notifications", Severity::Good, "Instant updates", "technical"),
    (r"third-party\s+integrations", "Connects to other tools", Severity::Neutral, "May need setup", "technical"),
    (r"per\s+user", "Price multiplied by team size", Severity::Neutral, "Gets expensive fast", "usage"),
    (r"per\s+seat", "Price multiplied by team size", Severity::Neutral, "Gets expensive fast", "usage"),
    (r"credits", "Prepaid usage units", Severity::Neutral, "Pay upfront, use later", "usage"),
    (r"tokens", "Pay per word/action", Severity::Neutral, "Common in AI tools", "usage"),
    (r"2fa", "Two-factor authentication", Severity::Good, "Extra security", "security"),
    (r"mfa", "Multi-factor authentication", Severity::Good, "Extra security", "security"),
    (r"soc\s+2", "Audited security practices", Severity::Good, "Third-party verified", "security"),
    (r"gdpr", "EU privacy rules followed", Severity::Good, "Privacy focused", "security"),
];

/// Compiled pattern tier, shared by every dictionary.
static PATTERNS: LazyLock<Vec<PatternEntry>> = LazyLock::new(|| {
    PATTERN_TABLE
        .iter()
        .map(|&(pattern, translation, severity, explanation, category)| PatternEntry {
            regex: RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("valid regex"),
            entry: DictionaryEntry::from_static(pattern, translation, severity, explanation, category),
        })
        .collect()
});

/// Entries used when no dictionary source can be loaded.
const FALLBACK_TABLE: &[(&str, &str, Severity, &str, &str)] = &[
    ("Contact Sales", "Hidden pricing (have to ask)", Severity::Warning, "Price not publicly listed", "pricing"),
    ("Unlimited*", "Has hidden limits (check terms)", Severity::Warning, "Never truly unlimited", "features"),
    ("Enterprise-Grade", "Built for large companies", Severity::Neutral, "Usually means expensive", "features"),
    ("API Access", "For developer integrations", Severity::Good, "Useful for automation", "technical"),
];

/// Whole-word, case-insensitive matcher for a literal key.
///
/// A boundary is only asserted next to a word character, so keys such as
/// `Unlimited*` still match when followed by a space.
fn word_pattern(key: &str) -> Option<Regex> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let lead = if key.chars().next().is_some_and(is_word) { r"\b" } else { "" };
    let trail = if key.chars().next_back().is_some_and(is_word) { r"\b" } else { "" };
    let pattern = format!("{lead}{}{trail}", regex::escape(key));
    match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(key, error = %e, "skipping dictionary key that cannot be matched");
            None
        }
    }
}

/// An ordered jargon dictionary with its compiled matchers.
#[derive(Debug, Clone)]
pub struct Dictionary {
    entries: Vec<DictionaryEntry>,
    lower_keys: Vec<String>,
    index: HashMap<String, usize>,
    word_patterns: Vec<Option<Regex>>,
    match_order: Vec<usize>,
    prefilter: Option<AhoCorasick>,
    patterns: &'static [PatternEntry],
    origin: DictionaryOrigin,
}

impl Dictionary {
    fn build(entries: Vec<DictionaryEntry>, origin: DictionaryOrigin) -> Self {
        let lower_keys: Vec<String> = entries.iter().map(|e| e.key.to_lowercase()).collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.key.clone(), i))
            .collect();
        let word_patterns = entries.iter().map(|e| word_pattern(&e.key)).collect();
        let mut match_order: Vec<usize> = (0..entries.len()).collect();
        match_order.sort_by_key(|&i| std::cmp::Reverse(entries[i].key.chars().count()));
        let prefilter = if lower_keys.is_empty() {
            None
        } else {
            match AhoCorasick::new(&lower_keys) {
                Ok(ac) => Some(ac),
                Err(e) => {
                    tracing::warn!(error = %e, "key prefilter unavailable, every element will be matched");
                    None
                }
            }
        };
        Self {
            entries,
            lower_keys,
            index,
            word_patterns,
            match_order,
            prefilter,
            patterns: PATTERNS.as_slice(),
            origin,
        }
    }

    /// Build a dictionary from entries, keeping their order.
    ///
    /// A repeated key replaces the earlier entry at the earlier position.
    pub fn from_entries(entries: impl IntoIterator<Item = DictionaryEntry>) -> Self {
        let mut ordered: Vec<DictionaryEntry> = Vec::new();
        for entry in entries {
            match ordered.iter_mut().find(|e| e.key == entry.key) {
                Some(slot) => *slot = entry,
                None => ordered.push(entry),
            }
        }
        Self::build(ordered, DictionaryOrigin::Inline)
    }

    /// Parse a dictionary from a JSON source document.
    #[tracing::instrument(skip(json), fields(json_len = json.len()))]
    pub fn from_json_str(json: &str) -> DictionaryResult<Self> {
        let source: DictionarySource = serde_json::from_str(json)?;
        if source.is_empty() {
            return Err(DictionaryError::Empty);
        }
        let entries = source
            .0
            .into_iter()
            .map(|(key, value)| DictionaryEntry::from_source(key, value))
            .collect();
        Ok(Self::build(entries, DictionaryOrigin::Inline))
    }

    /// Parse the glossary compiled into the library.
    pub fn bundled() -> DictionaryResult<Self> {
        let mut dictionary = Self::from_json_str(BUNDLED_GLOSSARY)?;
        dictionary.origin = DictionaryOrigin::Bundled;
        Ok(dictionary)
    }

    /// Read and parse a JSON dictionary file.
    pub fn from_path(path: &Utf8Path) -> DictionaryResult<Self> {
        let json = std::fs::read_to_string(path.as_std_path()).map_err(|source| {
            DictionaryError::Read {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let mut dictionary = Self::from_json_str(&json)?;
        dictionary.origin = DictionaryOrigin::File(path.to_path_buf());
        Ok(dictionary)
    }

    /// The small built-in subset used when nothing else loads.
    pub fn fallback() -> Self {
        let entries = FALLBACK_TABLE
            .iter()
            .map(|&(key, translation, severity, explanation, category)| {
                DictionaryEntry::from_static(key, translation, severity, explanation, category)
            })
            .collect();
        Self::build(entries, DictionaryOrigin::Fallback)
    }

    /// Load a dictionary, never failing.
    ///
    /// Reads `path` when given, the bundled glossary otherwise. Any error
    /// is logged and the fallback subset is returned instead.
    #[tracing::instrument(fields(path = ?path))]
    pub fn load(path: Option<&Utf8Path>) -> Self {
        let loaded = match path {
            Some(p) => Self::from_path(p),
            None => Self::bundled(),
        };
        match loaded {
            Ok(dictionary) => {
                tracing::info!(
                    entries = dictionary.len(),
                    origin = %dictionary.origin,
                    "dictionary ready"
                );
                dictionary
            }
            Err(e) => {
                tracing::warn!(error = %e, "dictionary unavailable, using fallback");
                Self::fallback()
            }
        }
    }

    /// Where the entries came from.
    pub const fn origin(&self) -> &DictionaryOrigin {
        &self.origin
    }

    /// Number of keyed entries (patterns excluded).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no keyed entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keyed entries in iteration order.
    pub fn entries(&self) -> &[DictionaryEntry] {
        &self.entries
    }

    /// Number of entries in the pattern tier.
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Entry stored under exactly `key`.
    pub fn get(&self, key: &str) -> Option<&DictionaryEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    /// Entry indices longest key first, ties in iteration order.
    pub(crate) fn match_order(&self) -> &[usize] {
        &self.match_order
    }

    pub(crate) fn word_pattern(&self, index: usize) -> Option<&Regex> {
        self.word_patterns.get(index).and_then(Option::as_ref)
    }

    /// Resolve `text` through the four tiers.
    pub fn resolve(&self, text: &str) -> Option<(&DictionaryEntry, MatchTier)> {
        if let Some(entry) = self.get(text) {
            return Some((entry, MatchTier::Exact));
        }

        let lower = text.to_lowercase();
        if let Some(i) = self.lower_keys.iter().position(|k| *k == lower) {
            return Some((&self.entries[i], MatchTier::CaseInsensitive));
        }

        let partial = self
            .entries
            .iter()
            .zip(&self.lower_keys)
            .find(|(e, k)| e.key.chars().count() >= PARTIAL_MIN_KEY_CHARS && lower.contains(k.as_str()));
        if let Some((entry, _)) = partial {
            return Some((entry, MatchTier::Partial));
        }

        self.patterns
            .iter()
            .find(|p| p.regex.is_match(text))
            .map(|p| (&p.entry, MatchTier::Pattern))
    }

    /// Entry for `text`, or `None` when the text should stay unchanged.
    pub fn lookup(&self, text: &str) -> Option<&DictionaryEntry> {
        self.resolve(text).map(|(entry, _)| entry)
    }

    /// Translate page text into plain language.
    ///
    /// For a substring hit on longer text, only the key is swapped out and
    /// the surrounding words are kept.
    pub fn translate(&self, text: &str) -> Option<Translation<'_>> {
        let (entry, tier) = self.resolve(text)?;
        let replacement = if tier == MatchTier::Partial && text.to_lowercase() != entry.key.to_lowercase() {
            match RegexBuilder::new(&regex::escape(&entry.key))
                .case_insensitive(true)
                .build()
            {
                Ok(re) => re
                    .replace_all(text, NoExpand(&entry.replacement))
                    .into_owned(),
                Err(_) => entry.replacement.clone(),
            }
        } else {
            entry.replacement.clone()
        };
        Some(Translation {
            original: text.to_string(),
            replacement,
            entry,
            tier,
        })
    }

    /// Cheap check: does the text mention any key, ignoring case?
    ///
    /// May report `true` for text where no whole-word match exists.
    pub fn mentions_any_key(&self, text: &str) -> bool {
        match &self.prefilter {
            Some(ac) => ac.is_match(&text.to_lowercase()),
            None => !self.entries.is_empty(),
        }
    }

    /// Returns `true` if the text mentions a key or matches a pattern.
    pub fn contains_jargon(&self, text: &str) -> bool {
        self.mentions_any_key(text) || self.patterns.iter().any(|p| p.regex.is_match(text))
    }

    /// All keys in iteration order.
    pub fn terms(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.key.as_str()).collect()
    }

    /// Keys whose entry belongs to `category`.
    pub fn terms_by_category(&self, category: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.category == category)
            .map(|e| e.key.as_str())
            .collect()
    }

    /// Keys whose entry has `severity`.
    pub fn terms_by_severity(&self, severity: Severity) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.severity == severity)
            .map(|e| e.key.as_str())
            .collect()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for e in &self.entries {
            if !seen.contains(&e.category.as_str()) {
                seen.push(&e.category);
            }
        }
        seen
    }
}
