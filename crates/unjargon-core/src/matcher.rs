//! Find dictionary terms inside a block of element text.
//!
//! Every key is matched as a whole word, ignoring case, with regex
//! metacharacters in the key taken literally. Keys are tried longest first
//! (ties in dictionary order) and an occurrence that overlaps a span already
//! claimed is dropped, so the spans yielded for one text never overlap and
//! "Monthly Credits" wins over "Credits".

use regex::Matches as RegexMatches;

use crate::dictionary::{Dictionary, DictionaryEntry};

/// One occurrence of a dictionary key in element text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan<'d> {
    /// Byte offset of the first matched byte.
    pub start: usize,
    /// Byte offset one past the last matched byte.
    pub end: usize,
    /// The matched text exactly as it appears in the element.
    pub matched: String,
    /// The dictionary entry whose key matched.
    pub entry: &'d DictionaryEntry,
}

impl MatchSpan<'_> {
    /// Byte length of the match.
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` for a zero-length match.
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

/// Lazy sequence of non-overlapping [`MatchSpan`]s.
///
/// Spans come out grouped by key in claim order, not by position.
/// The sequence is consumed as it is walked; call [`find_matches`] again to
/// start over.
#[derive(Debug)]
pub struct Matches<'d, 't> {
    dictionary: &'d Dictionary,
    text: &'t str,
    next_key: usize,
    current: Option<(usize, RegexMatches<'d, 't>)>,
    claimed: Vec<(usize, usize)>,
}

impl<'d> Iterator for Matches<'d, '_> {
    type Item = MatchSpan<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((key, occurrences)) = self.current.as_mut() {
                for m in occurrences.by_ref() {
                    if m.is_empty() {
                        continue;
                    }
                    if self.claimed.iter().any(|&(s, e)| m.start() < e && s < m.end()) {
                        continue;
                    }
                    self.claimed.push((m.start(), m.end()));
                    return Some(MatchSpan {
                        start: m.start(),
                        end: m.end(),
                        matched: m.as_str().to_string(),
                        entry: &self.dictionary.entries()[*key],
                    });
                }
                self.current = None;
            }

            let &key = self.dictionary.match_order().get(self.next_key)?;
            self.next_key += 1;
            self.current = self
                .dictionary
                .word_pattern(key)
                .map(|re| (key, re.find_iter(self.text)));
        }
    }
}

/// Find every dictionary key occurring in `text`.
///
/// Returns an empty sequence without running any per-key search when the
/// text cannot contain a key.
pub fn find_matches<'d, 't>(text: &'t str, dictionary: &'d Dictionary) -> Matches<'d, 't> {
    let next_key = if dictionary.mentions_any_key(text) {
        0
    } else {
        dictionary.len()
    };
    Matches {
        dictionary,
        text,
        next_key,
        current: None,
        claimed: Vec::new(),
    }
}

/// Sort spans by position, for callers that want document order.
pub fn in_text_order(mut spans: Vec<MatchSpan<'_>>) -> Vec<MatchSpan<'_>> {
    spans.sort_by_key(|s| s.start);
    spans
}

/// Returns `true` if none of the spans overlap each other.
pub fn is_disjoint(spans: &[MatchSpan<'_>]) -> bool {
    spans
        .iter()
        .enumerate()
        .all(|(i, a)| spans[i + 1..].iter().all(|b| !a.overlaps(b.start, b.end)))
}
