use serde::{Deserialize, Serialize};

/// The literal marker that requests an inline resolution. Matching is
/// ASCII-case-insensitive; the recorded text is whatever the document
/// actually contains.
pub const TRIGGER_TOKEN: &str = "@paradigm";

/// Shortest run that still counts as an occurrence (`@p`). A lone `@` is
/// ordinary text.
const MIN_PARTIAL_LEN: usize = 2;

/// One detected instance of the trigger token at a specific character
/// offset. Occurrences are recomputed from scratch on every scan; they are
/// snapshots of a document state, not long-lived mutable objects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Character offset where the match begins, relative to the document
    /// snapshot it was scanned from.
    pub position: usize,
    /// The literal substring matched, from `@p` up to the full token.
    pub matched: String,
}

impl Occurrence {
    pub fn is_complete(&self) -> bool {
        self.matched.chars().count() == TRIGGER_TOKEN.chars().count()
    }

    pub fn matched_len(&self) -> usize {
        self.matched.chars().count()
    }

    /// Character offset one past the end of the matched text.
    pub fn end(&self) -> usize {
        self.position + self.matched_len()
    }
}

/// Scan the whole document for non-overlapping trigger occurrences.
///
/// An occurrence is a maximal run starting at `@` whose characters
/// prefix-match the token case-insensitively. Full-length runs are complete
/// matches; shorter runs (at least `@p`) are partials still being typed.
/// Scanning resumes after each run, so adjacent complete tokens each count
/// once and never overlap.
pub fn scan(text: &str) -> Vec<Occurrence> {
    let chars: Vec<char> = text.chars().collect();
    let token: Vec<char> = TRIGGER_TOKEN.chars().collect();

    let mut occurrences = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '@' {
            i += 1;
            continue;
        }

        let mut run = 1;
        while run < token.len()
            && i + run < chars.len()
            && chars[i + run].to_ascii_lowercase() == token[run]
        {
            run += 1;
        }

        if run >= MIN_PARTIAL_LEN {
            occurrences.push(Occurrence {
                position: i,
                matched: chars[i..i + run].iter().collect(),
            });
            i += run;
        } else {
            i += 1;
        }
    }

    occurrences
}

/// Complete occurrences in `current` that were not already complete at the
/// same position in `prev`.
///
/// This is the completion predicate: it keeps a trigger from firing while
/// it is still being typed (partials never qualify) and from firing twice
/// for a token that was already complete before the latest edit.
pub fn newly_complete(prev: &[Occurrence], current: &[Occurrence]) -> Vec<Occurrence> {
    current
        .iter()
        .filter(|occ| occ.is_complete())
        .filter(|occ| {
            !prev
                .iter()
                .any(|p| p.is_complete() && p.position == occ.position)
        })
        .cloned()
        .collect()
}
