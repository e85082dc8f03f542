//! Similarity Matcher — bag-of-words overlap between an original line and a
//! pool of tailored lines.
//!
//! Score = size of the intersection of the lower-cased whitespace token sets.
//! The scan keeps the first candidate whose score strictly beats the best so
//! far, so earlier candidates win ties. A score of 0 is "no match".

use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMatch<'a> {
    /// Position of the candidate in the tailored pool.
    pub index: usize,
    pub line: &'a str,
    pub score: usize,
}

fn tokens(line: &str) -> HashSet<String> {
    line.split_whitespace().map(str::to_lowercase).collect()
}

pub fn overlap_score(a: &str, b: &str) -> usize {
    tokens(a).intersection(&tokens(b)).count()
}

/// Best word-overlap candidate for `line`, or `None` when nothing shares a token.
pub fn best_match<'a, S: AsRef<str>>(line: &str, pool: &'a [S]) -> Option<LineMatch<'a>> {
    let wanted = tokens(line);
    let mut best: Option<LineMatch<'a>> = None;

    for (index, candidate) in pool.iter().enumerate() {
        let candidate = candidate.as_ref();
        let score = tokens(candidate).intersection(&wanted).count();
        if score > best.map_or(0, |b| b.score) {
            best = Some(LineMatch {
                index,
                line: candidate,
                score,
            });
        }
    }

    best
}

/// Secondary heuristic: the first candidate whose lower-cased text contains
/// any of the first three lower-cased words of `line` as a substring.
///
/// Deliberately approximate; it can pick a different line than
/// [`best_match`] would.
pub fn prefix_word_match<'a, S: AsRef<str>>(line: &str, pool: &'a [S]) -> Option<LineMatch<'a>> {
    let lowered = line.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().take(3).collect();
    if words.is_empty() {
        return None;
    }

    pool.iter().enumerate().find_map(|(index, candidate)| {
        let candidate = candidate.as_ref();
        let haystack = candidate.to_lowercase();
        words
            .iter()
            .any(|w| haystack.contains(w))
            .then(|| LineMatch {
                index,
                line: candidate,
                score: overlap_score(line, candidate),
            })
    })
}
