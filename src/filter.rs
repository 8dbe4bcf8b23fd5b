//! Candidate filtering: input text + option set + selection -> candidate list.
//!
//! Matching is a case-insensitive substring test on the option label. The
//! test runs on plain chars so combining marks take part in it; the
//! `nucleo-matcher` substring atom is only used to report which characters
//! to highlight.

use nucleo_matcher::pattern::{Atom, AtomKind, CaseMatching, Normalization};
use nucleo_matcher::{Config, Matcher, Utf32Str};

use crate::config::Variant;
use crate::option::{contains_id, ComboOption};

/// An option that survived filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub option: ComboOption,
    /// 1-based position of the option within the full option set.
    pub position: usize,
}

/// Compute the candidate list.
///
/// Options already in `selection` (by id) are dropped, the rest keep their
/// relative order. The variant is accepted so every call site passes the
/// same inputs, but filtering is identical for all variants; predefined-only
/// handling happens at commit time.
pub fn filter(
    input_value: &str,
    options: &[ComboOption],
    selection: &[ComboOption],
    _variant: Variant,
) -> Vec<Candidate> {
    let needle = input_value.to_lowercase();

    let candidates: Vec<Candidate> = options
        .iter()
        .enumerate()
        .filter(|(_, o)| !contains_id(selection, &o.id))
        .filter(|(_, o)| match o.label.as_deref() {
            Some(label) => label_matches(label, &needle),
            None => false,
        })
        .map(|(i, o)| Candidate {
            option: o.clone(),
            position: i + 1,
        })
        .collect();

    tracing::trace!(
        input = input_value,
        options = options.len(),
        candidates = candidates.len(),
        "filtered options"
    );
    candidates
}

/// Character positions of the best-scoring case-insensitive occurrence of
/// `input_value` in `label`. Empty when there is no match or no input.
pub fn match_indices(label: &str, input_value: &str) -> Vec<u32> {
    let Some(atom) = substring_atom(input_value) else {
        return Vec::new();
    };
    let mut matcher = Matcher::new(Config::DEFAULT);
    // One entry per char, so indices line up with `label.chars()`.
    let chars: Vec<char> = label.chars().collect();
    let haystack = Utf32Str::Unicode(&chars);

    let mut indices = Vec::new();
    if atom.indices(haystack, &mut matcher, &mut indices).is_some() {
        indices.sort_unstable();
        indices.dedup();
        indices
    } else {
        Vec::new()
    }
}

/// `None` for empty input, which highlights nothing.
fn substring_atom(input_value: &str) -> Option<Atom> {
    if input_value.is_empty() {
        return None;
    }
    Some(Atom::new(
        input_value,
        CaseMatching::Ignore,
        Normalization::Never,
        AtomKind::Substring,
        false,
    ))
}

/// `needle` is already lowercased; an empty needle matches everything.
fn label_matches(label: &str, needle: &str) -> bool {
    needle.is_empty() || label.to_lowercase().contains(needle)
}
