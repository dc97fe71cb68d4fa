//! Closed tables used by the token finalizer: the Tibetan affix particle
//! list, their canonical lemmas, and the Sanskrit long-vowel sequences the
//! match engine checks for.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Tsek character.
pub const TSEK: char = '་';

/// Known affix particles, longest first so a suffix search tries the
/// longest candidate before any shorter particle it contains (e.g. `ཀྱིས`
/// before `ས`).
pub static AFFIXES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut affixes = vec![
        "འི", "ས", "འང", "ག", "གི", "གིས", "ཀྱི", "ཀྱིས", "ལ", "ར", "རུ", "ན", "ནས", "འམ", "ཡང",
        "མ",
    ];
    affixes.sort_by_key(|a| std::cmp::Reverse(a.chars().count()));
    affixes
});

/// Canonical lemma for each affix particle's surface form.
pub static PART_LEMMAS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("འི", "གྱི"),
        ("ས", "གྱིས"),
        ("འང", "ཡང"),
        ("གི", "གྱི"),
        ("གིས", "གྱིས"),
        ("ཀྱི", "གྱི"),
        ("ཀྱིས", "གྱིས"),
        ("ལ", "ལ"),
        ("ར", "ར"),
        ("རུ", "རུ"),
        ("ན", "ན"),
        ("ནས", "ནས"),
        ("འམ", "འམ"),
        ("ཡང", "ཡང"),
        ("མ", "མ"),
    ])
});

/// Long-vowel sequences that flag a token as Sanskrit regardless of its
/// per-codepoint category.
pub const SANSKRIT_SEQUENCES: &[&str] = &["ཱི", "ཱུ", "ྲྀ"];

/// Whether `text` contains any of the three Sanskrit long-vowel sequences.
pub fn has_sanskrit_sequence(text: &str) -> bool {
    SANSKRIT_SEQUENCES.iter().any(|seq| text.contains(seq))
}

/// Find the longest known affix particle `text` ends in, stripping an
/// optional trailing tsek first. Returns `None` if no particle matches or
/// the match would consume the entire text (no host left).
pub fn find_affix(text: &str) -> Option<&'static str> {
    let trimmed = text.strip_suffix(TSEK).unwrap_or(text);
    let trimmed_len = trimmed.chars().count();

    AFFIXES
        .iter()
        .find(|affix| {
            let affix_len = affix.chars().count();
            trimmed_len > affix_len && trimmed.ends_with(*affix)
        })
        .copied()
}

/// Canonical lemma for a particle, falling back to the particle's own
/// surface form when it isn't in [`PART_LEMMAS`].
pub fn lemma_for_particle(particle: &str) -> String {
    PART_LEMMAS
        .get(particle)
        .map(|s| s.to_string())
        .unwrap_or_else(|| particle.to_string())
}
