//! Character classification for Tibetan Unicode characters.
//!
//! Maps every codepoint of an input string to a [`CharCategory`], the
//! foundation the chunker and match engine build their segmentation on.
//! Classification is total, deterministic, and codepoint-indexed (never
//! byte-indexed): Tibetan text is multi-byte in UTF-8 and all downstream
//! offsets in this crate count codepoints.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Character categories used in Tibetan text processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharCategory {
    /// Tibetan consonant.
    Cons,
    /// Sub-joined consonant (used in consonant clusters).
    SubCons,
    /// Tibetan vowel sign.
    Vow,
    /// Tsek (syllable separator, U+0F0B).
    Tsek,
    /// Normal punctuation (shad, etc.).
    NormalPunct,
    /// Special punctuation.
    SpecialPunct,
    /// Tibetan numeral.
    Numeral,
    /// Symbol.
    Symbol,
    /// In-syllable mark.
    InSylMark,
    /// Non-Tibetan, non-Sanskrit character that still occupies the Tibetan
    /// Unicode block. No codepoint in the classification table below maps
    /// here; the variant exists for parity with the closed enumeration.
    NonBoNonSkrt,
    /// Sanskrit consonant (Devanagari).
    SkrtCons,
    /// Sanskrit sub-joined consonant (Devanagari).
    SkrtSubCons,
    /// Sanskrit vowel sign (Devanagari).
    SkrtVow,
    /// Transparent characters (spaces, etc.) - ignored in syllable processing.
    Transparent,
    /// Latin character.
    Latin,
    /// CJK character.
    Cjk,
    /// Other/unknown character.
    #[default]
    Other,
    /// NFC (pre-composed) character. No codepoint in the current table maps
    /// here; reserved because `chunk_symbols` references it.
    Nfc,
}

impl CharCategory {
    /// Categories that form the body of a Tibetan syllable (can sit between
    /// two `Tsek` boundaries).
    pub fn is_syllable_part(&self) -> bool {
        matches!(
            self,
            CharCategory::Cons
                | CharCategory::SubCons
                | CharCategory::Vow
                | CharCategory::SkrtCons
                | CharCategory::SkrtSubCons
                | CharCategory::SkrtVow
                | CharCategory::InSylMark
                | CharCategory::Nfc
                | CharCategory::NonBoNonSkrt
        )
    }

    /// Whether this category forms part of a word-forming ("Bo") run: the
    /// syllable-part categories plus the `Tsek` separator itself.
    pub fn is_word_forming(&self) -> bool {
        self.is_syllable_part() || matches!(self, CharCategory::Tsek)
    }

    /// Whether a codepoint of this category counts toward the match
    /// engine's Sanskrit flag.
    pub fn is_sanskrit(&self) -> bool {
        matches!(
            self,
            CharCategory::SkrtCons | CharCategory::SkrtSubCons | CharCategory::SkrtVow
        )
    }
}

/// List of codepoints treated as transparent (space-like), beyond the plain
/// ASCII whitespace / NBSP / en-quad..four-per-em-space ranges named in the
/// classification rules.
const EXTRA_TRANSPARENT_CHARS: &[char] = &['\t', '\n', '\r'];

static EMPTY_IGNORE_SET: Lazy<HashSet<char>> = Lazy::new(HashSet::new);

/// Classify a single codepoint, honoring a caller-supplied `ignore_chars` set
/// (rule 1: ignored codepoints are always `Transparent`).
pub fn classify(c: char, ignore_chars: &HashSet<char>) -> CharCategory {
    if ignore_chars.contains(&c) {
        return CharCategory::Transparent;
    }

    let cp = c as u32;

    if (0x0F00..=0x0FFF).contains(&cp) {
        return classify_tibetan(cp);
    }

    if (0x0915..=0x0939).contains(&cp) {
        return CharCategory::SkrtCons;
    }
    if (0x093E..=0x094C).contains(&cp) {
        return CharCategory::SkrtVow;
    }
    if (0x0958..=0x095F).contains(&cp) {
        return CharCategory::SkrtSubCons;
    }

    if c.is_ascii_alphabetic() {
        return CharCategory::Latin;
    }

    if (0x4E00..=0x9FFF).contains(&cp) || (0x3400..=0x4DBF).contains(&cp) {
        return CharCategory::Cjk;
    }

    if c.is_ascii_whitespace()
        || cp == 0x00A0
        || (0x2000..=0x2005).contains(&cp)
        || EXTRA_TRANSPARENT_CHARS.contains(&c)
    {
        return CharCategory::Transparent;
    }

    CharCategory::Other
}

/// Classify a single codepoint with no ignored characters.
pub fn get_char_category(c: char) -> CharCategory {
    classify(c, &EMPTY_IGNORE_SET)
}

fn classify_tibetan(cp: u32) -> CharCategory {
    match cp {
        0x0F40..=0x0F6C => CharCategory::Cons,
        0x0F90..=0x0FBC => CharCategory::SubCons,
        0x0F71..=0x0F84 => CharCategory::Vow,
        0x0F0B => CharCategory::Tsek,
        0x0F20..=0x0F33 => CharCategory::Numeral,
        0x0F0D..=0x0F12 => CharCategory::NormalPunct,
        0x0F1A..=0x0F1F => CharCategory::Symbol,
        0x0F7F => CharCategory::InSylMark,
        0x0F86..=0x0F8B => CharCategory::InSylMark,
        0x0F00..=0x0F17 => CharCategory::SpecialPunct,
        _ => CharCategory::Other,
    }
}

/// An input string paired with the category of each of its codepoints.
///
/// Invariant: `categories.len() == chars.len()`.
#[derive(Debug, Clone)]
pub struct ClassifiedText {
    /// The original string.
    pub string: String,
    /// The codepoints of `string`, cached for repeated indexed access.
    pub chars: Vec<char>,
    /// Category for each codepoint, by codepoint index.
    pub categories: Vec<CharCategory>,
}

impl ClassifiedText {
    /// Classify every codepoint of `s`, honoring `ignore_chars`.
    pub fn new(s: &str, ignore_chars: &HashSet<char>) -> Self {
        let chars: Vec<char> = s.chars().collect();
        let categories: Vec<CharCategory> =
            chars.iter().map(|&c| classify(c, ignore_chars)).collect();
        ClassifiedText {
            string: s.to_string(),
            chars,
            categories,
        }
    }

    /// Number of codepoints.
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    /// Whether there are no codepoints.
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Category at a codepoint index, if in range.
    pub fn get_category(&self, idx: usize) -> Option<CharCategory> {
        self.categories.get(idx).copied()
    }

    /// Substring spanning codepoints `[start, start+len)`.
    pub fn slice(&self, start: usize, len: usize) -> String {
        let end = (start + len).min(self.chars.len());
        self.chars[start.min(end)..end].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tibetan_consonants() {
        assert_eq!(get_char_category('ཀ'), CharCategory::Cons);
        assert_eq!(get_char_category('ག'), CharCategory::Cons);
        assert_eq!(get_char_category('བ'), CharCategory::Cons);
    }

    #[test]
    fn test_tibetan_vowels() {
        assert_eq!(get_char_category('ི'), CharCategory::Vow);
        assert_eq!(get_char_category('ུ'), CharCategory::Vow);
        assert_eq!(get_char_category('ེ'), CharCategory::Vow);
        assert_eq!(get_char_category('ོ'), CharCategory::Vow);
    }

    #[test]
    fn test_tsek() {
        assert_eq!(get_char_category('་'), CharCategory::Tsek);
    }

    #[test]
    fn test_normal_punct() {
        assert_eq!(get_char_category('།'), CharCategory::NormalPunct);
    }

    #[test]
    fn test_numeral() {
        assert_eq!(get_char_category('༡'), CharCategory::Numeral);
    }

    #[test]
    fn test_space() {
        assert_eq!(get_char_category(' '), CharCategory::Transparent);
        assert_eq!(get_char_category('\t'), CharCategory::Transparent);
    }

    #[test]
    fn test_latin() {
        assert_eq!(get_char_category('a'), CharCategory::Latin);
        assert_eq!(get_char_category('Z'), CharCategory::Latin);
    }

    #[test]
    fn test_cjk() {
        assert_eq!(get_char_category('就'), CharCategory::Cjk);
    }

    #[test]
    fn test_devanagari() {
        assert_eq!(get_char_category('क'), CharCategory::SkrtCons);
        assert_eq!(get_char_category('ा'), CharCategory::SkrtVow);
    }

    #[test]
    fn test_ignore_chars() {
        let mut ignore = HashSet::new();
        ignore.insert('ཀ');
        assert_eq!(classify('ཀ', &ignore), CharCategory::Transparent);
        assert_eq!(classify('ག', &ignore), CharCategory::Cons);
    }

    #[test]
    fn test_classified_text() {
        let ct = ClassifiedText::new("བཀྲ་", &HashSet::new());
        assert_eq!(ct.len(), 4);
        assert_eq!(ct.get_category(0), Some(CharCategory::Cons)); // བ
        assert_eq!(ct.get_category(1), Some(CharCategory::Cons)); // ཀ
        assert_eq!(ct.get_category(2), Some(CharCategory::SubCons)); // ྲ
        assert_eq!(ct.get_category(3), Some(CharCategory::Tsek)); // ་
    }

    #[test]
    fn test_slice() {
        let ct = ClassifiedText::new("བཀྲ་ཤིས", &HashSet::new());
        assert_eq!(ct.slice(0, 3), "བཀྲ");
    }
}
