//! Token representation: the final artifact the tokenizer hands back to
//! callers, plus its JSON and human-debug serialization formats.

use serde::{Deserialize, Serialize};

use crate::char_categories::CharCategory;

/// Segment-level label for a chunk or a finished token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChunkKind {
    /// Tibetan text (syllables/words).
    #[default]
    Text,
    /// Punctuation.
    Punct,
    /// Non-Tibetan run (negative label used while composing chunkings).
    NonBo,
    /// Non-punctuation run (negative label used while composing chunkings).
    NonPunct,
    /// Number.
    Num,
    /// Non-numeral run (negative label used while composing chunkings).
    NonNum,
    /// Symbol.
    Sym,
    /// Non-symbol run (negative label used while composing chunkings).
    NonSym,
    /// Tibetan ("Bo") run, prior to syllabification.
    Bo,
    /// Other/unknown.
    Other,
    /// Latin text.
    Latin,
    /// CJK text.
    Cjk,
}

impl ChunkKind {
    /// Shout-case string, used by the CLI's plain-text output mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChunkKind::Text => "TEXT",
            ChunkKind::Punct => "PUNCT",
            ChunkKind::NonBo => "NON_BO",
            ChunkKind::NonPunct => "NON_PUNCT",
            ChunkKind::Num => "NUM",
            ChunkKind::NonNum => "NON_NUM",
            ChunkKind::Sym => "SYM",
            ChunkKind::NonSym => "NON_SYM",
            ChunkKind::Bo => "BO",
            ChunkKind::Other => "OTHER",
            ChunkKind::Latin => "LATIN",
            ChunkKind::Cjk => "CJK",
        }
    }
}

/// POS marker stamped on a token the match engine could not resolve in the
/// dictionary.
pub const NO_POS: &str = "NO_POS";

/// One reading of a dictionary entry. Multiple senses on a token indicate
/// homography; `affixed` records whether this reading is of the host's bare
/// form (`Some(false)`), its affixed form (`Some(true)`), or unspecified
/// (`None`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lemma: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freq: Option<u32>,
    #[serde(rename = "sense", skip_serializing_if = "Option::is_none")]
    pub sense_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affixed: Option<bool>,
}

impl Sense {
    /// Number of populated (`Some`) attributes, used by sense selection to
    /// prefer the "richest" sense within a bucket.
    pub fn populated_count(&self) -> usize {
        [
            self.pos.is_some(),
            self.lemma.is_some(),
            self.freq.is_some(),
            self.sense_label.is_some(),
            self.affixed.is_some(),
        ]
        .into_iter()
        .filter(|&b| b)
        .count()
    }

    /// Equality over `(pos, lemma, freq, sense_label, affixed)`, used by
    /// `add_meaning`'s idempotence check.
    pub fn same_meaning(&self, other: &Sense) -> bool {
        self.pos == other.pos
            && self.lemma == other.lemma
            && self.freq == other.freq
            && self.sense_label == other.sense_label
            && self.affixed == other.affixed
    }
}

/// How a host word was affixed: the particle's character length and whether
/// a trailing འ was dropped before the particle was appended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AffixationInfo {
    pub len: usize,
    pub aa: bool,
}

/// Slice `text` into one `String` per `(start, end)` span, for populating
/// `Token::syllables` alongside `Token::syllable_spans`.
pub fn syllables_from_spans(text: &str, spans: &[(usize, usize)]) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    spans.iter().map(|&(s, e)| chars[s..e].iter().collect()).collect()
}

/// A single token produced by tokenization.
///
/// `start`/`length` are codepoint offsets into the original (NFC-normalized)
/// input, never byte offsets. `syllables_idx` and `syllable_spans` are
/// relative to `start`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    pub text: String,
    pub text_cleaned: Option<String>,
    pub text_unaffixed: Option<String>,
    pub start: usize,
    pub length: usize,
    pub chunk_type: ChunkKind,
    pub syllables_idx: Vec<Vec<usize>>,
    pub syllable_spans: Vec<(usize, usize)>,
    pub syllables: Vec<String>,
    pub char_types: Vec<CharCategory>,
    pub pos: Option<String>,
    pub lemma: Option<String>,
    pub freq: Option<u32>,
    pub senses: Vec<Sense>,
    pub sanskrit: bool,
    pub affix: bool,
    pub affix_host: bool,
    pub affixation: Option<AffixationInfo>,
}

impl Token {
    /// A bare standalone token (punctuation, numeral, foreign-script run)
    /// with no syllable structure.
    pub fn standalone(text: String, start: usize, length: usize, chunk_type: ChunkKind) -> Self {
        Token {
            text,
            start,
            length,
            chunk_type,
            ..Default::default()
        }
    }

    /// Whether this is a word token (TEXT type with at least one syllable).
    pub fn is_word(&self) -> bool {
        self.chunk_type == ChunkKind::Text && !self.syllables_idx.is_empty()
    }

    /// Whether this is a punctuation token.
    pub fn is_punct(&self) -> bool {
        self.chunk_type == ChunkKind::Punct
    }

    /// Serialize to the JSON shape named in the external-interfaces spec:
    /// camelCase keys, optional fields omitted when absent or falsy.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert("text".into(), self.text.clone().into());
        map.insert("start".into(), self.start.into());
        map.insert("length".into(), self.length.into());
        map.insert(
            "chunkType".into(),
            serde_json::to_value(self.chunk_type).unwrap(),
        );

        if let Some(ref v) = self.text_cleaned {
            map.insert("textCleaned".into(), v.clone().into());
        }
        if let Some(ref v) = self.text_unaffixed {
            map.insert("textUnaffixed".into(), v.clone().into());
        }
        if let Some(ref v) = self.pos {
            map.insert("pos".into(), v.clone().into());
        }
        if let Some(ref v) = self.lemma {
            map.insert("lemma".into(), v.clone().into());
        }
        if let Some(v) = self.freq {
            map.insert("freq".into(), v.into());
        }
        if !self.char_types.is_empty() {
            map.insert(
                "charTypes".into(),
                serde_json::to_value(&self.char_types).unwrap(),
            );
        }
        if !self.syllables_idx.is_empty() {
            map.insert(
                "syllableIndices".into(),
                serde_json::to_value(&self.syllables_idx).unwrap(),
            );
        }
        if !self.syllable_spans.is_empty() {
            let spans: Vec<[usize; 2]> = self.syllable_spans.iter().map(|&(a, b)| [a, b]).collect();
            map.insert("syllableStartEnd".into(), spans.into());
        }
        if !self.syllables.is_empty() {
            map.insert("syllables".into(), self.syllables.clone().into());
        }
        if !self.senses.is_empty() {
            map.insert("senses".into(), serde_json::to_value(&self.senses).unwrap());
        }
        if self.sanskrit {
            map.insert("sanskrit".into(), true.into());
        }
        if self.affix {
            map.insert("affix".into(), true.into());
        }
        if self.affix_host {
            map.insert("affixHost".into(), true.into());
        }
        if let Some(ref a) = self.affixation {
            map.insert("affixation".into(), serde_json::to_value(a).unwrap());
        }

        serde_json::Value::Object(map)
    }

    /// Parse the JSON shape produced by [`Token::to_json`].
    pub fn from_json(v: &serde_json::Value) -> Option<Token> {
        let obj = v.as_object()?;
        let mut t = Token {
            text: obj.get("text")?.as_str()?.to_string(),
            start: obj.get("start")?.as_u64()? as usize,
            length: obj.get("length")?.as_u64()? as usize,
            chunk_type: serde_json::from_value(obj.get("chunkType")?.clone()).ok()?,
            ..Default::default()
        };

        t.text_cleaned = obj
            .get("textCleaned")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        t.text_unaffixed = obj
            .get("textUnaffixed")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        t.pos = obj.get("pos").and_then(|v| v.as_str()).map(str::to_string);
        t.lemma = obj
            .get("lemma")
            .and_then(|v| v.as_str())
            .map(str::to_string);
        t.freq = obj.get("freq").and_then(|v| v.as_u64()).map(|v| v as u32);
        if let Some(v) = obj.get("syllableIndices") {
            t.syllables_idx = serde_json::from_value(v.clone()).unwrap_or_default();
        }
        if let Some(v) = obj.get("charTypes") {
            t.char_types = serde_json::from_value(v.clone()).unwrap_or_default();
        }
        if let Some(v) = obj.get("syllableStartEnd") {
            let raw: Vec<[usize; 2]> = serde_json::from_value(v.clone()).unwrap_or_default();
            t.syllable_spans = raw.into_iter().map(|[a, b]| (a, b)).collect();
        }
        if let Some(v) = obj.get("syllables") {
            t.syllables = serde_json::from_value(v.clone()).unwrap_or_default();
        }
        if let Some(v) = obj.get("senses") {
            t.senses = serde_json::from_value(v.clone()).unwrap_or_default();
        }
        t.sanskrit = obj.get("sanskrit").and_then(|v| v.as_bool()).unwrap_or(false);
        t.affix = obj.get("affix").and_then(|v| v.as_bool()).unwrap_or(false);
        t.affix_host = obj
            .get("affixHost")
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if let Some(v) = obj.get("affixation") {
            t.affixation = serde_json::from_value(v.clone()).ok();
        }

        Some(t)
    }

    /// Newline-separated `key: value` debug dump, snake_case keys, mirroring
    /// the JSON shape (see [`Token::to_json`]).
    pub fn debug_string(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!("text: {}", self.text));
        if let Some(ref v) = self.text_cleaned {
            lines.push(format!("text_cleaned: {v}"));
        }
        if let Some(ref v) = self.text_unaffixed {
            lines.push(format!("text_unaffixed: {v}"));
        }
        if let Some(ref v) = self.pos {
            lines.push(format!("pos: {v}"));
        }
        if let Some(ref v) = self.lemma {
            lines.push(format!("lemma: {v}"));
        }
        if !self.senses.is_empty() {
            let parts: Vec<String> = self
                .senses
                .iter()
                .map(|s| {
                    format!(
                        "| pos: {}, freq: {}, lemma: {}, sense: {}, affixed: {} |",
                        s.pos.as_deref().unwrap_or(""),
                        s.freq.map(|f| f.to_string()).unwrap_or_default(),
                        s.lemma.as_deref().unwrap_or(""),
                        s.sense_label.as_deref().unwrap_or(""),
                        s.affixed.map(|b| b.to_string()).unwrap_or_default(),
                    )
                })
                .collect();
            lines.push(format!("senses: {}", parts.join(" | ")));
        }
        if !self.char_types.is_empty() {
            let types: Vec<String> = self.char_types.iter().map(|c| format!("{c:?}")).collect();
            lines.push(format!("char_types: {}", types.join(",")));
        }
        lines.push(format!("chunk_type: {}", self.chunk_type.as_str()));
        if let Some(v) = self.freq {
            lines.push(format!("freq: {v}"));
        }
        if self.affix_host {
            lines.push("affix_host: true".to_string());
        }
        if !self.syllables.is_empty() {
            lines.push(format!("syls: {}", self.syllables.join("་")));
        }
        if !self.syllables_idx.is_empty() {
            let idxs: Vec<String> = self
                .syllables_idx
                .iter()
                .map(|s| {
                    s.iter()
                        .map(|i| i.to_string())
                        .collect::<Vec<_>>()
                        .join(",")
                })
                .collect();
            lines.push(format!("syls_idx: {}", idxs.join(";")));
            let spans: Vec<String> = self
                .syllable_spans
                .iter()
                .map(|(a, b)| format!("{a}-{b}"))
                .collect();
            lines.push(format!("syls_start_end: {}", spans.join(";")));
        }
        lines.push(format!("start: {}", self.start));
        lines.push(format!("len: {}", self.length));
        lines.join("\n")
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)?;
        if let Some(ref pos) = self.pos {
            write!(f, "/{pos}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display() {
        let mut token = Token::standalone("བཀྲ".to_string(), 0, 3, ChunkKind::Text);
        token.pos = Some("NOUN".to_string());
        assert_eq!(format!("{token}"), "བཀྲ/NOUN");
    }

    #[test]
    fn test_sense_populated_count() {
        let s = Sense {
            pos: Some("NOUN".into()),
            freq: Some(10),
            ..Default::default()
        };
        assert_eq!(s.populated_count(), 2);
    }

    #[test]
    fn test_json_round_trip() {
        let mut token = Token::standalone("བཀྲ་ཤིས".to_string(), 0, 7, ChunkKind::Text);
        token.pos = Some("NOUN".to_string());
        token.syllables_idx = vec![vec![0, 1, 2], vec![4, 5, 6]];
        token.syllable_spans = vec![(0, 3), (4, 7)];
        token.syllables = vec!["བཀྲ".to_string(), "ཤིས".to_string()];
        token.char_types = vec![
            CharCategory::Cons,
            CharCategory::Cons,
            CharCategory::SubCons,
            CharCategory::Cons,
            CharCategory::Cons,
            CharCategory::Vow,
            CharCategory::Cons,
        ];
        token.senses.push(Sense {
            pos: Some("NOUN".into()),
            ..Default::default()
        });

        let json = token.to_json();
        let back = Token::from_json(&json).unwrap();
        assert_eq!(back.text, token.text);
        assert_eq!(back.pos, token.pos);
        assert_eq!(back.syllables_idx, token.syllables_idx);
        assert_eq!(back.syllable_spans, token.syllable_spans);
        assert_eq!(back.syllables, token.syllables);
        assert_eq!(back.char_types, token.char_types);
        assert_eq!(back.senses, token.senses);
        assert_eq!(back, token);
    }

    #[test]
    fn test_json_omits_absent_fields() {
        let token = Token::standalone("།".to_string(), 0, 1, ChunkKind::Punct);
        let json = token.to_json();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("pos"));
        assert!(!obj.contains_key("sanskrit"));
        assert!(!obj.contains_key("senses"));
    }
}
