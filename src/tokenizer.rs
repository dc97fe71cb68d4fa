//! Longest-match tokenization: the match engine that walks a [`ChunkFrame`]
//! against a [`Trie`] and emits [`Token`]s in input order.
//!
//! The engine advances an outer cursor `c_idx` over the frame one committed
//! token at a time. For each position it walks forward (`walker`) through
//! consecutive Tibetan syllables, remembering every leaf it passes through
//! (`max_match`) so that on failure it can commit the longest match seen
//! rather than the first. A run of syllables that never reaches a leaf is
//! emitted syllable-by-syllable as `NO_POS` tokens, one retry per syllable.

use std::collections::HashMap;
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::char_categories::ClassifiedText;
use crate::chunker::{serve_syls_to_trie, ChunkFrame};
use crate::finalize;
use crate::syllable;
use crate::token::{syllables_from_spans, ChunkKind, Sense, Token, NO_POS};
use crate::trie::{NodeData, Trie, TrieNode};

/// Where a single outer step of the match loop currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MatchState {
    /// About to look at the entry at `walker` for the first time this step.
    FreshStart,
    /// Walked at least one syllable successfully; still extending.
    Walking,
    /// Walked the frame's last entry successfully; nothing left to try.
    Matched,
    /// The walk cannot extend any further (failed lookup or hit a
    /// non-syllable entry).
    Stuck,
}

/// Longest-match tokenizer over a shared dictionary trie.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    trie: Arc<Trie>,
}

impl Tokenizer {
    /// Build a tokenizer owning `trie`.
    pub fn new(trie: Trie) -> Self {
        Tokenizer { trie: Arc::new(trie) }
    }

    /// Build a tokenizer sharing an already-`Arc`-wrapped trie, so several
    /// tokenizers (or threads) can match against one dictionary without
    /// cloning it.
    pub fn with_arc(trie: Arc<Trie>) -> Self {
        Tokenizer { trie }
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    pub fn trie_arc(&self) -> Arc<Trie> {
        Arc::clone(&self.trie)
    }

    /// Tokenize `text`: NFC-normalize, classify, chunk into syllables and
    /// non-Tibetan runs, longest-match against the trie, then run affix
    /// splitting and default sense/lemma assignment.
    pub fn tokenize(&self, text: &str, split_affixes: bool, spaces_as_punct: bool) -> Vec<Token> {
        let normalized: String = text.nfc().collect();
        let ct = ClassifiedText::new(&normalized, &Default::default());
        let frame = serve_syls_to_trie(&ct, spaces_as_punct);
        let mut tokens = self.tokenize_chunks(&frame, &ct);
        finalize::apply(&mut tokens, split_affixes);
        tokens
    }

    /// Like [`Tokenizer::tokenize`], also returning the snake_case debug
    /// dump of the resulting tokens joined by blank lines.
    pub fn tokenize_debug(
        &self,
        text: &str,
        split_affixes: bool,
        spaces_as_punct: bool,
    ) -> (Vec<Token>, String) {
        let tokens = self.tokenize(text, split_affixes, spaces_as_punct);
        let debug = tokens
            .iter()
            .map(Token::debug_string)
            .collect::<Vec<_>>()
            .join("\n\n");
        (tokens, debug)
    }

    /// Run the match engine over an already-built frame, without affix
    /// splitting or lemma assignment.
    fn tokenize_chunks(&self, frame: &ChunkFrame, ct: &ClassifiedText) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut c_idx = 0;
        while c_idx < frame.len() {
            let (token, next) = self.match_one(frame, ct, c_idx);
            debug_assert!(next > c_idx, "match engine must make progress");
            tokens.push(token);
            c_idx = next;
        }
        tokens
    }

    /// One outer step: starting from `c_idx`, walk as far as the trie
    /// allows, then commit the longest match, emit an unmatched run, or
    /// fall back to a standalone token. Returns the token and the next
    /// `c_idx`.
    fn match_one(&self, frame: &ChunkFrame, ct: &ClassifiedText, c_idx: usize) -> (Token, usize) {
        let mut state = MatchState::FreshStart;
        let mut walker = c_idx;
        let mut current_node: Option<&TrieNode> = None;
        let mut syls: Vec<usize> = Vec::new();
        let mut max_match: Vec<Vec<usize>> = Vec::new();
        let mut match_data: HashMap<usize, NodeData> = HashMap::new();

        loop {
            match state {
                MatchState::Matched | MatchState::Stuck => break,
                MatchState::FreshStart | MatchState::Walking => {
                    if walker >= frame.len() {
                        state = MatchState::Stuck;
                        continue;
                    }
                    let entry = &frame[walker];
                    let Some(idxs) = entry.syllable_indices.as_ref() else {
                        state = MatchState::Stuck;
                        continue;
                    };
                    let syl_text: String = idxs.iter().map(|&i| ct.chars[i]).collect();
                    match self.trie.walk(&syl_text, current_node) {
                        None => {
                            state = MatchState::Stuck;
                        }
                        Some(node) => {
                            syls.push(walker);
                            current_node = Some(node);
                            if node.leaf {
                                match_data.insert(walker, node.data.clone());
                                max_match.push(syls.clone());
                            }
                            if walker == frame.len() - 1 {
                                state = MatchState::Matched;
                            } else {
                                walker += 1;
                                state = MatchState::Walking;
                            }
                        }
                    }
                }
            }
        }

        // Commit the longest recorded match (last pushed, since match_data
        // only grows with walker and each push strictly extends the prior
        // prefix). This covers both a clean "walk until stuck" failure and
        // running off the end of the frame on a leaf.
        if let Some(longest) = max_match.last() {
            let final_idx = *longest.last().expect("max_match entries are non-empty");
            let data = match_data.remove(&final_idx);
            let token = self.build_word_token(frame, ct, longest, data);
            return (token, final_idx + 1);
        }

        // No leaf ever reached. A syllable run with no match retries from
        // its second syllable onward: emit a single NO_POS token for the
        // first syllable and resume immediately after it.
        if !syls.is_empty() {
            let token = self.build_no_pos_token(frame, ct, syls[0]);
            return (token, c_idx + 1);
        }

        // Nothing walked at all: either the syllable at c_idx doesn't match
        // any trie entry from the root, or c_idx is a non-syllable entry.
        let entry = &frame[c_idx];
        if entry.syllable_indices.is_some() {
            (self.build_no_pos_token(frame, ct, c_idx), c_idx + 1)
        } else {
            (self.build_standalone_token(frame, ct, c_idx), c_idx + 1)
        }
    }

    /// Assemble a word token from a committed list of frame indices
    /// (`syls`), each a syllable entry, plus the dictionary data attached to
    /// the final one if it matched a leaf.
    fn build_word_token(
        &self,
        frame: &ChunkFrame,
        ct: &ClassifiedText,
        syls: &[usize],
        data: Option<NodeData>,
    ) -> Token {
        let start = frame[syls[0]].meta.start;
        let mut text = String::new();
        let mut syllables_idx = Vec::with_capacity(syls.len());
        let mut syllable_spans = Vec::with_capacity(syls.len());
        let mut char_types = Vec::new();
        let mut offset = 0usize;

        for &frame_idx in syls {
            let abs_idxs = frame[frame_idx]
                .syllable_indices
                .as_ref()
                .expect("syls only ever holds syllable entries");
            let span_start = offset;
            let rel: Vec<usize> = abs_idxs.iter().map(|&a| a - start).collect();
            for &a in abs_idxs {
                text.push(ct.chars[a]);
                char_types.push(ct.categories[a]);
            }
            offset += abs_idxs.len();
            syllables_idx.push(rel);
            syllable_spans.push((span_start, offset));
        }
        let length = offset;

        let sanskrit = char_types.iter().any(|c| c.is_sanskrit()) || syllable::has_sanskrit_sequence(&text);
        let syllables = syllables_from_spans(&text, &syllable_spans);

        let mut token = Token {
            text,
            start,
            length,
            chunk_type: ChunkKind::Text,
            syllables_idx,
            syllable_spans,
            syllables,
            char_types,
            sanskrit,
            ..Default::default()
        };

        if let Some(data) = data {
            token.senses = data.senses;
            token.freq = data.form_freq;
            token.affixation = data.affixation;
            token.sanskrit = token.sanskrit || data.sanskrit.unwrap_or(false);
        }

        token
    }

    /// A single-syllable token the dictionary has no entry for.
    fn build_no_pos_token(&self, frame: &ChunkFrame, ct: &ClassifiedText, frame_idx: usize) -> Token {
        let mut token = self.build_word_token(frame, ct, &[frame_idx], None);
        token.senses = vec![Sense {
            pos: Some(NO_POS.to_string()),
            ..Default::default()
        }];
        token
    }

    /// A non-Tibetan chunk (punctuation, numeral, foreign script) passed
    /// through untouched.
    fn build_standalone_token(&self, frame: &ChunkFrame, ct: &ClassifiedText, frame_idx: usize) -> Token {
        let meta = frame[frame_idx].meta;
        let text = ct.slice(meta.start, meta.length);
        let char_types = ct.categories[meta.start..meta.start + meta.length].to_vec();
        Token {
            text,
            start: meta.start,
            length: meta.length,
            chunk_type: meta.kind,
            char_types,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::NodeUpdate;

    fn dict_with(words: &[(&[&str], Option<&str>)]) -> Trie {
        let mut trie = Trie::new();
        for (word, pos) in words {
            let update = pos.map(|p| {
                NodeUpdate::Sense(Sense {
                    pos: Some(p.to_string()),
                    ..Default::default()
                })
            });
            trie.add(word, update);
        }
        trie
    }

    #[test]
    fn test_tokenize_known_word() {
        let trie = dict_with(&[(&["བཀྲ", "ཤིས"], Some("NOUN"))]);
        let tok = Tokenizer::new(trie);
        let tokens = tok.tokenize("བཀྲ་ཤིས།", false, false);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "བཀྲཤིས");
        assert!(tokens[0].is_word());
        assert_eq!(tokens[1].chunk_type, ChunkKind::Punct);
    }

    #[test]
    fn test_tokenize_prefers_longest_match() {
        let trie = dict_with(&[(&["ཀ"], Some("PART")), (&["ཀ", "ཁ"], Some("NOUN"))]);
        let tok = Tokenizer::new(trie);
        let tokens = tok.tokenize("ཀ་ཁ", false, false);

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "ཀཁ");
        assert_eq!(tokens[0].senses[0].pos.as_deref(), Some("NOUN"));
    }

    #[test]
    fn test_unmatched_syllable_run_retries_each_syllable() {
        let trie = Trie::new();
        let tok = Tokenizer::new(trie);
        let tokens = tok.tokenize("ཀ་ཁ", false, false);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].senses[0].pos.as_deref(), Some(NO_POS));
        assert_eq!(tokens[1].senses[0].pos.as_deref(), Some(NO_POS));
    }

    #[test]
    fn test_known_prefix_of_longer_unknown_word() {
        // "ཀ" is a dictionary word on its own, and also the first syllable
        // of the (undictionaried) two-syllable sequence "ཀ་ཁ". The engine
        // should commit the known prefix as its own token and retry from
        // the next syllable rather than failing the whole run.
        let trie = dict_with(&[(&["ཀ"], Some("PART"))]);
        let tok = Tokenizer::new(trie);
        let tokens = tok.tokenize("ཀ་ཁ", false, false);

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "ཀ");
        assert_eq!(tokens[0].senses[0].pos.as_deref(), Some("PART"));
        assert_eq!(tokens[1].text, "ཁ");
        assert_eq!(tokens[1].senses[0].pos.as_deref(), Some(NO_POS));
    }

    #[test]
    fn test_fully_non_tibetan_is_standalone() {
        let tok = Tokenizer::new(Trie::new());
        let tokens = tok.tokenize("hello", false, false);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].chunk_type, ChunkKind::Latin);
    }

    #[test]
    fn test_empty_input_is_empty() {
        let tok = Tokenizer::new(Trie::new());
        assert!(tok.tokenize("", false, false).is_empty());
    }

    #[test]
    fn test_arc_sharing() {
        let trie = dict_with(&[(&["ཀ"], None)]);
        let arc = Arc::new(trie);
        let tok_a = Tokenizer::with_arc(Arc::clone(&arc));
        let tok_b = Tokenizer::with_arc(Arc::clone(&arc));
        assert_eq!(Arc::strong_count(&arc), 3);
        assert_eq!(tok_a.tokenize("ཀ", false, false).len(), 1);
        assert_eq!(tok_b.tokenize("ཀ", false, false).len(), 1);
    }

    #[test]
    fn test_unicode_normalization() {
        // Combining vowel sign followed separately should normalize the
        // same as its precomposed form before classification.
        let tok = Tokenizer::new(Trie::new());
        let decomposed = "ཀ\u{0F72}";
        let tokens = tok.tokenize(decomposed, false, false);
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_sanskrit_flag_from_category() {
        let tok = Tokenizer::new(Trie::new());
        let tokens = tok.tokenize("क", false, false);
        assert!(tokens[0].sanskrit);
    }

    #[test]
    fn test_sanskrit_flag_from_sequence() {
        let tok = Tokenizer::new(Trie::new());
        let tokens = tok.tokenize("ཀཱི", false, false);
        assert!(tokens.iter().any(|t| t.sanskrit));
    }
}
