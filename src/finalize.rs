//! Post-match token cleanup: affix splitting, default lemma assignment, and
//! picking which of a word's senses a caller sees at the top level.
//!
//! This runs once, after the match engine has produced a full token list,
//! via [`apply`]. No dagdra merging happens here — that overlay belongs to a
//! separate adjustments pass this crate doesn't implement.

use crate::syllable;
use crate::token::{syllables_from_spans, ChunkKind, Sense, Token, NO_POS};

/// Split affixed particles off word tokens (if `split_affixes`), then fill
/// in default lemmas and pick each token's displayed sense.
pub fn apply(tokens: &mut Vec<Token>, split_affixes: bool) {
    if split_affixes {
        split_all_affixes(tokens);
    }
    for token in tokens.iter_mut() {
        assign_default_lemma(token);
        select_sense(token);
    }
}

fn split_all_affixes(tokens: &mut Vec<Token>) {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens.drain(..) {
        if let Some((host, affix)) = try_split(&token) {
            out.push(host);
            out.push(affix);
            continue;
        }

        if whole_text_affix(&token.text).is_some() {
            if let Some(prev) = out.last_mut() {
                if prev.chunk_type == ChunkKind::Text
                    && !prev.syllables_idx.is_empty()
                    && !prev.affix
                    && !prev.affix_host
                {
                    prev.affix_host = true;
                    let mut affix_tok = token;
                    affix_tok.affix = true;
                    // The match engine stamped this NO_POS for lacking a
                    // dictionary entry, but it's a known affix particle, not
                    // an unresolved word — drop the NO_POS sense so default
                    // lemma assignment isn't guarded off by it.
                    affix_tok.senses.clear();
                    out.push(affix_tok);
                    continue;
                }
            }
        }

        out.push(token);
    }
    *tokens = out;
}

/// Known affix particle matching `text`'s entire (tsek-stripped) contents.
/// Distinct from [`syllable::find_affix`], which refuses a match that would
/// consume the whole string — here the match engine has already produced a
/// separate token for the particle, with no host characters left to require.
fn whole_text_affix(text: &str) -> Option<&'static str> {
    let trimmed = text.strip_suffix(syllable::TSEK).unwrap_or(text);
    syllable::AFFIXES.iter().find(|a| **a == trimmed).copied()
}

/// Split `token` into a host and an affix particle if its text ends in a
/// known affix with a non-empty host left over.
fn try_split(token: &Token) -> Option<(Token, Token)> {
    if token.chunk_type != ChunkKind::Text || token.syllables_idx.is_empty() {
        return None;
    }

    let affix = syllable::find_affix(&token.text)?;
    let affix_len = affix.chars().count();
    let total_len = token.length;
    let host_len = total_len.checked_sub(affix_len).filter(|&n| n > 0)?;

    let chars: Vec<char> = token.text.chars().collect();
    let host_text: String = chars[..host_len].iter().collect();
    let affix_text: String = chars[host_len..].iter().collect();

    let flat_idx: Vec<usize> = token.syllables_idx.iter().flatten().copied().collect();
    let (host_groups, affix_groups) = split_groups(&token.syllables_idx, host_len);
    let host_spans = spans_from_groups(&host_groups);
    let affix_spans = spans_from_groups(&affix_groups);

    let host_cats = token.char_types[..host_len].to_vec();
    let affix_cats = token.char_types[host_len..].to_vec();
    let host_syllables = syllables_from_spans(&host_text, &host_spans);
    let affix_syllables = syllables_from_spans(&affix_text, &affix_spans);

    let mut host = Token {
        text: host_text,
        start: token.start,
        length: host_len,
        chunk_type: ChunkKind::Text,
        syllables_idx: host_groups,
        syllable_spans: host_spans,
        syllables: host_syllables,
        char_types: host_cats,
        senses: token.senses.clone(),
        freq: token.freq,
        affixation: token.affixation,
        affix_host: true,
        ..Default::default()
    };
    host.sanskrit = host.char_types.iter().any(|c| c.is_sanskrit()) || syllable::has_sanskrit_sequence(&host.text);

    let mut affix_tok = Token {
        text: affix_text,
        start: token.start + flat_idx[host_len],
        length: affix_len,
        chunk_type: ChunkKind::Text,
        syllables_idx: affix_groups,
        syllable_spans: affix_spans,
        syllables: affix_syllables,
        char_types: affix_cats,
        affix: true,
        ..Default::default()
    };
    affix_tok.sanskrit =
        affix_tok.char_types.iter().any(|c| c.is_sanskrit()) || syllable::has_sanskrit_sequence(&affix_tok.text);

    Some((host, affix_tok))
}

/// Partition each syllable's relative-index group at the compacted `host_len`
/// boundary, splitting the one group that straddles it.
fn split_groups(groups: &[Vec<usize>], host_len: usize) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let mut host_groups = Vec::new();
    let mut affix_groups = Vec::new();
    let mut offset = 0usize;
    for g in groups {
        let start = offset;
        let end = offset + g.len();
        if end <= host_len {
            host_groups.push(g.clone());
        } else if start >= host_len {
            affix_groups.push(g.clone());
        } else {
            let split_at = host_len - start;
            host_groups.push(g[..split_at].to_vec());
            affix_groups.push(g[split_at..].to_vec());
        }
        offset = end;
    }
    (host_groups, affix_groups)
}

fn spans_from_groups(groups: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let mut spans = Vec::with_capacity(groups.len());
    let mut offset = 0usize;
    for g in groups {
        let start = offset;
        offset += g.len();
        spans.push((start, offset));
    }
    spans
}

/// Fill in a default lemma for any sense still missing one, skipping senses
/// with no POS at all or stamped `NO_POS` (an unresolved or bare headword
/// gets no fabricated lemma).
fn assign_default_lemma(token: &mut Token) {
    if token.chunk_type != ChunkKind::Text {
        return;
    }

    let default_lemma = if token.affix {
        default_lemma_for_affix(&token.text)
    } else if token.affix_host {
        default_lemma_for_host(&token.text, token.affixation.map(|a| a.aa).unwrap_or(false))
    } else {
        default_lemma_for_word(&token.text)
    };

    if token.senses.is_empty() {
        token.senses.push(Sense::default());
    }
    for sense in token.senses.iter_mut() {
        if sense.lemma.is_none() && sense.pos.is_some() && sense.pos.as_deref() != Some(NO_POS) {
            sense.lemma = Some(default_lemma.clone());
        }
    }
}

fn default_lemma_for_affix(particle_text: &str) -> String {
    let particle = particle_text.strip_suffix(syllable::TSEK).unwrap_or(particle_text);
    format!("{}{}", syllable::lemma_for_particle(particle), syllable::TSEK)
}

fn default_lemma_for_host(host_text: &str, restore_aa: bool) -> String {
    let mut lemma = host_text.to_string();
    if restore_aa {
        lemma.push('འ');
    }
    lemma.push(syllable::TSEK);
    lemma
}

fn default_lemma_for_word(text: &str) -> String {
    if text.ends_with(syllable::TSEK) {
        text.to_string()
    } else {
        format!("{text}{}", syllable::TSEK)
    }
}

/// Pick the sense a caller sees at the top level: the richest sense (most
/// populated attributes) from the highest-priority non-empty bucket among
/// non-affixed, unspecified, and affixed senses, in that order.
fn select_sense(token: &mut Token) {
    if token.senses.is_empty() {
        return;
    }

    let mut chosen: Option<Sense> = None;
    for want in [Some(false), None, Some(true)] {
        let best = token
            .senses
            .iter()
            .filter(|s| s.affixed == want)
            .max_by_key(|s| s.populated_count());
        if let Some(s) = best {
            chosen = Some(s.clone());
            break;
        }
    }

    if let Some(sense) = chosen {
        token.pos = sense.pos;
        token.lemma = sense.lemma;
        token.freq = sense.freq;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_token(text: &str) -> Token {
        let chars: Vec<char> = text.chars().collect();
        let idx: Vec<usize> = (0..chars.len()).collect();
        Token {
            text: text.to_string(),
            start: 0,
            length: chars.len(),
            chunk_type: ChunkKind::Text,
            syllables_idx: vec![idx],
            syllable_spans: vec![(0, chars.len())],
            char_types: vec![Default::default(); chars.len()],
            ..Default::default()
        }
    }

    #[test]
    fn test_split_known_affix() {
        let token = word_token("བཀྲཤིསཀྱིས");
        let (host, affix) = try_split(&token).expect("should split on known affix");
        assert_eq!(affix.text, "ཀྱིས");
        assert!(affix.affix);
        assert!(host.affix_host);
        assert_eq!(host.length + affix.length, token.length);
    }

    #[test]
    fn test_no_split_without_known_affix() {
        let token = word_token("བཀྲཤིས");
        assert!(try_split(&token).is_none());
    }

    #[test]
    fn test_default_lemma_for_affix() {
        assert_eq!(default_lemma_for_affix("ཀྱིས"), "གྱིས་");
        assert_eq!(default_lemma_for_affix("ཟ"), "ཟ་");
    }

    #[test]
    fn test_default_lemma_for_word_adds_trailing_tsek() {
        assert_eq!(default_lemma_for_word("བཀྲཤིས"), "བཀྲཤིས་");
        assert_eq!(default_lemma_for_word("བཀྲཤིས་"), "བཀྲཤིས་");
    }

    #[test]
    fn test_assign_default_lemma_skips_no_pos() {
        let mut token = word_token("ཁ");
        token.senses = vec![Sense {
            pos: Some(NO_POS.to_string()),
            ..Default::default()
        }];
        assign_default_lemma(&mut token);
        assert!(token.senses[0].lemma.is_none());
    }

    #[test]
    fn test_assign_default_lemma_skips_absent_pos() {
        let mut token = word_token("ཁ");
        token.senses = vec![Sense {
            pos: None,
            ..Default::default()
        }];
        assign_default_lemma(&mut token);
        assert!(token.senses[0].lemma.is_none());
    }

    #[test]
    fn test_select_sense_prefers_non_affixed_bucket() {
        let mut token = word_token("ཀ");
        token.senses = vec![
            Sense {
                pos: Some("PART".into()),
                affixed: Some(true),
                ..Default::default()
            },
            Sense {
                pos: Some("NOUN".into()),
                affixed: Some(false),
                freq: Some(5),
                ..Default::default()
            },
        ];
        select_sense(&mut token);
        assert_eq!(token.pos.as_deref(), Some("NOUN"));
    }

    #[test]
    fn test_select_sense_picks_richest_in_bucket() {
        let mut token = word_token("ཀ");
        token.senses = vec![
            Sense {
                pos: Some("NOUN".into()),
                ..Default::default()
            },
            Sense {
                pos: Some("NOUN".into()),
                lemma: Some("ཀ་".into()),
                freq: Some(1),
                ..Default::default()
            },
        ];
        select_sense(&mut token);
        assert_eq!(token.lemma.as_deref(), Some("ཀ་"));
    }

    #[test]
    fn test_select_sense_clears_stale_form_freq() {
        let mut token = word_token("ཀ");
        token.freq = Some(99); // carried over from the node's form_freq
        token.senses = vec![Sense {
            pos: Some("NOUN".into()),
            freq: None,
            ..Default::default()
        }];
        select_sense(&mut token);
        assert_eq!(token.freq, None);
    }
}
