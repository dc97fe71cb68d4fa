//! Segmentation of classified text into typed, non-overlapping runs, and
//! further splitting of Tibetan runs into syllables.
//!
//! The primitives here compose: [`chunk_using`] produces a labeled run
//! sequence from a per-codepoint predicate, and [`pipe_chunk`] refines
//! whichever entries of a prior pass carry a given label by re-chunking
//! just that span. [`serve_syls_to_trie`] wires the named chunkings
//! together into the sequence the match engine consumes.

use crate::char_categories::{CharCategory, ClassifiedText};
use crate::token::ChunkKind;

/// A labeled, contiguous span of codepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub start: usize,
    pub length: usize,
}

impl Chunk {
    pub fn end(&self) -> usize {
        self.start + self.length
    }
}

/// One entry of a [`ChunkFrame`]: either a Tibetan syllable (its codepoint
/// indices recorded for trie lookup) or an untokenizable span that passes
/// through as a standalone token.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkFrameEntry {
    pub syllable_indices: Option<Vec<usize>>,
    pub meta: Chunk,
}

/// The ordered sequence [`serve_syls_to_trie`] hands to the match engine.
pub type ChunkFrame = Vec<ChunkFrameEntry>;

/// Scan `[start, end)` and emit maximal runs labeled `yes` where `pred`
/// holds and `no` otherwise.
pub fn chunk_using<F>(ct: &ClassifiedText, start: usize, end: usize, yes: ChunkKind, no: ChunkKind, pred: F) -> Vec<Chunk>
where
    F: Fn(&ClassifiedText, usize) -> bool,
{
    let mut chunks = Vec::new();
    let mut i = start;
    while i < end {
        let matched = pred(ct, i);
        let label = if matched { yes } else { no };
        let run_start = i;
        i += 1;
        while i < end && pred(ct, i) == matched {
            i += 1;
        }
        chunks.push(Chunk {
            kind: label,
            start: run_start,
            length: i - run_start,
        });
    }
    chunks
}

/// Replace every entry of `prev` labeled `target_label` with the result of
/// applying `chunker` to that entry's span; other entries pass through.
pub fn pipe_chunk<F>(prev: &[Chunk], ct: &ClassifiedText, target_label: ChunkKind, chunker: F) -> Vec<Chunk>
where
    F: Fn(&ClassifiedText, usize, usize) -> Vec<Chunk>,
{
    let mut out = Vec::with_capacity(prev.len());
    for c in prev {
        if c.kind == target_label {
            out.extend(chunker(ct, c.start, c.end()));
        } else {
            out.push(*c);
        }
    }
    out
}

/// Word-forming (`Bo`) vs everything else (`NonBo`). This is the predicate
/// that actually drives the split: the syllable-part categories plus
/// `Tsek` itself, which keeps punctuation/numerals/symbols in `NonBo` runs
/// instead of folding them onto an adjacent word (see `DESIGN.md`).
pub fn chunk_bo_text(ct: &ClassifiedText, start: usize, end: usize) -> Vec<Chunk> {
    chunk_using(ct, start, end, ChunkKind::Bo, ChunkKind::NonBo, |ct, i| {
        ct.categories[i].is_word_forming()
    })
}

fn punct_predicate(ct: &ClassifiedText, idx: usize) -> bool {
    let cat = ct.categories[idx];
    if matches!(
        cat,
        CharCategory::NormalPunct | CharCategory::SpecialPunct | CharCategory::Transparent
    ) {
        return true;
    }
    if matches!(cat, CharCategory::Tsek) && idx > 0 {
        let prev = ct.categories[idx - 1];
        return matches!(
            prev,
            CharCategory::Symbol
                | CharCategory::Numeral
                | CharCategory::Other
                | CharCategory::NormalPunct
                | CharCategory::SpecialPunct
                | CharCategory::Tsek
                | CharCategory::Transparent
        );
    }
    false
}

/// Punctuation vs not, with the context rule: a `Tsek` is folded onto a
/// preceding non-word run when the codepoint right before it is itself
/// punctuation-like.
pub fn chunk_punctuation(ct: &ClassifiedText, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
    chunk_using(ct, start, end, yes, no, punct_predicate)
}

pub fn chunk_numbers(ct: &ClassifiedText, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
    chunk_using(ct, start, end, yes, no, |ct, i| {
        matches!(ct.categories[i], CharCategory::Numeral | CharCategory::Transparent)
    })
}

pub fn chunk_symbols(ct: &ClassifiedText, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
    chunk_using(ct, start, end, yes, no, |ct, i| {
        matches!(
            ct.categories[i],
            CharCategory::Symbol | CharCategory::Transparent | CharCategory::Nfc
        )
    })
}

pub fn chunk_latin(ct: &ClassifiedText, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
    chunk_using(ct, start, end, yes, no, |ct, i| {
        matches!(ct.categories[i], CharCategory::Latin | CharCategory::Transparent)
    })
}

pub fn chunk_cjk(ct: &ClassifiedText, start: usize, end: usize, yes: ChunkKind, no: ChunkKind) -> Vec<Chunk> {
    chunk_using(ct, start, end, yes, no, |ct, i| {
        matches!(ct.categories[i], CharCategory::Cjk | CharCategory::Transparent)
    })
}

/// Resolve a `NonBo` run's final labels by piping it through the
/// punctuation/number/symbol/latin/cjk chain, each stage claiming what it
/// matches and handing the remainder to the next.
fn classify_non_bo_run(ct: &ClassifiedText, start: usize, end: usize) -> Vec<Chunk> {
    let p1 = chunk_punctuation(ct, start, end, ChunkKind::Punct, ChunkKind::NonPunct);
    let p2 = pipe_chunk(&p1, ct, ChunkKind::NonPunct, |ct, s, e| {
        chunk_numbers(ct, s, e, ChunkKind::Num, ChunkKind::NonNum)
    });
    let p3 = pipe_chunk(&p2, ct, ChunkKind::NonNum, |ct, s, e| {
        chunk_symbols(ct, s, e, ChunkKind::Sym, ChunkKind::NonSym)
    });
    let p4 = pipe_chunk(&p3, ct, ChunkKind::NonSym, |ct, s, e| {
        chunk_latin(ct, s, e, ChunkKind::Latin, ChunkKind::NonBo)
    });
    pipe_chunk(&p4, ct, ChunkKind::NonBo, |ct, s, e| {
        chunk_cjk(ct, s, e, ChunkKind::Cjk, ChunkKind::Other)
    })
}

/// Split a Tibetan run into syllables at `Tsek`/U+0F7F/U+0F71 boundaries.
/// The separator is a boundary, not part of either syllable; empty
/// syllables (two adjacent separators) are dropped.
pub fn syllabify(ct: &ClassifiedText, start: usize, end: usize) -> Vec<Vec<usize>> {
    let mut syllables = Vec::new();
    let mut current = Vec::new();
    for idx in start..end {
        let c = ct.chars[idx];
        let is_sep = ct.categories[idx] == CharCategory::Tsek || c == '\u{0F7F}' || c == '\u{0F71}';
        if is_sep {
            if !current.is_empty() {
                syllables.push(std::mem::take(&mut current));
            }
        } else {
            current.push(idx);
        }
    }
    if !current.is_empty() {
        syllables.push(current);
    }
    syllables
}

fn is_pure_transparent(ct: &ClassifiedText, start: usize, end: usize) -> bool {
    (start..end).all(|i| ct.categories[i] == CharCategory::Transparent)
}

/// Assemble the canonical [`ChunkFrame`] for tokenization: Tibetan runs
/// become one entry per syllable; non-Tibetan runs become one entry per
/// resolved sub-run. Whitespace-only `Punct` runs are dropped as gaps
/// unless `spaces_as_punct` is set.
pub fn serve_syls_to_trie(ct: &ClassifiedText, spaces_as_punct: bool) -> ChunkFrame {
    let mut frame = Vec::new();
    let bo_runs = chunk_bo_text(ct, 0, ct.len());

    for run in bo_runs {
        match run.kind {
            ChunkKind::Bo => {
                let syls = syllabify(ct, run.start, run.end());
                if syls.is_empty() {
                    frame.push(ChunkFrameEntry {
                        syllable_indices: None,
                        meta: Chunk {
                            kind: ChunkKind::Punct,
                            start: run.start,
                            length: run.length,
                        },
                    });
                } else {
                    for syl in syls {
                        let syl_start = syl[0];
                        let syl_len = syl.len();
                        frame.push(ChunkFrameEntry {
                            syllable_indices: Some(syl),
                            meta: Chunk {
                                kind: ChunkKind::Text,
                                start: syl_start,
                                length: syl_len,
                            },
                        });
                    }
                }
            }
            ChunkKind::NonBo => {
                for sub in classify_non_bo_run(ct, run.start, run.end()) {
                    if sub.kind == ChunkKind::Punct
                        && !spaces_as_punct
                        && is_pure_transparent(ct, sub.start, sub.end())
                    {
                        continue;
                    }
                    frame.push(ChunkFrameEntry {
                        syllable_indices: None,
                        meta: sub,
                    });
                }
            }
            _ => unreachable!("chunk_bo_text only emits Bo/NonBo"),
        }
    }

    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn classify(s: &str) -> ClassifiedText {
        ClassifiedText::new(s, &HashSet::new())
    }

    #[test]
    fn test_chunk_bo_text_splits_word_and_punct() {
        let ct = classify("བཀྲ་ཤིས།");
        let chunks = chunk_bo_text(&ct, 0, ct.len());
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].kind, ChunkKind::Bo);
        assert_eq!(chunks[1].kind, ChunkKind::NonBo);
    }

    #[test]
    fn test_syllabify_drops_separator() {
        let ct = classify("བཀྲ་ཤིས");
        let syls = syllabify(&ct, 0, ct.len());
        assert_eq!(syls.len(), 2);
        assert_eq!(syls[0], vec![0, 1, 2]);
        assert_eq!(syls[1], vec![4, 5, 6]);
    }

    #[test]
    fn test_syllabify_empty_run_is_empty() {
        let ct = classify("་");
        let syls = syllabify(&ct, 0, ct.len());
        assert!(syls.is_empty());
    }

    #[test]
    fn test_serve_syls_lone_tsek_is_punct() {
        let ct = classify("་");
        let frame = serve_syls_to_trie(&ct, false);
        assert_eq!(frame.len(), 1);
        assert!(frame[0].syllable_indices.is_none());
        assert_eq!(frame[0].meta.kind, ChunkKind::Punct);
        assert_eq!(frame[0].meta.length, 1);
    }

    #[test]
    fn test_serve_syls_word_then_shad() {
        let ct = classify("ཤིས།");
        let frame = serve_syls_to_trie(&ct, false);
        assert_eq!(frame.len(), 2);
        assert!(frame[0].syllable_indices.is_some());
        assert_eq!(frame[1].meta.kind, ChunkKind::Punct);
    }

    #[test]
    fn test_serve_syls_drops_bare_whitespace_by_default() {
        let ct = classify("ཀ a");
        let frame = serve_syls_to_trie(&ct, false);
        // The Latin "a" is present but the separating space is a dropped gap.
        assert!(frame.iter().any(|e| e.meta.kind == ChunkKind::Latin));
        let total_len: usize = frame.iter().map(|e| e.meta.length).sum();
        assert!(total_len < ct.len());
    }

    #[test]
    fn test_serve_syls_spaces_as_punct_keeps_whitespace() {
        let ct = classify("ཀ a");
        let frame = serve_syls_to_trie(&ct, true);
        let total_len: usize = frame.iter().map(|e| e.meta.length).sum();
        assert_eq!(total_len, ct.len());
    }

    #[test]
    fn test_pipe_chunk_refines_non_bo_run() {
        let ct = classify("༡༢abc");
        let non_bo = classify_non_bo_run(&ct, 0, ct.len());
        assert_eq!(non_bo.len(), 2);
        assert_eq!(non_bo[0].kind, ChunkKind::Num);
        assert_eq!(non_bo[1].kind, ChunkKind::Latin);
    }

    #[test]
    fn test_fully_non_tibetan_input_is_one_run_per_kind() {
        let ct = classify("hello world");
        let frame = serve_syls_to_trie(&ct, false);
        assert_eq!(frame.len(), 1);
        assert_eq!(frame[0].meta.kind, ChunkKind::Latin);
        assert_eq!(frame[0].meta.length, ct.len());
    }
}
