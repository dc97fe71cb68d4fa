//! Dictionary-based longest-match tokenizer for Tibetan text.
//!
//! Classifies every codepoint of an input string, groups them into syllables
//! and non-Tibetan runs, then walks a [`Trie`] of dictionary entries to find
//! the longest matching word at each position.
//!
//! ## Quick start
//!
//! ```rust
//! use bo_tokenize::{Tokenizer, loader::TrieBuilder};
//!
//! let tsv = "བཀྲ་ཤིས\tNOUN\t\t\t1000\nབདེ་ལེགས\tNOUN\t\t\t500";
//! let mut builder = TrieBuilder::new();
//! builder.load_tsv(tsv);
//! let trie = builder.build();
//!
//! let tokenizer = Tokenizer::new(trie);
//! let tokens = tokenizer.tokenize("བཀྲ་ཤིས་བདེ་ལེགས།", true, false);
//!
//! for token in &tokens {
//!     println!("{}: {:?}", token.text, token.pos);
//! }
//! ```

pub mod char_categories;
pub mod chunker;
pub mod error;
pub mod finalize;
pub mod loader;
pub mod syllable;
pub mod token;
pub mod tokenizer;
pub mod trie;

pub use char_categories::{get_char_category, CharCategory, ClassifiedText};
pub use chunker::{Chunk, ChunkFrame, ChunkFrameEntry};
pub use error::TokenizeError;
pub use token::{AffixationInfo, ChunkKind, Sense, Token, NO_POS};
pub use tokenizer::Tokenizer;
pub use trie::{NodeData, NodeUpdate, Trie, TrieNode};

/// Version of the library.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use loader::TrieBuilder;

    #[test]
    fn test_full_pipeline() {
        let tsv = "བཀྲ་ཤིས\tNOUN\t\t\t1000\nབདེ་ལེགས\tNOUN\t\t\t500\nབཀྲ་ཤིས་བདེ་ལེགས\tPHRASE\t\t\t2000";

        let mut builder = TrieBuilder::new();
        builder.load_tsv(tsv);
        let trie = builder.build();

        let tokenizer = Tokenizer::new(trie);
        let tokens = tokenizer.tokenize("བཀྲ་ཤིས་བདེ་ལེགས། བཀྲ་ཤིས།", true, false);

        assert!(!tokens.is_empty());
        // Longest match wins: the four-syllable phrase beats either half.
        assert_eq!(tokens[0].syllables_idx.len(), 4);
        assert!(tokens.iter().any(|t| t.chunk_type == ChunkKind::Punct));
    }

    #[test]
    fn test_tokenize_without_dictionary_still_syllabifies() {
        let tokenizer = Tokenizer::new(Trie::new());
        let tokens = tokenizer.tokenize("བཀྲ་ཤིས་བདེ་ལེགས།", true, false);
        // Four syllables (each NO_POS, since there's no dictionary) plus the shad.
        assert_eq!(tokens.len(), 5);
        assert!(tokens[..4].iter().all(|t| t.pos.as_deref() == Some(NO_POS)));
    }
}
