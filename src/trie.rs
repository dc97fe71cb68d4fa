//! Ordered prefix structure over syllable-string sequences, carrying
//! per-word dictionary metadata (senses, frequency, affixation hints, the
//! Sanskrit flag).

use std::collections::HashMap;

use crate::error::TokenizeError;
use crate::token::{AffixationInfo, Sense};

/// Data attached to a trie node that terminates a dictionary entry.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    pub senses: Vec<Sense>,
    pub form_freq: Option<u32>,
    pub affixation: Option<AffixationInfo>,
    pub sanskrit: Option<bool>,
    /// Loader-supplied attributes that aren't one of the well-known keys.
    pub extra: HashMap<String, String>,
}

/// The three ways `add`/`add_data` can update a node's data, mirroring the
/// `update_node_data` policy: a single sense, a batch of senses, a raw
/// frequency, or opaque extension attributes.
#[derive(Debug, Clone)]
pub enum NodeUpdate {
    Freq(u32),
    Sense(Sense),
    Senses(Vec<Sense>),
    Extra(HashMap<String, String>),
}

fn add_meaning(senses: &mut Vec<Sense>, new: Sense) -> bool {
    if senses.iter().any(|s| s.same_meaning(&new)) {
        return false;
    }
    senses.push(new);
    true
}

fn update_node_data(data: &mut NodeData, update: NodeUpdate) {
    match update {
        NodeUpdate::Freq(freq) => data.form_freq = Some(freq),
        NodeUpdate::Sense(sense) => {
            add_meaning(&mut data.senses, sense);
        }
        NodeUpdate::Senses(senses) => {
            for sense in senses {
                add_meaning(&mut data.senses, sense);
            }
        }
        NodeUpdate::Extra(attrs) => data.extra.extend(attrs),
    }
}

/// A single trie node. `leaf == true` iff the path from root to here spells
/// a complete, currently-active dictionary entry.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    pub children: HashMap<String, TrieNode>,
    pub leaf: bool,
    pub data: NodeData,
}

impl TrieNode {
    pub fn can_walk(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Dictionary trie keyed by ordered syllable sequences.
#[derive(Debug, Default, Clone)]
pub struct Trie {
    root: TrieNode,
    word_count: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.word_count
    }

    pub fn is_empty(&self) -> bool {
        self.word_count == 0
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Walk/extend the path for `word`, mark the terminal node a leaf, and
    /// merge `update` into its data.
    pub fn add(&mut self, word: &[&str], update: Option<NodeUpdate>) {
        let mut current = &mut self.root;
        for syl in word {
            current = current.children.entry((*syl).to_string()).or_default();
        }

        if !current.leaf {
            self.word_count += 1;
        }
        current.leaf = true;

        if let Some(update) = update {
            update_node_data(&mut current.data, update);
        }
    }

    /// Single-syllable transition from `from` (or the root if absent).
    pub fn walk<'a>(&'a self, syl: &str, from: Option<&'a TrieNode>) -> Option<&'a TrieNode> {
        let node = from.unwrap_or(&self.root);
        node.children.get(syl)
    }

    /// Whether `word` is a complete, active dictionary entry, and its data
    /// if so.
    pub fn has_word(&self, word: &[&str]) -> Result<(bool, Option<NodeData>), TokenizeError> {
        if word.is_empty() {
            return Err(TokenizeError::EmptyWord);
        }

        let mut current = &self.root;
        for syl in word {
            match current.children.get(*syl) {
                Some(node) => current = node,
                None => return Ok((false, None)),
            }
        }

        if current.leaf {
            Ok((true, Some(current.data.clone())))
        } else {
            Ok((false, None))
        }
    }

    /// Attach `update` to an existing terminal node. Returns `false` (not
    /// an error) when `word` isn't a currently-active entry.
    pub fn add_data(&mut self, word: &[&str], update: NodeUpdate) -> Result<bool, TokenizeError> {
        if word.is_empty() {
            return Err(TokenizeError::EmptyWord);
        }

        let mut current = &mut self.root;
        for syl in word {
            match current.children.get_mut(*syl) {
                Some(node) => current = node,
                None => return Ok(false),
            }
        }

        if !current.leaf {
            return Ok(false);
        }

        update_node_data(&mut current.data, update);
        Ok(true)
    }

    /// Toggle the terminal node's `leaf` flag without removing subtree
    /// structure. `reverse = true` reactivates a previously-deactivated
    /// entry; idempotent when called repeatedly in the same direction.
    pub fn deactivate(&mut self, word: &[&str], reverse: bool) -> Result<bool, TokenizeError> {
        if word.is_empty() {
            return Err(TokenizeError::EmptyWord);
        }

        let mut current = &mut self.root;
        for syl in word {
            match current.children.get_mut(*syl) {
                Some(node) => current = node,
                None => return Ok(false),
            }
        }

        let target = reverse;
        let changed = current.leaf != target;
        current.leaf = target;
        if changed {
            if target {
                self.word_count += 1;
            } else {
                self.word_count -= 1;
            }
        }
        Ok(changed)
    }

    /// Reset to an empty trie (root with no children, word count 0).
    pub fn clear(&mut self) {
        self.root = TrieNode::default();
        self.word_count = 0;
    }
}
