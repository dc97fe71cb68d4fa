//! Dictionary ingestion: building a [`Trie`] from TSV word lists, on disk
//! individually or as a whole dialect pack directory.
//!
//! Network fetching of dialect packs is out of scope here — only the local
//! directory layout (`<pack>/dictionary/*.tsv`) is read.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TokenizeError;
use crate::token::Sense;
use crate::trie::{NodeUpdate, Trie};

/// Name of the bundled dialect pack this crate ships no copy of; callers
/// point `resource_root` at a checkout of it instead.
pub const DEFAULT_DIALECT_PACK: &str = "general";

/// Classification/loading options threaded through the loader and, for
/// `ignore_chars`, down into [`crate::char_categories::ClassifiedText`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub ignore_chars: HashSet<char>,
    pub resource_root: Option<PathBuf>,
}

/// Incrementally builds a [`Trie`] from one or more TSV sources.
#[derive(Debug, Default)]
pub struct TrieBuilder {
    trie: Trie,
}

impl TrieBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse TSV text (`form\tpos\tlemma\tsense\tfreq`, one entry per line,
    /// blank lines and `#`-prefixed comments skipped) and merge it into the
    /// trie being built. Malformed fields within an otherwise-parseable
    /// line are dropped rather than failing the whole load, matching how a
    /// hand-curated dictionary file accumulates typos over time.
    pub fn load_tsv(&mut self, tsv_content: &str) {
        for line in tsv_content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut fields = line.split('\t');
            let Some(form) = fields.next() else { continue };
            let syls: Vec<&str> = form.split('་').filter(|s| !s.is_empty()).collect();
            if syls.is_empty() {
                continue;
            }

            let non_empty = |s: &str| if s.is_empty() { None } else { Some(s.to_string()) };
            let pos = fields.next().and_then(non_empty);
            let lemma = fields.next().and_then(non_empty);
            let sense_label = fields.next().and_then(non_empty);
            let freq = fields.next().and_then(|s| s.trim().parse::<u32>().ok());

            let sense = Sense {
                pos,
                lemma,
                freq,
                sense_label,
                affixed: None,
            };
            self.trie.add(&syls, Some(NodeUpdate::Sense(sense)));
            if let Some(freq) = freq {
                let _ = self.trie.add_data(&syls, NodeUpdate::Freq(freq));
            }
        }
    }

    /// Read and load a single TSV file from disk.
    pub fn load_tsv_file(&mut self, path: &Path) -> Result<(), TokenizeError> {
        let content = fs::read_to_string(path)?;
        self.load_tsv(&content);
        Ok(())
    }

    /// Load every `dictionary/**/*.tsv` file under a dialect pack's root
    /// directory. Returns the number of files loaded.
    pub fn load_dialect_pack(&mut self, pack_root: &Path) -> Result<usize, TokenizeError> {
        let files = list_dictionary_files(pack_root)?;
        let count = files.len();
        for file in files {
            self.load_tsv_file(&file)?;
        }
        Ok(count)
    }

    pub fn build(self) -> Trie {
        self.trie
    }
}

/// List every `.tsv` file under `<dialect_pack_path>/dictionary`, recursing
/// into subdirectories.
pub fn list_dictionary_files(dialect_pack_path: &Path) -> Result<Vec<PathBuf>, TokenizeError> {
    collect_tsv_files(&dialect_pack_path.join("dictionary"))
}

/// List every `.tsv` file under `<dialect_pack_path>/adjustments`. Reading
/// these is not implemented here — the adjustments overlay (dagdra merging
/// and similar) sits outside this crate's scope — but enumerating the files
/// is still useful for a caller that wants to report what's available.
pub fn list_adjustment_files(dialect_pack_path: &Path) -> Result<Vec<PathBuf>, TokenizeError> {
    collect_tsv_files(&dialect_pack_path.join("adjustments"))
}

fn collect_tsv_files(dir: &Path) -> Result<Vec<PathBuf>, TokenizeError> {
    let mut files = Vec::new();
    collect_tsv_files_into(dir, &mut files)?;
    Ok(files)
}

fn collect_tsv_files_into(dir: &Path, files: &mut Vec<PathBuf>) -> Result<(), TokenizeError> {
    if !dir.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            collect_tsv_files_into(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "tsv") {
            files.push(path);
        }
    }
    Ok(())
}

/// Whether a dialect pack directory exists and has a `dictionary` subdir.
pub fn dialect_pack_exists(path: &Path) -> bool {
    path.is_dir() && path.join("dictionary").is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_tsv_basic() {
        let mut builder = TrieBuilder::new();
        builder.load_tsv("བཀྲ་ཤིས\tNOUN\t\t\t1000\nབདེ་ལེགས\tNOUN\t\t\t500");
        let trie = builder.build();

        assert_eq!(trie.len(), 2);
        let (found, data) = trie.has_word(&["བཀྲ", "ཤིས"]).unwrap();
        assert!(found);
        assert_eq!(data.unwrap().form_freq, Some(1000));
    }

    #[test]
    fn test_load_tsv_skips_comments_and_blank_lines() {
        let mut builder = TrieBuilder::new();
        builder.load_tsv("# a comment\n\nཀ\tPART\n");
        let trie = builder.build();
        assert_eq!(trie.len(), 1);
    }

    #[test]
    fn test_load_tsv_merges_duplicate_entries() {
        let mut builder = TrieBuilder::new();
        builder.load_tsv("ཀ\tPART\nཀ\tNOUN\n");
        let trie = builder.build();

        let (_, data) = trie.has_word(&["ཀ"]).unwrap();
        assert_eq!(data.unwrap().senses.len(), 2);
    }

    #[test]
    fn test_load_tsv_file_missing_errors() {
        let mut builder = TrieBuilder::new();
        let err = builder.load_tsv_file(Path::new("/nonexistent/path.tsv"));
        assert!(matches!(err, Err(TokenizeError::Io(_))));
    }

    #[test]
    fn test_dialect_pack_exists_false_for_missing_dir() {
        assert!(!dialect_pack_exists(Path::new("/nonexistent/pack")));
    }

    #[test]
    fn test_list_dictionary_files_empty_when_absent() {
        let files = list_dictionary_files(Path::new("/nonexistent/pack")).unwrap();
        assert!(files.is_empty());
    }
}
