//! Recursive character text splitting
//!
//! Text is split on the first separator from `["\n\n", "\n", " ", ""]` that
//! occurs in it; pieces that are still too long are split again with the
//! remaining separators. Small pieces are then merged back into chunks of at
//! most `chunk_size` characters, carrying up to `chunk_overlap` characters of
//! trailing context into the next chunk.

use std::collections::VecDeque;

use crate::config::ChunkingConfig;
use crate::types::{Chunk, RawDocument};

/// Separators tried in order; the empty string splits into characters
pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Length measure used for every size comparison
fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Splitter with configurable size and overlap, both counted in characters
#[derive(Debug, Clone)]
pub struct RecursiveTextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveTextSplitter {
    /// Create a new splitter with the default separators
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a splitter from configuration
    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.chunk_size, config.chunk_overlap)
    }

    /// Split every document, each chunk inheriting its document's metadata
    pub fn split_documents(&self, documents: &[RawDocument]) -> Vec<Chunk> {
        documents
            .iter()
            .flat_map(|doc| {
                self.split_text(&doc.content)
                    .into_iter()
                    .map(move |text| Chunk::new(text, doc.metadata.clone()))
            })
            .collect()
    }

    /// Split text into trimmed, non-empty chunks
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let mut final_chunks = Vec::new();

        // Pick the first separator present; "" always matches and ends the list
        let mut separator = separators.last().map(String::as_str).unwrap_or("");
        let mut remaining: &[String] = &[];
        for (i, candidate) in separators.iter().enumerate() {
            if candidate.is_empty() {
                separator = "";
                break;
            }
            if text.contains(candidate.as_str()) {
                separator = candidate.as_str();
                remaining = &separators[i + 1..];
                break;
            }
        }

        let mut good_splits: Vec<&str> = Vec::new();
        for piece in split_keeping_separator(text, separator) {
            if char_len(piece) < self.chunk_size {
                good_splits.push(piece);
                continue;
            }

            if !good_splits.is_empty() {
                final_chunks.extend(self.merge_splits(&good_splits));
                good_splits.clear();
            }
            if remaining.is_empty() {
                final_chunks.push(piece.to_string());
            } else {
                final_chunks.extend(self.split_recursive(piece, remaining));
            }
        }

        if !good_splits.is_empty() {
            final_chunks.extend(self.merge_splits(&good_splits));
        }

        final_chunks
    }

    /// Merge small pieces into chunks, keeping an overlapping tail
    fn merge_splits(&self, splits: &[&str]) -> Vec<String> {
        let mut docs = Vec::new();
        let mut current: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in splits {
            let len = char_len(piece);

            if total + len > self.chunk_size {
                if total > self.chunk_size {
                    tracing::warn!(
                        "Created a chunk of size {}, which is longer than the specified {}",
                        total,
                        self.chunk_size
                    );
                }
                if !current.is_empty() {
                    if let Some(doc) = join_pieces(&current) {
                        docs.push(doc);
                    }
                    while total > self.chunk_overlap
                        || (total + len > self.chunk_size && total > 0)
                    {
                        match current.pop_front() {
                            Some(front) => total -= char_len(front),
                            None => break,
                        }
                    }
                }
            }

            current.push_back(piece);
            total += len;
        }

        if let Some(doc) = join_pieces(&current) {
            docs.push(doc);
        }
        docs
    }
}

impl Default for RecursiveTextSplitter {
    fn default() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }
}

/// Split `text` at every occurrence of `separator`, which stays at the start
/// of the following piece. Empty pieces are dropped.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    if separator.is_empty() {
        return text
            .char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator) {
        if idx > start {
            pieces.push(&text[start..idx]);
        }
        start = idx;
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_pieces(pieces: &VecDeque<&str>) -> Option<String> {
    let joined: String = pieces.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkMetadata;
    use std::path::Path;

    #[test]
    fn test_short_text_is_single_chunk() {
        let splitter = RecursiveTextSplitter::default();
        let chunks = splitter.split_text("Refunds take 5 business days.");
        assert_eq!(chunks, vec!["Refunds take 5 business days."]);
    }

    #[test]
    fn test_empty_and_whitespace_text() {
        let splitter = RecursiveTextSplitter::default();
        assert!(splitter.split_text("").is_empty());
        assert!(splitter.split_text(" \n\n \n").is_empty());
    }

    #[test]
    fn test_long_unbroken_text_overlaps() {
        let text: String = (0..1500).map(|i| char::from(b'a' + (i % 26) as u8)).collect();
        let splitter = RecursiveTextSplitter::default();
        let chunks = splitter.split_text(&text);

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].chars().count(), 1000);
        assert_eq!(chunks[0], text[..1000]);
        assert_eq!(chunks[1], text[800..]);

        let tail: String = chunks[0].chars().skip(800).collect();
        assert!(chunks[1].starts_with(&tail));
    }

    #[test]
    fn test_prefers_paragraph_breaks() {
        let para_a = "a".repeat(600);
        let para_b = "b".repeat(600);
        let text = format!("{}\n\n{}", para_a, para_b);

        let chunks = RecursiveTextSplitter::default().split_text(&text);
        assert_eq!(chunks, vec![para_a, para_b]);
    }

    #[test]
    fn test_words_respect_limit_with_overlap() {
        let text = "word ".repeat(500);
        let splitter = RecursiveTextSplitter::new(100, 20);
        let chunks = splitter.split_text(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 100);
            assert!(chunk.starts_with("word"));
        }
    }

    #[test]
    fn test_split_keeping_separator() {
        assert_eq!(
            split_keeping_separator("a\n\nb\n\nc", "\n\n"),
            vec!["a", "\n\nb", "\n\nc"]
        );
        assert_eq!(split_keeping_separator("\n\nx", "\n\n"), vec!["\n\nx"]);
        assert_eq!(split_keeping_separator("héllo", ""), vec!["h", "é", "l", "l", "o"]);
    }

    #[test]
    fn test_split_documents_inherits_metadata() {
        let doc = RawDocument {
            content: "x".repeat(1500),
            metadata: ChunkMetadata::for_path(Path::new("docs/faq.pdf"), Some(1)),
        };
        let chunks = RecursiveTextSplitter::default().split_documents(&[doc]);

        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.metadata.filename == "faq.pdf"));
        assert!(chunks.iter().all(|c| c.metadata.page == Some(1)));
        assert_ne!(chunks[0].id, chunks[1].id);
    }
}
