//! Reference building for answers

use std::collections::HashSet;

use crate::providers::vector_store::VectorSearchResult;
use crate::types::response::Reference;

/// Preview length in characters before truncation
pub const PREVIEW_CHARS: usize = 200;

/// Build one reference per distinct filename, keeping retrieval order
///
/// The first chunk seen for a filename decides its page and preview.
pub fn build_references(results: &[VectorSearchResult]) -> Vec<Reference> {
    let mut seen = HashSet::new();
    let mut references = Vec::new();

    for result in results {
        let metadata = &result.chunk.metadata;
        let source = if metadata.source.is_empty() {
            "unknown".to_string()
        } else {
            metadata.source.clone()
        };
        let filename = if metadata.filename.is_empty() {
            crate::types::document::basename(std::path::Path::new(&source))
        } else {
            metadata.filename.clone()
        };

        if !seen.insert(filename.clone()) {
            continue;
        }

        references.push(Reference {
            id: filename.clone(),
            filename,
            source,
            page: metadata.page.unwrap_or(0),
            preview: truncate_preview(&result.chunk.content),
        });
    }

    references
}

/// First 200 characters of `text` followed by `...`, or `text` itself when short enough
pub fn truncate_preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Chunk, ChunkMetadata};

    fn result(filename: &str, page: Option<u32>, content: &str) -> VectorSearchResult {
        VectorSearchResult {
            chunk: Chunk::new(
                content,
                ChunkMetadata {
                    filename: filename.to_string(),
                    source: format!("src/documents/{}", filename),
                    page,
                },
            ),
            score: 0.5,
        }
    }

    #[test]
    fn test_dedupes_by_filename_in_order() {
        let refs = build_references(&[
            result("a.pdf", Some(3), "third page"),
            result("b.txt", None, "plain"),
            result("a.pdf", Some(0), "first page"),
        ]);

        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].id, "a.pdf");
        assert_eq!(refs[0].page, 3);
        assert_eq!(refs[0].preview, "third page");
        assert_eq!(refs[0].source, "src/documents/a.pdf");
        assert_eq!(refs[1].filename, "b.txt");
        assert_eq!(refs[1].page, 0);
    }

    #[test]
    fn test_truncate_preview() {
        let exact = "x".repeat(200);
        assert_eq!(truncate_preview(&exact), exact);

        let long = "é".repeat(250);
        let preview = truncate_preview(&long);
        assert_eq!(preview.chars().count(), 203);
        assert!(preview.ends_with("..."));
    }
}
