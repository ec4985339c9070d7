//! Document loading for text and PDF files

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{ChunkMetadata, FileType, RawDocument};

/// Loads files into raw documents: one per text file, one per PDF page
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load a single file
    ///
    /// Missing paths and unrecognised extensions are load errors.
    pub async fn load_file(path: &Path) -> Result<Vec<RawDocument>> {
        let display = path.to_string_lossy().to_string();

        if FileType::from_path(path).is_none() {
            return Err(Error::load(
                &display,
                Error::UnsupportedFileType(extension_of(path)).to_string(),
            ));
        }

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| Error::load(&display, e.to_string()))?;

        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::parse(&owned, &data))
            .await
            .map_err(|e| Error::internal(format!("loader task failed: {}", e)))?
    }

    /// Load every supported regular file directly inside `dir`, sorted by name
    ///
    /// Unsupported files are skipped with a warning; any supported file that
    /// fails to load fails the whole call.
    pub async fn load_directory(dir: &Path) -> Result<Vec<RawDocument>> {
        let display = dir.to_string_lossy().to_string();
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| Error::load(&display, e.to_string()))?;

        let mut files: Vec<PathBuf> = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();

        let mut documents = Vec::new();
        for path in files {
            if FileType::from_path(&path).is_none() {
                tracing::warn!("Skipping unsupported file {}", path.display());
                continue;
            }
            let loaded = Self::load_file(&path).await?;
            tracing::debug!("Loaded {} document(s) from {}", loaded.len(), path.display());
            documents.extend(loaded);
        }

        Ok(documents)
    }

    /// Parse file contents according to the path's extension
    pub fn parse(path: &Path, data: &[u8]) -> Result<Vec<RawDocument>> {
        match FileType::from_path(path) {
            Some(FileType::Pdf) => Self::parse_pdf(path, data),
            Some(FileType::Text) => Self::parse_text(path, data),
            None => Err(Error::UnsupportedFileType(extension_of(path))),
        }
    }

    /// Decode a text file as UTF-8
    fn parse_text(path: &Path, data: &[u8]) -> Result<Vec<RawDocument>> {
        let content = std::str::from_utf8(data).map_err(|e| {
            Error::load(path.to_string_lossy(), format!("invalid UTF-8: {}", e))
        })?;

        Ok(vec![RawDocument {
            content: content.to_string(),
            metadata: ChunkMetadata::for_path(path, None),
        }])
    }

    /// Extract text page by page; pages are numbered from zero
    fn parse_pdf(path: &Path, data: &[u8]) -> Result<Vec<RawDocument>> {
        let doc = lopdf::Document::load_mem(data).map_err(|e| {
            Error::load(path.to_string_lossy(), format!("Failed to load PDF: {}", e))
        })?;

        let mut documents = Vec::new();
        for page_num in doc.get_pages().keys().copied() {
            let text = match doc.extract_text(&[page_num]) {
                Ok(text) => text.replace('\0', ""),
                Err(e) => {
                    tracing::warn!(
                        "Could not extract text from page {} of {}: {}",
                        page_num,
                        path.display(),
                        e
                    );
                    String::new()
                }
            };

            documents.push(RawDocument {
                content: text,
                metadata: ChunkMetadata::for_path(path, Some(page_num.saturating_sub(1))),
            });
        }

        Ok(documents)
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}
