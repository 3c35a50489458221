use crate::utils::{FALLBACK_TAG, get_language_tag};
use anyhow::{Context, Result};
use log::{debug, warn};
use memmap2::MmapOptions;
use std::fs::File as StdFile;
use std::io::{self, Read};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

/// Introductory block placed at the top of the document unless disabled.
pub const DOCUMENT_HEADER: &str = "# Directory Context\n\n\
This document contains the contents of the processed directory structure.\n\
Each file is presented with its relative path and contents in a code block\n\
with appropriate syntax highlighting based on the file type.\n\n\
---\n\n";

/// Accumulates the rendered document in memory and writes it out in one go.
#[derive(Debug, Default)]
pub struct MarkdownWriter {
    buffer: String,
    entries: usize,
}

impl MarkdownWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_header(&mut self) {
        self.buffer.push_str(DOCUMENT_HEADER);
    }

    /// Appends the section for one file.
    pub fn write_entry(&mut self, path: &Path, rel_path: &str) {
        debug!("Writing file: {rel_path}");
        self.buffer.push_str(&render_file(path, rel_path));
        self.entries += 1;
    }

    /// Number of file sections written so far.
    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Creates (or truncates) `output_path` and writes the whole document.
    pub async fn save(&self, output_path: &Path) -> Result<()> {
        let mut file = File::create(output_path)
            .await
            .with_context(|| format!("Failed to create {}", output_path.display()))?;

        file.write_all(self.buffer.as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        file.flush().await.context("Failed to flush output")
    }
}

/// Renders one file as a `## File:` heading followed by a fenced code block.
///
/// Read failures are rendered into the block instead of being returned.
pub fn render_file(path: &Path, rel_path: &str) -> String {
    match read_text(path) {
        Ok(content) => render_block(rel_path, get_language_tag(path), content.trim()),
        Err(err) => {
            warn!("Failed to read {rel_path}: {err}");
            render_block(
                rel_path,
                FALLBACK_TAG,
                &format!("Error reading file: {err}"),
            )
        }
    }
}

fn render_block(rel_path: &str, lang: &str, body: &str) -> String {
    format!("## File: {rel_path}\n\n```{lang}\n{body}\n```\n\n")
}

/// Files at least this large are memory-mapped instead of read into a buffer.
const MMAP_THRESHOLD: u64 = 1 << 20;

/// Reads a file as text, dropping byte sequences that are not valid UTF-8.
///
/// Line endings are normalised to `\n`.
pub fn read_text(path: &Path) -> io::Result<String> {
    let mut file = StdFile::open(path)?;
    let len = file.metadata()?.len();

    if len < MMAP_THRESHOLD {
        let mut bytes = Vec::with_capacity(len as usize);
        file.read_to_end(&mut bytes)?;
        if bytes.is_empty() {
            debug!("File '{}' is empty", path.display());
        }
        return Ok(normalize_newlines(&decode_lossy(&bytes)));
    }

    // SAFETY: the mapping is only read here and copied out before it is
    // dropped. Truncation by another process during this copy can still fault.
    let mmap = unsafe { MmapOptions::new().map(&file)? };
    debug!("Mapped {} bytes of '{}'", mmap.len(), path.display());

    Ok(normalize_newlines(&decode_lossy(&mmap)))
}

fn decode_lossy(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_owned()
    }
}
