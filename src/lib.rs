//! # codesushi Library
//!
//! Rolls the text files of a directory tree into a single Markdown document.
//! Every file becomes a `## File: <relative path>` section holding a fenced
//! code block tagged with a language inferred from the file extension.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use codesushi::{Config, run_codesushi};
//! use std::path::PathBuf;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config {
//!         directory: PathBuf::from("."),
//!         ignore_file: PathBuf::from(".sushignore"),
//!         output_path: PathBuf::from("context_output.md"),
//!         header: true,
//!         extra_patterns: Vec::new(),
//!     };
//!
//!     run_codesushi(&config).await
//! }
//! ```

pub mod cli;
pub mod filewalker;
pub mod patterns;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use filewalker::{SourceFile, collect_files};
pub use patterns::IgnoreMatcher;
pub use writer::{DOCUMENT_HEADER, MarkdownWriter};

use anyhow::Result;
use log::info;

/// Builds the ignore matcher described by `config`.
///
/// Built-in patterns come first, then `extra_patterns`, then the contents of
/// the ignore file when it exists.
pub fn build_matcher(config: &Config) -> Result<IgnoreMatcher> {
    let mut matcher = IgnoreMatcher::with_patterns(config.extra_patterns.iter().cloned())?;
    matcher.load_patterns_from_file(&config.ignore_file)?;
    Ok(matcher)
}

/// Renders the full document for `config` without touching the output file.
pub fn build_document(config: &Config, matcher: &IgnoreMatcher) -> MarkdownWriter {
    let mut md_writer = MarkdownWriter::new();

    if config.header {
        md_writer.write_header();
    }

    let entries = collect_files(
        &config.directory,
        matcher,
        Some(config.output_path.as_path()),
    );
    for entry in &entries {
        md_writer.write_entry(&entry.path, &entry.rel_path);
    }

    md_writer
}

/// Generates the Markdown document and writes it to `config.output_path`.
pub async fn run_codesushi(config: &Config) -> Result<()> {
    let matcher = build_matcher(config)?;
    let md_writer = build_document(config, &matcher);

    info!(
        "Collected {} file(s) from {}",
        md_writer.entries(),
        config.directory.display()
    );

    md_writer.save(&config.output_path).await
}
