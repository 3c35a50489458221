use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

/// Tag used for unknown extensions and for error blocks.
pub const FALLBACK_TAG: &str = "plaintext";

static LANGUAGE_TAGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Programming languages
        ("py", "python"),
        ("js", "javascript"),
        ("ts", "typescript"),
        ("jsx", "jsx"),
        ("tsx", "tsx"),
        ("html", "html"),
        ("css", "css"),
        ("scss", "scss"),
        ("sql", "sql"),
        ("java", "java"),
        ("cpp", "cpp"),
        ("c", "c"),
        ("cs", "csharp"),
        ("go", "go"),
        ("rs", "rust"),
        ("rb", "ruby"),
        ("php", "php"),
        ("swift", "swift"),
        ("kt", "kotlin"),
        ("r", "r"),
        ("sh", "bash"),
        ("bat", "batch"),
        ("ps1", "powershell"),
        // Config & data
        ("json", "json"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
        ("xml", "xml"),
        ("toml", "toml"),
        ("ini", "ini"),
        ("env", "plaintext"),
        // Documentation
        ("md", "markdown"),
        ("tex", "latex"),
        ("rst", "rst"),
        ("", FALLBACK_TAG),
    ])
});

/// Returns the code fence language tag for `path`, based on its extension.
///
/// Extensions are compared case-insensitively. Files without an extension
/// (including dotfiles such as `.env`) and unknown extensions get
/// [`FALLBACK_TAG`].
pub fn get_language_tag(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(OsStr::to_str)
        .unwrap_or("")
        .to_lowercase();

    LANGUAGE_TAGS.get(ext.as_str()).copied().unwrap_or(FALLBACK_TAG)
}
