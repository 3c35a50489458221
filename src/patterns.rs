//! Shell-glob ignore patterns.
//!
//! Patterns are matched against the whole `/`-separated path relative to the
//! scanned root. `*` and `?` are allowed to cross `/`, so `*.log` also hides
//! `logs/debug.log`, while `node_modules/*` only hides a top-level
//! `node_modules` directory. There is no gitignore-style anchoring.
//!
//! Pattern syntax is plain shell glob: `*`, `?` and `[...]` are special,
//! everything else is literal. Braces do not alternate, `\` does not escape,
//! `**` is just `*`, and an unclosed `[` matches itself.

use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use log::{debug, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Patterns every matcher starts with.
pub const DEFAULT_IGNORES: &[&str] = &[
    // Compiled / cache artifacts
    "*.pyc",
    "__pycache__/*",
    // Version control and OS metadata
    ".git/*",
    ".DS_Store",
    // Logs, temp and swap files
    "*.log",
    "*.tmp",
    "*.swp",
    "*.swo",
    // Dependencies
    "node_modules/*",
    // Binaries
    "*.exe",
    "*.dll",
    "*.so",
    "*.dylib",
    // Archives
    "*.zip",
    "*.tar",
    "*.gz",
    "*.rar",
    // Images
    "*.jpg",
    "*.jpeg",
    "*.png",
    "*.gif",
    "*.ico",
    // Documents
    "*.pdf",
    "*.doc",
    "*.docx",
    // Environment files
    ".env",
    ".env.*",
    // IDE files
    ".vscode/*",
    ".idea/*",
];

/// Decides whether a relative path is left out of the document.
#[derive(Debug, Clone)]
pub struct IgnoreMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl IgnoreMatcher {
    /// Creates a matcher holding only [`DEFAULT_IGNORES`].
    pub fn new() -> Result<Self> {
        Self::with_patterns(std::iter::empty::<String>())
    }

    /// Creates a matcher holding [`DEFAULT_IGNORES`] followed by `extra`.
    pub fn with_patterns<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let patterns: Vec<String> = DEFAULT_IGNORES
            .iter()
            .map(|p| p.to_string())
            .chain(extra.into_iter().map(Into::into))
            .collect();

        let mut matcher = Self {
            patterns: Vec::new(),
            set: GlobSet::empty(),
        };
        matcher.extend(patterns)?;
        Ok(matcher)
    }

    /// All accepted patterns, built-ins first.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Appends patterns and recompiles the matcher.
    ///
    /// A pattern globset still rejects (a reversed range such as `[z-a]`)
    /// could never match anything, so it is dropped with a warning.
    pub fn extend<I, S>(&mut self, patterns: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            let pattern = pattern.into();
            match compile_glob(&pattern) {
                Ok(_) => self.patterns.push(pattern),
                Err(err) => warn!("Skipping invalid ignore pattern '{pattern}': {err}"),
            }
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in &self.patterns {
            builder.add(compile_glob(pattern)?);
        }
        self.set = builder.build().context("Failed to compile ignore patterns")?;
        Ok(())
    }

    /// Reads newline-delimited patterns from `path` and appends them.
    ///
    /// Lines starting with `#` are comments; remaining lines are trimmed and
    /// blank ones skipped. A missing file only logs a warning. Returns the
    /// number of patterns read.
    pub fn load_patterns_from_file(&mut self, path: &Path) -> Result<usize> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("Ignore file {} not found.", path.display());
                return Ok(0);
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read ignore file {}", path.display()));
            }
        };

        let patterns = parse_ignore_file(&content);
        let count = patterns.len();
        debug!("Loaded {count} ignore pattern(s) from {}", path.display());
        self.extend(patterns)?;
        Ok(count)
    }

    /// Returns true when `relative_path` matches any pattern.
    pub fn should_ignore(&self, relative_path: &str) -> bool {
        self.set.is_match(normalize_separators(relative_path))
    }
}

fn compile_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(&shell_to_globset(pattern))
        .backslash_escape(false)
        .allow_unclosed_class(true)
        .build()
}

/// Rewrites a shell glob into globset syntax with the same meaning.
fn shell_to_globset(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 8);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                while chars.get(i + 1) == Some(&'*') {
                    i += 1;
                }
                out.push('*');
            }
            '{' => out.push_str("[{]"),
            '}' => out.push_str("[}]"),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i + 1..end]);
                    i = end;
                }
                // Unclosed: a literal `[`, spelled as a class so escaped
                // braces later on cannot close it.
                None => out.push_str("[[]"),
            },
            c => out.push(c),
        }
        i += 1;
    }

    out
}

/// Index of the `]` closing the class opened at `start`, if any.
///
/// A `]` right after `[` or `[!` belongs to the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    let offset = chars.get(j..)?.iter().position(|&c| c == ']')?;
    Some(j + offset)
}

/// Emits a class body. Only `!` negates; a leading `^` is a literal caret,
/// which globset would read as negation, so it is moved out of first place.
fn push_class(out: &mut String, body: &[char]) {
    let (negated, members) = match body.split_first() {
        Some((&'!', rest)) => (true, rest),
        _ => (false, body),
    };

    let members: Vec<char> = match members.split_first() {
        Some((&'^', rest)) if !negated => {
            if rest.is_empty() {
                out.push('^');
                return;
            }
            match rest.split_last() {
                // Keep `-` literal by leading with it instead of ending `x-^`.
                Some((&'-', init)) => std::iter::once('-')
                    .chain(init.iter().copied())
                    .chain(std::iter::once('^'))
                    .collect(),
                _ => rest.iter().copied().chain(std::iter::once('^')).collect(),
            }
        }
        _ => members.to_vec(),
    };

    out.push('[');
    if negated {
        out.push('!');
    }
    out.extend(members);
    out.push(']');
}

fn parse_ignore_file(content: &str) -> Vec<String> {
    content
        .lines()
        .filter(|line| !line.starts_with('#'))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Rewrites Windows separators to `/`.
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_hide_common_artifacts() {
        let matcher = IgnoreMatcher::new().unwrap();

        for path in [
            "module.pyc",
            "pkg/module.pyc",
            "__pycache__/module.cpython-312.pyc",
            ".git/HEAD",
            ".git/objects/ab/cdef",
            ".DS_Store",
            "debug.log",
            "logs/server.log",
            "node_modules/left-pad/index.js",
            "lib/native.so",
            "release.tar",
            "assets/logo.png",
            "docs/manual.pdf",
            ".env",
            ".env.local",
            ".vscode/settings.json",
            ".idea/workspace.xml",
        ] {
            assert!(matcher.should_ignore(path), "{path} should be ignored");
        }
    }

    #[test]
    fn defaults_keep_source_files() {
        let matcher = IgnoreMatcher::new().unwrap();

        for path in ["main.py", "src/lib.rs", "README.md", "env.txt", ".gitignore"] {
            assert!(!matcher.should_ignore(path), "{path} should be kept");
        }
    }

    #[test]
    fn slash_patterns_are_not_recursive() {
        let matcher = IgnoreMatcher::new().unwrap();

        // Only the top-level directory is covered by `node_modules/*`.
        assert!(matcher.should_ignore("node_modules/a.js"));
        assert!(!matcher.should_ignore("web/node_modules/a.js"));
        // Literal names only match at the root.
        assert!(!matcher.should_ignore("config/.env"));
    }

    #[test]
    fn normalizes_backslashes() {
        let matcher = IgnoreMatcher::with_patterns(["build/*"]).unwrap();

        assert!(matcher.should_ignore("build\\out.txt"));
        assert!(matcher.should_ignore(".git\\config"));
    }

    #[test]
    fn user_patterns_extend_defaults() {
        let matcher = IgnoreMatcher::with_patterns(["secret.txt", "target/*"]).unwrap();

        assert!(matcher.should_ignore("secret.txt"));
        assert!(matcher.should_ignore("target/debug/app"));
        assert!(matcher.should_ignore("debug.log"));
        assert!(!matcher.should_ignore("public.txt"));
        assert_eq!(matcher.patterns().len(), DEFAULT_IGNORES.len() + 2);
    }

    #[test]
    fn invalid_patterns_are_skipped() {
        let matcher = IgnoreMatcher::with_patterns(["[z-a]", "*.bak"]).unwrap();

        assert!(matcher.should_ignore("old.bak"));
        assert!(!matcher.patterns().iter().any(|p| p == "[z-a]"));
    }

    #[test]
    fn shell_glob_metacharacters_stay_literal() {
        let matcher = IgnoreMatcher::with_patterns(["a{b}.txt", "[draft", "x\\*y"]).unwrap();

        // Braces do not alternate.
        assert!(matcher.should_ignore("a{b}.txt"));
        assert!(!matcher.should_ignore("ab.txt"));
        // An unclosed class is a literal bracket.
        assert!(matcher.should_ignore("[draft"));
        // Backslash is not an escape, so `*` keeps its wildcard meaning.
        assert!(!matcher.should_ignore("x*y"));
        assert!(matcher.patterns().iter().any(|p| p == "[draft"));
        assert_eq!(matcher.patterns().len(), DEFAULT_IGNORES.len() + 3);
    }

    #[test]
    fn classes_follow_shell_rules() {
        let matcher =
            IgnoreMatcher::with_patterns(["[^a]bc", "[!x]yz", "[]]q", "n[^a-]m"]).unwrap();

        assert!(matcher.should_ignore("^bc"));
        assert!(matcher.should_ignore("abc"));
        assert!(!matcher.should_ignore("zbc"));
        assert!(matcher.should_ignore("ayz"));
        assert!(!matcher.should_ignore("xyz"));
        assert!(matcher.should_ignore("]q"));
        assert!(matcher.should_ignore("n-m"));
        assert!(matcher.should_ignore("n^m"));
        assert!(!matcher.should_ignore("nbm"));
    }

    #[test]
    fn double_star_is_a_single_star() {
        let matcher = IgnoreMatcher::with_patterns(["a/**/b"]).unwrap();

        assert!(matcher.should_ignore("a/x/b"));
        assert!(matcher.should_ignore("a/x/y/b"));
        assert!(!matcher.should_ignore("a/b"));
    }

    #[test]
    fn translates_to_globset_syntax() {
        assert_eq!(shell_to_globset("a{b,c}"), "a[{]b,c[}]");
        assert_eq!(shell_to_globset("[{}]x"), "[{}]x");
        assert_eq!(shell_to_globset("***.log"), "*.log");
        assert_eq!(shell_to_globset("[^a-z]"), "[a-z^]");
        assert_eq!(shell_to_globset("[^]"), "^");
        assert_eq!(shell_to_globset("[oops"), "[[]oops");
        assert_eq!(shell_to_globset("[a{"), "[[]a[{]");
    }

    #[test]
    fn loads_patterns_from_file() {
        let dir = tempdir().unwrap();
        let ignore_path = dir.path().join(".sushignore");
        fs::write(
            &ignore_path,
            "# build output\n\n  dist/*  \n*.bak\n   \n#*.rs\n",
        )
        .unwrap();

        let mut matcher = IgnoreMatcher::new().unwrap();
        let loaded = matcher.load_patterns_from_file(&ignore_path).unwrap();

        assert_eq!(loaded, 2);
        assert!(matcher.should_ignore("dist/bundle.js"));
        assert!(matcher.should_ignore("notes.bak"));
        assert!(!matcher.should_ignore("main.rs"));
    }

    #[test]
    fn missing_ignore_file_leaves_patterns_unchanged() {
        let dir = tempdir().unwrap();
        let mut matcher = IgnoreMatcher::new().unwrap();

        let loaded = matcher
            .load_patterns_from_file(&dir.path().join("absent"))
            .unwrap();

        assert_eq!(loaded, 0);
        assert_eq!(matcher.patterns().len(), DEFAULT_IGNORES.len());
    }

    #[test]
    fn comment_marker_must_start_the_line() {
        let patterns = parse_ignore_file("#skip\n  #kept\nplain\n");
        assert_eq!(patterns, vec!["#kept".to_string(), "plain".to_string()]);
    }
}
