use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static BLOCK_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*import\s*\(\s*$").expect("valid block start regex"));

static BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\)\s*$").expect("valid block end regex"));

// optional alias (identifier, `_` or `.`), a quoted path, anything after it
static ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?:[\p{L}_][\p{L}_\p{N}]*|\.)?\s*"[^"]*".*$"#).expect("valid entry regex")
});

static PATH_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("valid path literal regex"));

// host label, last `.label` of the host, first path segment
static EXTERNAL_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([a-zA-Z0-9_][a-zA-Z0-9_-]{0,62})(\.[a-zA-Z0-9_][a-zA-Z0-9_-]{0,62})*[._]?/([\p{L}_\-\p{N}]*)/?.*$",
    )
    .expect("valid external path regex")
});

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(//.*)|(/\*.*?\*/)").expect("valid comment regex"));

static GENERATED_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^// Code generated .* DO NOT EDIT\.\s*$").expect("valid generated marker regex")
});

/// The closed set of kinds a single source line can be classified as.
///
/// The regular expressions behind the classification are private to this
/// module; everything else in the crate works with `LineKind` only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `import (` with nothing else on the line.
    BlockStart,
    /// A lone `)` closing an import block.
    BlockEnd,
    /// A single import: optional alias, quoted path, optional trailing text.
    Entry,
    /// Anything else. Copied through outside a block, attachable inside one.
    Opaque,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineKind::BlockStart => write!(f, "block-start"),
            LineKind::BlockEnd => write!(f, "block-end"),
            LineKind::Entry => write!(f, "entry"),
            LineKind::Opaque => write!(f, "opaque"),
        }
    }
}

/// Classifies one line of text.
///
/// Block delimiters take precedence over entries, so a line is only reported
/// as `Entry` when it is neither `import (` nor `)`. Whether an `Entry` is
/// meaningful depends on the caller being inside a block; outside a block the
/// scanner only looks for `BlockStart`.
pub fn classify_line(line: &str) -> LineKind {
    if BLOCK_START.is_match(line) {
        LineKind::BlockStart
    } else if BLOCK_END.is_match(line) {
        LineKind::BlockEnd
    } else if ENTRY.is_match(line) {
        LineKind::Entry
    } else {
        LineKind::Opaque
    }
}

/// Returns true if the line is empty or whitespace only.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Returns true if `line` is the `// Code generated ... DO NOT EDIT.` marker.
pub fn is_generated_marker(line: &str) -> bool {
    GENERATED_MARKER.is_match(line)
}

/// Returns the contents of the first quoted literal on an entry line.
pub fn path_literal(entry: &str) -> Option<&str> {
    PATH_LITERAL
        .captures(entry)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Derives the group key of an entry, or `None` for the standard subset.
///
/// An entry is external when its path literal starts with a domain-like
/// element (one containing a `.`) followed by at least one more segment.
/// The key is the host's first label, the host's last `.label` and the first
/// path segment concatenated, so `"github.com/hashicorp/vault/api"` yields
/// `github.comhashicorp`. The same path always yields the same key.
///
/// # Arguments
/// * `entry`: The entry line, alias and trailing comment included.
///
/// # Returns
/// `Some(key)` for external entries, `None` otherwise.
pub fn group_key(entry: &str) -> Option<String> {
    let path = path_literal(entry)?;
    let root = path.split('/').next().unwrap_or_default();
    if !root.contains('.') {
        return None;
    }

    let caps = EXTERNAL_PATH.captures(path)?;
    let key: String = caps
        .iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .collect();
    Some(key)
}

/// Builds the text an entry is ordered by.
///
/// Comments are removed and a leading alias is dropped, so `foo "b/c"` and
/// `"b/c" // note` both compare as `"b/c"`.
pub fn sort_key(entry: &str) -> String {
    let trimmed = entry.trim();
    let without_comments = COMMENT.replace_all(trimmed, "");
    let text = without_comments.trim();

    if text.starts_with('"') {
        return text.to_string();
    }
    match text.split_once(char::is_whitespace) {
        Some((_alias, rest)) => rest.trim().to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_delimiters() {
        assert_eq!(classify_line("import ("), LineKind::BlockStart);
        assert_eq!(classify_line("  import(  "), LineKind::BlockStart);
        assert_eq!(classify_line(")"), LineKind::BlockEnd);
        assert_eq!(classify_line("\t) "), LineKind::BlockEnd);
        assert_eq!(classify_line("import ( // stdlib"), LineKind::Opaque);
    }

    #[test]
    fn test_classify_entries() {
        assert_eq!(classify_line("\t\"fmt\""), LineKind::Entry);
        assert_eq!(classify_line("\tlog \"github.com/sirupsen/logrus\""), LineKind::Entry);
        assert_eq!(classify_line("\t_ \"github.com/lib/pq\""), LineKind::Entry);
        assert_eq!(classify_line("\t. \"testing\""), LineKind::Entry);
        assert_eq!(classify_line("\t\"os\" // nolint"), LineKind::Entry);
        assert_eq!(classify_line("\tv2 \"gopkg.in/yaml.v2\""), LineKind::Entry);
    }

    #[test]
    fn test_classify_opaque() {
        assert_eq!(classify_line(""), LineKind::Opaque);
        assert_eq!(classify_line("\t// the \"fmt\" package"), LineKind::Opaque);
        assert_eq!(classify_line("/* block comment */"), LineKind::Opaque);
        assert_eq!(classify_line("func main() {"), LineKind::Opaque);
    }

    #[test]
    fn test_group_key_external() {
        assert_eq!(
            group_key("\t\"github.com/hashicorp/vault/x\"").as_deref(),
            Some("github.comhashicorp")
        );
        assert_eq!(
            group_key("\t\"indeed.com/devops/foobar\"").as_deref(),
            Some("indeed.comdevops")
        );
        assert_eq!(
            group_key("\tquz \"indeed.com/gophers/quz\" // why").as_deref(),
            Some("indeed.comgophers")
        );
    }

    #[test]
    fn test_group_key_standard() {
        assert_eq!(group_key("\t\"fmt\""), None);
        assert_eq!(group_key("\t\"io/ioutil\""), None);
        assert_eq!(group_key("\t\"net/http\" // see golang.org"), None);
        assert_eq!(group_key("\t\"example.com\""), None);
    }

    #[test]
    fn test_group_key_is_stable_per_root() {
        let a = group_key("\"github.com/pkg/errors\"");
        let b = group_key("\"github.com/pkg/term/termios\"");
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_ne!(a, group_key("\"github.com/stretchr/testify\""));
    }

    #[test]
    fn test_sort_key_drops_alias_and_comments() {
        assert_eq!(sort_key("\t\"fmt\""), "\"fmt\"");
        assert_eq!(sort_key("\tlog \"github.com/a/b\""), "\"github.com/a/b\"");
        assert_eq!(sort_key("\t\"os\" // nolint:gosec"), "\"os\"");
        assert_eq!(sort_key("\t_ \"x.io/y/z\" /* driver */"), "\"x.io/y/z\"");
    }

    #[test]
    fn test_generated_marker() {
        assert!(is_generated_marker("// Code generated by protoc-gen-go. DO NOT EDIT."));
        assert!(!is_generated_marker("// Code generated by hand, edit freely."));
        assert!(!is_generated_marker("package main"));
    }
}
