use std::collections::HashMap;
use tracing::{debug, trace, warn};

use crate::builders::patterns::{LineKind, classify_line, is_blank};

/// One import with the comment lines it owns.
///
/// `content_above` and `content_below` hold the contiguous, non-blank,
/// non-entry lines directly next to the entry inside its block. They move
/// with the entry when the block is reordered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEntry {
    pub text: String,
    pub content_above: Option<String>,
    pub content_below: Option<String>,
}

impl ImportEntry {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            content_above: None,
            content_below: None,
        }
    }
}

/// A contiguous `import ( ... )` region.
///
/// `start` and `end` are the indices of the delimiter lines; entries lie
/// strictly between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
    pub entries: Vec<ImportEntry>,
}

/// How the lines of a source file are terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    /// `"\r\n"` when the first line ends that way, `"\n"` otherwise.
    pub ending: &'static str,
    /// Whether the last line is terminated.
    pub trailing_newline: bool,
}

impl Default for LineLayout {
    fn default() -> Self {
        Self {
            ending: "\n",
            trailing_newline: true,
        }
    }
}

impl LineLayout {
    /// Detects the layout of `source`. An empty source keeps the default.
    pub fn of(source: &str) -> Self {
        if source.is_empty() {
            return Self::default();
        }
        let ending = match source.find('\n') {
            Some(i) if source[..i].ends_with('\r') => "\r\n",
            _ => "\n",
        };
        Self {
            ending,
            trailing_newline: source.ends_with('\n'),
        }
    }
}

/// The result of scanning a whole file.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Lines outside every block, keyed by their zero-based index.
    pub untouched: HashMap<usize, String>,
    /// Completed blocks in top-to-bottom order.
    pub blocks: Vec<Block>,
    /// Number of lines in the file.
    pub total_lines: usize,
    /// Line terminators to reproduce on output.
    pub layout: LineLayout,
}

impl ScanResult {
    /// True when the file holds no import block, i.e. there is nothing to rewrite.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Scans a file's lines for import blocks in a single forward pass.
///
/// Lines outside blocks are recorded verbatim. Inside a block, entries are
/// collected together with their attached comments; any other line that no
/// entry claims is dropped, since separators are regenerated on output.
///
/// A block that is still open at the end of the file is abandoned: its lines
/// are kept as untouched content.
///
/// # Arguments
/// * `lines`: The file's lines without their terminators.
///
/// # Returns
/// A `ScanResult` with the default `\n` layout. Use [`scan`] to have the
/// layout detected from the source text.
pub fn scan_lines(lines: &[&str]) -> ScanResult {
    let mut result = ScanResult {
        total_lines: lines.len(),
        ..Default::default()
    };
    let mut current: Option<Block> = None;

    for (index, line) in lines.iter().enumerate() {
        match current.as_mut() {
            None => {
                if classify_line(line) == LineKind::BlockStart {
                    trace!(line = index, "import block opened");
                    current = Some(Block {
                        start: index,
                        end: index,
                        entries: Vec::new(),
                    });
                } else {
                    result.untouched.insert(index, (*line).to_string());
                }
            }
            Some(block) => match classify_line(line) {
                LineKind::BlockEnd => {
                    block.end = index;
                    if let Some(block) = current.take() {
                        debug!(
                            start = block.start,
                            end = block.end,
                            entries = block.entries.len(),
                            "import block closed"
                        );
                        result.blocks.push(block);
                    }
                }
                LineKind::Entry => {
                    let entry = ImportEntry {
                        text: (*line).to_string(),
                        content_above: attached_above(lines, block.start, index),
                        content_below: attached_below(lines, index),
                    };
                    block.entries.push(entry);
                }
                kind => trace!(line = index, %kind, "line inside import block left to attachment"),
            },
        }
    }

    if let Some(block) = current {
        warn!(
            start = block.start,
            "import block is never closed, leaving the rest of the file untouched"
        );
        for (index, line) in lines.iter().enumerate().skip(block.start) {
            result.untouched.insert(index, (*line).to_string());
        }
    }

    result
}

/// Scans a whole source text and records its line layout.
pub fn scan(source: &str) -> ScanResult {
    let lines: Vec<&str> = source.lines().collect();
    let mut result = scan_lines(&lines);
    result.layout = LineLayout::of(source);
    result
}

/// Collects the run of comment lines directly above the entry at `index`.
///
/// The walk stops at a blank line, at another entry or at the block start.
fn attached_above(lines: &[&str], block_start: usize, index: usize) -> Option<String> {
    let mut first = index;
    while first > block_start + 1 {
        let candidate = lines[first - 1];
        if is_blank(candidate) || classify_line(candidate) != LineKind::Opaque {
            break;
        }
        first -= 1;
    }
    join_run(&lines[first..index])
}

/// Collects the run of comment lines directly below the entry at `index`.
///
/// The run is only claimed when it ends at a blank line or at the block end
/// (or the end of the file). When it runs into another entry, that entry owns
/// it as its `content_above` instead, so no line is claimed twice.
fn attached_below(lines: &[&str], index: usize) -> Option<String> {
    let mut last = index + 1;
    while last < lines.len() {
        let candidate = lines[last];
        if is_blank(candidate) {
            break;
        }
        match classify_line(candidate) {
            LineKind::Opaque => last += 1,
            LineKind::BlockEnd => break,
            LineKind::Entry | LineKind::BlockStart => return None,
        }
    }
    join_run(&lines[index + 1..last])
}

fn join_run(run: &[&str]) -> Option<String> {
    if run.is_empty() {
        None
    } else {
        Some(run.join("\n"))
    }
}
