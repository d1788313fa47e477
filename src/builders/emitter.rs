use std::collections::HashMap;

use crate::builders::grouping::{BlockLine, SortedBlock};
use crate::builders::scanner::LineLayout;

const BLOCK_OPEN: &str = "import (";
const BLOCK_CLOSE: &str = ")";

/// Reassembles a file from its untouched lines and its sorted blocks.
///
/// Every untouched line is written verbatim followed by the layout's line
/// ending. At the start index of a block the rendered block is written
/// instead and the lines up to the block's end index are skipped. The final
/// terminator is dropped again when the source had none.
///
/// # Arguments
/// * `untouched`: Lines outside any block, keyed by zero-based index.
/// * `total_lines`: Number of lines in the original file.
/// * `blocks`: The sorted blocks, in any order.
/// * `layout`: Line ending and trailing newline of the original file.
///
/// # Returns
/// The complete new file contents.
pub fn emit_file(
    untouched: &HashMap<usize, String>,
    total_lines: usize,
    blocks: &[SortedBlock],
    layout: LineLayout,
) -> String {
    let by_start: HashMap<usize, &SortedBlock> =
        blocks.iter().map(|block| (block.start, block)).collect();
    let mut out = String::new();

    let mut index = 0;
    while index < total_lines {
        if let Some(line) = untouched.get(&index) {
            push_line(&mut out, line, layout.ending);
        } else if let Some(block) = by_start.get(&index) {
            render_block(block, layout.ending, &mut out);
            index = block.end;
        }
        index += 1;
    }

    if !layout.trailing_newline && out.ends_with(layout.ending) {
        out.truncate(out.len() - layout.ending.len());
    }
    out
}

/// Renders one block, delimiters included.
///
/// Separators before the first entry are skipped, so a block whose standard
/// group is empty still opens directly with an import.
///
/// # Arguments
/// * `block`: The regrouped block.
/// * `ending`: Terminator written after every line, the last one included.
/// * `out`: Buffer the block is appended to.
pub fn render_block(block: &SortedBlock, ending: &str, out: &mut String) {
    push_line(out, BLOCK_OPEN, ending);

    let first_entry = block
        .lines
        .iter()
        .position(|line| matches!(line, BlockLine::Entry(_)))
        .unwrap_or(block.lines.len());

    for line in &block.lines[first_entry..] {
        match line {
            BlockLine::Separator => out.push_str(ending),
            BlockLine::Entry(entry) => {
                if let Some(above) = &entry.content_above {
                    push_line(out, above, ending);
                }
                push_line(out, &entry.text, ending);
                if let Some(below) = &entry.content_below {
                    push_line(out, below, ending);
                }
            }
        }
    }

    push_line(out, BLOCK_CLOSE, ending);
}

/// Appends `text`, which may span several `\n`-joined lines, terminating
/// each line with `ending`.
fn push_line(out: &mut String, text: &str, ending: &str) {
    for line in text.split('\n') {
        out.push_str(line);
        out.push_str(ending);
    }
}
