use std::collections::HashMap;
use tracing::debug;

use crate::builders::patterns::{group_key, sort_key};
use crate::builders::scanner::{Block, ImportEntry};

/// One line of a block in its final emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockLine {
    /// A blank line separating two groups.
    Separator,
    /// An import together with its attached comments.
    Entry(ImportEntry),
}

/// A block whose entries have been grouped and sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedBlock {
    pub start: usize,
    pub end: usize,
    pub lines: Vec<BlockLine>,
}

/// Splits a block into the standard subset and external groups, then sorts.
///
/// Standard entries come first without a separator. Each external group
/// follows in ascending key order, preceded by a `Separator`. Entries within
/// a subset are ordered by [`sort_key`]; ties keep their original order.
///
/// # Arguments
/// * `block`: A block as produced by the scanner, entries in file order.
///
/// # Returns
/// The `SortedBlock` to hand to the emitter.
pub fn regroup_block(block: Block) -> SortedBlock {
    let mut standard: Vec<ImportEntry> = Vec::with_capacity(block.entries.len());
    let mut groups: HashMap<String, Vec<ImportEntry>> = HashMap::new();
    let mut keys: Vec<String> = Vec::new();

    for entry in block.entries {
        match group_key(&entry.text) {
            Some(key) => {
                if !groups.contains_key(&key) {
                    keys.push(key.clone());
                }
                groups.entry(key).or_default().push(entry);
            }
            None => standard.push(entry),
        }
    }

    // The map only stores groups; the emission order comes from `keys`.
    keys.sort();
    debug!(
        standard = standard.len(),
        groups = keys.len(),
        "regrouped import block"
    );

    sort_entries(&mut standard);
    let mut lines: Vec<BlockLine> = standard.into_iter().map(BlockLine::Entry).collect();
    for key in keys {
        let Some(mut entries) = groups.remove(&key) else {
            continue;
        };
        sort_entries(&mut entries);
        lines.push(BlockLine::Separator);
        lines.extend(entries.into_iter().map(BlockLine::Entry));
    }

    SortedBlock {
        start: block.start,
        end: block.end,
        lines,
    }
}

fn sort_entries(entries: &mut [ImportEntry]) {
    entries.sort_by_cached_key(|entry| sort_key(&entry.text));
}
