// This file is the module declaration file for the `builders` module.
// It declares the building blocks the engine assembles a run from.

// `patterns` module:
// The line classifier. Turns a single line into a `LineKind`
// (block start, block end, entry, opaque) and derives the group key and
// comparison key of an import entry. The regular expressions stay private.
pub mod patterns;

// `scanner` module:
// A single forward pass over a file that finds the import blocks, collects
// their entries and the comment lines attached to each entry.
pub mod scanner;

// `grouping` module:
// Splits a block into the standard subset and the external groups, and
// sorts both the entries and the group keys.
pub mod grouping;

// `emitter` module:
// Reassembles the file from the untouched lines and the sorted blocks.
pub mod emitter;

// `formatter` module:
// The external style formatter (gofmt by default) rewritten files are
// piped through.
pub mod formatter;

// `diff` module:
// Unified diffs for `-d`, with scratch file names replaced by the real one.
pub mod diff;

// `storage` module:
// Backup files written next to a source file before `-w` overwrites it.
pub mod storage;
