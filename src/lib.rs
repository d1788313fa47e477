//! go-groups: regroups and sorts the import blocks of Go source files.
//!
//! The pipeline lives in [`core::engine::process_source`]; the pieces it is
//! built from (line classifier, block scanner, grouping, emitter and the
//! external collaborators) live under [`builders`].
pub mod builders;
pub mod core;
pub mod utils;
