// This file is the module declaration file for the `core` module.
// It declares the submodules that drive a regrouping run and exposes them to
// the rest of the crate.

// `config` module:
// Holds `PipelineConfig`, the explicit set of flags passed into every
// pipeline run, and the `ConfigManager` that discovers and parses the
// optional `.go-groups.toml` settings file.
pub mod config;

// `engine` module:
// The pipeline driver. `process_source` runs scan, regroup and re-emit over
// one source text; `FileProcessor` applies it to stdin, files and directory
// trees and produces list, write, diff or plain output.
pub mod engine;

// `error` module:
// The typed errors returned by the engine and its collaborators.
pub mod error;

pub mod version;
