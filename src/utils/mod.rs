use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};

use crate::core::config::{ConfigManager, ConfigProvider, GroupsSettings};
use crate::core::engine::{FileProcessor, OutputMode};

/// Options gathered from the command line.
#[derive(Debug, Default, Clone)]
pub struct RunOptions {
    pub mode: OutputMode,
    pub no_gofmt: bool,
    pub include_generated: bool,
    pub config: Option<PathBuf>,
}

/// Outcome of a run over command line paths.
#[derive(Debug)]
pub enum PathError {
    /// A path given on the command line does not exist.
    Missing(PathBuf, io::Error),
    /// Processing failed while walking or rewriting files.
    Internal(anyhow::Error),
}

/// Loads the settings file, either the explicit one or the discovered one.
pub fn load_settings(explicit: Option<&Path>) -> Result<GroupsSettings> {
    let manager = match explicit {
        Some(path) => ConfigManager::new_at(path.to_path_buf())?,
        None => ConfigManager::new()?,
    };
    manager.load_settings().context("Failed to load settings")
}

/// Builds the file processor for `options`, applying CLI overrides on top
/// of the settings file.
pub fn build_processor(options: &RunOptions) -> Result<FileProcessor> {
    let settings = load_settings(options.config.as_deref())?;
    let mut config = settings.pipeline_config();
    if options.no_gofmt {
        config.apply_external_formatter = false;
    }
    if options.include_generated {
        config.skip_generated = false;
    }
    Ok(FileProcessor::new(
        config,
        options.mode,
        Box::new(settings.formatter()),
    ))
}

/// Regroups stdin and writes the result to stdout.
pub fn run_stdin(options: &RunOptions) -> Result<()> {
    let mut processor = build_processor(options)?;
    let stdin = io::stdin();
    let stdout = io::stdout();
    processor
        .process_reader("<standard input>", &mut stdin.lock(), &mut stdout.lock())
        .context("Failed to process standard input")?;
    Ok(())
}

/// Regroups every path given on the command line.
///
/// Directories are walked for `.go` files; any other path is processed as a
/// single file. Per-file failures are reported on stderr and turn the whole
/// run into an internal error once every path has been visited.
pub fn run_paths(options: &RunOptions, paths: &[PathBuf]) -> std::result::Result<(), PathError> {
    let mut processor = build_processor(options).map_err(PathError::Internal)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failed = 0usize;

    for path in paths {
        let metadata = std::fs::metadata(path).map_err(|e| PathError::Missing(path.clone(), e))?;
        if metadata.is_dir() {
            let summary = processor
                .walk_dir(path, &mut out)
                .with_context(|| format!("Failed processing path {}", path.display()))
                .map_err(PathError::Internal)?;
            for (file, err) in &summary.failures {
                report_error(&format!("{}: {err}", file.display()));
            }
            failed += summary.failures.len();
        } else if let Err(err) = processor.process_path(path, &mut out) {
            report_error(&format!("{}: {err}", path.display()));
            failed += 1;
        }
    }

    if failed > 0 {
        return Err(PathError::Internal(anyhow::anyhow!(
            "{failed} file(s) could not be processed"
        )));
    }
    Ok(())
}

/// Prints an error line to stderr with a highlighted prefix.
pub fn report_error(message: &str) {
    use colored::Colorize;
    eprintln!("{} {message}", "error:".red().bold());
}
