use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};
use walkdir::WalkDir;

use crate::builders::diff::{slash_path, unified_diff};
use crate::builders::emitter::emit_file;
use crate::builders::formatter::StyleFormatter;
use crate::builders::grouping::regroup_block;
use crate::builders::patterns::is_generated_marker;
use crate::builders::scanner::scan;
use crate::builders::storage::{BackupStore, SiblingBackup};
use crate::core::config::PipelineConfig;
use crate::core::error::{GroupsError, Result};

/// The outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    /// The full replacement contents, or the original text when nothing changed.
    pub content: String,
    /// True when `content` differs from the input.
    pub rewritten: bool,
}

impl Rewrite {
    fn unchanged(source: &str) -> Self {
        Self {
            content: source.to_string(),
            rewritten: false,
        }
    }
}

/// Regroups every import block of one source file.
///
/// Runs scan, regroup and re-emit. Files with no import block, generated
/// files (when `skip_generated` is set) and files that are already in order
/// come back unchanged with `rewritten == false`. Only a changed result is
/// handed to the style formatter, and a formatter failure is returned as is.
///
/// # Arguments
/// * `source`: The raw file contents.
/// * `config`: Which optional steps to apply.
/// * `formatter`: The external style formatter.
///
/// # Returns
/// The `Rewrite`. Fails with `GroupsError::InvalidInput` if the source is not
/// UTF-8, and passes on the formatter's error (usually
/// `GroupsError::FormatterFailure`) when the formatter rejects the result.
pub fn process_source(
    source: &[u8],
    config: &PipelineConfig,
    formatter: &dyn StyleFormatter,
) -> Result<Rewrite> {
    let text = std::str::from_utf8(source).map_err(|e| GroupsError::InvalidInput(e.to_string()))?;

    if config.skip_generated && text.lines().next().is_some_and(is_generated_marker) {
        debug!("generated file, leaving it alone");
        return Ok(Rewrite::unchanged(text));
    }

    let scanned = scan(text);
    if scanned.is_empty() {
        debug!("no import blocks found");
        return Ok(Rewrite::unchanged(text));
    }

    let blocks: Vec<_> = scanned.blocks.into_iter().map(regroup_block).collect();
    let regrouped = emit_file(
        &scanned.untouched,
        scanned.total_lines,
        &blocks,
        scanned.layout,
    );
    if regrouped == text {
        return Ok(Rewrite::unchanged(text));
    }

    let content = if config.apply_external_formatter {
        formatter.format(&regrouped)?
    } else {
        regrouped
    };
    let rewritten = content != text;
    Ok(Rewrite { content, rewritten })
}

/// What to do with a file whose imports change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputMode {
    /// Print the file name.
    pub list: bool,
    /// Overwrite the source file.
    pub write: bool,
    /// Print a unified diff.
    pub diff: bool,
}

impl OutputMode {
    /// True when none of list, write or diff is set, so results go to the output.
    pub fn prints_result(&self) -> bool {
        !self.list && !self.write && !self.diff
    }
}

/// Files visited while walking a directory.
#[derive(Debug, Default)]
pub struct WalkSummary {
    pub processed: usize,
    pub rewritten: usize,
    pub failures: Vec<(PathBuf, GroupsError)>,
}

/// Applies the pipeline to stdin, single files and directory trees.
pub struct FileProcessor {
    config: PipelineConfig,
    mode: OutputMode,
    formatter: Box<dyn StyleFormatter>,
    backups: Box<dyn BackupStore>,
}

impl FileProcessor {
    pub fn new(config: PipelineConfig, mode: OutputMode, formatter: Box<dyn StyleFormatter>) -> Self {
        Self {
            config,
            mode,
            formatter,
            backups: Box::new(SiblingBackup::new()),
        }
    }

    /// Replaces the backup strategy used by write mode.
    pub fn with_backups(mut self, backups: Box<dyn BackupStore>) -> Self {
        self.backups = backups;
        self
    }

    /// Processes content read from `input`, e.g. stdin. Write mode is ignored
    /// because there is no file to write back to.
    pub fn process_reader(
        &mut self,
        label: &str,
        input: &mut dyn Read,
        out: &mut dyn Write,
    ) -> Result<bool> {
        let mut source = Vec::new();
        input.read_to_end(&mut source)?;
        self.process_bytes(label, None, &source, out)
    }

    /// Processes one file on disk.
    ///
    /// # Arguments
    /// * `path`: The Go source file. In write mode it is overwritten in place.
    /// * `out`: Where listings, diffs or the regrouped source are printed.
    ///
    /// # Returns
    /// `true` when the file's imports were regrouped, or the error that
    /// stopped reading, formatting or writing it.
    pub fn process_path(&mut self, path: &Path, out: &mut dyn Write) -> Result<bool> {
        let source = fs::read(path)?;
        let label = path.display().to_string();
        self.process_bytes(&label, Some(path), &source, out)
    }

    /// Processes every Go file below `root`.
    ///
    /// Failures on individual files are collected in the summary and do not
    /// stop the walk. Errors walking the tree itself are returned.
    ///
    /// # Arguments
    /// * `root`: Directory to walk. Hidden files and non-`.go` files are skipped.
    /// * `out`: Shared output for every file visited.
    ///
    /// # Returns
    /// A `WalkSummary` counting processed and rewritten files.
    pub fn walk_dir(&mut self, root: &Path, out: &mut dyn Write) -> Result<WalkSummary> {
        let mut summary = WalkSummary::default();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() || !is_go_file(entry.path()) {
                continue;
            }

            summary.processed += 1;
            match self.process_path(entry.path(), out) {
                Ok(true) => summary.rewritten += 1,
                Ok(false) => {}
                Err(err) => {
                    error!(path = %entry.path().display(), "{err}");
                    summary.failures.push((entry.path().to_path_buf(), err));
                }
            }
        }
        debug!(
            root = %root.display(),
            processed = summary.processed,
            rewritten = summary.rewritten,
            failed = summary.failures.len(),
            "walked directory"
        );
        Ok(summary)
    }

    fn process_bytes(
        &mut self,
        label: &str,
        path: Option<&Path>,
        source: &[u8],
        out: &mut dyn Write,
    ) -> Result<bool> {
        let rewrite = process_source(source, &self.config, self.formatter.as_ref())?;

        if rewrite.rewritten {
            info!(file = label, "imports regrouped");
            if self.mode.list {
                writeln!(out, "{label}")?;
            }
            if self.mode.write
                && let Some(path) = path
            {
                self.write_back(path, source, rewrite.content.as_bytes())?;
            }
            if self.mode.diff {
                let data = unified_diff(source, rewrite.content.as_bytes(), label)?;
                let name = slash_path(Path::new(label));
                writeln!(out, "diff -u {name}.orig {name}")?;
                out.write_all(&data)?;
            }
        }

        if self.mode.prints_result() {
            out.write_all(rewrite.content.as_bytes())?;
        }
        Ok(rewrite.rewritten)
    }

    fn write_back(&mut self, path: &Path, original: &[u8], updated: &[u8]) -> Result<()> {
        let backup = self.backups.store_backup(path, original)?;
        if let Err(err) = fs::write(path, updated) {
            self.backups.restore(&backup, path)?;
            return Err(err.into());
        }
        self.backups.discard(&backup)
    }
}

/// A regular Go source file name that is not hidden.
fn is_go_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .is_some_and(|name| !name.starts_with('.') && name.ends_with(".go"))
}
