use std::io::Write;
use std::path::{MAIN_SEPARATOR, Path};
use std::process::Command;
use tempfile::NamedTempFile;

use crate::core::error::{GroupsError, Result};

/// Produces a unified diff between `original` and `updated`.
///
/// Both texts are written to scratch files and compared with `diff -u`. The
/// scratch file names in the two header lines are then replaced with
/// `<label>.orig` and `<label>`, so the output reads as a diff of the real
/// file. An empty result means the inputs are identical.
pub fn unified_diff(original: &[u8], updated: &[u8], label: &str) -> Result<Vec<u8>> {
    let before = write_temp_file(original)?;
    let after = write_temp_file(updated)?;
    diff_files(before.path(), after.path(), label)
}

/// Runs `diff -u` over two files and relabels the headers.
///
/// # Arguments
/// * `before`: The original contents on disk.
/// * `after`: The updated contents on disk.
/// * `label`: The logical file name for the headers.
///
/// # Returns
/// The relabelled diff, empty when the files match, or `GroupsError::Diff`
/// when `diff` reports trouble (exit status 2 or killed by a signal).
fn diff_files(before: &Path, after: &Path, label: &str) -> Result<Vec<u8>> {
    let output = Command::new("diff").arg("-u").arg(before).arg(after).output()?;

    // 0: identical, 1: different.
    match output.status.code() {
        Some(0) | Some(1) => {}
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GroupsError::Diff(format!("{label}: {}", stderr.trim())));
        }
    }

    if output.stdout.is_empty() {
        return Ok(output.stdout);
    }
    replace_temp_filename(&output.stdout, label)
}

/// Rewrites the `---`/`+++` header lines of a diff to name `label`.
///
/// Timestamps after the tab are preserved and the label is always written
/// with `/` separators, whatever the host uses.
///
/// # Arguments
/// * `diff`: Raw `diff -u` output whose headers name scratch files.
/// * `label`: The logical file name to show instead.
///
/// # Returns
/// The diff with rewritten headers, or `GroupsError::Diff` when the input
/// has fewer than three lines.
pub fn replace_temp_filename(diff: &[u8], label: &str) -> Result<Vec<u8>> {
    let mut parts = diff.splitn(3, |b| *b == b'\n');
    let (Some(first), Some(second), Some(rest)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(GroupsError::Diff(label.to_string()));
    };

    let name = label.replace(MAIN_SEPARATOR, "/");
    let mut out = Vec::with_capacity(diff.len() + name.len() * 2);
    out.extend_from_slice(format!("--- {name}.orig").as_bytes());
    out.extend_from_slice(timestamp(first));
    out.push(b'\n');
    out.extend_from_slice(format!("+++ {name}").as_bytes());
    out.extend_from_slice(timestamp(second));
    out.push(b'\n');
    out.extend_from_slice(rest);
    Ok(out)
}

/// The header line's trailing `\t<timestamp>`, if any.
fn timestamp(header: &[u8]) -> &[u8] {
    header
        .iter()
        .rposition(|b| *b == b'\t')
        .map(|i| &header[i..])
        .unwrap_or_default()
}

fn write_temp_file(data: &[u8]) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().prefix("go-groups").tempfile()?;
    file.write_all(data)?;
    file.flush()?;
    Ok(file)
}

/// Returns true if a `diff` binary can be run.
pub fn diff_available() -> bool {
    Command::new("diff")
        .arg("--version")
        .output()
        .is_ok_and(|out| out.status.success())
}

/// Formats `path` with forward slashes for diff headers.
pub fn slash_path(path: &Path) -> String {
    path.display().to_string().replace(MAIN_SEPARATOR, "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diff() {
        if !diff_available() {
            eprintln!("skipping: diff command is required");
            return;
        }
        let data = unified_diff(b"first\nsecond\n", b"first\nthird\n", "difftest.txt").unwrap();
        let text = String::from_utf8(data).unwrap();
        let mut lines = text.splitn(3, '\n');

        assert!(lines.next().unwrap().starts_with("--- difftest.txt.orig"));
        assert!(lines.next().unwrap().starts_with("+++ difftest.txt"));
        assert_eq!(lines.next().unwrap(), "@@ -1,2 +1,2 @@\n first\n-second\n+third\n");
    }

    #[test]
    fn test_identical_inputs_produce_no_diff() {
        if !diff_available() {
            return;
        }
        assert!(unified_diff(b"same\n", b"same\n", "same.go").unwrap().is_empty());
    }

    #[test]
    fn test_diff_failure_is_an_error() {
        if !diff_available() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present.go");
        std::fs::write(&present, "package main\n").unwrap();

        let err = diff_files(&dir.path().join("missing.go"), &present, "main.go").unwrap_err();
        match err {
            GroupsError::Diff(message) => assert!(message.starts_with("main.go: ")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_replace_temp_filename() {
        let diff = b"--- /tmp/tmpfile1\t2017-02-08 00:53:26.175105619 +0900
+++ /tmp/tmpfile2\t2017-02-08 00:53:38.415151275 +0900
@@ -1,2 +1,2 @@
 first
-second
+third
";
        let want = "--- path/to/file.go.orig\t2017-02-08 00:53:26.175105619 +0900
+++ path/to/file.go\t2017-02-08 00:53:38.415151275 +0900
@@ -1,2 +1,2 @@
 first
-second
+third
";
        let label = ["path", "to", "file.go"].join(std::path::MAIN_SEPARATOR_STR);
        let got = replace_temp_filename(diff, &label).unwrap();
        assert_eq!(String::from_utf8(got).unwrap(), want);
    }

    #[test]
    fn test_replace_temp_filename_without_timestamps() {
        let got = replace_temp_filename(b"--- a\n+++ b\n@@ -1 +1 @@\n", "x.go").unwrap();
        assert_eq!(String::from_utf8(got).unwrap(), "--- x.go.orig\n+++ x.go\n@@ -1 +1 @@\n");
    }

    #[test]
    fn test_short_diff_is_rejected() {
        assert!(matches!(
            replace_temp_filename(b"--- a\n", "x.go"),
            Err(GroupsError::Diff(_))
        ));
    }
}
