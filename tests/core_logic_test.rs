use go_groups::core::config::{ConfigManager, ConfigProvider, PipelineConfig};
use go_groups::core::engine::{FileProcessor, OutputMode};
use go_groups::core::error::{GroupsError, Result};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const UNSORTED: &str = "package main\n\nimport (\n\t\"os\"\n\t\"github.com/pkg/errors\"\n\t\"fmt\"\n)\n";
const SORTED: &str = "package main\n\nimport (\n\t\"fmt\"\n\t\"os\"\n\n\t\"github.com/pkg/errors\"\n)\n";

fn identity(source: &str) -> Result<String> {
    Ok(source.to_string())
}

fn no_format() -> PipelineConfig {
    PipelineConfig {
        apply_external_formatter: false,
        skip_generated: true,
    }
}

fn setup_tree() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let pkg = dir.path().join("pkg");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(dir.path().join("main.go"), UNSORTED).unwrap();
    fs::write(pkg.join("sorted.go"), SORTED).unwrap();
    fs::write(pkg.join("notes.txt"), UNSORTED).unwrap();
    fs::write(pkg.join(".hidden.go"), UNSORTED).unwrap();
    dir
}

fn backups_in(dir: &Path) -> Vec<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".bak"))
        .collect()
}

#[test]
fn test_write_mode_rewrites_only_go_files() {
    let dir = setup_tree();
    let mode = OutputMode {
        write: true,
        ..Default::default()
    };
    let mut processor = FileProcessor::new(no_format(), mode, Box::new(identity));
    let mut out: Vec<u8> = Vec::new();

    let summary = processor.walk_dir(dir.path(), &mut out).unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.rewritten, 1);
    assert!(summary.failures.is_empty());
    assert!(out.is_empty());
    assert_eq!(fs::read_to_string(dir.path().join("main.go")).unwrap(), SORTED);
    assert_eq!(fs::read_to_string(dir.path().join("pkg/notes.txt")).unwrap(), UNSORTED);
    assert_eq!(fs::read_to_string(dir.path().join("pkg/.hidden.go")).unwrap(), UNSORTED);
    assert!(backups_in(dir.path()).is_empty(), "backup should be removed after writing");
}

#[test]
fn test_list_mode_names_changed_files() {
    let dir = setup_tree();
    let mode = OutputMode {
        list: true,
        ..Default::default()
    };
    let mut processor = FileProcessor::new(no_format(), mode, Box::new(identity));
    let mut out: Vec<u8> = Vec::new();

    processor.walk_dir(dir.path(), &mut out).unwrap();

    let listed = String::from_utf8(out).unwrap();
    assert_eq!(listed, format!("{}\n", dir.path().join("main.go").display()));
    assert_eq!(fs::read_to_string(dir.path().join("main.go")).unwrap(), UNSORTED);
}

#[test]
fn test_diff_mode_prints_unified_diff() {
    if go_groups::builders::diff::diff_available() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.go");
        fs::write(&file, UNSORTED).unwrap();

        let mode = OutputMode {
            diff: true,
            ..Default::default()
        };
        let mut processor = FileProcessor::new(no_format(), mode, Box::new(identity));
        let mut out: Vec<u8> = Vec::new();
        assert!(processor.process_path(&file, &mut out).unwrap());

        let text = String::from_utf8(out).unwrap();
        let name = go_groups::builders::diff::slash_path(&file);
        assert!(text.starts_with(&format!("diff -u {name}.orig {name}\n--- {name}.orig")));
        assert!(text.contains("\n+++ "));
        assert!(text.contains("\n@@ -1,7 +1,8 @@\n"));
        assert!(text.contains("\n+\n"));
        assert_eq!(fs::read_to_string(&file).unwrap(), UNSORTED);
    }
}

#[test]
fn test_formatter_failure_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.go");
    fs::write(&file, UNSORTED).unwrap();

    let failing = |_: &str| -> Result<String> {
        Err(GroupsError::FormatterFailure {
            program: "gofmt".to_string(),
            message: "1:1: expected 'package'".to_string(),
        })
    };
    let mode = OutputMode {
        write: true,
        ..Default::default()
    };
    let mut processor = FileProcessor::new(PipelineConfig::default(), mode, Box::new(failing));
    let mut out: Vec<u8> = Vec::new();

    let summary = processor.walk_dir(dir.path(), &mut out).unwrap();
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].1.is_formatter_failure());
    assert_eq!(fs::read_to_string(&file).unwrap(), UNSORTED);
}

#[test]
fn test_settings_file_drives_pipeline_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join(".go-groups.toml");
    fs::write(&config_path, "skip_generated = false\n\n[formatter]\nenabled = false\n").unwrap();

    let settings = ConfigManager::new_at(config_path).unwrap().load_settings().unwrap();
    let config = settings.pipeline_config();
    assert!(!config.apply_external_formatter);
    assert!(!config.skip_generated);

    let generated = format!("// Code generated by stringer. DO NOT EDIT.\n\n{UNSORTED}");
    let mut processor = FileProcessor::new(config, OutputMode::default(), Box::new(identity));
    let mut input = generated.as_bytes();
    let mut out: Vec<u8> = Vec::new();
    assert!(processor.process_reader("gen.go", &mut input, &mut out).unwrap());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        format!("// Code generated by stringer. DO NOT EDIT.\n\n{SORTED}")
    );
}
