use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::{TempDir, tempdir};

const CONFIG: &str = r#"
[merge]
target_size_gib = 0.0000002
max_files_to_merge = 2
num_threads = 2
tree_name = "Events"

[tool]
kind = "concat"

[counter]
kind = "tagged_lines"

[logging]
stdout_level = "warn"
"#;

fn write_inputs(dir: &Path, count: usize, records: usize) {
    for i in 1..=count {
        let mut contents = String::new();
        for entry in 0..records {
            contents.push_str(&format!("Events\tfile {} entry {}\n", i, entry));
        }
        fs::write(dir.join(format!("sample_{}.root", i)), contents).unwrap();
    }
}

fn workspace(count: usize, records: usize) -> TempDir {
    let dir = tempdir().unwrap();
    write_inputs(dir.path(), count, records);
    fs::write(dir.path().join("settings.toml"), CONFIG).unwrap();
    dir
}

fn part_merge(dir: &Path, extra: &[&str]) -> Output {
    part_merge_with_env(dir, &[], extra)
}

fn part_merge_with_env(dir: &Path, vars: &[(&str, &str)], extra: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_part_merge"))
        .current_dir(dir)
        .env_remove("PART_MERGE_CONFIG")
        .envs(vars.iter().copied())
        .args(["--config", "settings.toml"])
        .args(extra)
        .output()
        .expect("failed to start part_merge")
}

#[test]
fn prints_outputs_and_total() {
    let dir = workspace(6, 5);

    let output = part_merge(dir.path(), &[]);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("merged/sample.part1.root"), "{}", stdout);
    assert!(stdout.contains("Total number of entries in these files: 30"));
    assert!(dir.path().join("merged/sample.part1.root").is_file());
}

#[test]
fn cli_flags_override_config_file() {
    let dir = workspace(3, 4);

    let output = part_merge(dir.path(), &["--size", "2", "-o", "final"]);
    assert!(output.status.success(), "{:?}", output);

    let merged = fs::read_to_string(dir.path().join("final/sample.root")).unwrap();
    assert_eq!(merged.lines().count(), 12);
    assert!(merged.starts_with("Events\tfile 1 entry 0\n"));
}

#[test]
fn existing_output_fails_run() {
    let dir = workspace(3, 4);
    fs::create_dir(dir.path().join("merged")).unwrap();
    fs::write(dir.path().join("merged/sample.root"), "keep me").unwrap();

    let output = part_merge(dir.path(), &["--size", "2"]);
    assert!(!output.status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join("merged/sample.root")).unwrap(),
        "keep me"
    );
}

#[test]
fn unparseable_name_fails_run() {
    let dir = workspace(2, 1);
    fs::write(dir.path().join("summary.root"), "").unwrap();

    let output = part_merge(dir.path(), &[]);
    assert!(!output.status.success());
    assert!(!dir.path().join("merged").exists());
}

#[test]
fn print_config_shows_effective_settings() {
    let dir = workspace(1, 1);

    let output = part_merge(dir.path(), &["--print-config", "-n", "7"]);
    assert!(output.status.success(), "{:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("num_threads = 7"), "{}", stdout);
    assert!(stdout.contains("kind = \"concat\""), "{}", stdout);
    assert!(!dir.path().join("merged").exists());
}

#[test]
fn environment_overrides_file_and_flags_override_environment() {
    let dir = workspace(1, 1);
    let vars = [
        ("PART_MERGE__MERGE__NUM_THREADS", "9"),
        ("PART_MERGE__MERGE__MAX_FILES_TO_MERGE", "17"),
    ];

    let output = part_merge_with_env(dir.path(), &vars, &["--print-config"]);
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("num_threads = 9"), "{}", stdout);
    assert!(stdout.contains("max_files_to_merge = 17"), "{}", stdout);

    let output = part_merge_with_env(dir.path(), &vars, &["--print-config", "-n", "4"]);
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("num_threads = 4"), "{}", stdout);
    assert!(stdout.contains("max_files_to_merge = 17"), "{}", stdout);
}

#[test]
fn log_dir_receives_rolling_log_file() {
    let dir = workspace(3, 2);
    let logs = tempdir().unwrap();
    let log_dir = logs.path().to_str().unwrap();

    let output = part_merge_with_env(
        dir.path(),
        &[("PART_MERGE__LOGGING__LOG_DIR", log_dir)],
        &[],
    );
    assert!(output.status.success(), "{:?}", output);

    let log_files: Vec<_> = fs::read_dir(logs.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("part_merge.log"))
        .collect();
    assert_eq!(log_files.len(), 1, "{:?}", log_files);

    let contents = fs::read_to_string(logs.path().join(&log_files[0])).unwrap();
    assert!(contents.contains("Entry counts match"), "{}", contents);
}
