#![allow(deprecated)]

#[allow(unused_imports)]
use assert_cmd::cargo::CommandCargoExt;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn cmd(temp: &TempDir) -> assert_cmd::Command {
    let mut c = assert_cmd::Command::cargo_bin("daybook").unwrap();
    c.env("DAYBOOK_DIR", journal_dir(temp))
        .env("DAYBOOK_CONFIG", temp.path().join("config.toml"))
        .env("HOME", temp.path())
        .env("XDG_DATA_HOME", temp.path().join("data"))
        .env("XDG_CONFIG_HOME", temp.path().join("config"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--no-edit");
    c
}

fn journal_dir(temp: &TempDir) -> PathBuf {
    temp.path().join("journal")
}

fn stdout_path(output: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(output).trim().lines().last().unwrap())
}

fn write(path: &Path, text: &str) {
    fs::write(path, text).unwrap();
}

#[test]
fn prints_the_journal_root() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .arg("--path")
        .assert()
        .success()
        .stdout(predicate::str::contains(journal_dir(&temp).to_string_lossy().as_ref()));
}

#[test]
fn offset_creates_the_entry_from_its_template() {
    let temp = TempDir::new().unwrap();
    let out = cmd(&temp).arg("+1").assert().success().get_output().stdout.clone();

    let path = stdout_path(&out);
    assert!(path.starts_with(journal_dir(&temp)));
    assert_eq!(path.extension().and_then(|e| e.to_str()), Some("md"));
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("# "), "{text}");
}

#[test]
fn task_is_appended_to_today() {
    let temp = TempDir::new().unwrap();
    let out = cmd(&temp)
        .args(["task:", "call", "bob"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = fs::read_to_string(stdout_path(&out)).unwrap();
    assert!(text.ends_with("- [ ] call bob\n"), "{text}");
}

#[test]
fn note_links_back_from_today() {
    let temp = TempDir::new().unwrap();
    let out = cmd(&temp)
        .args(["note", "Team", "sync"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let note = stdout_path(&out);
    assert!(note.to_string_lossy().ends_with("-team-sync.md"));
    assert_eq!(fs::read_to_string(&note).unwrap(), "# Team sync\n\n");

    let today = cmd(&temp).arg("today").assert().success().get_output().stdout.clone();
    let entry = fs::read_to_string(stdout_path(&today)).unwrap();
    assert!(entry.contains("- [Team sync]("), "{entry}");
}

#[test]
fn prompt_reads_stdin() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .write_stdin("-1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains(".md"));
}

#[test]
fn end_of_input_cancels_quietly() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."))
        .stderr(predicate::str::contains("daybook:").not());
}

#[test]
fn unknown_input_fails_and_is_logged() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .args(["someday", "maybe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'someday maybe' is not an offset"))
        .stderr(predicate::str::contains("daybook logs"));

    cmd(&temp)
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("someday maybe"));
}

#[test]
fn existing_file_is_opened_as_is() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(journal_dir(&temp)).unwrap();
    write(&journal_dir(&temp).join("ideas.md"), "- one\n");

    cmd(&temp)
        .arg("ideas.md")
        .assert()
        .success()
        .stdout(predicate::str::ends_with("ideas.md\n"));
    assert_eq!(
        fs::read_to_string(journal_dir(&temp).join("ideas.md")).unwrap(),
        "- one\n"
    );
}

#[test]
fn sum_is_printed_and_written() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("calc.md");
    write(&file, "3\n\n4\n5\n");

    cmd(&temp)
        .arg("sum")
        .arg(&file)
        .args(["1:1", "2:1", "3:1", "4:1"])
        .assert()
        .success()
        .stdout("12\n");
    assert_eq!(fs::read_to_string(&file).unwrap(), "3\n12\n4\n5\n");
}

#[test]
fn duration_is_printed_and_written() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("times.md");
    write(&file, "09:00\n\n17:30\n");

    cmd(&temp)
        .arg("duration")
        .arg(&file)
        .args(["1:1-1:6", "2:1", "3:1-3:6"])
        .assert()
        .success()
        .stdout("8.50\n");
    assert_eq!(fs::read_to_string(&file).unwrap(), "09:00\n8.50\n17:30\n");
}

#[test]
fn duration_needs_three_selections() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("times.md");
    write(&file, "09:00\n\n");

    cmd(&temp)
        .arg("duration")
        .arg(&file)
        .args(["1:1-1:6", "2:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Select exactly three ranges"));
    assert_eq!(fs::read_to_string(&file).unwrap(), "09:00\n\n");
}

#[test]
fn time_is_stamped_at_the_cursor() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("log.md");
    write(&file, "started \n");

    let out = cmd(&temp)
        .arg("time")
        .arg(&file)
        .arg("1:9")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let time = String::from_utf8_lossy(&out).trim().to_string();
    assert_eq!(time.len(), 5, "{time}");
    assert_eq!(fs::read_to_string(&file).unwrap(), format!("started {time}\n"));
}

#[test]
fn bad_selection_is_a_usage_error() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .args(["sum", "x.md", "0:1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("start at 1"));
}

#[test]
fn workspace_prints_the_root() {
    let temp = TempDir::new().unwrap();
    cmd(&temp)
        .arg("workspace")
        .assert()
        .success()
        .stdout(predicate::str::contains(journal_dir(&temp).to_string_lossy().as_ref()));
}
