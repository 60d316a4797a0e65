use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

const ITEMS: &str = "\
# estimates
Item 1: 0.75 hour, 15 minutes
Item 2: 15 minutes
Item 3: 60 seconds
";

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture should be written");
    path
}

fn command() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_refscale"));
    command.env_remove("REFSCALE_UNITS_DIR").env_remove("RUST_LOG");
    command
}

fn run_refscale<I, S>(args: I) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    command()
        .args(args)
        .output()
        .expect("refscale command should execute")
}

fn assert_success(output: &Output) {
    if !output.status.success() {
        panic!(
            "command failed with status {:?}\nstdout:\n{}\nstderr:\n{}",
            output.status.code(),
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
    }
}

fn stdout_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_text(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn parse_json_stdout(output: &Output) -> Value {
    serde_json::from_slice::<Value>(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout should be valid json ({e})\nstdout:\n{}",
            stdout_text(output)
        )
    })
}

#[test]
fn test_scale_to_year() {
    let temp = TempDir::new().unwrap();
    let items = write(temp.path(), "items.txt", ITEMS);

    let output = command()
        .arg("scale")
        .arg(&items)
        .args(["--scale", "1 year"])
        .output()
        .expect("refscale command should execute");
    assert_success(&output);

    insta::assert_snapshot!(stdout_text(&output).trim_end(), @r###"
    Item 1: 1 year
    Item 2: 3 month, 1 day, 6.00 hour
    Item 3: 6 day, 2 hour
    "###);
}

#[test]
fn test_scale_unscaled_with_unit_cap() {
    let temp = TempDir::new().unwrap();
    let items = write(temp.path(), "items.txt", "long: 90 minutes\nshort: 1 min\n");

    let output = command()
        .arg("scale")
        .arg(&items)
        .args(["--units", "1"])
        .output()
        .expect("refscale command should execute");
    assert_success(&output);
    assert_eq!(stdout_text(&output), "long: 1.50 hour\nshort: 1.00 minute\n");
}

#[test]
fn test_scale_json() {
    let temp = TempDir::new().unwrap();
    let items = write(temp.path(), "items.txt", ITEMS);

    let output = command()
        .arg("scale")
        .arg(&items)
        .args(["--scale", "23 hours, 60 minutes", "--json"])
        .output()
        .expect("refscale command should execute");
    assert_success(&output);

    let rows = parse_json_stdout(&output);
    let rows = rows.as_array().expect("json output should be an array");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["label"], "Item 1");
    assert_eq!(rows[0]["value"], 86400.0);
    assert_eq!(rows[0]["text"], "1 day");
    assert_eq!(rows[1]["value"], 21600.0);
    assert_eq!(rows[1]["text"], "6 hour");
    assert_eq!(rows[2]["label"], "Item 3");
    assert_eq!(rows[2]["text"], "24 minute");
}

#[test]
fn test_scale_from_stdin() {
    let mut child = command()
        .args(["scale", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("refscale command should spawn");
    child
        .stdin
        .take()
        .expect("stdin should be piped")
        .write_all(b"a: 30 min\nb: 2 hours\n")
        .expect("stdin should accept input");
    let output = child.wait_with_output().expect("refscale should finish");
    assert_success(&output);
    assert_eq!(
        stdout_text(&output),
        "b: 2 hour\na: 30 minute\n"
    );
}

#[test]
fn test_units_from_directory() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "beats.json",
        r#"[{"name": "beat", "value": 1, "aliases": ["beats"]},
            {"name": "bar", "value": 4, "aliases": ["bars"]}]"#,
    );
    let items = write(temp.path(), "song.txt", "verse: 16 bars\nfill: 6 beats\n");

    let output = command()
        .arg("scale")
        .arg(&items)
        .arg("--units-dir")
        .arg(temp.path())
        .args(["--units", "2"])
        .output()
        .expect("refscale command should execute");
    assert_success(&output);
    assert_eq!(stdout_text(&output), "verse: 16 bar\nfill: 1 bar, 2.00 beat\n");

    let output = command()
        .arg("units")
        .env("REFSCALE_UNITS_DIR", temp.path())
        .output()
        .expect("refscale command should execute");
    assert_success(&output);
    let export = parse_json_stdout(&output);
    let keys: Vec<&String> = export.as_object().expect("object").keys().collect();
    assert_eq!(keys, vec!["beats"]);
    assert_eq!(export["beats"][1]["name"], "bar");
}

#[test]
fn test_units_bundled() {
    let output = run_refscale(["units"]);
    assert_success(&output);

    let export = parse_json_stdout(&output);
    let keys: Vec<&String> = export.as_object().expect("object").keys().collect();
    assert_eq!(keys, vec!["data", "length", "mass", "time"]);
    assert_eq!(export["time"][1]["name"], "second");
    assert_eq!(export["time"][1]["value"], 1.0);
}

#[test]
fn test_failure_exit_code() {
    let temp = TempDir::new().unwrap();
    let items = write(temp.path(), "items.txt", "a: 1 hour\nb: 3 kg\n");

    let output = command()
        .arg("scale")
        .arg(&items)
        .output()
        .expect("refscale command should execute");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = stderr_text(&output);
    assert!(stderr.starts_with("error: failed to load enlistment from"), "{stderr}");
    assert!(stderr.contains("line 2: failed to add entry 'b: 3 kg'"), "{stderr}");
}

#[test]
fn test_failure_json_report() {
    let temp = TempDir::new().unwrap();
    let items = write(temp.path(), "items.txt", "a: 1 hour\n");

    let output = command()
        .arg("scale")
        .arg(&items)
        .args(["--scale", "2 parsec", "--json"])
        .output()
        .expect("refscale command should execute");
    assert_eq!(output.status.code(), Some(1));

    let report: Value =
        serde_json::from_slice(&output.stderr).expect("stderr should carry a json report");
    assert_eq!(report["code"], "LOOKUP_ERROR");
    assert_eq!(report["message"], "alias 'parsec' not found");
    assert_eq!(
        report["context"][0],
        "failed to create measure value from '2 parsec'"
    );
}

#[test]
fn test_missing_input_file() {
    let temp = TempDir::new().unwrap();
    let output = command()
        .arg("scale")
        .arg(temp.path().join("absent.txt"))
        .output()
        .expect("refscale command should execute");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_text(&output).starts_with("error: failed to read"));
}

#[test]
fn test_argument_error_exit_code() {
    let output = run_refscale(["scale"]);
    assert_eq!(output.status.code(), Some(2));

    let output = run_refscale(["scale", "items.txt", "--units", "many"]);
    assert_eq!(output.status.code(), Some(2));
}
