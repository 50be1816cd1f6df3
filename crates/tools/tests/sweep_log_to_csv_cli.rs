use std::fs;
use std::io::Write;
use std::path::Path;

use assert_cmd::Command;
use flate2::write::GzEncoder;
use flate2::Compression;

const HEADER: &str = "epochs,batch_size,learning_rate,mean_accuracy,variance\r\n";
const DELIM: &str = "--------------------------";
const DONE: &str = "Extraction and CSV writing complete.\n";

fn block(epochs: u32, batch: u32, lr: &str, acc: &str, var: &str) -> String {
    format!(
        "Training with epochs: {epochs}, batch_size: {batch}, learning_rate: {lr}\n\
         Fold 1/5 accuracy: {acc}\n\
         mean accuracy over kfold: {acc}\n\
         Variance  over kfold: {var}\n"
    )
}

fn sweep_log() -> String {
    [
        block(10, 16, "0.01", "0.71", "0.0031"),
        "interrupted run, no results\n".to_owned(),
        block(20, 32, "0.001", "0.8734", "0.0021"),
        block(30, 64, "0.0005", "0.9", "0.001"),
    ]
    .join(format!("{DELIM}\n").as_str())
}

const EXPECTED_ROWS: &str = "10,16,0.01,0.71,0.0031\r\n\
                             20,32,0.001,0.8734,0.0021\r\n\
                             30,64,0.0005,0.9,0.001\r\n";

fn cmd() -> Command {
    Command::cargo_bin("sweep_log_to_csv").unwrap()
}

fn run(input: &Path, output: &Path) -> String {
    let assert = cmd()
        .arg(input)
        .arg("--output-csv")
        .arg(output)
        .assert()
        .success();
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

#[test]
fn converts_sweep_log_in_block_order() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("output.txt");
    let output = dir.path().join("results.csv");
    fs::write(&input, sweep_log()).unwrap();

    let stdout = run(&input, &output);
    assert_eq!(stdout, DONE);
    assert_eq!(fs::read_to_string(&output).unwrap(), format!("{HEADER}{EXPECTED_ROWS}"));
}

#[test]
fn uses_default_paths_in_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("output.txt"), sweep_log()).unwrap();

    cmd().current_dir(dir.path()).assert().success().stdout(DONE);
    let csv = fs::read_to_string(dir.path().join("output_results.csv")).unwrap();
    assert_eq!(csv, format!("{HEADER}{EXPECTED_ROWS}"));
}

#[test]
fn empty_input_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("empty.txt");
    let output = dir.path().join("empty.csv");
    fs::write(&input, "").unwrap();

    run(&input, &output);
    assert_eq!(fs::read_to_string(&output).unwrap(), HEADER);
}

#[test]
fn missing_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("results.csv");

    let assert = cmd()
        .arg(dir.path().join("does_not_exist.txt"))
        .arg("--output-csv")
        .arg(&output)
        .assert()
        .failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("failed to read"), "stderr: {stderr}");
    assert!(assert.get_output().stdout.is_empty());
    assert!(!output.exists());
}

#[test]
fn unwritable_output_fails_without_completion_line() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("output.txt");
    let blocker = dir.path().join("file.txt");
    fs::write(&input, sweep_log()).unwrap();
    fs::write(&blocker, "not a directory").unwrap();
    let output = blocker.join("out.csv");

    let assert = cmd().arg(&input).arg("--output-csv").arg(&output).assert().failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("failed to create"), "stderr: {stderr}");
    assert!(assert.get_output().stdout.is_empty());
    assert_eq!(fs::read_to_string(&blocker).unwrap(), "not a directory");
}

#[test]
fn malformed_number_aborts_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("output.txt");
    let output = dir.path().join("results.csv");
    fs::write(&input, block(1, 2, "0.1.2", "0.5", "0.01")).unwrap();

    let assert = cmd().arg(&input).arg("--output-csv").arg(&output).assert().failure();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("learning_rate"), "stderr: {stderr}");
    assert!(!output.exists());
}

#[test]
fn rerun_produces_identical_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("output.txt");
    let output = dir.path().join("results.csv");
    fs::write(&input, sweep_log()).unwrap();

    run(&input, &output);
    let first = fs::read(&output).unwrap();
    run(&input, &output);
    assert_eq!(fs::read(&output).unwrap(), first);
}

#[test]
fn reads_stdin_and_writes_stdout() {
    let assert = cmd()
        .args(["-", "--output-csv", "-"])
        .write_stdin(sweep_log())
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(stdout, format!("{HEADER}{EXPECTED_ROWS}"));
}

#[test]
fn accepts_gzip_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("output.txt.gz");
    let output = dir.path().join("results.csv");
    let mut enc = GzEncoder::new(fs::File::create(&input).unwrap(), Compression::default());
    enc.write_all(sweep_log().as_bytes()).unwrap();
    enc.finish().unwrap();

    run(&input, &output);
    assert_eq!(fs::read_to_string(&output).unwrap(), format!("{HEADER}{EXPECTED_ROWS}"));
}

#[test]
fn custom_delimiter() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("output.txt");
    let output = dir.path().join("results.csv");
    let log = format!("{}#####\n{}", block(1, 2, "0.1", "0.5", "0.01"), block(3, 4, "0.2", "0.6", "0.02"));
    fs::write(&input, log).unwrap();

    cmd()
        .arg(&input)
        .args(["--output-csv"])
        .arg(&output)
        .args(["--delimiter", "#####"])
        .assert()
        .success();
    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        format!("{HEADER}1,2,0.1,0.5,0.01\r\n3,4,0.2,0.6,0.02\r\n")
    );
}

#[test]
fn verbose_reports_skipped_blocks_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("output.txt");
    let output = dir.path().join("results.csv");
    fs::write(&input, sweep_log()).unwrap();

    let assert = cmd()
        .arg(&input)
        .arg("--output-csv")
        .arg(&output)
        .arg("--verbose")
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stdout(DONE);
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("skipped block 1"), "stderr: {stderr}");
    assert!(stderr.contains("extracted 3 records from 4 blocks (1 skipped)"), "stderr: {stderr}");
}

#[test]
fn default_run_is_quiet_on_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("output.txt");
    let output = dir.path().join("results.csv");
    fs::write(&input, sweep_log()).unwrap();

    cmd()
        .arg(&input)
        .arg("--output-csv")
        .arg(&output)
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr("");
}
