use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[test]
fn test_processes_jobs_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("jobs.csv");

    let mut wtr = csv::Writer::from_path(&input).unwrap();
    wtr.write_record(["id", "fail"]).unwrap();
    wtr.write_record(["job-0", "false"]).unwrap();
    wtr.write_record(["job-1", "true"]).unwrap();
    wtr.write_record(["job-2", "false"]).unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("microbatch"));
    cmd.arg(&input).args(["--batch-size", "2", "--interval-ms", "10"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("job_id,status,detail"))
        .stdout(predicate::str::contains("job-0,success,"))
        .stdout(predicate::str::contains("job-1,failure,job flagged to fail"))
        .stdout(predicate::str::contains("job-2,success,"));
}

#[test]
fn test_malformed_rows_are_reported_and_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("jobs.csv");

    let mut wtr = csv::Writer::from_path(&input).unwrap();
    wtr.write_record(["id", "fail"]).unwrap();
    wtr.write_record(["job-0", "false"]).unwrap();
    // not a boolean
    wtr.write_record(["job-1", "maybe"]).unwrap();
    wtr.write_record(["job-2", "true"]).unwrap();
    wtr.flush().unwrap();
    drop(wtr);

    let mut cmd = Command::new(cargo_bin!("microbatch"));
    cmd.arg(&input).args(["--interval-ms", "10"]);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Error reading job"))
        .stdout(predicate::str::contains("job-0,success,"))
        .stdout(predicate::str::contains("job-2,failure,"));
}

#[test]
fn test_rejects_invalid_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("jobs.csv");
    std::fs::write(&input, "id,fail\njob-0,false\n").unwrap();

    let mut cmd = Command::new(cargo_bin!("microbatch"));
    cmd.arg(&input).args(["--batch-size", "0"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("max_batch_size must be positive"));
}
