#![forbid(unsafe_code)]
//! Black-box CLI tests: the binary's exit-code and stdout contract (§6).

use assert_cmd::Command;
use predicates::str::contains;
use std::io::Write;

fn bin() -> Command {
    Command::cargo_bin("garde-veto-cli").unwrap()
}

#[test]
fn solve_over_a_trivial_horizon_succeeds_and_writes_history() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.json");
    let out_path = dir.path().join("schedule.json");
    let history_path = dir.path().join("history.json");

    std::fs::write(
        &roster_path,
        r#"[
            {"id": "alice", "rest_days": [], "vacations": []},
            {"id": "bob", "rest_days": [], "vacations": []},
            {"id": "carol", "rest_days": [], "vacations": []}
        ]"#,
    )
    .unwrap();

    bin()
        .arg("--history")
        .arg(&history_path)
        .arg("solve")
        .arg("--roster")
        .arg(&roster_path)
        .arg("--start")
        .arg("2026-01-05")
        .arg("--end")
        .arg("2026-01-05")
        .arg("--out")
        .arg(&out_path)
        .arg("--period")
        .arg("2026-W02")
        .arg("--time-budget-secs")
        .arg("5")
        .assert()
        .success()
        .stdout(contains("Schedule written"));

    assert!(out_path.exists());
    assert!(history_path.exists());
}

#[test]
fn solve_with_only_one_eligible_vet_reports_infeasible_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let roster_path = dir.path().join("roster.json");
    let out_path = dir.path().join("schedule.json");

    std::fs::write(
        &roster_path,
        r#"[
            {"id": "alice", "rest_days": [], "vacations": []},
            {"id": "bob", "rest_days": [], "vacations": ["2026-01-05"]},
            {"id": "carol", "rest_days": [], "vacations": ["2026-01-05"]}
        ]"#,
    )
    .unwrap();

    bin()
        .arg("--history")
        .arg(dir.path().join("history.json"))
        .arg("solve")
        .arg("--roster")
        .arg(&roster_path)
        .arg("--start")
        .arg("2026-01-05")
        .arg("--end")
        .arg("2026-01-05")
        .arg("--out")
        .arg(&out_path)
        .arg("--period")
        .arg("2026-W02")
        .arg("--time-budget-secs")
        .arg("5")
        .assert()
        .code(1)
        .stderr(contains("Infeasible"));
}

#[test]
fn import_roster_writes_a_json_array() {
    let dir = tempfile::tempdir().unwrap();
    let mut csv = tempfile::NamedTempFile::new_in(dir.path()).unwrap();
    writeln!(csv, "handle,rest_days,vacations").unwrap();
    writeln!(csv, "alice,0,").unwrap();
    let out_path = dir.path().join("roster.json");

    bin()
        .arg("import-roster")
        .arg("--csv")
        .arg(csv.path())
        .arg("--out")
        .arg(&out_path)
        .assert()
        .success()
        .stdout(contains("Imported 1 vet"));

    let data = std::fs::read_to_string(&out_path).unwrap();
    assert!(data.contains("alice"));
}
