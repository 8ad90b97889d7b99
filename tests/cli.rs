use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn portal(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("portal").unwrap();
    cmd.env("PORTAL_REPORTS_HOME", home.path())
        .env_remove("RUST_LOG");
    cmd
}

fn write_rows(home: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = home.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

const TRIAL_BALANCE: &str = r#"[
    {"AccountCode":"A100","AccountName":"Cash","ClosingBalance":100},
    {"AccountCode":"A200","AccountName":"Debtors","ClosingBalance":-50},
    {"AccountCode":"L100","AccountName":"Creditors","ClosingBalance":30}
]"#;

#[test]
fn test_list_reports() {
    let home = TempDir::new().unwrap();
    portal(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("trial-balance"))
        .stdout(predicate::str::contains("ie-cost-center"));
}

#[test]
fn test_render_csv_to_stdout() {
    let home = TempDir::new().unwrap();
    let input = write_rows(&home, "tb.json", TRIAL_BALANCE);

    portal(&home)
        .args(["render", "trial-balance", "--scope-id", "510", "--period", "2024-06"])
        .arg("--input")
        .arg(&input)
        .args(["--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Assets,,0.00,0.00,0.00,50.00"))
        .stdout(predicate::str::contains("Grand Total,,0.00,0.00,0.00,80.00"));
}

#[test]
fn test_render_writes_default_file_name() {
    let home = TempDir::new().unwrap();
    let input = write_rows(&home, "tb.json", TRIAL_BALANCE);

    portal(&home)
        .args(["render", "trial-balance", "--scope-id", "510", "--period", "2024-06"])
        .args(["--format", "html"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("TrialBalance_510_2024-06.html"));

    let written = home
        .path()
        .join("exports")
        .join("TrialBalance_510_2024-06.html");
    let html = std::fs::read_to_string(written).unwrap();
    assert!(html.contains("<tr class=\"grand-total\">"));
}

#[test]
fn test_cross_tab_from_csv_input() {
    let home = TempDir::new().unwrap();
    let input = write_rows(
        &home,
        "ie.csv",
        "AccountCode,AccountName,CatFlag,DeptId,Actual\n\
         4100,Rates,I,CC1,100\n\
         4100,Rates,I,CC2,50\n\
         5100,Fuel,X,CC1,30\n",
    );

    portal(&home)
        .args(["render", "ie-cost-center", "--scope-id", "R1", "--period", "2024-06", "-o", "-"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Code,Name,CC1,CC2,Total"))
        .stdout(predicate::str::contains("5100,Fuel,30.00,0.00,30.00"))
        .stdout(predicate::str::contains("Grand Total,,130.00,50.00,180.00"));
}

#[test]
fn test_preview_prints_table() {
    let home = TempDir::new().unwrap();
    let input = write_rows(&home, "tb.json", TRIAL_BALANCE);

    portal(&home)
        .args(["preview", "trial-balance", "--scope-id", "510", "--period", "2024-06"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Liabilities"))
        .stdout(predicate::str::contains("(50.00)"));
}

#[test]
fn test_unknown_report_fails() {
    let home = TempDir::new().unwrap();
    let input = write_rows(&home, "tb.json", TRIAL_BALANCE);

    portal(&home)
        .args(["render", "balance-sheet", "--scope-id", "510", "--period", "2024-06"])
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown report: balance-sheet"));
}

#[test]
fn test_blank_scope_id_fails() {
    let home = TempDir::new().unwrap();
    let input = write_rows(&home, "tb.json", TRIAL_BALANCE);

    portal(&home)
        .args(["render", "trial-balance", "--scope-id", "", "--period", "2024-06"])
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error: scope id cannot be empty"));
}

#[test]
fn test_settings_zero_policy_override() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.json"),
        r#"{"organization":"Water Board","zero_policies":{"trial-balance":{"missing":"-","zero":"-"}}}"#,
    )
    .unwrap();
    let input = write_rows(&home, "tb.json", TRIAL_BALANCE);

    portal(&home)
        .args(["render", "trial-balance", "--scope-id", "510", "--period", "2024-06", "-o", "-"])
        .arg("--input")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("\"Trial Balance\"\n\"Water Board\""))
        .stdout(predicate::str::contains("Grand Total,,-,-,-,80.00"));
}

#[test]
fn test_config_shows_paths() {
    let home = TempDir::new().unwrap();
    portal(&home)
        .args(["config", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.json"));
    assert!(home.path().join("config.json").exists());
}
