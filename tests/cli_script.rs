use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("daily_ledger_cli").unwrap();
    cmd.env("DAILY_LEDGER_CLI_SCRIPT", "1")
        .env("DAILY_LEDGER_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "add income 50000 2024-01-01 Salary\n\
                 add expense 20000 2024-01-02 Food\n\
                 list\n\
                 summary\n\
                 exit\n";

    cli(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Rp 50.000"))
        .stdout(contains("Rp 30.000"))
        .stdout(contains("Salary"));

    let json = std::fs::read_to_string(home.path().join("simple_finance_tx_v1.json")).unwrap();
    assert!(json.contains("\"expense\""));
}

#[test]
fn data_survives_between_sessions() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add expense 1500 2024-06-01 Coffee\n")
        .assert()
        .success();

    cli(&home)
        .write_stdin("list\n")
        .assert()
        .success()
        .stdout(contains("Coffee"))
        .stdout(contains("Rp 1.500"));
}

#[test]
fn validation_errors_do_not_stop_the_script() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add expense 0 2024-01-01\nadd income 10 2024-01-01\nsummary\n")
        .assert()
        .success()
        .stdout(contains("Rp 10"));
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("sumary\n")
        .assert()
        .success()
        .stdout(contains("Unknown command").and(contains("summary")));
}

#[test]
fn export_of_empty_ledger_reports_nothing_to_export() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("export\n")
        .assert()
        .success()
        .stdout(contains("No data to export."));
    assert!(!home.path().join("exports").exists());
}

#[test]
fn export_defaults_to_the_data_directory() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add income 5 2024-01-01\nexport\n")
        .assert()
        .success()
        .stdout(contains("Exported 1 transaction(s)"));

    let exports: Vec<_> = std::fs::read_dir(home.path().join("exports"))
        .unwrap()
        .collect();
    assert_eq!(exports.len(), 1);
}

#[test]
fn corrupt_storage_is_reported_and_reset() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("simple_finance_tx_v1.json"), "garbage").unwrap();
    cli(&home)
        .write_stdin("list\n")
        .assert()
        .success()
        .stdout(contains("corrupt"))
        .stdout(contains("No transactions recorded."));
}

#[test]
fn oversized_amounts_are_refused() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add income 10000000000000000000 2024-01-01\nlist\n")
        .assert()
        .success()
        .stdout(contains("larger than the maximum"))
        .stdout(contains("No transactions recorded."));
}

#[test]
fn aliases_dispatch_like_their_commands() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .write_stdin("add income 7 2024-01-01 Tips\nls\nrm 1\nquit\nadd income 9 2024-01-02 Late\n")
        .assert()
        .success()
        .stdout(contains("Tips"))
        .stdout(contains("No transaction with id 1."));

    let json = std::fs::read_to_string(home.path().join("simple_finance_tx_v1.json")).unwrap();
    assert!(json.contains("Tips"));
    assert!(!json.contains("Late"));
}
