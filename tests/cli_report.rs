mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

use analytics_core::config::{Config, ConfigManager};

use common::{fixture, temp_base, write_ledger};

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("analytics_core_cli").unwrap();
    cmd.env("ANALYTICS_CORE_HOME", home)
        .env("NO_COLOR", "1")
        .env_remove("ANALYTICS_CORE_LEDGER")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn report_prints_summary_and_insights() {
    let fx = fixture();
    let ledger = write_ledger(&fx.snapshot);
    cli(&temp_base())
        .args(["--ledger", ledger.to_str().unwrap()])
        .args(["--user", &fx.user.to_string()])
        .args(["report", "--date", "2024-03-15"])
        .assert()
        .success()
        .stdout(contains("MARZO 2024"))
        .stdout(contains("Gastos"))
        .stdout(contains("Supermercado"))
        .stdout(contains("Gastas 25% más que el mes pasado"));
}

#[test]
fn report_json_is_machine_readable() {
    let fx = fixture();
    let ledger = write_ledger(&fx.snapshot);
    let output = cli(&temp_base())
        .args(["--ledger", ledger.to_str().unwrap()])
        .args(["--user", &fx.user.to_string(), "--json"])
        .args(["report", "--date", "2024-03-15", "--year"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["mode"], "year");
    assert_eq!(report["label"], "2024");
    assert_eq!(report["monthly"].as_array().unwrap().len(), 12);
    assert_eq!(report["current"]["expense"], 900.0);
}

#[test]
fn ledger_path_falls_back_to_config() {
    let fx = fixture();
    let home = temp_base();
    let manager = ConfigManager::with_base_dir(home.clone()).unwrap();
    manager
        .save(&Config {
            ledger_path: Some(write_ledger(&fx.snapshot)),
            ..Config::default()
        })
        .unwrap();

    cli(&home)
        .args(["--user", &fx.user.to_string()])
        .args(["stats", "--date", "2024-03-01"])
        .assert()
        .success()
        .stdout(contains("Ahorrado"))
        .stdout(contains("30,00"))
        .stdout(contains("250,00"));
}

#[test]
fn explore_lists_top_transactions() {
    let fx = fixture();
    let ledger = write_ledger(&fx.snapshot);
    cli(&temp_base())
        .args(["--ledger", ledger.to_str().unwrap()])
        .args(["--user", &fx.user.to_string()])
        .args(["explore", "--from", "2024-02-01", "--to", "2024-03-31", "--type", "expense"])
        .args(["--group-by", "month", "--limit", "2"])
        .assert()
        .success()
        .stdout(contains("(3 movimientos)"))
        .stdout(contains("feb 2024"))
        .stdout(contains("Compra semanal"))
        .stdout(contains("Alquiler").not());
}

#[test]
fn missing_ledger_is_reported() {
    cli(&temp_base())
        .args(["--user", "5d0f6a2e-9a4b-4f7e-8d1c-2b3a4c5d6e7f", "report"])
        .assert()
        .failure()
        .stderr(contains("no ledger given"));
}
