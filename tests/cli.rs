use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn missing_workbook_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();

    Command::cargo_bin("climate-plots")
        .unwrap()
        .current_dir(dir.path())
        .env("RUST_LOG", "off")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workbook not found"))
        .stderr(predicate::str::contains("climate-data.xlsx"))
        .stdout(predicate::str::contains("Plots created successfully!").not());

    for file in [
        "climate_yearly_trends.png",
        "climate_monthly_comparison.png",
        "climate_summary_statistics.png",
    ] {
        assert!(!dir.path().join(file).exists(), "{file} was written");
    }
}

#[test]
fn empty_workbook_is_not_a_spreadsheet() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("Misc.")).unwrap();
    std::fs::write(dir.path().join("Misc./climate-data.xlsx"), b"not a zip").unwrap();

    Command::cargo_bin("climate-plots")
        .unwrap()
        .current_dir(dir.path())
        .env("RUST_LOG", "off")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not read workbook"));

    assert!(!dir.path().join("climate_yearly_trends.png").exists());
}
