use assert_cmd::Command;
use predicates::prelude::predicate;

#[test]
fn test_problems() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("scrutari")?;
    cmd.arg("problems").arg("--logging-level").arg("off");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("EE-CO"))
        .stdout(predicate::str::contains("DS-STG"))
        .stdout(predicate::str::contains("D3"));
    Ok(())
}

#[test]
fn test_unknown_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("scrutari")?;
    cmd.arg("foo");
    cmd.assert().failure();
    Ok(())
}
