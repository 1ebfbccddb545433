#![cfg(unix)]

use assert_cmd::Command;
use assert_fs::{prelude::FileWriteStr, NamedTempFile};
use std::os::unix::fs::PermissionsExt;

fn fake_solver(answer: &str) -> Result<NamedTempFile, Box<dyn std::error::Error>> {
    let file = NamedTempFile::new("fake_solver.sh")?;
    file.write_str(&format!("#!/bin/sh\nprintf '%s\\n' '{}'\n", answer))?;
    let mut permissions = std::fs::metadata(file.path())?.permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(file.path(), permissions)?;
    Ok(file)
}

fn check_solver_cmd(solver: &NamedTempFile, problem: &str) -> Command {
    let mut cmd = Command::cargo_bin("scrutari").unwrap();
    cmd.arg("check-solver")
        .arg("-s")
        .arg(solver.path())
        .arg("-p")
        .arg(problem)
        .arg("--max-depth")
        .arg("0")
        .arg("--logging-level")
        .arg("off");
    cmd
}

#[test]
fn test_correct_answer_on_empty_framework() -> Result<(), Box<dyn std::error::Error>> {
    // the only complete extension of the empty framework is the empty set
    let solver = fake_solver("[[]]")?;
    check_solver_cmd(&solver, "EE-CO").assert().success();
    solver.close()?;
    Ok(())
}

#[test]
fn test_wrong_answer_on_empty_framework() -> Result<(), Box<dyn std::error::Error>> {
    let solver = fake_solver("[[a]]")?;
    check_solver_cmd(&solver, "EE-CO").assert().failure();
    solver.close()?;
    Ok(())
}

#[test]
fn test_malformed_answer() -> Result<(), Box<dyn std::error::Error>> {
    let solver = fake_solver("[[a],")?;
    check_solver_cmd(&solver, "EE-CO").assert().failure();
    solver.close()?;
    Ok(())
}

#[test]
fn test_acceptance_queries_skip_the_empty_framework() -> Result<(), Box<dyn std::error::Error>> {
    // no argument to decide on: the instance is skipped and no check fails
    let solver = fake_solver("YES")?;
    check_solver_cmd(&solver, "DC-CO").assert().success();
    solver.close()?;
    Ok(())
}

#[test]
fn test_combined_track_on_empty_framework() -> Result<(), Box<dyn std::error::Error>> {
    let solver = fake_solver("[[]],[[]],[[]]")?;
    check_solver_cmd(&solver, "D3").assert().success();
    solver.close()?;
    Ok(())
}

#[test]
fn test_combined_track_has_no_dynamic_track() -> Result<(), Box<dyn std::error::Error>> {
    let solver = fake_solver("[[]],[[]],[[]]")?;
    check_solver_cmd(&solver, "D3").arg("--dynamics").assert().failure();
    solver.close()?;
    Ok(())
}

#[test]
fn test_missing_solver() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("scrutari")?;
    cmd.arg("check-solver")
        .arg("-s")
        .arg("/does/not/exist")
        .arg("-p")
        .arg("EE-CO")
        .arg("--max-depth")
        .arg("0")
        .arg("--logging-level")
        .arg("off");
    cmd.assert().failure();
    Ok(())
}
