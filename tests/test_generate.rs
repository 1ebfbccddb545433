use assert_cmd::Command;
use assert_fs::TempDir;

#[test]
fn test_generate_static_instances() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut cmd = Command::cargo_bin("scrutari")?;
    cmd.arg("generate")
        .arg("--semantics")
        .arg("CO")
        .arg("-o")
        .arg(dir.path())
        .arg("--max-depth")
        .arg("1")
        .arg("--logging-level")
        .arg("off");
    cmd.assert().success();
    // depth 1 from the empty framework: the root and a one-argument child
    assert_eq!(
        "",
        std::fs::read_to_string(dir.path().join("instance_0000.apx"))?
    );
    assert_eq!(
        "[\n[]\n]\n",
        std::fs::read_to_string(dir.path().join("instance_0000.exts"))?
    );
    assert_eq!(
        "arg(a0).\n",
        std::fs::read_to_string(dir.path().join("instance_0001.apx"))?
    );
    assert_eq!(
        "[\n[a0]\n]\n",
        std::fs::read_to_string(dir.path().join("instance_0001.exts"))?
    );
    dir.close()?;
    Ok(())
}

#[test]
fn test_generate_dynamic_instances() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut cmd = Command::cargo_bin("scrutari")?;
    cmd.arg("generate")
        .arg("--semantics")
        .arg("ST")
        .arg("-o")
        .arg(dir.path())
        .arg("--max-depth")
        .arg("1")
        .arg("--dynamics")
        .arg("--logging-level")
        .arg("off");
    cmd.assert().success();
    assert!(dir.path().join("instance_0000.apx").is_file());
    assert!(dir.path().join("instance_0000.apxm").is_file());
    assert!(dir.path().join("instance_0000.exts").is_file());
    dir.close()?;
    Ok(())
}

#[test]
fn test_generate_unknown_semantics() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let mut cmd = Command::cargo_bin("scrutari")?;
    cmd.arg("generate")
        .arg("--semantics")
        .arg("foo")
        .arg("-o")
        .arg(dir.path());
    cmd.assert().failure();
    dir.close()?;
    Ok(())
}
