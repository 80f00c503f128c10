use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

fn config_model_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("config-model"));
    cmd.env("RUST_LOG", "warn");
    cmd
}

fn template_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("templates")
}

fn write_schema(dir: &Path) -> PathBuf {
    let path = dir.join("devicesim.yang");
    fs::write(&path, "module devicesim {}").unwrap();
    path
}

// ---------------------------------------------------------------------------
// compile-plugin
// ---------------------------------------------------------------------------

#[test]
fn malformed_module_key_fails_before_any_output() {
    let work = TempDir::new().unwrap();
    let schema = write_schema(work.path());
    let output = work.path().join("out");

    config_model_cmd()
        .args(["compile-plugin", "-n", "devicesim", "-v", "1.0.0"])
        .arg("-m")
        .arg(format!("devicesim=1.0.0={}", schema.display()))
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(contains("$name@$version"));

    assert!(!output.exists(), "no output directory may be created");
}

#[test]
fn bad_key_is_reported_even_after_valid_keys() {
    let work = TempDir::new().unwrap();
    let output = work.path().join("out");

    // The first module points at a file that does not exist; the key check on
    // the second must still win because keys are parsed before any read.
    config_model_cmd()
        .args(["compile-plugin", "-n", "devicesim", "-v", "1.0.0"])
        .args(["-m", "devicesim@1.0.0=/nonexistent/devicesim.yang"])
        .args(["-m", "broken@"])
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(contains("broken@"))
        .stderr(contains("cannot read module").not());
}

#[test]
fn unreadable_module_file_fails() {
    let work = TempDir::new().unwrap();
    let output = work.path().join("out");

    config_model_cmd()
        .args(["compile-plugin", "-n", "devicesim", "-v", "1.0.0"])
        .arg("-m")
        .arg(format!("devicesim@1.0.0={}", work.path().join("absent.yang").display()))
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(contains("cannot read module devicesim@1.0.0"));

    assert!(!output.exists());
}

#[test]
fn missing_binding_generator_fails_at_bindings_step() {
    let work = TempDir::new().unwrap();
    let schema = write_schema(work.path());
    let output = work.path().join("out");

    config_model_cmd()
        .args(["compile-plugin", "-n", "devicesim", "-v", "1.0.0"])
        .arg("-m")
        .arg(format!("devicesim@1.0.0={}", schema.display()))
        .arg("-o")
        .arg(&output)
        .arg("-t")
        .arg(template_root())
        .args(["--binding-generator", "config-model-no-such-generator"])
        .assert()
        .failure()
        .stderr(contains("failed to compile model devicesim@1.0.0"))
        .stderr(contains("generate bindings"));

    let module = output.join("devicesim_1_0_0");
    assert!(module.join("Cargo.toml").is_file());
    assert!(module.join("src/plugin/plugin.rs").is_file());
    assert!(module.join("yang/devicesim@1.0.0.yang").is_file());
    assert!(!module.join("devicesim.so.1.0.0").exists());
}

#[test]
fn binary_mode_entry_point_has_no_exported_symbol() {
    let work = TempDir::new().unwrap();
    let schema = write_schema(work.path());
    let output = work.path().join("out");

    config_model_cmd()
        .args(["compile-plugin", "-n", "devicesim", "-v", "1.0.0", "--mode", "binary"])
        .arg("-m")
        .arg(format!("devicesim@1.0.0={}", schema.display()))
        .arg("-o")
        .arg(&output)
        .arg("-t")
        .arg(template_root())
        .args(["--binding-generator", "config-model-no-such-generator"])
        .assert()
        .failure();

    let entry = fs::read_to_string(output.join("devicesim_1_0_0/src/lib.rs")).unwrap();
    assert!(!entry.contains("MODEL_PLUGIN"), "got:\n{entry}");
}

#[test]
fn unknown_mode_is_rejected_by_argument_parsing() {
    config_model_cmd()
        .args(["compile-plugin", "-n", "x", "-v", "1", "--mode", "plugin"])
        .assert()
        .failure()
        .stderr(contains("unknown mode 'plugin'"));
}

// ---------------------------------------------------------------------------
// list-models
// ---------------------------------------------------------------------------

#[test]
fn artifacts_only_lists_matching_files() {
    let repo = TempDir::new().unwrap();
    fs::create_dir_all(repo.path().join("devicesim_1_0_0")).unwrap();
    fs::write(repo.path().join("devicesim_1_0_0/devicesim.so.1.0.0"), b"x").unwrap();
    fs::write(repo.path().join("testdevice.so.2.0.0"), b"x").unwrap();
    fs::write(repo.path().join("notes.txt"), b"x").unwrap();

    config_model_cmd()
        .args(["list-models", "--artifacts-only", "--path"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(contains("devicesim.so.1.0.0"))
        .stdout(contains("testdevice.so.2.0.0"))
        .stdout(contains("notes.txt").not());
}

#[test]
fn artifacts_only_reads_path_from_config() {
    let repo = TempDir::new().unwrap();
    fs::write(repo.path().join("devicesim.so.1.0.0"), b"x").unwrap();
    let config = repo.path().join("repository.yaml");
    fs::write(&config, format!("path: {}\n", repo.path().display())).unwrap();

    config_model_cmd()
        .args(["list-models", "--artifacts-only", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(contains("devicesim.so.1.0.0"));
}

#[test]
fn listing_an_empty_repository_succeeds() {
    let repo = TempDir::new().unwrap();
    config_model_cmd()
        .args(["list-models", "--path"])
        .arg(repo.path())
        .assert()
        .success()
        .stdout(contains("No models"));
}

#[test]
fn non_library_artifact_fails_listing() {
    let repo = TempDir::new().unwrap();
    fs::write(repo.path().join("x.so.1"), "plain text").unwrap();

    config_model_cmd()
        .args(["list-models", "--path"])
        .arg(repo.path())
        .assert()
        .failure()
        .stderr(contains("failed to load model artifact"));
}
