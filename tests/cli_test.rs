//! Integration tests for the geolocate command line.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn geolocate() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("geolocate");
    for var in [
        "GEOLOCATE_CONFIG",
        "GEOLOCATE_HOST",
        "GEOLOCATE_PORT",
        "GEOLOCATE_MODEL_PATH",
        "GEOLOCATE_DEVICE",
        "GEOLOCATE_THREADS",
        "GEOLOCATE_MAX_UPLOAD_BYTES",
        "CORS_ORIGINS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_subcommands() {
    geolocate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("predict"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_predict_requires_images() {
    geolocate()
        .arg("predict")
        .assert()
        .failure()
        .stderr(predicate::str::contains("<IMAGES>"));
}

#[test]
fn test_predict_with_missing_model_fails() {
    let dir = TempDir::new().unwrap();
    let model = dir.path().join("missing.onnx");
    let image = dir.path().join("scene.png");
    image::RgbImage::new(8, 8).save(&image).unwrap();

    geolocate()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .arg("predict")
        .arg("-m")
        .arg(&model)
        .arg(&image)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("model file does not exist"));
}

#[test]
fn test_config_path_honors_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("geolocate.toml");

    geolocate()
        .arg("--config")
        .arg(&path)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("geolocate.toml"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    geolocate()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(path.is_file());

    geolocate()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    geolocate()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[server]"))
        .stdout(predicate::str::contains("port = 8000"))
        .stdout(predicate::str::contains("http://localhost:3000"));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server\nport = ").unwrap();

    geolocate()
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to parse config file"));
}

#[test]
fn test_serve_rejects_port_zero() {
    let dir = TempDir::new().unwrap();

    geolocate()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["serve", "--port", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration validation failed"));
}

#[test]
fn test_serve_exits_when_model_cannot_load() {
    let dir = TempDir::new().unwrap();

    geolocate()
        .arg("--config")
        .arg(dir.path().join("config.toml"))
        .args(["serve", "--host", "127.0.0.1", "--port", "48213", "-m"])
        .arg(dir.path().join("absent.onnx"))
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("model file does not exist"));
}
