#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Command with an isolated (missing) configuration file.
pub fn glc(name: &str) -> Command {
    let mut cmd = cargo_bin_cmd!("glucolog");
    cmd.args(["--config-file", &temp_conf(name)]);
    cmd
}

fn temp_conf(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_glucolog.conf"));
    path.to_string_lossy().to_string()
}

/// Unique data file path inside the system temp dir, removed if present
pub fn setup_test_data(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_glucolog.csv"));
    let data = path.to_string_lossy().to_string();
    fs::remove_file(&data).ok();
    fs::remove_file(format!("{data}.lock")).ok();
    data
}

/// Temporary output file path inside tempdir, removed if present
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{name}_out.{ext}"));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Add one reading through the CLI
pub fn add_reading(name: &str, data: &str, date: &str, time: &str, glucose: &str, insulin: &str, notes: &str) {
    glc(name)
        .args([
            "--data", data, "add", "--date", date, "--time", time, "--glucose", glucose,
            "--insulin", insulin, "--notes", notes,
        ])
        .assert()
        .success();
}

/// The two readings used by most tests
pub fn init_data_with_readings(name: &str, data: &str) {
    glc(name)
        .args(["--data", data, "--test", "init"])
        .assert()
        .success();

    add_reading(name, data, "2024-01-01", "08:00", "110", "2", "");
    add_reading(name, data, "2024-01-01", "20:00", "140", "3", "after dinner");
}
