use std::process::Command;

fn temp_path(label: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "overflow-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

#[test]
fn cli_writes_json_report_to_file() {
    let exe = env!("CARGO_BIN_EXE_overflow-cli");
    let output_path = temp_path("json");
    let status = Command::new(exe)
        .args([
            "--trials", "200", "--workers", "2", "--seed", "0xBEEF", "--report", "json",
            "--output",
        ])
        .arg(&output_path)
        .status()
        .expect("run cli");
    assert!(status.success());
    let content = std::fs::read_to_string(&output_path).expect("read output");
    let value: serde_json::Value = serde_json::from_str(&content).expect("valid json");
    assert_eq!(value["seed"], 0xBEEF);
    assert_eq!(
        value["historical"]["overflow_series"]
            .as_array()
            .map(Vec::len),
        Some(200)
    );
    assert_eq!(value["future"]["bands"].as_array().map(Vec::len), Some(5));
    let _ = std::fs::remove_file(output_path);
}

#[test]
fn cli_is_reproducible_across_worker_counts() {
    let exe = env!("CARGO_BIN_EXE_overflow-cli");
    let run = |workers: &str| {
        let output = Command::new(exe)
            .args([
                "--mode", "future", "--trials", "150", "--workers", workers, "--report", "csv",
            ])
            .output()
            .expect("run cli");
        assert!(output.status.success());
        String::from_utf8(output.stdout).expect("utf8 csv")
    };
    assert_eq!(run("1"), run("3"));
}

#[test]
fn cli_console_report_lists_members() {
    let exe = env!("CARGO_BIN_EXE_overflow-cli");
    let output = Command::new(exe)
        .args(["--mode", "historical", "--trials", "50"])
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Overflow Simulator"));
    assert!(stdout.contains("Diluc"));
    assert!(stdout.contains("Total time"));
}

#[test]
fn cli_rejects_unknown_member() {
    let exe = env!("CARGO_BIN_EXE_overflow-cli");
    let output = Command::new(exe)
        .args(["--mode", "future", "--trials", "10", "--copies", "Nobody=2"])
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Nobody"), "{stderr}");
}

#[test]
fn cli_rejects_config_with_unknown_pool_size() {
    let exe = env!("CARGO_BIN_EXE_overflow-cli");
    let config_path = temp_path("config");
    std::fs::write(&config_path, r#"{"future": {"years": 9}}"#).expect("write config");
    let output = Command::new(exe)
        .args(["--trials", "10", "--config"])
        .arg(&config_path)
        .output()
        .expect("run cli");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("pool size"), "{stderr}");
    let _ = std::fs::remove_file(config_path);
}
