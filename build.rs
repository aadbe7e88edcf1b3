use std::env;
use std::process::Command;

const PREFIX: &str = "COST_SIMULATOR_BUILD";

fn main() {
    for watched in ["build.rs", ".git/HEAD", ".git/refs"] {
        println!("cargo:rerun-if-changed={watched}");
    }

    let git_status = run("git", &["status", "--porcelain"])
        .map(|changes| if changes.is_empty() { "clean" } else { "dirty" })
        .unwrap_or("unknown");
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    let values = [
        ("HASH", run("git", &["rev-parse", "--short", "HEAD"])),
        ("STATUS", Some(git_status.to_string())),
        ("TIMESTAMP", Some(timestamp)),
        ("TARGET", env::var("TARGET").ok()),
        ("PROFILE", env::var("PROFILE").ok()),
        ("RUSTC", run("rustc", &["--version"])),
    ];
    for (key, value) in values {
        let value = value.unwrap_or_else(|| "unknown".to_string());
        println!("cargo:rustc-env={PREFIX}_{key}={value}");
    }
}

/// Trimmed stdout of a successful command; `None` when it fails or is missing.
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|stdout| stdout.trim().to_string())
}
