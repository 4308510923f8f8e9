use std::path::PathBuf;
use std::process::Command;

use serde_json::Value;

pub fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .to_path_buf()
}

pub fn charsheet_bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_charsheet"));
    cmd.current_dir(workspace_root());
    // Keep a developer's shell config out of the tests.
    for var in [
        "OPENAI_API_KEY",
        "OPENAI_BASE_URL",
        "CHARSHEET_PROFILE_DIR",
        "CHARSHEET_STUB",
        "CHARSHEET_MAX_RETRIES",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("RUST_LOG", "off");
    cmd
}

/// Run charsheet, assert exit code, return parsed JSON stdout.
#[allow(dead_code)]
pub fn charsheet_json(args: &[&str], expected_exit: i32) -> Value {
    let out = charsheet_bin()
        .args(args)
        .output()
        .expect("failed to run charsheet");
    let code = out.status.code().unwrap_or(-1);
    assert_eq!(
        code,
        expected_exit,
        "exit mismatch for: charsheet {}\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&out.stdout),
        String::from_utf8_lossy(&out.stderr)
    );
    serde_json::from_slice(&out.stdout).unwrap_or_else(|e| {
        panic!(
            "invalid JSON from: charsheet {}\n{e}\nstdout: {}",
            args.join(" "),
            String::from_utf8_lossy(&out.stdout)
        )
    })
}

/// Run charsheet, return stdout as string (exit 0 expected).
#[allow(dead_code)]
pub fn charsheet_stdout(args: &[&str]) -> String {
    let out = charsheet_bin()
        .args(args)
        .output()
        .expect("failed to run charsheet");
    assert!(
        out.status.success(),
        "charsheet {} failed with exit {}\nstderr: {}",
        args.join(" "),
        out.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&out.stderr)
    );
    String::from_utf8_lossy(&out.stdout).to_string()
}
