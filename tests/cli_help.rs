//! CLI surface smoke tests.

mod common;

use common::*;

#[test]
fn help_lists_subcommands() {
    let env = TestEnv::empty();
    let result = env.run(&["--help"]);

    assert!(result.success, "help failed:\n{}", result.combined_output());
    for subcommand in ["sync", "all", "backup", "config"] {
        assert!(
            result.stdout.contains(subcommand),
            "help missing '{subcommand}':\n{}",
            result.stdout
        );
    }
}

#[test]
fn sync_help_lists_skip_switches() {
    let env = TestEnv::empty();
    let result = env.run(&["sync", "--help"]);

    assert!(result.success);
    for flag in [
        "--dry-run",
        "--skip-source-cleanup",
        "--skip-target-cleanup",
        "--skip-target-import",
        "--transfer-name",
        "--ssh-host",
        "--ssh-portal",
    ] {
        assert!(
            result.stdout.contains(flag),
            "sync help missing '{flag}':\n{}",
            result.stdout
        );
    }
}

#[test]
fn unknown_subcommand_fails() {
    let env = TestEnv::empty();
    let result = env.run(&["frobnicate"]);
    assert!(!result.success);
}

#[test]
fn sync_without_source_environment_fails() {
    let env = TestEnv::with_config(FULL_CONFIG);
    let result = env.run(&["sync", "mariadb"]);
    assert!(!result.success);
    assert!(result.stderr.contains("--source-environment") || result.stderr.contains("required"));
}
