//! The `config --json` output is the prerequisite-probe wire document.

mod common;

use common::*;

#[test]
fn config_json_emits_probe_document() {
    let env = TestEnv::with_config(FULL_CONFIG);
    let result = env.run(&["config", "--json"]);

    assert!(
        result.success,
        "config --json failed:\n{}",
        result.combined_output()
    );

    let doc = result.json();
    assert!(doc["version"].is_string());
    let checks = doc["checks"].as_array().expect("checks array");
    let rsync = checks
        .iter()
        .find(|c| c["name"] == "rsync-path")
        .expect("rsync-path fact present");
    // Either a usable path with status ok, or explicitly missing
    match rsync["status"].as_str() {
        Some("ok") => assert!(!rsync["value"].as_str().unwrap_or_default().is_empty()),
        Some("missing") => assert_eq!(rsync["value"], ""),
        other => panic!("unexpected status: {other:?}"),
    }
}

#[test]
fn config_json_answers_without_a_config_file() {
    let env = TestEnv::empty();
    let result = env.run(&["config", "--json"]);

    assert!(
        result.success,
        "probe must answer on a bare machine:\n{}",
        result.combined_output()
    );
    let doc = result.json();
    assert!(doc["checks"].as_array().is_some());
}

#[test]
fn config_human_output_lists_syncers() {
    let env = TestEnv::with_config(FULL_CONFIG);
    let result = env.run(&["config"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("acme"));
    assert!(result.stdout.contains("mariadb"));
    assert!(result.stdout.contains("logs (files)"));
}

#[test]
fn config_human_output_fails_without_config() {
    let env = TestEnv::empty();
    let result = env.run(&["config"]);
    assert!(!result.success);
    assert!(result.stderr.contains("no configuration file found"));
}

#[test]
fn config_flag_points_at_explicit_file() {
    let env = TestEnv::empty();
    env.write_project_file("elsewhere.yml", MINIMAL_CONFIG);
    let result = env.run(&["--config", "elsewhere.yml", "config"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("acme"));
}

#[test]
fn config_env_var_points_at_explicit_file() {
    let env = TestEnv::empty();
    env.write_project_file("via-env.yml", MINIMAL_CONFIG);
    let result = env.run_with_env(&["config"], &[("PORTSIDE_CONFIG", "via-env.yml")]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("acme"));
}
