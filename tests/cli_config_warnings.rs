//! Unknown configuration keys warn without failing.

mod common;

use common::*;

#[test]
fn unknown_key_warns_with_suggestion() {
    let env = TestEnv::with_config(TYPO_CONFIG);
    let result = env.run(&["config"]);

    assert!(
        result.success,
        "unknown keys must not be fatal:\n{}",
        result.combined_output()
    );
    assert!(result.stderr.contains("Unknown config key 'hots'"));
    assert!(result.stderr.contains("Did you mean 'host'?"));
}

#[test]
fn override_file_is_merged_on_top() {
    let env = TestEnv::with_config(FULL_CONFIG);
    env.write_project_file(".portside.override.yml", "project: acme-dev\n");
    let result = env.run(&["config"]);

    assert!(result.success, "{}", result.combined_output());
    assert!(result.stdout.contains("acme-dev"));
}
