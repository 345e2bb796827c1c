use std::fs;

use super::*;

fn write_config(dir: &std::path::Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

const BASIC_CONFIG: &str = r#"
project: my-app
ssh:
  host: ssh.example.com
  port: "32222"
syncers:
  mariadb:
    config:
      hostname: db
      username: app
      password: secret
      port: "3306"
      database: appdb
  files:
    config:
      sync_directory: /app/files
  logs:
    type: files
    config:
      sync_directory: /var/log/app
"#;

#[test]
fn parses_basic_config() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(temp.path(), "config.yml", BASIC_CONFIG);

    let loaded = load_with_override(&path, None).unwrap();
    assert_eq!(loaded.config.project, "my-app");
    assert_eq!(loaded.config.ssh.host, "ssh.example.com");
    assert_eq!(loaded.config.ssh.port, "32222");
    assert_eq!(loaded.config.syncers.len(), 3);
    assert!(loaded.warnings.is_empty());
}

#[test]
fn alias_entry_carries_type() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(temp.path(), "config.yml", BASIC_CONFIG);

    let loaded = load_with_override(&path, None).unwrap();
    let logs = &loaded.config.syncers["logs"];
    assert_eq!(logs.kind.as_deref(), Some("files"));
    let mariadb = &loaded.config.syncers["mariadb"];
    assert!(mariadb.kind.is_none());
}

#[test]
fn unknown_key_produces_warning_with_suggestion() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(
        temp.path(),
        "config.yml",
        "project: my-app\nssh:\n  hots: ssh.example.com\n",
    );

    let loaded = load_with_override(&path, None).unwrap();
    assert_eq!(loaded.warnings.len(), 1);
    let warning = &loaded.warnings[0];
    assert_eq!(warning.key, "hots");
    assert_eq!(warning.suggestion.as_deref(), Some("host"));
    assert_eq!(warning.line, Some(3));
}

#[test]
fn override_file_wins_field_by_field() {
    let temp = tempfile::tempdir().unwrap();
    let base = write_config(temp.path(), "config.yml", BASIC_CONFIG);
    let over = write_config(
        temp.path(),
        "override.yml",
        "ssh:\n  host: ssh.internal\n",
    );

    let loaded = load_with_override(&base, Some(&over)).unwrap();
    // Overridden field
    assert_eq!(loaded.config.ssh.host, "ssh.internal");
    // Untouched sibling field survives the merge
    assert_eq!(loaded.config.ssh.port, "32222");
    assert_eq!(loaded.config.project, "my-app");
}

#[test]
fn missing_config_reports_searched_paths() {
    let missing = std::path::Path::new("/nonexistent/.portside.yml");
    let err = discover(Some(missing)).unwrap_err();
    match err {
        crate::error::PortsideError::ConfigNotFound { searched } => {
            assert_eq!(searched, vec![missing.to_path_buf()]);
        }
        other => panic!("expected ConfigNotFound, got {other:?}"),
    }
}

#[test]
fn invalid_yaml_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(temp.path(), "config.yml", "project: [unclosed");
    assert!(load_with_override(&path, None).is_err());
}

#[test]
fn empty_sections_default() {
    let temp = tempfile::tempdir().unwrap();
    let path = write_config(temp.path(), "config.yml", "project: my-app\n");

    let loaded = load_with_override(&path, None).unwrap();
    assert!(loaded.config.ssh.host.is_empty());
    assert!(!loaded.config.api.ssh_portal);
    assert!(loaded.config.syncers.is_empty());
}
