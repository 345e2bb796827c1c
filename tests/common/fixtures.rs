//! Reusable configuration fixtures.

/// A configuration with one syncer of each flavor plus a files alias.
pub const FULL_CONFIG: &str = r#"
project: acme
ssh:
  host: ssh.acme.example
  port: "32222"
syncers:
  mariadb:
    config:
      hostname: db
      username: app
      password: secret
      port: "3306"
      database: appdb
    local:
      hostname: "127.0.0.1"
  files:
    config:
      sync_directory: /app/files
      exclude: [css, js]
  logs:
    type: files
    config:
      sync_directory: /var/log/app
  custom:
    config:
      transfer_resource: /tmp/acme-state.tar
      source_commands: ["tar -cf {{ transfer_resource }} state/"]
      target_commands: ["tar -xf {{ transfer_resource }}"]
"#;

/// Minimal configuration with just a project name.
pub const MINIMAL_CONFIG: &str = "project: acme\n";

/// Configuration with a misspelled key under `ssh`.
pub const TYPO_CONFIG: &str = "project: acme\nssh:\n  hots: ssh.acme.example\n";
