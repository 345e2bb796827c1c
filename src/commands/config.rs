//! Configuration inspection.
//!
//! With `--json` this prints the prerequisite-probe document other
//! portside instances parse when probing this machine: the tool version
//! plus `{name, value, status}` facts, including `rsync-path`.

use anyhow::Result;

use portside::config::LoadedConfig;
use portside::error::PortsideError;
use portside::prerequisite::find_rsync_on_path;
use portside::ui;

use crate::cli::ConfigCmd;

pub fn cmd_config(config_flag: Option<&std::path::Path>, json: bool, _cmd: &ConfigCmd) -> Result<()> {
    let loaded = match portside::config::discover(config_flag) {
        Ok(loaded) => loaded,
        // The probe must answer even on a bare machine with no config.
        Err(PortsideError::ConfigNotFound { .. }) if json => {
            println!("{}", serde_json::to_string(&probe_document(None))?);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string(&probe_document(Some(&loaded)))?
        );
        return Ok(());
    }

    ui::print_config_warnings(&loaded.warnings);

    println!("Configuration: {}", loaded.path.display());
    println!("Project:       {}", loaded.config.project);
    if !loaded.config.ssh.host.is_empty() {
        println!(
            "SSH:           {}:{}",
            loaded.config.ssh.host, loaded.config.ssh.port
        );
    }
    if loaded.config.api.ssh_portal {
        println!("SSH portal:    {}", loaded.config.api.endpoint);
    }

    println!("Syncers:");
    for (name, entry) in &loaded.config.syncers {
        match &entry.kind {
            Some(kind) => println!("  {name} ({kind})"),
            None => println!("  {name}"),
        }
    }

    Ok(())
}

fn probe_document(loaded: Option<&LoadedConfig>) -> serde_json::Value {
    let rsync = find_rsync_on_path();
    let mut checks = vec![serde_json::json!({
        "name": "rsync-path",
        "value": rsync
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default(),
        "status": if rsync.is_some() { "ok" } else { "missing" },
    })];

    if let Some(loaded) = loaded {
        checks.push(serde_json::json!({
            "name": "config-path",
            "value": loaded.path.display().to_string(),
            "status": "ok",
        }));
    }

    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "checks": checks,
    })
}
