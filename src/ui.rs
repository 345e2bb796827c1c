//! User-facing status output
//!
//! Thin println/eprintln helpers with emoji prefixes. Color is gated on
//! stderr being a terminal and `PORTSIDE_NO_COLOR` being unset; `--json`
//! callers suppress these lines entirely and read structured output
//! instead. Diagnostic detail goes through `tracing`, not here.

use crossterm::style::Stylize;
use is_terminal::IsTerminal;

fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("PORTSIDE_NO_COLOR").is_none()
}

/// Section header for a new phase or command.
pub fn header(message: &str) {
    if use_color() {
        eprintln!("{}", message.to_string().bold());
    } else {
        eprintln!("{message}");
    }
}

/// One step inside a phase.
pub fn step(message: &str) {
    eprintln!("  {message}");
}

pub fn success(message: &str) {
    if use_color() {
        eprintln!("{} {}", "✓".green(), message);
    } else {
        eprintln!("✓ {message}");
    }
}

pub fn warn(message: &str) {
    if use_color() {
        eprintln!("{} {}", "⚠".yellow(), message);
    } else {
        eprintln!("⚠ {message}");
    }
}

pub fn failure(message: &str) {
    if use_color() {
        eprintln!("{} {}", "✗".red(), message);
    } else {
        eprintln!("✗ {message}");
    }
}

/// Print unknown-config-key warnings collected by the loader.
pub fn print_config_warnings(warnings: &[crate::config::ConfigWarning]) {
    for w in warnings {
        if let Some(line) = w.line {
            warn(&format!(
                "Unknown config key '{}' in {}:{}",
                w.key,
                w.file.display(),
                line
            ));
        } else {
            warn(&format!(
                "Unknown config key '{}' in {}",
                w.key,
                w.file.display()
            ));
        }
        if let Some(suggestion) = &w.suggestion {
            step(&format!("Did you mean '{suggestion}'?"));
        }
    }
}
