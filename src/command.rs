//! Command template engine
//!
//! A [`SyncCommand`] pairs a shell command template with the substitution
//! set used to render it. Templates use `{{ key }}` placeholders. Rendering
//! is strict: a placeholder without a matching substitution is an error, and
//! a no-op command refuses to render at all so callers can tell "nothing to
//! do, by design" apart from an empty-but-valid command string.

use std::collections::BTreeMap;

use crate::error::{PortsideError, PortsideResult};

/// A parametrized shell command for one sync phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncCommand {
    template: String,
    substitutions: BTreeMap<String, String>,
    no_op: bool,
}

impl SyncCommand {
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
            substitutions: BTreeMap::new(),
            no_op: false,
        }
    }

    /// A command for a phase that does not apply to this resource kind.
    pub fn no_op() -> Self {
        Self {
            template: String::new(),
            substitutions: BTreeMap::new(),
            no_op: true,
        }
    }

    pub fn substitute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.substitutions.insert(key.to_string(), value.into());
        self
    }

    pub fn is_no_op(&self) -> bool {
        self.no_op
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render the template against the substitution set.
    ///
    /// Fails with [`PortsideError::CommandNotApplicable`] for no-op commands
    /// and [`PortsideError::UnresolvedPlaceholder`] when the template names a
    /// key the substitution set does not carry.
    pub fn get_command(&self) -> PortsideResult<String> {
        if self.no_op {
            return Err(PortsideError::CommandNotApplicable);
        }

        let mut rendered = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            rendered.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let end = after
                .find("}}")
                .ok_or_else(|| PortsideError::UnresolvedPlaceholder {
                    key: after.trim().to_string(),
                    template: self.template.clone(),
                })?;
            let key = after[..end].trim();
            let value =
                self.substitutions
                    .get(key)
                    .ok_or_else(|| PortsideError::UnresolvedPlaceholder {
                        key: key.to_string(),
                        template: self.template.clone(),
                    })?;
            rendered.push_str(value);
            rest = &after[end + 2..];
        }
        rendered.push_str(rest);

        Ok(rendered)
    }
}
