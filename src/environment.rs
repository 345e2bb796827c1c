//! Logical deployment targets
//!
//! An [`Environment`] names one side of a sync: a project, an environment
//! within it, and the service container commands run against. The reserved
//! environment name [`LOCAL_ENVIRONMENT`] stands for the machine portside
//! itself runs on; remote-shell steps are skipped for that side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved environment name for the local machine.
pub const LOCAL_ENVIRONMENT: &str = "local";

/// Default service commands are executed against.
pub const DEFAULT_SERVICE: &str = "cli";

/// One side of a sync: project, environment and service names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub project: String,
    pub name: String,
    #[serde(default = "default_service")]
    pub service: String,
}

fn default_service() -> String {
    DEFAULT_SERVICE.to_string()
}

impl Environment {
    pub fn new(project: &str, name: &str) -> Self {
        Self {
            project: project.to_string(),
            name: name.to_string(),
            service: DEFAULT_SERVICE.to_string(),
        }
    }

    /// The local-machine sentinel for a project.
    pub fn local(project: &str) -> Self {
        Self::new(project, LOCAL_ENVIRONMENT)
    }

    pub fn with_service(mut self, service: &str) -> Self {
        if !service.is_empty() {
            self.service = service.to_string();
        }
        self
    }

    /// Whether this side is the local machine (no remote shell involved).
    pub fn is_local(&self) -> bool {
        self.name == LOCAL_ENVIRONMENT
    }

    /// SSH login user for this environment.
    ///
    /// The transport multiplexes project and environment through the login
    /// name; a non-default service is appended so the remote side can route
    /// the session to the right container.
    pub fn ssh_user(&self) -> String {
        if self.service == DEFAULT_SERVICE {
            format!("{}-{}", self.project, self.name)
        } else {
            format!("{}-{}-{}", self.project, self.name, self.service)
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.project, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_sentinel_is_local() {
        let env = Environment::local("my-app");
        assert!(env.is_local());
        assert_eq!(env.name, LOCAL_ENVIRONMENT);
        assert_eq!(env.service, DEFAULT_SERVICE);
    }

    #[test]
    fn named_environment_is_not_local() {
        let env = Environment::new("my-app", "staging");
        assert!(!env.is_local());
    }

    #[test]
    fn ssh_user_with_default_service() {
        let env = Environment::new("my-app", "staging");
        assert_eq!(env.ssh_user(), "my-app-staging");
    }

    #[test]
    fn ssh_user_with_custom_service() {
        let env = Environment::new("my-app", "staging").with_service("nginx");
        assert_eq!(env.ssh_user(), "my-app-staging-nginx");
    }

    #[test]
    fn with_service_ignores_empty() {
        let env = Environment::new("my-app", "staging").with_service("");
        assert_eq!(env.service, DEFAULT_SERVICE);
    }

    #[test]
    fn display_shows_project_and_name() {
        let env = Environment::new("my-app", "staging");
        assert_eq!(env.to_string(), "my-app/staging");
    }
}
