//! Remote execution shim
//!
//! One command string, two execution modes: a local subprocess under `sh`,
//! or a session through the `ssh` client binary. The orchestrator never
//! cares which mode runs a phase; the choice is the local-sentinel check on
//! the environment, made once per side.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::environment::Environment;
use crate::error::{PortsideError, PortsideResult};
use crate::ssh::SshOptions;

/// Captured output of one executed command.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes phase commands locally or over the remote shell transport.
pub trait Executor {
    fn execute(
        &self,
        environment: &Environment,
        ssh: &SshOptions,
        command: &str,
    ) -> PortsideResult<ExecOutput>;

    /// Execute with bytes streamed to the command's stdin. Used by the
    /// rsync bootstrap's `cat > dest` idiom.
    fn execute_with_stdin(
        &self,
        environment: &Environment,
        ssh: &SshOptions,
        command: &str,
        input: &[u8],
    ) -> PortsideResult<ExecOutput>;
}

/// Transport arguments shared by direct `ssh` sessions and the `-e` program
/// rsync uses for remote sides.
pub fn ssh_transport_args(ssh: &SshOptions) -> Vec<String> {
    let mut args = vec![
        "-o".to_string(),
        "UserKnownHostsFile=/dev/null".to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        "-o".to_string(),
        "LogLevel=ERROR".to_string(),
        "-p".to_string(),
        ssh.port.clone(),
    ];
    if !ssh.private_key.is_empty() {
        args.push("-i".to_string());
        args.push(ssh.private_key.clone());
    }
    if ssh.skip_agent {
        args.push("-o".to_string());
        args.push("IdentitiesOnly=yes".to_string());
    }
    if ssh.verbose {
        args.push("-v".to_string());
    }
    args
}

/// The `-e` value handed to rsync for a remote side.
pub fn ssh_transport_string(ssh: &SshOptions) -> String {
    let mut parts = vec!["ssh".to_string()];
    parts.extend(ssh_transport_args(ssh));
    parts.join(" ")
}

/// Spawns real processes: `sh -c` locally, the `ssh` client remotely.
///
/// An optional deadline bounds each phase command; a stalled remote
/// session is killed instead of hanging the sync indefinitely. The stdin
/// streaming path (bootstrap) stays unbounded: its payload write already
/// fails fast when the transport dies.
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor {
    timeout: Option<std::time::Duration>,
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    pub fn with_timeout(seconds: u64) -> Self {
        Self {
            timeout: Some(std::time::Duration::from_secs(seconds)),
        }
    }

    fn build_command(environment: &Environment, ssh: &SshOptions, command: &str) -> Command {
        if environment.is_local() {
            let mut cmd = Command::new("sh");
            cmd.arg("-c").arg(command);
            cmd
        } else {
            let mut cmd = Command::new("ssh");
            cmd.args(ssh_transport_args(ssh));
            cmd.arg(format!("{}@{}", environment.ssh_user(), ssh.host));
            cmd.arg(command);
            cmd
        }
    }

    fn finish(command: &str, output: std::process::Output) -> PortsideResult<ExecOutput> {
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            return Err(PortsideError::CommandFailed {
                command: command.to_string(),
                status: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok(ExecOutput { stdout, stderr })
    }
}

impl Executor for ShellExecutor {
    fn execute(
        &self,
        environment: &Environment,
        ssh: &SshOptions,
        command: &str,
    ) -> PortsideResult<ExecOutput> {
        tracing::debug!(environment = %environment, command, "executing");

        let mut cmd = Self::build_command(environment, ssh, command);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        match self.timeout {
            None => Self::finish(command, cmd.output()?),
            Some(timeout) => {
                let output = wait_with_deadline(cmd.spawn()?, command, timeout)?;
                Self::finish(command, output)
            }
        }
    }

    fn execute_with_stdin(
        &self,
        environment: &Environment,
        ssh: &SshOptions,
        command: &str,
        input: &[u8],
    ) -> PortsideResult<ExecOutput> {
        tracing::debug!(
            environment = %environment,
            command,
            bytes = input.len(),
            "executing with stdin payload"
        );

        let mut child = Self::build_command(environment, ssh, command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input)?;
        }

        let output = child.wait_with_output()?;
        Self::finish(command, output)
    }
}

/// Drain stdout/stderr on reader threads while polling for exit; kill the
/// child once the deadline passes. Reader threads keep the pipes flowing
/// so a chatty child cannot deadlock against a full pipe buffer.
fn wait_with_deadline(
    mut child: std::process::Child,
    command: &str,
    timeout: std::time::Duration,
) -> PortsideResult<std::process::Output> {
    use std::io::Read;

    fn drain<R: Read + Send + 'static>(
        source: Option<R>,
    ) -> std::thread::JoinHandle<Vec<u8>> {
        std::thread::spawn(move || {
            let mut buffer = Vec::new();
            if let Some(mut source) = source {
                let _ = source.read_to_end(&mut buffer);
            }
            buffer
        })
    }

    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let deadline = std::time::Instant::now() + timeout;
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if std::time::Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Err(PortsideError::CommandTimeout {
                command: command.to_string(),
                seconds: timeout.as_secs(),
            });
        }
        std::thread::sleep(std::time::Duration::from_millis(50));
    };

    Ok(std::process::Output {
        status,
        stdout: stdout_reader.join().unwrap_or_default(),
        stderr: stderr_reader.join().unwrap_or_default(),
    })
}

/// Recording executor for tests. Commands are captured instead of spawned;
/// outcomes are scripted by substring match.
#[cfg(test)]
pub struct MockExecutor {
    executed: std::sync::Mutex<Vec<ExecutedCommand>>,
    fail_matching: Vec<String>,
    stdout_matching: Vec<(String, String)>,
}

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedCommand {
    pub environment: String,
    pub command: String,
    pub stdin_bytes: usize,
}

#[cfg(test)]
impl MockExecutor {
    pub fn new() -> Self {
        Self {
            executed: std::sync::Mutex::new(Vec::new()),
            fail_matching: Vec::new(),
            stdout_matching: Vec::new(),
        }
    }

    /// Commands containing `needle` fail with a non-zero status.
    pub fn fail_on(mut self, needle: &str) -> Self {
        self.fail_matching.push(needle.to_string());
        self
    }

    /// Commands containing `needle` produce `stdout`.
    pub fn respond(mut self, needle: &str, stdout: &str) -> Self {
        self.stdout_matching
            .push((needle.to_string(), stdout.to_string()));
        self
    }

    pub fn executed(&self) -> Vec<ExecutedCommand> {
        self.executed.lock().unwrap().clone()
    }

    pub fn commands(&self) -> Vec<String> {
        self.executed()
            .into_iter()
            .map(|e| e.command)
            .collect()
    }

    fn record(
        &self,
        environment: &Environment,
        command: &str,
        stdin_bytes: usize,
    ) -> PortsideResult<ExecOutput> {
        self.executed.lock().unwrap().push(ExecutedCommand {
            environment: environment.name.clone(),
            command: command.to_string(),
            stdin_bytes,
        });

        if self.fail_matching.iter().any(|n| command.contains(n)) {
            return Err(PortsideError::CommandFailed {
                command: command.to_string(),
                status: 1,
                stderr: "mock failure".to_string(),
            });
        }

        let stdout = self
            .stdout_matching
            .iter()
            .find(|(n, _)| command.contains(n))
            .map(|(_, out)| out.clone())
            .unwrap_or_default();

        Ok(ExecOutput {
            stdout,
            stderr: String::new(),
        })
    }
}

#[cfg(test)]
impl Executor for MockExecutor {
    fn execute(
        &self,
        environment: &Environment,
        ssh: &SshOptions,
        command: &str,
    ) -> PortsideResult<ExecOutput> {
        let _ = ssh;
        self.record(environment, command, 0)
    }

    fn execute_with_stdin(
        &self,
        environment: &Environment,
        ssh: &SshOptions,
        command: &str,
        input: &[u8],
    ) -> PortsideResult<ExecOutput> {
        let _ = ssh;
        self.record(environment, command, input.len())
    }
}
