//! Probe execution: running version commands through the shell
//!
//! This module provides:
//! - The `ProbeRunner` seam used by the engine
//! - `ShellProbe`, which runs commands with `sh -c` on tokio

use crate::error::ProbeError;
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Captured result of a probe command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutput {
    /// Whether the command exited with status zero
    pub success: bool,
    /// Exit code, if the process was not killed by a signal
    pub code: Option<i32>,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
}

impl ProbeOutput {
    /// Output of a command that exited zero
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Output of a command that exited non-zero
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }
}

/// Trait for running probe commands
#[async_trait]
pub trait ProbeRunner: Send + Sync {
    /// Run a shell command and capture its output
    async fn run(&self, command: &str) -> Result<ProbeOutput, ProbeError>;
}

/// Default probe runner that executes real shell commands
#[derive(Debug, Clone, Default)]
pub struct ShellProbe {
    timeout: Option<Duration>,
}

impl ShellProbe {
    /// Create a probe runner without a timeout
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// Kill probes that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn command(command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        // Own process group, so a timeout can reach whatever the shell started
        #[cfg(unix)]
        cmd.process_group(0);
        cmd
    }
}

/// Kill every process in the group led by the probe shell
#[cfg(unix)]
fn kill_process_group(pid: Option<u32>) {
    let Some(pid) = pid else {
        return;
    };
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group was created for this probe
    if unsafe { libc::killpg(pgid, libc::SIGKILL) } != 0 {
        tracing::debug!(pid, "probe process group already gone");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_pid: Option<u32>) {}

#[async_trait]
impl ProbeRunner for ShellProbe {
    async fn run(&self, command: &str) -> Result<ProbeOutput, ProbeError> {
        tracing::debug!(command, "spawning probe");
        let child = Self::command(command)
            .spawn()
            .map_err(|e| ProbeError::spawn(command, e))?;

        let pid = child.id();
        let waited = child.wait_with_output();
        let output = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, waited).await {
                Ok(result) => result,
                Err(_) => {
                    kill_process_group(pid);
                    tracing::debug!(command, "probe timed out");
                    return Err(ProbeError::timeout(command, limit.as_secs()));
                }
            },
            None => waited.await,
        }
        .map_err(|e| ProbeError::spawn(command, e))?;

        tracing::debug!(command, status = ?output.status, "probe exited");
        Ok(ProbeOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
