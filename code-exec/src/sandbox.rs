use crate::{
    error::Error,
    harness::CaseRun,
    types::{ExecutionOutcome, ExecutionStatus, ResourceLimits},
};
use nix::sys::resource::{setrlimit, Resource};
use nix::sys::signal::{killpg, Signal};
use nix::unistd::{setsid, Pid};
use std::{path::PathBuf, process::Stdio, time::Instant};
use tempfile::TempDir;
use tokio::{
    fs,
    io::AsyncWriteExt,
    process::Command,
    time::{self, Duration},
};
use tracing::{debug, warn};

/// How a sandboxed process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    Exited(i32),
    Signaled(i32),
    /// Killed by the sandbox after the wall-clock deadline
    TimedOut,
}

#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit: ProcessExit,
}

impl ProcessOutput {
    /// Maps the process result onto an execution outcome. Any stderr output
    /// counts as an error even when the exit status is clean.
    pub fn into_outcome(self, timeout_message: impl FnOnce() -> String) -> ExecutionOutcome {
        match self.exit {
            ProcessExit::TimedOut => ExecutionOutcome::timeout(timeout_message()),
            ProcessExit::Signaled(sig) if sig == Signal::SIGXCPU as i32 => {
                ExecutionOutcome::timeout(timeout_message()).with_output(self.stdout)
            }
            _ if !self.stderr.is_empty() => {
                ExecutionOutcome::error(self.stderr).with_output(self.stdout)
            }
            ProcessExit::Exited(0) => ExecutionOutcome::success(self.stdout),
            ProcessExit::Exited(code) => {
                ExecutionOutcome::error(format!("Process exited with status {}", code))
                    .with_output(self.stdout)
            }
            ProcessExit::Signaled(sig) => {
                ExecutionOutcome::error(format!("Process terminated by signal {}", sig))
                    .with_output(self.stdout)
            }
        }
    }

    pub fn into_case_run(self, timeout_message: impl FnOnce() -> String) -> CaseRun {
        let outcome = self.into_outcome(timeout_message);
        match outcome.status {
            ExecutionStatus::Success => CaseRun::Completed(outcome.output),
            _ => CaseRun::Failed {
                output: outcome.output,
                error: outcome.errors,
            },
        }
    }
}

/// Runs interpreters against a source artifact in a throwaway working
/// directory, under rlimits and a hard wall-clock deadline.
#[derive(Debug, Clone)]
pub struct Sandbox {
    limits: ResourceLimits,
    /// Parent of the per-execution directories; system temp dir when unset
    scratch_dir: Option<PathBuf>,
}

impl Sandbox {
    pub fn new(limits: ResourceLimits, scratch_dir: Option<PathBuf>) -> Self {
        Self {
            limits,
            scratch_dir,
        }
    }

    async fn workdir(&self) -> Result<TempDir, Error> {
        let builder = {
            let mut builder = tempfile::Builder::new();
            builder.prefix("exec-");
            builder
        };
        let dir = match &self.scratch_dir {
            Some(parent) => {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::Sandbox(format!("Failed to create scratch directory: {}", e))
                })?;
                builder.tempdir_in(parent)
            }
            None => builder.tempdir(),
        };
        dir.map_err(|e| Error::Sandbox(format!("Failed to create sandbox directory: {}", e)))
    }

    /// Writes `code` to `source.<extension>` in a fresh directory and runs
    /// `interpreter` on it with `input` on stdin. The directory is removed
    /// on every exit path.
    pub async fn execute(
        &self,
        interpreter: &str,
        extension: &str,
        code: &str,
        input: Option<&str>,
        timeout: Duration,
    ) -> Result<ProcessOutput, Error> {
        let cmd_path = which::which(interpreter)
            .map_err(|_| Error::Sandbox(format!("Command not found: {}", interpreter)))?;

        let workdir = self.workdir().await?;
        let source_file = workdir.path().join(format!("source.{}", extension));
        fs::write(&source_file, code).await?;

        debug!("Sandbox execute - Command: {}", cmd_path.display());
        debug!("Sandbox execute - Root dir: {:?}", workdir.path());

        let mut command = Command::new(&cmd_path);
        command
            .arg(&source_file)
            .env_clear()
            .env("PATH", "/usr/bin:/bin:/usr/sbin:/sbin")
            .env("HOME", workdir.path())
            .current_dir(workdir.path())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .kill_on_drop(true);

        let file_size = self.limits.file_size;
        let cpu_time = u64::from(self.limits.cpu_time);
        let memory = self.limits.memory;

        unsafe {
            command.pre_exec(move || {
                // own process group, so the whole tree can be killed on timeout
                setsid()?;
                setrlimit(Resource::RLIMIT_CPU, cpu_time, cpu_time + 1)?;
                setrlimit(Resource::RLIMIT_FSIZE, file_size, file_size)?;
                if let Some(bytes) = memory {
                    #[cfg(target_os = "linux")]
                    setrlimit(Resource::RLIMIT_AS, bytes, bytes)?;
                    #[cfg(not(target_os = "linux"))]
                    let _ = bytes;
                }
                Ok(())
            });
        }

        let started = Instant::now();
        let mut child = command
            .spawn()
            .map_err(|e| Error::Sandbox(format!("Failed to spawn process: {}", e)))?;
        let child_id = child.id();

        if let (Some(input), Some(mut stdin)) = (input, child.stdin.take()) {
            let input = input.to_string();
            // the child may exit without reading; a broken pipe is not an error
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    debug!("Failed to write input: {}", e);
                }
            });
        }

        let output = match time::timeout(timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(Error::Sandbox(format!("Process error: {}", e))),
            Err(_) => {
                if let Some(id) = child_id {
                    if let Err(e) = killpg(Pid::from_raw(id as i32), Signal::SIGKILL) {
                        debug!("Process group {} already gone: {}", id, e);
                    }
                }
                warn!(
                    "Process {} killed after exceeding {:?}",
                    cmd_path.display(),
                    timeout
                );
                return Ok(ProcessOutput {
                    stdout: String::new(),
                    stderr: String::new(),
                    exit: ProcessExit::TimedOut,
                });
            }
        };
        debug!("Process finished in {:?}", started.elapsed());

        let exit = {
            use std::os::unix::process::ExitStatusExt;
            match (output.status.code(), output.status.signal()) {
                (Some(code), _) => ProcessExit::Exited(code),
                (None, Some(signal)) => ProcessExit::Signaled(signal),
                (None, None) => ProcessExit::Exited(-1),
            }
        };

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit,
        })
    }
}
