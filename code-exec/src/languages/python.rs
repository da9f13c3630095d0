use async_trait::async_trait;
use std::thread;
use std::time::Duration;
use tokio::{sync::oneshot, time};
use tracing::{debug, error, warn};

use crate::{
    error::Error,
    executor::{describe_bound, LanguageExecutor},
    harness::{self, CaseRun},
    languages::run_script,
    restricted::{self, WORKER_STACK_SIZE},
    sandbox::Sandbox,
    types::{ExecutionOutcome, Language, TestCase},
};

fn timeout_message(timeout: Duration) -> String {
    format!("Code execution exceeded {} timeout", describe_bound(timeout))
}

/// Top-level run, then the test harness, all on the calling thread.
fn run_submission(code: &str, test_cases: &[TestCase]) -> Result<ExecutionOutcome, Error> {
    restricted::with_runtime(|runtime| {
        let output = match runtime.run(code, harness::sample_input(test_cases)) {
            Ok(output) => output,
            Err(failure) => {
                return ExecutionOutcome::error(failure.traceback).with_output(failure.output)
            }
        };

        let mut outcome = ExecutionOutcome::success(output);
        if !test_cases.is_empty() {
            // every case gets a fresh namespace
            outcome.test_results = Some(harness::run_cases(test_cases, |case| {
                match runtime.run(code, Some(&case.input)) {
                    Ok(output) => CaseRun::Completed(output),
                    Err(failure) => CaseRun::Failed {
                        error: failure.to_string(),
                        output: failure.output,
                    },
                }
            }));
        }
        outcome
    })
}

/// Runs Python submissions on the restricted in-process interpreter.
///
/// Each execution gets its own worker thread. The caller waits up to the
/// deadline; a worker that overruns is reported as a timeout and left to
/// finish on its own, since threads cannot be cancelled.
pub struct PythonExecutor {
    timeout: Duration,
}

impl PythonExecutor {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl LanguageExecutor for PythonExecutor {
    fn language(&self) -> Language {
        Language::Python
    }

    async fn run(&self, code: &str, test_cases: &[TestCase]) -> Result<ExecutionOutcome, Error> {
        let (tx, rx) = oneshot::channel();
        let code = code.to_string();
        let test_cases = test_cases.to_vec();

        thread::Builder::new()
            .name("python-submission".to_string())
            .stack_size(WORKER_STACK_SIZE)
            .spawn(move || {
                // the receiver is gone when the deadline already passed
                let _ = tx.send(run_submission(&code, &test_cases));
            })
            .map_err(|e| Error::System(format!("Failed to start interpreter thread: {}", e)))?;

        match time::timeout(self.timeout, rx).await {
            Ok(Ok(Ok(outcome))) => {
                debug!("Python submission finished with status {}", outcome.status);
                Ok(outcome)
            }
            Ok(Ok(Err(e))) => {
                error!("Python runtime failed: {}", e);
                Err(e)
            }
            Ok(Err(_)) => {
                error!("Interpreter thread exited without a result");
                Ok(ExecutionOutcome::error("Interpreter stopped unexpectedly"))
            }
            Err(_) => {
                warn!(
                    "Python submission exceeded {:?}; worker thread left running detached",
                    self.timeout
                );
                Ok(ExecutionOutcome::timeout(timeout_message(self.timeout)))
            }
        }
    }
}

/// Runs Python submissions with an external `python3`, one killable
/// process per run.
pub struct ProcessPythonExecutor {
    sandbox: Sandbox,
    command: String,
    timeout: Duration,
}

impl ProcessPythonExecutor {
    pub fn new(sandbox: Sandbox, command: String, timeout: Duration) -> Self {
        Self {
            sandbox,
            command,
            timeout,
        }
    }
}

#[async_trait]
impl LanguageExecutor for ProcessPythonExecutor {
    fn language(&self) -> Language {
        Language::Python
    }

    async fn run(&self, code: &str, test_cases: &[TestCase]) -> Result<ExecutionOutcome, Error> {
        run_script(
            &self.sandbox,
            &self.command,
            "py",
            code,
            test_cases,
            self.timeout,
            &timeout_message(self.timeout),
        )
        .await
    }
}
