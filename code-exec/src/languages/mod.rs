//! Language-specific executor implementations

mod java;
mod javascript;
mod python;

pub use java::JavaExecutor;
pub use javascript::JavaScriptExecutor;
pub use python::{ProcessPythonExecutor, PythonExecutor};

use crate::{
    error::Error,
    harness::{self, CaseRun},
    sandbox::Sandbox,
    types::{ExecutionOutcome, ExecutionStatus, TestCase},
};
use std::time::Duration;
use tracing::debug;
use which::which;

/// Runs a script through an external interpreter: once at top level with
/// the first test input on stdin, then in a fresh process per test case.
/// Test cases are skipped when the top-level run does not succeed.
pub(crate) async fn run_script(
    sandbox: &Sandbox,
    interpreter: &str,
    extension: &str,
    code: &str,
    test_cases: &[TestCase],
    timeout: Duration,
    timeout_message: &str,
) -> Result<ExecutionOutcome, Error> {
    let message = || timeout_message.to_string();
    let mut outcome = sandbox
        .execute(interpreter, extension, code, harness::sample_input(test_cases), timeout)
        .await?
        .into_outcome(message);
    if test_cases.is_empty() || outcome.status != ExecutionStatus::Success {
        return Ok(outcome);
    }

    let mut details = Vec::with_capacity(test_cases.len());
    for (i, case) in test_cases.iter().enumerate() {
        let run = match sandbox
            .execute(interpreter, extension, code, Some(&case.input), timeout)
            .await
        {
            Ok(output) => output.into_case_run(message),
            Err(e) => CaseRun::Failed {
                output: String::new(),
                error: e.to_string(),
            },
        };
        details.push(harness::judge(i + 1, case, run));
    }
    let summary = harness::summarize(details);
    debug!(
        "{}: {}/{} test cases passed",
        interpreter, summary.passed, summary.total
    );
    outcome.test_results = Some(summary);
    Ok(outcome)
}

pub(crate) fn check_command(cmd: &str) -> bool {
    which(cmd).is_ok()
}

#[cfg(test)]
pub(crate) fn skip_if_not_available(tools: &[&str]) -> bool {
    let missing: Vec<_> = tools
        .iter()
        .filter(|tool| !check_command(tool))
        .map(|s| (*s).to_string())
        .collect();

    if !missing.is_empty() {
        eprintln!("Skipping test: {} not available", missing.join(", "));
        return true;
    }
    false
}
