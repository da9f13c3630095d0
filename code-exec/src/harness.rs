//! Per-test-case judging shared by every runner.
//!
//! Runners own *how* a test case is executed (a fresh interpreter namespace,
//! a fresh process); this module only turns each case's captured output into
//! a [`TestDetail`] and aggregates them in input order.

use crate::types::{TestCase, TestDetail, TestRunSummary, TestStatus};

/// What running one test case produced: captured output, or the error that
/// interrupted it together with whatever was printed before.
#[derive(Debug, Clone, PartialEq)]
pub enum CaseRun {
    Completed(String),
    Failed { output: String, error: String },
}

/// Trimmed exact comparison of captured output against the expected value.
pub fn judge(index: usize, case: &TestCase, run: CaseRun) -> TestDetail {
    let expected = case.expected.trim().to_string();
    match run {
        CaseRun::Completed(output) => {
            let actual = output.trim().to_string();
            let status = if actual == expected {
                TestStatus::Passed
            } else {
                TestStatus::Failed
            };
            TestDetail {
                index,
                status,
                input: case.input.clone(),
                expected,
                actual,
                error: None,
            }
        }
        CaseRun::Failed { output, error } => TestDetail {
            index,
            status: TestStatus::Error,
            input: case.input.clone(),
            expected,
            actual: output.trim().to_string(),
            error: Some(error),
        },
    }
}

/// Runs every case through `run` in order and aggregates the verdicts.
pub fn run_cases<F>(cases: &[TestCase], mut run: F) -> TestRunSummary
where
    F: FnMut(&TestCase) -> CaseRun,
{
    let details = cases
        .iter()
        .enumerate()
        .map(|(i, case)| judge(i + 1, case, run(case)))
        .collect();
    summarize(details)
}

pub fn summarize(details: Vec<TestDetail>) -> TestRunSummary {
    let passed = details
        .iter()
        .filter(|d| d.status == TestStatus::Passed)
        .count();
    TestRunSummary {
        passed,
        failed: details.len() - passed,
        total: details.len(),
        details,
    }
}

/// Input fed to the top-level run: the first case's input when test cases
/// are present, nothing otherwise.
pub fn sample_input(cases: &[TestCase]) -> Option<&str> {
    cases.first().map(|c| c.input.as_str())
}
