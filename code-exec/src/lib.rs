//! # Code Execution Service
//!
//! Runs interview submissions with a wall-clock deadline and checks them
//! against test cases. Python runs on a restricted in-process interpreter
//! (or, optionally, an external `python3`); JavaScript runs under `node` in
//! a resource-limited child process.

mod error;
mod executor;
mod harness;
mod languages;
mod restricted;
mod sandbox;
mod service;
mod submission;
mod types;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use executor::{CodeExecutor, LanguageExecutor};
pub use sandbox::{ProcessExit, ProcessOutput, Sandbox};
pub use service::CodeExecutionService;
pub use submission::{InMemorySubmissionStore, Submission, SubmissionStore};
pub use types::{
    ExecutionOutcome, ExecutionRequest, ExecutionResult, ExecutionStatus, ExecutorConfig,
    Language, PythonIsolation, ResourceLimits, TestCase, TestDetail, TestRunSummary, TestStatus,
};

/// Result type for code execution operations
pub type Result<T> = std::result::Result<T, Error>;
