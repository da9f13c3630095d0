use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

use crate::error::Error;

/// Supported programming languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    Java,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Python, Language::JavaScript, Language::Java];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::Java => "java",
        }
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "javascript" => Ok(Language::JavaScript),
            "java" => Ok(Language::Java),
            _ => Err(Error::UnsupportedLanguage(s.to_string())),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single input/expected-output pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(default, deserialize_with = "scalar_text")]
    pub input: String,
    #[serde(default, deserialize_with = "scalar_text")]
    pub expected: String,
}

impl TestCase {
    pub fn new(input: impl Into<String>, expected: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            expected: expected.into(),
        }
    }
}

/// Accepts any JSON scalar and renders it the way the scripting language's
/// `str()` would, so `9`, `"9"` and `true`/`"True"` compare alike.
fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Bool(true) => "True".to_string(),
        serde_json::Value::Bool(false) => "False".to_string(),
        serde_json::Value::Null => "None".to_string(),
        other => other.to_string(),
    })
}

/// Code execution request, shared by the execute and submit paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionRequest {
    /// Source code to execute
    pub code: String,
    /// Language identifier, matched case-insensitively
    pub language: String,
    #[serde(default)]
    pub test_cases: Option<Vec<TestCase>>,
    /// Required for submissions, ignored by execute
    #[serde(default)]
    pub interview_id: Option<Uuid>,
    #[serde(default)]
    pub question_id: Option<Uuid>,
}

impl ExecutionRequest {
    pub fn new(language: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            test_cases: None,
            interview_id: None,
            question_id: None,
        }
    }

    pub fn with_test_cases(mut self, test_cases: Vec<TestCase>) -> Self {
        self.test_cases = Some(test_cases);
        self
    }

    pub fn for_interview(mut self, interview_id: Uuid, question_id: Option<Uuid>) -> Self {
        self.interview_id = Some(interview_id);
        self.question_id = question_id;
        self
    }

    pub fn test_cases(&self) -> &[TestCase] {
        self.test_cases.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Failed,
    Error,
}

/// Outcome of one test case. Serialized with the `test` key for the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDetail {
    /// 1-based position in the request's test_cases
    #[serde(rename = "test")]
    pub index: usize,
    pub status: TestStatus,
    pub input: String,
    pub expected: String,
    pub actual: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestRunSummary {
    pub passed: usize,
    /// Includes test cases that raised an error
    pub failed: usize,
    pub total: usize,
    pub details: Vec<TestDetail>,
}

/// Execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    Success,
    Error,
    Timeout,
    NotImplemented,
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExecutionStatus::Success => "success",
            ExecutionStatus::Error => "error",
            ExecutionStatus::Timeout => "timeout",
            ExecutionStatus::NotImplemented => "not_implemented",
        })
    }
}

/// What a runner reports, before the caller stamps wall-clock time on it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub status: ExecutionStatus,
    pub output: String,
    pub errors: String,
    pub test_results: Option<TestRunSummary>,
}

impl ExecutionOutcome {
    pub fn success(output: String) -> Self {
        Self {
            status: ExecutionStatus::Success,
            output,
            errors: String::new(),
            test_results: None,
        }
    }

    pub fn error(errors: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Error,
            output: String::new(),
            errors: errors.into(),
            test_results: None,
        }
    }

    pub fn timeout(errors: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Timeout,
            ..Self::error(errors)
        }
    }

    pub fn not_implemented(errors: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::NotImplemented,
            ..Self::error(errors)
        }
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = output;
        self
    }
}

/// Execution result returned by both execute and submit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub output: String,
    #[serde(default)]
    pub errors: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_results: Option<TestRunSummary>,
    /// Wall-clock seconds around dispatch-to-completion, 3 decimals
    pub execution_time: f64,
}

/// Resource limits applied to spawned interpreter processes
#[derive(Debug, Clone)]
pub struct ResourceLimits {
    /// Maximum CPU time (seconds)
    pub cpu_time: u32,
    /// Maximum address space (bytes); unset leaves the interpreter's default
    pub memory: Option<u64>,
    /// Maximum file size (bytes)
    pub file_size: u64,
}

impl Default for ResourceLimits {
    fn default() -> Self {
        Self {
            cpu_time: 10,
            memory: None,
            file_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Where the scripting language runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PythonIsolation {
    /// Restricted interpreter on a detached worker thread
    #[default]
    InProcess,
    /// `python3` in a separate, killable process
    Process,
}

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Wall-clock deadline for one execution
    pub timeout: Duration,
    pub max_concurrent_executions: usize,
    pub limits: ResourceLimits,
    /// Directory for temporary source artifacts; system temp dir when unset
    pub scratch_dir: Option<PathBuf>,
    pub node_command: String,
    pub python_command: String,
    pub python_isolation: PythonIsolation,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_concurrent_executions: 10,
            limits: ResourceLimits::default(),
            scratch_dir: None,
            node_command: "node".to_string(),
            python_command: "python3".to_string(),
            python_isolation: PythonIsolation::default(),
        }
    }
}
