use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::{
    error::Error,
    languages::{JavaExecutor, JavaScriptExecutor, ProcessPythonExecutor, PythonExecutor},
    sandbox::Sandbox,
    types::{ExecutionOutcome, ExecutorConfig, Language, PythonIsolation, TestCase},
};

/// Trait for language-specific code executors
#[async_trait]
pub trait LanguageExecutor: Send + Sync {
    fn language(&self) -> Language;

    /// Run `code` once at top level and, when `test_cases` is non-empty,
    /// once more per test case. Only infrastructure failures are `Err`;
    /// anything the submission did wrong is reported in the outcome.
    async fn run(&self, code: &str, test_cases: &[TestCase]) -> Result<ExecutionOutcome, Error>;
}

/// Renders a deadline the way timeout messages show it: whole seconds when
/// possible, milliseconds otherwise.
pub fn describe_bound(timeout: Duration) -> String {
    if timeout.subsec_nanos() == 0 {
        format!("{} second", timeout.as_secs())
    } else {
        format!("{} millisecond", timeout.as_millis())
    }
}

/// Routes each language to its runner
#[derive(Clone)]
pub struct CodeExecutor {
    python: Arc<dyn LanguageExecutor>,
    javascript: Arc<dyn LanguageExecutor>,
    java: Arc<dyn LanguageExecutor>,
}

impl CodeExecutor {
    pub fn new(config: &ExecutorConfig) -> Self {
        let sandbox = Sandbox::new(config.limits.clone(), config.scratch_dir.clone());
        let python: Arc<dyn LanguageExecutor> = match config.python_isolation {
            PythonIsolation::InProcess => Arc::new(PythonExecutor::new(config.timeout)),
            PythonIsolation::Process => Arc::new(ProcessPythonExecutor::new(
                sandbox.clone(),
                config.python_command.clone(),
                config.timeout,
            )),
        };
        Self {
            python,
            javascript: Arc::new(JavaScriptExecutor::new(
                sandbox,
                config.node_command.clone(),
                config.timeout,
            )),
            java: Arc::new(JavaExecutor),
        }
    }

    /// Executor for a supported language identifier, matched
    /// case-insensitively.
    pub fn create_executor(&self, language: &str) -> Result<Arc<dyn LanguageExecutor>, Error> {
        let language: Language = language.parse()?;
        Ok(match language {
            Language::Python => self.python.clone(),
            Language::JavaScript => self.javascript.clone(),
            Language::Java => self.java.clone(),
        })
    }

    pub async fn dispatch(
        &self,
        language: &str,
        code: &str,
        test_cases: &[TestCase],
    ) -> Result<ExecutionOutcome, Error> {
        let executor = self.create_executor(language)?;
        debug!(
            "Dispatching {} submission ({} bytes, {} test cases)",
            executor.language(),
            code.len(),
            test_cases.len()
        );
        executor.run(code, test_cases).await
    }
}
