use async_trait::async_trait;
use std::time::Duration;

use crate::{
    error::Error,
    executor::{describe_bound, LanguageExecutor},
    languages::run_script,
    sandbox::Sandbox,
    types::{ExecutionOutcome, Language, TestCase},
};

pub struct JavaScriptExecutor {
    sandbox: Sandbox,
    node: String,
    timeout: Duration,
}

impl JavaScriptExecutor {
    pub fn new(sandbox: Sandbox, node: String, timeout: Duration) -> Self {
        Self {
            sandbox,
            node,
            timeout,
        }
    }
}

#[async_trait]
impl LanguageExecutor for JavaScriptExecutor {
    fn language(&self) -> Language {
        Language::JavaScript
    }

    async fn run(&self, code: &str, test_cases: &[TestCase]) -> Result<ExecutionOutcome, Error> {
        let message = format!(
            "JavaScript execution exceeded {} timeout",
            describe_bound(self.timeout)
        );
        run_script(
            &self.sandbox,
            &self.node,
            "js",
            code,
            test_cases,
            self.timeout,
            &message,
        )
        .await
    }
}
