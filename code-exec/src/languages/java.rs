use async_trait::async_trait;

use crate::{
    error::Error,
    executor::LanguageExecutor,
    types::{ExecutionOutcome, Language, TestCase},
};

/// Recognized so requests are not rejected, but there is no runner yet.
pub struct JavaExecutor;

#[async_trait]
impl LanguageExecutor for JavaExecutor {
    fn language(&self) -> Language {
        Language::Java
    }

    async fn run(&self, _code: &str, _test_cases: &[TestCase]) -> Result<ExecutionOutcome, Error> {
        Ok(ExecutionOutcome::not_implemented(
            "Java execution not yet implemented. Please use Python or JavaScript.",
        ))
    }
}
