use crate::{
    CodeExecutionService, ExecutionRequest, ExecutionResult, ExecutionStatus, ExecutorConfig,
    Result,
};
use tokio::time::Duration;

pub mod javascript;
pub mod python;

// Common test utilities for language tests
pub(crate) async fn test_language_execution(
    config: ExecutorConfig,
    language: &str,
    code: &str,
) -> Result<()> {
    let service = CodeExecutionService::new(config);
    let result = service.execute(&ExecutionRequest::new(language, code)).await?;
    assert_eq!(result.status, ExecutionStatus::Success, "{}", result.errors);
    assert!(result.output.contains("Hello from"));
    assert!(result.errors.is_empty());
    Ok(())
}

pub(crate) async fn test_language_timeout(
    config: ExecutorConfig,
    language: &str,
    code: &str,
) -> Result<ExecutionResult> {
    let service = CodeExecutionService::new(ExecutorConfig {
        timeout: Duration::from_millis(300),
        ..config
    });
    let result = service.execute(&ExecutionRequest::new(language, code)).await?;
    assert_eq!(result.status, ExecutionStatus::Timeout);
    assert!(result.errors.ends_with("exceeded 300 millisecond timeout"));
    Ok(result)
}
