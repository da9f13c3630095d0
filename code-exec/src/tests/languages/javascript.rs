use super::{test_language_execution, test_language_timeout};
use crate::{
    languages::skip_if_not_available,
    tests::{
        fixtures::{code_samples::JS_HELLO, test_scenarios::*},
        utils::defaults::{leftover_artifacts, test_config},
    },
    CodeExecutionService, ExecutionRequest, ExecutionStatus, Result, TestCase, TestStatus,
};
use tempfile::tempdir;

#[tokio::test]
async fn test_javascript_basic() -> Result<()> {
    if skip_if_not_available(&["node"]) {
        return Ok(());
    }
    let scratch = tempdir()?;
    test_language_execution(test_config(scratch.path()), "javascript", JS_HELLO).await?;
    assert_eq!(leftover_artifacts(scratch.path()), 0);
    Ok(())
}

#[tokio::test]
async fn test_javascript_timeout() -> Result<()> {
    if skip_if_not_available(&["node"]) {
        return Ok(());
    }
    let scratch = tempdir()?;
    let result =
        test_language_timeout(test_config(scratch.path()), "javascript", JS_WITH_TIMEOUT).await?;
    assert!(result.errors.starts_with("JavaScript execution exceeded"));
    assert_eq!(leftover_artifacts(scratch.path()), 0);
    Ok(())
}

#[tokio::test]
async fn test_javascript_test_cases() -> Result<()> {
    if skip_if_not_available(&["node"]) {
        return Ok(());
    }
    let scratch = tempdir()?;
    let service = CodeExecutionService::new(test_config(scratch.path()));
    let request = ExecutionRequest::new("JavaScript", JS_SQUARE).with_test_cases(vec![
        TestCase::new("3", "9"),
        TestCase::new("7", "49"),
    ]);

    let result = service.execute(&request).await?;
    assert_eq!(result.status, ExecutionStatus::Success);
    assert_eq!(result.output, "9\n");
    let summary = result.test_results.unwrap();
    assert_eq!((summary.passed, summary.total), (2, 2));
    assert!(summary
        .details
        .iter()
        .all(|detail| detail.status == TestStatus::Passed));
    Ok(())
}

#[tokio::test]
async fn test_javascript_thrown_error() -> Result<()> {
    if skip_if_not_available(&["node"]) {
        return Ok(());
    }
    let scratch = tempdir()?;
    let service = CodeExecutionService::new(test_config(scratch.path()));
    let result = service
        .execute(&ExecutionRequest::new(
            "javascript",
            "console.log('before'); throw new Error('boom');",
        ))
        .await?;
    assert_eq!(result.status, ExecutionStatus::Error);
    assert_eq!(result.output, "before\n");
    assert!(result.errors.contains("Error: boom"));
    Ok(())
}
