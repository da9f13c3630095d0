use super::{test_language_execution, test_language_timeout};
use crate::{
    languages::skip_if_not_available,
    tests::{
        fixtures::{code_samples::PYTHON_HELLO, test_scenarios::*},
        utils::defaults::{leftover_artifacts, process_python_config, test_config},
    },
    CodeExecutionService, ExecutionRequest, ExecutionStatus, ExecutorConfig, Result, TestCase,
    TestStatus,
};
use tempfile::tempdir;

#[tokio::test]
async fn test_python_basic() -> Result<()> {
    test_language_execution(ExecutorConfig::default(), "python", PYTHON_HELLO).await
}

#[tokio::test]
async fn test_python_timeout() -> Result<()> {
    let result =
        test_language_timeout(ExecutorConfig::default(), "python", PYTHON_INFINITE_LOOP).await?;
    assert_eq!(result.output, "");
    Ok(())
}

#[tokio::test]
async fn test_python_input() -> Result<()> {
    let service = CodeExecutionService::new(ExecutorConfig::default());
    let request = ExecutionRequest::new("python", PYTHON_WITH_INPUT)
        .with_test_cases(vec![TestCase::new("test user", "Hello, test user!")]);

    let result = service.execute(&request).await?;
    assert_eq!(result.output, "Hello, test user!\n");
    assert!(result.errors.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_python_without_input_reads_empty_line() -> Result<()> {
    let service = CodeExecutionService::new(ExecutorConfig::default());
    let result = service
        .execute(&ExecutionRequest::new("python", PYTHON_WITH_INPUT))
        .await?;
    assert_eq!(result.status, ExecutionStatus::Success);
    assert_eq!(result.output, "Hello, !\n");
    Ok(())
}

#[tokio::test]
async fn test_python_syntax_error() -> Result<()> {
    let service = CodeExecutionService::new(ExecutorConfig::default());
    let result = service
        .execute(&ExecutionRequest::new("python", "print('unclosed'"))
        .await?;
    assert_eq!(result.status, ExecutionStatus::Error);
    assert!(result.errors.contains("SyntaxError"));
    assert_eq!(result.output, "");
    Ok(())
}

#[tokio::test]
async fn test_python_in_process_leaves_no_artifacts() -> Result<()> {
    let scratch = tempdir()?;
    let service = CodeExecutionService::new(test_config(scratch.path()));
    for code in [PYTHON_HELLO, PYTHON_RUNTIME_ERROR, PYTHON_ESCAPE_ATTEMPT] {
        service.execute(&ExecutionRequest::new("python", code)).await?;
    }
    assert_eq!(leftover_artifacts(scratch.path()), 0);
    Ok(())
}

mod process_isolation {
    use super::*;

    #[tokio::test]
    async fn test_process_python_basic() -> Result<()> {
        if skip_if_not_available(&["python3"]) {
            return Ok(());
        }
        let scratch = tempdir()?;
        test_language_execution(process_python_config(scratch.path()), "python", PYTHON_HELLO)
            .await?;
        assert_eq!(leftover_artifacts(scratch.path()), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_process_python_timeout_reclaims_worker() -> Result<()> {
        if skip_if_not_available(&["python3"]) {
            return Ok(());
        }
        let scratch = tempdir()?;
        test_language_timeout(
            process_python_config(scratch.path()),
            "python",
            PYTHON_INFINITE_LOOP,
        )
        .await?;
        assert_eq!(leftover_artifacts(scratch.path()), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_process_python_test_cases() -> Result<()> {
        if skip_if_not_available(&["python3"]) {
            return Ok(());
        }
        let scratch = tempdir()?;
        let service = CodeExecutionService::new(process_python_config(scratch.path()));
        let request = ExecutionRequest::new("python", PYTHON_SQUARE).with_test_cases(vec![
            TestCase::new("3", "9"),
            TestCase::new("4", "15"),
        ]);

        let result = service.execute(&request).await?;
        assert_eq!(result.output, "9\n");
        let summary = result.test_results.unwrap();
        assert_eq!((summary.passed, summary.failed), (1, 1));
        assert_eq!(summary.details[1].status, TestStatus::Failed);
        assert_eq!(summary.details[1].actual, "16");
        assert_eq!(leftover_artifacts(scratch.path()), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_process_python_runtime_error() -> Result<()> {
        if skip_if_not_available(&["python3"]) {
            return Ok(());
        }
        let scratch = tempdir()?;
        let service = CodeExecutionService::new(process_python_config(scratch.path()));
        let result = service
            .execute(&ExecutionRequest::new("python", PYTHON_RUNTIME_ERROR))
            .await?;
        assert_eq!(result.status, ExecutionStatus::Error);
        assert_eq!(result.output, "started\n");
        assert!(result.errors.contains("KeyError"));
        Ok(())
    }
}
