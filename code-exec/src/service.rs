use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::{
    error::Error,
    executor::CodeExecutor,
    submission::{InMemorySubmissionStore, Submission, SubmissionStore},
    types::{ExecutionOutcome, ExecutionRequest, ExecutionResult, ExecutorConfig},
};

/// Seconds rounded to three decimals.
fn round_seconds(elapsed: std::time::Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0).round() / 1000.0
}

#[derive(Clone)]
pub struct CodeExecutionService {
    executor: Arc<CodeExecutor>,
    semaphore: Arc<Semaphore>,
    store: Arc<dyn SubmissionStore>,
}

impl CodeExecutionService {
    pub fn new(config: ExecutorConfig) -> Self {
        Self::with_store(config, Arc::new(InMemorySubmissionStore::new()))
    }

    pub fn with_store(config: ExecutorConfig, store: Arc<dyn SubmissionStore>) -> Self {
        Self {
            executor: Arc::new(CodeExecutor::new(&config)),
            semaphore: Arc::new(Semaphore::new(config.max_concurrent_executions)),
            store,
        }
    }

    /// Runs a request and assembles the result. Only request-validation
    /// failures are returned as errors.
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, Error> {
        let executor = self.executor.create_executor(&request.language)?;

        // Acquire execution permit
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| Error::System(format!("Failed to acquire execution permit: {}", e)))?;

        debug!("Starting code execution for language: {}", executor.language());
        let started = Instant::now();
        let outcome = match executor.run(&request.code, request.test_cases()).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_rejection() => return Err(e),
            Err(e) => {
                error!("Code execution failed: {}", e);
                ExecutionOutcome::error(e.to_string())
            }
        };
        let execution_time = round_seconds(started.elapsed());
        info!(
            "Code execution finished: status={} time={}s",
            outcome.status, execution_time
        );

        Ok(ExecutionResult {
            status: outcome.status,
            output: outcome.output,
            errors: outcome.errors,
            test_results: outcome.test_results,
            execution_time,
        })
    }

    /// Executes and records a submission. Requires `interview_id`; nothing
    /// runs or is stored when it is missing.
    pub async fn submit(&self, request: ExecutionRequest) -> Result<Submission, Error> {
        let interview_id = request
            .interview_id
            .ok_or(Error::MissingRequiredField("interview_id"))?;
        let language = request.language.parse()?;

        let result = self.execute(&request).await?;
        let submission = Submission::new(
            interview_id,
            request.question_id,
            language,
            request.code,
            result,
        );
        let stored = self.store.insert(submission).await.map_err(|e| {
            error!("Failed to persist submission for {}: {}", interview_id, e);
            e
        })?;
        info!(
            "Stored submission {} for interview {}",
            stored.id, stored.interview_id
        );
        Ok(stored)
    }

    pub async fn submissions_for_interview(
        &self,
        interview_id: Uuid,
    ) -> Result<Vec<Submission>, Error> {
        self.store.list_for_interview(interview_id).await
    }

    pub async fn latest_submission(
        &self,
        interview_id: Uuid,
        question_id: Option<Uuid>,
    ) -> Result<Submission, Error> {
        self.store
            .latest(interview_id, question_id)
            .await?
            .ok_or_else(|| Error::NotFound("No submissions found".to_string()))
    }

    pub fn get_available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }
}
