use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::Error,
    types::{ExecutionResult, Language, TestRunSummary},
};

/// A graded submission. Created once after execution and never modified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub question_id: Option<Uuid>,
    pub language: Language,
    pub code_content: String,
    pub execution_result: ExecutionResult,
    pub test_results: Option<TestRunSummary>,
    pub created_at: DateTime<Utc>,
}

impl Submission {
    pub fn new(
        interview_id: Uuid,
        question_id: Option<Uuid>,
        language: Language,
        code_content: String,
        execution_result: ExecutionResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            interview_id,
            question_id,
            language,
            code_content,
            test_results: execution_result.test_results.clone(),
            execution_result,
            created_at: Utc::now(),
        }
    }
}

/// Storage for submissions. Listings are newest first.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn insert(&self, submission: Submission) -> Result<Submission, Error>;

    async fn list_for_interview(&self, interview_id: Uuid) -> Result<Vec<Submission>, Error>;

    /// Newest submission for the interview, optionally narrowed to one
    /// question.
    async fn latest(
        &self,
        interview_id: Uuid,
        question_id: Option<Uuid>,
    ) -> Result<Option<Submission>, Error>;
}

#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    submissions: RwLock<Vec<Submission>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first<'a>(items: impl Iterator<Item = &'a Submission>) -> Vec<Submission> {
        // reversed insertion order breaks created_at ties
        let mut matching: Vec<Submission> = items.cloned().collect();
        matching.reverse();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn insert(&self, submission: Submission) -> Result<Submission, Error> {
        let mut submissions = self.submissions.write().await;
        if submissions.iter().any(|s| s.id == submission.id) {
            return Err(Error::Persistence(format!(
                "Submission {} already exists",
                submission.id
            )));
        }
        submissions.push(submission.clone());
        Ok(submission)
    }

    async fn list_for_interview(&self, interview_id: Uuid) -> Result<Vec<Submission>, Error> {
        let submissions = self.submissions.read().await;
        Ok(Self::newest_first(
            submissions.iter().filter(|s| s.interview_id == interview_id),
        ))
    }

    async fn latest(
        &self,
        interview_id: Uuid,
        question_id: Option<Uuid>,
    ) -> Result<Option<Submission>, Error> {
        let submissions = self.submissions.read().await;
        let matching = submissions.iter().filter(|s| {
            s.interview_id == interview_id
                && question_id.map_or(true, |q| s.question_id == Some(q))
        });
        Ok(Self::newest_first(matching).into_iter().next())
    }
}
