use crate::error::Result;
use serde_json::Value;
use std::path::Path;

/// Terminal and transitional job statuses reported by the service.
///
/// Anything unrecognized maps to `Unknown`, which the poll loop treats as
/// transient: services introduce new transitional states, and the attempt
/// cap terminates the loop either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Unknown,
}

impl TaskStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PENDING" => TaskStatus::Pending,
            "RUNNING" => TaskStatus::Running,
            "SUCCEEDED" => TaskStatus::Succeeded,
            "FAILED" => TaskStatus::Failed,
            _ => TaskStatus::Unknown,
        }
    }
}

/// Wire client for the asynchronous transcription service.
///
/// Responses are raw JSON values: the result payload shape is not guaranteed
/// across service versions, so interpretation lives in
/// [`crate::remote::parse`], not in deserialization.
#[async_trait::async_trait]
pub trait TranscriptionApi: Send + Sync {
    /// `POST submit {model, input:{file_url}}`
    async fn submit(&self, file_url: &str, model: &str) -> Result<Value>;

    /// `GET poll/{task_id}`
    async fn poll(&self, task_id: &str) -> Result<Value>;

    /// Download a result document referenced by `transcription_url`.
    async fn fetch_document(&self, url: &str) -> Result<String>;
}

/// Object storage for the short-lived uploaded audio.
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload a file and return its remote URL. `on_progress` receives
    /// fractions in `[0, 1]`.
    async fn upload(
        &self,
        file: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<String>;

    async fn delete(&self, url: &str) -> Result<()>;
}
