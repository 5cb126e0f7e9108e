use super::api::{ObjectStore, TranscriptionApi};
use crate::config::RemoteConfig;
use crate::error::{Error, Result};
use serde_json::{json, Value};
use std::path::Path;
use tracing::info;

/// reqwest-backed client for the transcription service.
pub struct HttpTranscriptionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpTranscriptionClient {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl TranscriptionApi for HttpTranscriptionClient {
    async fn submit(&self, file_url: &str, model: &str) -> Result<Value> {
        let body = json!({
            "model": model,
            "input": { "file_url": file_url },
        });

        let response = self
            .authorize(self.http.post(format!("{}/transcriptions", self.base_url)))
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn poll(&self, task_id: &str) -> Result<Value> {
        let response = self
            .authorize(
                self.http
                    .get(format!("{}/transcriptions/{}", self.base_url, task_id)),
            )
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    async fn fetch_document(&self, url: &str) -> Result<String> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

/// reqwest-backed object storage client (multipart upload, delete by URL).
pub struct HttpObjectStore {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpObjectStore {
    pub fn new(config: &RemoteConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }
}

#[async_trait::async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(
        &self,
        file: &Path,
        on_progress: &(dyn Fn(f32) + Send + Sync),
    ) -> Result<String> {
        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "recording.wav".to_string());

        on_progress(0.0);

        let bytes = tokio::fs::read(file).await?;
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.clone());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .authorize(self.http.post(format!("{}/uploads", self.base_url)))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body: Value = response.json().await?;
        let url = body
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Protocol("upload response is missing url".to_string()))?
            .to_string();

        on_progress(1.0);
        info!("Uploaded {} to {}", file_name, url);

        Ok(url)
    }

    async fn delete(&self, url: &str) -> Result<()> {
        self.authorize(self.http.delete(url))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
