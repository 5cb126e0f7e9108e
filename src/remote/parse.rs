//! Interpretation of service responses whose shape varies across versions.
//!
//! Submit and poll payloads are handled as raw JSON: the only hard
//! requirements are `output.task_id` on submit and `output.task_status` on
//! poll. Result text is extracted by trying every known shape in order; the
//! first non-empty match wins.

use super::api::{TaskStatus, TranscriptionApi};
use crate::error::{Error, Result};
use serde_json::Value;

/// Extract the job id from a submit response. A missing id is a protocol
/// error, not a transient one.
pub fn task_id(submit: &Value) -> Result<String> {
    submit
        .pointer("/output/task_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::Protocol("submit response is missing output.task_id".to_string()))
}

/// Extract the job status from a poll response. A missing or unrecognized
/// status reads as `Unknown` (transient).
pub fn task_status(poll: &Value) -> TaskStatus {
    poll.pointer("/output/task_status")
        .and_then(Value::as_str)
        .map(TaskStatus::parse)
        .unwrap_or(TaskStatus::Unknown)
}

/// Service-provided failure message, with a generic default.
pub fn failure_message(poll: &Value) -> String {
    poll.pointer("/output/message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "transcription service reported failure".to_string())
}

/// Extract transcript text from a SUCCEEDED poll response.
///
/// Shapes are tried in order:
/// 1. inline `output.result.text`
/// 2. `output.result.transcription_url` → downloaded result document
/// 3. legacy `output.results[0].transcription.text` / `output.results[0].text`
/// 4. top-level `output.text`
///
/// Exhausting every shape without a non-empty string is an empty-result
/// error: the service succeeded but had nothing to say, which callers treat
/// differently from a malformed response.
pub async fn extract_transcript(poll: &Value, api: &dyn TranscriptionApi) -> Result<String> {
    if let Some(text) = string_at(poll, "/output/result/text") {
        return Ok(text);
    }

    if let Some(url) = poll
        .pointer("/output/result/transcription_url")
        .and_then(Value::as_str)
    {
        let document = api.fetch_document(url).await?;
        if let Some(text) = parse_result_document(&document) {
            return Ok(text);
        }
    }

    for path in [
        "/output/results/0/transcription/text",
        "/output/results/0/text",
        "/output/text",
    ] {
        if let Some(text) = string_at(poll, path) {
            return Ok(text);
        }
    }

    Err(Error::EmptyResult)
}

/// Interpret a downloaded result document.
///
/// Known JSON shapes: `transcripts[0].text`, a `transcripts[0].sentences[]`
/// join, `transcription.text`, and a bare `text` field. A body that is not
/// JSON at all is taken as the raw transcript.
pub fn parse_result_document(body: &str) -> Option<String> {
    let value: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return non_empty(body),
    };

    if let Some(text) = string_at(&value, "/transcripts/0/text") {
        return Some(text);
    }

    if let Some(sentences) = value
        .pointer("/transcripts/0/sentences")
        .and_then(Value::as_array)
    {
        let joined: String = sentences
            .iter()
            .filter_map(|s| s.get("text").and_then(Value::as_str))
            .collect();
        if let Some(text) = non_empty(&joined) {
            return Some(text);
        }
    }

    string_at(&value, "/transcription/text").or_else(|| string_at(&value, "/text"))
}

fn string_at(value: &Value, path: &str) -> Option<String> {
    value
        .pointer(path)
        .and_then(Value::as_str)
        .and_then(non_empty)
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct DocumentApi(String);

    #[async_trait::async_trait]
    impl TranscriptionApi for DocumentApi {
        async fn submit(&self, _file_url: &str, _model: &str) -> Result<Value> {
            unreachable!("parse tests never submit")
        }

        async fn poll(&self, _task_id: &str) -> Result<Value> {
            unreachable!("parse tests never poll")
        }

        async fn fetch_document(&self, _url: &str) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    fn no_document() -> DocumentApi {
        DocumentApi(String::new())
    }

    #[test]
    fn task_id_is_required() {
        let err = task_id(&json!({"output": {}})).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));

        let id = task_id(&json!({"output": {"task_id": "abc-123"}})).unwrap();
        assert_eq!(id, "abc-123");
    }

    #[test]
    fn unrecognized_status_reads_as_unknown() {
        let status = task_status(&json!({"output": {"task_status": "QUEUED_V2"}}));
        assert_eq!(status, TaskStatus::Unknown);

        let status = task_status(&json!({"output": {}}));
        assert_eq!(status, TaskStatus::Unknown);
    }

    #[tokio::test]
    async fn inline_result_text_wins() {
        let poll = json!({"output": {"task_status": "SUCCEEDED", "result": {"text": "hello"}}});
        let text = extract_transcript(&poll, &no_document()).await.unwrap();
        assert_eq!(text, "hello");
    }

    #[tokio::test]
    async fn sentences_are_joined_without_separator() {
        let poll = json!({
            "output": {"result": {"transcription_url": "https://results/doc"}}
        });
        let api = DocumentApi(
            json!({"transcripts": [{"sentences": [{"text": "A"}, {"text": "B"}]}]}).to_string(),
        );
        let text = extract_transcript(&poll, &api).await.unwrap();
        assert_eq!(text, "AB");
    }

    #[tokio::test]
    async fn raw_document_body_is_a_transcript() {
        let poll = json!({
            "output": {"result": {"transcription_url": "https://results/doc"}}
        });
        let api = DocumentApi("plain words, not json".to_string());
        let text = extract_transcript(&poll, &api).await.unwrap();
        assert_eq!(text, "plain words, not json");
    }

    #[tokio::test]
    async fn legacy_results_shape_is_supported() {
        let poll = json!({
            "output": {"results": [{"transcription": {"text": "legacy"}}]}
        });
        let text = extract_transcript(&poll, &no_document()).await.unwrap();
        assert_eq!(text, "legacy");

        let poll = json!({"output": {"results": [{"text": "flat legacy"}]}});
        let text = extract_transcript(&poll, &no_document()).await.unwrap();
        assert_eq!(text, "flat legacy");
    }

    #[tokio::test]
    async fn top_level_output_text_is_the_last_resort() {
        let poll = json!({"output": {"text": "bare"}});
        let text = extract_transcript(&poll, &no_document()).await.unwrap();
        assert_eq!(text, "bare");
    }

    #[tokio::test]
    async fn exhausted_shapes_yield_empty_result() {
        let poll = json!({"output": {"result": {"text": "   "}}});
        let err = extract_transcript(&poll, &no_document()).await.unwrap_err();
        assert!(matches!(err, Error::EmptyResult));
    }
}
