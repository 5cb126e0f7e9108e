//! Asynchronous remote transcription
//!
//! Upload → submit → poll → parse → cleanup, with the result-shape
//! ambiguity isolated in `parse` and the wire transport behind traits so
//! the orchestrator can be exercised without a network.

mod api;
mod client;
mod job;
mod optimize;
pub mod parse;

pub use api::{ObjectStore, TaskStatus, TranscriptionApi};
pub use client::{HttpObjectStore, HttpTranscriptionClient};
pub use job::{RemoteTranscriber, RemoteTranscriberConfig, TranscriptionJob};
pub use optimize::{TextCompletion, TranscriptRefiner};
