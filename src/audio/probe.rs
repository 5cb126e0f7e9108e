use crate::error::Result;
use chrono::{DateTime, Utc};
use hound::WavReader;
use std::path::Path;

/// Duration and creation time of a recording on disk.
#[derive(Debug, Clone)]
pub struct AudioProbe {
    pub duration_secs: f64,
    pub created_at: DateTime<Utc>,
}

/// Read a WAV file's duration and creation timestamp.
///
/// Creation time falls back to modification time, then to now; a duration
/// that comes out NaN, infinite, or negative is clamped to zero. The orphan
/// sweep would rather record a zero-length meeting than skip a file.
pub fn probe_wav(path: impl AsRef<Path>) -> Result<AudioProbe> {
    let path = path.as_ref();

    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let duration_secs = reader.duration() as f64 / spec.sample_rate as f64;

    Ok(AudioProbe {
        duration_secs: clamp_duration(duration_secs),
        created_at: file_created_at(path),
    })
}

pub fn clamp_duration(duration_secs: f64) -> f64 {
    if duration_secs.is_finite() && duration_secs > 0.0 {
        duration_secs
    } else {
        0.0
    }
}

pub fn file_created_at(path: &Path) -> DateTime<Utc> {
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(_) => return Utc::now(),
    };

    meta.created()
        .or_else(|_| meta.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now())
}
