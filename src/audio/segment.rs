use crate::error::{Error, Result};
use hound::{WavReader, WavWriter};
use std::path::Path;

/// Export a time-bounded slice of a WAV recording to `dest`.
///
/// The slice covers `[start_secs, start_secs + duration_secs)`, truncated at
/// the end of the source. Only 16-bit integer PCM is supported, matching the
/// recording sink format.
pub fn export_slice(
    source: impl AsRef<Path>,
    start_secs: f64,
    duration_secs: f64,
    dest: impl AsRef<Path>,
) -> Result<()> {
    let source = source.as_ref();
    let dest = dest.as_ref();

    let reader = WavReader::open(source)?;
    let spec = reader.spec();

    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(Error::Audio(format!(
            "unsupported sample format in {}: {}-bit {:?}",
            source.display(),
            spec.bits_per_sample,
            spec.sample_format
        )));
    }

    let frames_per_sec = spec.sample_rate as f64;
    let skip = (start_secs * frames_per_sec) as usize * spec.channels as usize;
    let take = (duration_secs * frames_per_sec) as usize * spec.channels as usize;

    let mut writer = WavWriter::create(dest, spec)?;

    for sample in reader.into_samples::<i16>().skip(skip).take(take) {
        writer.write_sample(sample?)?;
    }

    writer.finalize()?;

    Ok(())
}
