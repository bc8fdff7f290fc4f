use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use super::decode::AudioData;
use crate::error::{PrepError, Result};

/// Scale between 16-bit PCM and normalized floats. `i16::MIN` maps slightly below -1.0.
pub const PCM_SCALE: f32 = 32767.0;

/// Read a mono 16-bit PCM WAV file as samples normalized by [`PCM_SCALE`].
pub fn read(path: &Path) -> Result<AudioData> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(PrepError::UnsupportedFormat(format!(
            "expected mono WAV, got {} channels",
            spec.channels
        )));
    }
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(PrepError::UnsupportedFormat(format!(
            "expected 16-bit integer PCM, got {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    let samples = reader
        .samples::<i16>()
        .map(|s| s.map(from_pcm))
        .collect::<std::result::Result<Vec<f32>, _>>()?;

    log::debug!(
        "Read {} samples at {}Hz from {}",
        samples.len(),
        spec.sample_rate,
        path.display()
    );

    Ok(AudioData {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Write normalized samples as a mono 16-bit PCM WAV file.
///
/// Values outside [-1, 1] saturate at the i16 range.
pub fn write(samples: &[f32], path: &Path, sample_rate: u32) -> Result<()> {
    if sample_rate == 0 {
        return Err(PrepError::invalid("sample rate must be positive"));
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        writer.write_sample(to_pcm(sample))?;
    }
    writer.finalize()?;

    log::debug!(
        "Wrote {} samples at {}Hz to {}",
        samples.len(),
        sample_rate,
        path.display()
    );
    Ok(())
}

pub fn from_pcm(sample: i16) -> f32 {
    sample as f32 / PCM_SCALE
}

pub fn to_pcm(sample: f32) -> i16 {
    (sample * PCM_SCALE) as i16
}
