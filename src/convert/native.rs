use std::path::{Path, PathBuf};

use super::{prepare_output, ConvertMp3ToWav};
use crate::audio::{decode, resample, wav};
use crate::error::Result;

/// In-process conversion: symphonia decode, mono downmix, rubato resample.
#[derive(Clone, Copy, Debug, Default)]
pub struct NativeConverter;

impl ConvertMp3ToWav for NativeConverter {
    fn convert(&self, input: &Path, out_dir: &Path, sample_rate: u32) -> Result<PathBuf> {
        let out = prepare_output(input, out_dir, sample_rate)?;

        let audio = decode::decode_audio(input)?;
        let samples = resample::resample(&audio.samples, audio.sample_rate, sample_rate)?;
        wav::write(&samples, &out, sample_rate)?;

        log::info!(
            "Converted {} -> {} ({}Hz -> {}Hz)",
            input.display(),
            out.display(),
            audio.sample_rate,
            sample_rate
        );
        Ok(out)
    }
}
