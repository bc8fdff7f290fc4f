use rubato::{Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction};

use crate::error::{PrepError, Result};

/// Resample a mono signal in one pass. Returns the input unchanged when the rates match.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == 0 || to_rate == 0 {
        return Err(PrepError::invalid("sample rate must be positive"));
    }
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, samples.len(), 1)
        .map_err(|e| PrepError::Resample(e.to_string()))?;

    let expected = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();

    let input = vec![samples.to_vec()];
    let mut output = resampler
        .process(&input, None)
        .map_err(|e| PrepError::Resample(e.to_string()))?
        .into_iter()
        .next()
        .unwrap_or_default();

    // Flush the filter tail until the delayed signal has fully come out.
    while output.len() < delay + expected {
        let tail = resampler
            .process_partial::<Vec<f32>>(None, None)
            .map_err(|e| PrepError::Resample(e.to_string()))?
            .into_iter()
            .next()
            .unwrap_or_default();
        if tail.is_empty() {
            break;
        }
        output.extend(tail);
    }

    output.drain(..delay.min(output.len()));
    output.truncate(expected);

    log::debug!(
        "Resampled {} samples {}Hz -> {}Hz",
        samples.len(),
        from_rate,
        to_rate
    );

    Ok(output)
}
