use std::collections::HashMap;
use std::sync::Arc;

use rayon::prelude::*;
use rustfft::{num_complex::Complex, Fft, FftDirection, FftPlanner};

use crate::error::{PrepError, Result};

/// Transform each time-domain block into `[re_0..re_{N-1}, im_0..im_{N-1}]`.
///
/// The DFT is unnormalized, so bin 0 holds the plain sum of the block.
pub fn to_frequency_domain(blocks: &[Vec<f32>]) -> Result<Vec<Vec<f32>>> {
    if let Some(idx) = blocks.iter().position(|b| b.is_empty()) {
        return Err(PrepError::invalid(format!("block {} is empty", idx)));
    }

    let plans = plan_lengths(blocks.iter().map(Vec::len), FftDirection::Forward);

    let out = blocks
        .par_iter()
        .map(|block| {
            let n = block.len();
            let mut buffer: Vec<Complex<f32>> =
                block.iter().map(|&s| Complex::new(s, 0.0)).collect();
            plans[&n].process(&mut buffer);

            let mut packed = Vec::with_capacity(2 * n);
            packed.extend(buffer.iter().map(|c| c.re));
            packed.extend(buffer.iter().map(|c| c.im));
            packed
        })
        .collect();

    Ok(out)
}

/// Rebuild complex time-domain blocks from packed real/imaginary vectors.
///
/// The inverse DFT is scaled by `1/N`. Output stays complex; see
/// [`max_imaginary_residue`] and [`into_real`] for getting a real signal back.
pub fn from_frequency_domain(blocks: &[Vec<f32>]) -> Result<Vec<Vec<Complex<f32>>>> {
    for (idx, block) in blocks.iter().enumerate() {
        if block.is_empty() {
            return Err(PrepError::invalid(format!(
                "frequency block {} is empty",
                idx
            )));
        }
        if block.len() % 2 != 0 {
            return Err(PrepError::invalid(format!(
                "frequency block {} has odd length {}, cannot split into real/imaginary halves",
                idx,
                block.len()
            )));
        }
    }

    let plans = plan_lengths(blocks.iter().map(|b| b.len() / 2), FftDirection::Inverse);

    let out = blocks
        .par_iter()
        .map(|block| {
            let n = block.len() / 2;
            let (re, im) = block.split_at(n);
            let mut buffer: Vec<Complex<f32>> = re
                .iter()
                .zip(im)
                .map(|(&r, &i)| Complex::new(r, i))
                .collect();
            plans[&n].process(&mut buffer);

            let scale = 1.0 / n as f32;
            for c in &mut buffer {
                *c *= scale;
            }
            buffer
        })
        .collect();

    Ok(out)
}

/// Largest absolute imaginary component across all blocks.
pub fn max_imaginary_residue(blocks: &[Vec<Complex<f32>>]) -> f32 {
    blocks
        .iter()
        .flatten()
        .map(|c| c.im.abs())
        .fold(0.0f32, f32::max)
}

/// Drop the imaginary parts.
pub fn into_real(blocks: &[Vec<Complex<f32>>]) -> Vec<Vec<f32>> {
    blocks
        .iter()
        .map(|block| block.iter().map(|c| c.re).collect())
        .collect()
}

// FftPlanner is not Sync, so plans are built up front and shared with the workers.
fn plan_lengths(
    lengths: impl Iterator<Item = usize>,
    direction: FftDirection,
) -> HashMap<usize, Arc<dyn Fft<f32>>> {
    let mut planner = FftPlanner::<f32>::new();
    let mut plans = HashMap::new();
    for n in lengths {
        plans
            .entry(n)
            .or_insert_with(|| planner.plan_fft(n, direction));
    }
    plans
}
