use crate::error::{PrepError, Result};

/// Split `signal` into consecutive `block_size` chunks, zero-padding the last one on the right.
///
/// Returns `ceil(signal.len() / block_size)` blocks; an empty signal yields no blocks.
/// The amount of padding is not recorded, so [`from_blocks`] cannot strip it again.
pub fn to_blocks(signal: &[f32], block_size: usize) -> Result<Vec<Vec<f32>>> {
    if block_size == 0 {
        return Err(PrepError::invalid("block size must be positive"));
    }

    let blocks: Vec<Vec<f32>> = signal
        .chunks(block_size)
        .map(|chunk| {
            let mut block = Vec::with_capacity(block_size);
            block.extend_from_slice(chunk);
            block.resize(block_size, 0.0);
            block
        })
        .collect();

    log::debug!(
        "Segmented {} samples into {} blocks of {}",
        signal.len(),
        blocks.len(),
        block_size
    );
    Ok(blocks)
}

/// Concatenate blocks back into a flat signal.
///
/// Any zero padding added by [`to_blocks`] stays at the tail: the result is
/// `blocks.len() * block_size` long. All blocks must share one length.
pub fn from_blocks(blocks: &[Vec<f32>]) -> Result<Vec<f32>> {
    let Some(first) = blocks.first() else {
        return Ok(Vec::new());
    };
    let block_size = first.len();

    if let Some((idx, block)) = blocks
        .iter()
        .enumerate()
        .find(|(_, b)| b.len() != block_size)
    {
        return Err(PrepError::invalid(format!(
            "block {} has length {}, expected {}",
            idx,
            block.len(),
            block_size
        )));
    }

    Ok(blocks.concat())
}
