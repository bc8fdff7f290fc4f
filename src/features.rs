use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};

/// Frequency-domain blocks of one signal, as handed to the model pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureFile {
    pub sample_rate: u32,
    /// Time-domain block length; every entry of `blocks` is twice this long.
    pub block_size: usize,
    pub blocks: Vec<Vec<f32>>,
}

impl FeatureFile {
    pub fn new(sample_rate: u32, block_size: usize, blocks: Vec<Vec<f32>>) -> Result<Self> {
        let file = Self {
            sample_rate,
            block_size,
            blocks,
        };
        file.validate()?;
        Ok(file)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let reader = BufReader::new(std::fs::File::open(path)?);
        let file: Self = serde_json::from_reader(reader)?;
        file.validate()?;
        log::debug!(
            "Loaded {} feature blocks from {}",
            file.blocks.len(),
            path.display()
        );
        Ok(file)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        log::debug!("Saved {} feature blocks to {}", self.blocks.len(), path.display());
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(PrepError::invalid("block size must be positive"));
        }
        if self.sample_rate == 0 {
            return Err(PrepError::invalid("sample rate must be positive"));
        }
        let expected = self
            .block_size
            .checked_mul(2)
            .ok_or_else(|| PrepError::invalid("block size too large"))?;
        if let Some(idx) = self.blocks.iter().position(|b| b.len() != expected) {
            return Err(PrepError::invalid(format!(
                "feature block {} has length {}, expected {}",
                idx,
                self.blocks[idx].len(),
                expected
            )));
        }
        Ok(())
    }
}
