use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::convert::Backend;
use crate::error::Result;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub convert: ConvertConfig,
    #[serde(default)]
    pub features: FeaturesConfig,
}

#[derive(Debug, Deserialize)]
pub struct ConvertConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_lame_binary")]
    pub lame_binary: String,
}

#[derive(Debug, Deserialize)]
pub struct FeaturesConfig {
    #[serde(default = "default_block_size")]
    pub block_size: usize,
    /// Largest imaginary residue tolerated silently on reconstruction
    #[serde(default = "default_residue_tolerance")]
    pub residue_tolerance: f32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            out_dir: default_out_dir(),
            sample_rate: default_sample_rate(),
            backend: Backend::default(),
            lame_binary: default_lame_binary(),
        }
    }
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        Self {
            block_size: default_block_size(),
            residue_tolerance: default_residue_tolerance(),
        }
    }
}

fn default_out_dir() -> PathBuf { PathBuf::from("dataset/binary") }
fn default_sample_rate() -> u32 { 44100 }
fn default_lame_binary() -> String { "lame".into() }
fn default_block_size() -> usize { 2048 }
fn default_residue_tolerance() -> f32 { 1e-3 }

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Explicit path, then `./audioprep.toml`, then the user config locations.
pub fn discover(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let local = PathBuf::from("audioprep.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("audioprep").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("audioprep").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}
