pub mod audio;
pub mod config;
pub mod convert;
pub mod error;
pub mod features;

pub use audio::blocks::{from_blocks, to_blocks};
pub use audio::decode::AudioData;
pub use audio::spectral::{from_frequency_domain, to_frequency_domain};
pub use convert::{ConvertMp3ToWav, LameConverter, NativeConverter};
pub use error::{PrepError, Result};
