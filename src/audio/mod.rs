pub mod blocks;
pub mod decode;
pub mod resample;
pub mod spectral;
pub mod wav;
