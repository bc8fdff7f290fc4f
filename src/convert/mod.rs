pub mod lame;
pub mod native;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{PrepError, Result};

pub use lame::LameConverter;
pub use native::NativeConverter;

/// Turns an MP3 file into a mono 16-bit WAV file at a chosen sample rate.
pub trait ConvertMp3ToWav {
    /// Writes `out_dir/<stem>.wav` and returns its path.
    fn convert(&self, input: &Path, out_dir: &Path, sample_rate: u32) -> Result<PathBuf>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Shell out to the `lame` encoder
    #[default]
    Lame,
    /// Decode and resample in process
    Native,
}

pub fn converter(backend: Backend, lame_binary: &str) -> Box<dyn ConvertMp3ToWav> {
    match backend {
        Backend::Lame => Box::new(LameConverter::new(lame_binary)),
        Backend::Native => Box::new(NativeConverter),
    }
}

/// Checks the shared preconditions, creates `out_dir` and returns the WAV path to write.
pub(crate) fn prepare_output(input: &Path, out_dir: &Path, sample_rate: u32) -> Result<PathBuf> {
    let is_mp3 = input
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("mp3"));
    if !is_mp3 {
        return Err(PrepError::invalid("expected .mp3 extension"));
    }
    if sample_rate == 0 {
        return Err(PrepError::invalid("sample rate must be positive"));
    }
    if !input.is_file() {
        return Err(PrepError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("input file not found: {}", input.display()),
        )));
    }

    let out = output_path(input, out_dir)
        .ok_or_else(|| PrepError::invalid(format!("no file name in {}", input.display())))?;

    std::fs::create_dir_all(out_dir)?;
    Ok(out)
}

/// `out_dir/<stem>.wav`, the file a converter writes for `input`.
pub fn output_path(input: &Path, out_dir: &Path) -> Option<PathBuf> {
    let mut name = input.file_stem()?.to_os_string();
    name.push(".wav");
    Some(out_dir.join(name))
}

/// Output paths that more than one of `inputs` would write, in first-seen order.
pub fn colliding_outputs(inputs: &[PathBuf], out_dir: &Path) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    let mut collisions = Vec::new();
    for out in inputs.iter().filter_map(|i| output_path(i, out_dir)) {
        if !seen.insert(out.clone()) && !collisions.contains(&out) {
            collisions.push(out);
        }
    }
    collisions
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn rejects_non_mp3() {
        let dir = TempDir::new().unwrap();
        let err = prepare_output(Path::new("song.flac"), dir.path(), 44100).unwrap_err();
        match err {
            PrepError::InvalidArgument(msg) => assert_eq!(msg, "expected .mp3 extension"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_zero_rate() {
        let dir = TempDir::new().unwrap();
        let err = prepare_output(Path::new("song.mp3"), dir.path(), 0).unwrap_err();
        assert!(matches!(err, PrepError::InvalidArgument(_)));
    }

    #[test]
    fn missing_input_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = prepare_output(&dir.path().join("gone.mp3"), dir.path(), 44100).unwrap_err();
        assert!(matches!(err, PrepError::Io(_)));
    }

    #[test]
    fn creates_out_dir_and_names_output() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("Track 01.MP3");
        std::fs::write(&input, b"").unwrap();
        let out_dir = dir.path().join("dataset").join("binary");

        let out = prepare_output(&input, &out_dir, 44100).unwrap();
        assert!(out_dir.is_dir());
        assert_eq!(out, out_dir.join("Track 01.wav"));
    }

    #[test]
    fn keeps_dots_in_stem() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("live.2019.mp3");
        std::fs::write(&input, b"").unwrap();

        let out = prepare_output(&input, dir.path(), 44100).unwrap();
        assert_eq!(out, dir.path().join("live.2019.wav"));
    }

    #[test]
    fn same_stem_in_different_dirs_collides() {
        let inputs = vec![
            PathBuf::from("a/x.mp3"),
            PathBuf::from("b/x.mp3"),
            PathBuf::from("c/y.mp3"),
            PathBuf::from("d/x.mp3"),
        ];
        let out_dir = Path::new("wavs");
        assert_eq!(colliding_outputs(&inputs, out_dir), vec![out_dir.join("x.wav")]);
    }

    #[test]
    fn distinct_stems_do_not_collide() {
        let inputs = vec![PathBuf::from("a/x.mp3"), PathBuf::from("a/y.mp3")];
        assert!(colliding_outputs(&inputs, Path::new("wavs")).is_empty());
    }

    #[test]
    fn backend_parses_from_toml_names() {
        #[derive(Deserialize)]
        struct Wrapper {
            backend: Backend,
        }
        let w: Wrapper = toml::from_str("backend = \"native\"").unwrap();
        assert_eq!(w.backend, Backend::Native);
    }
}
