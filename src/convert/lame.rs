use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::{prepare_output, ConvertMp3ToWav};
use crate::error::{PrepError, Result};

/// Two-step conversion through the `lame` CLI: re-encode to a mono MP3, then decode
/// with resampling.
#[derive(Clone, Debug)]
pub struct LameConverter {
    program: String,
    temp_dir: PathBuf,
}

impl Default for LameConverter {
    fn default() -> Self {
        Self::new("lame")
    }
}

impl LameConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            temp_dir: std::env::temp_dir(),
        }
    }

    /// Parent directory for the per-call work dir holding the intermediate mono MP3.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }

    fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| PrepError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(PrepError::ExternalProcess {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }
}

impl ConvertMp3ToWav for LameConverter {
    fn convert(&self, input: &Path, out_dir: &Path, sample_rate: u32) -> Result<PathBuf> {
        let out = prepare_output(input, out_dir, sample_rate)?;

        // Private work dir per call; removed on drop.
        let work = tempfile::Builder::new()
            .prefix("audioprep-")
            .tempdir_in(&self.temp_dir)?;
        let mut tmp_name = input.file_stem().unwrap_or_default().to_os_string();
        tmp_name.push(".mono.mp3");
        let tmp = work.path().join(tmp_name);

        log::info!("Converting {} -> {}", input.display(), out.display());

        let result = self
            .run([
                OsStr::new("-a"),
                OsStr::new("-m"),
                OsStr::new("m"),
                input.as_os_str(),
                tmp.as_os_str(),
            ])
            .and_then(|()| {
                let rate = resample_arg(sample_rate);
                self.run([
                    OsStr::new("--decode"),
                    tmp.as_os_str(),
                    out.as_os_str(),
                    OsStr::new("--resample"),
                    OsStr::new(&rate),
                ])
            });

        let work_path = work.path().to_path_buf();
        if let Err(e) = work.close() {
            log::warn!("Failed to remove {}: {}", work_path.display(), e);
        }
        result?;

        if !out.is_file() {
            return Err(PrepError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} reported success but wrote no {}", self.program, out.display()),
            )));
        }

        Ok(out)
    }
}

/// `lame --resample` takes kHz.
fn resample_arg(sample_rate: u32) -> String {
    format!("{}", sample_rate as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fake_mp3(dir: &Path) -> PathBuf {
        let input = dir.join("clip.mp3");
        std::fs::write(&input, b"ID3").unwrap();
        input
    }

    #[test]
    fn resample_arg_is_khz() {
        assert_eq!(resample_arg(44100), "44.1");
        assert_eq!(resample_arg(22050), "22.05");
        assert_eq!(resample_arg(16000), "16");
    }

    #[test]
    fn missing_binary_fails_to_spawn() {
        let dir = TempDir::new().unwrap();
        let input = fake_mp3(dir.path());
        let converter = LameConverter::new("audioprep-no-such-lame").with_temp_dir(dir.path());

        let err = converter.convert(&input, &dir.path().join("out"), 44100).unwrap_err();
        assert!(matches!(err, PrepError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_reported() {
        let dir = TempDir::new().unwrap();
        let input = fake_mp3(dir.path());
        let work = dir.path().join("work");
        std::fs::create_dir(&work).unwrap();
        let converter = LameConverter::new("false").with_temp_dir(&work);

        let err = converter.convert(&input, &dir.path().join("out"), 44100).unwrap_err();
        match err {
            PrepError::ExternalProcess { program, status, .. } => {
                assert_eq!(program, "false");
                assert!(!status.success());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(std::fs::read_dir(&work).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn success_without_output_is_an_error() {
        let dir = TempDir::new().unwrap();
        let input = fake_mp3(dir.path());
        let converter = LameConverter::new("true").with_temp_dir(dir.path());

        let err = converter.convert(&input, &dir.path().join("out"), 44100).unwrap_err();
        assert!(matches!(err, PrepError::Io(_)));
    }

    #[cfg(unix)]
    fn fake_lame(dir: &Path, log: &Path) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        // Logs its args, then creates whichever file it was asked to write.
        let script = dir.join("fake-lame");
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\necho \"$@\" >> '{}'\nif [ \"$1\" = \"--decode\" ]; then : > \"$3\"; else : > \"$5\"; fi\n",
                log.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
        script
    }

    #[cfg(unix)]
    #[test]
    fn runs_encode_then_decode_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let input = fake_mp3(dir.path());
        let log = dir.path().join("args.log");
        let script = fake_lame(dir.path(), &log);
        let work = dir.path().join("work");
        std::fs::create_dir(&work).unwrap();
        let out_dir = dir.path().join("out");

        let converter = LameConverter::new(script.to_str().unwrap()).with_temp_dir(&work);
        let out = converter.convert(&input, &out_dir, 22050).unwrap();

        assert_eq!(out, out_dir.join("clip.wav"));
        assert!(out.is_file());

        let calls = std::fs::read_to_string(&log).unwrap();
        let calls: Vec<&str> = calls.lines().collect();
        assert_eq!(calls.len(), 2);

        let encode: Vec<&str> = calls[0].split(' ').collect();
        assert_eq!(&encode[..3], &["-a", "-m", "m"]);
        assert_eq!(encode[3], input.to_str().unwrap());
        let tmp = Path::new(encode[4]);
        assert!(tmp.starts_with(&work));
        assert_eq!(tmp.file_name().unwrap(), "clip.mono.mp3");

        assert_eq!(
            calls[1],
            format!("--decode {} {} --resample 22.05", tmp.display(), out.display())
        );

        assert!(!tmp.exists());
        assert_eq!(std::fs::read_dir(&work).unwrap().count(), 0);
    }

    #[test]
    fn leaves_same_named_file_in_temp_dir_alone() {
        let dir = TempDir::new().unwrap();
        let input = fake_mp3(dir.path());
        let bystander = dir.path().join("clip.mono.mp3");
        std::fs::write(&bystander, b"keep me").unwrap();

        let converter = LameConverter::new("audioprep-no-such-lame").with_temp_dir(dir.path());
        assert!(converter.convert(&input, &dir.path().join("out"), 44100).is_err());
        assert_eq!(std::fs::read(&bystander).unwrap(), b"keep me");
    }

    #[test]
    fn wrong_extension_never_spawns() {
        let dir = TempDir::new().unwrap();
        let converter = LameConverter::new("audioprep-no-such-lame");
        let err = converter
            .convert(Path::new("clip.ogg"), dir.path(), 44100)
            .unwrap_err();
        assert!(matches!(err, PrepError::InvalidArgument(_)));
    }
}
