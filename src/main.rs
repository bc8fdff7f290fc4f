mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};

use audioprep::audio::{blocks, spectral, wav};
use audioprep::config::{self, Config};
use audioprep::convert::{self, Backend};
use audioprep::features::FeatureFile;
use cli::{Cli, Command};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let cfg = match config::discover(cli.config.as_deref()) {
        Some(path) if cli.config.is_some() => {
            let cfg = config::load_config(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            log::info!("Loaded config from {}", path.display());
            cfg
        }
        Some(path) => match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(err) => {
                log::warn!("Failed to load config from {}: {}", path.display(), err);
                Config::default()
            }
        },
        None => Config::default(),
    };

    match cli.command {
        Command::Convert {
            inputs,
            out_dir,
            sample_rate,
            backend,
            lame,
        } => {
            let out_dir = out_dir.unwrap_or(cfg.convert.out_dir);
            let sample_rate = sample_rate.unwrap_or(cfg.convert.sample_rate);
            let backend = backend.unwrap_or(cfg.convert.backend);
            let lame = lame.unwrap_or(cfg.convert.lame_binary);
            run_convert(&inputs, &out_dir, sample_rate, backend, &lame)
        }
        Command::Features {
            input,
            output,
            block_size,
        } => {
            let block_size = block_size.unwrap_or(cfg.features.block_size);
            run_features(&input, &output, block_size)
        }
        Command::Reconstruct { input, output } => {
            run_reconstruct(&input, &output, cfg.features.residue_tolerance)
        }
    }
}

fn run_convert(
    inputs: &[PathBuf],
    out_dir: &Path,
    sample_rate: u32,
    backend: Backend,
    lame: &str,
) -> Result<()> {
    log::info!(
        "Converting {} file(s) to {} at {}Hz ({:?} backend)",
        inputs.len(),
        out_dir.display(),
        sample_rate,
        backend
    );
    let collisions = convert::colliding_outputs(inputs, out_dir);
    if !collisions.is_empty() {
        let names: Vec<String> = collisions.iter().map(|p| p.display().to_string()).collect();
        anyhow::bail!(
            "Several inputs share a file stem and would overwrite: {}",
            names.join(", ")
        );
    }
    let converter = convert::converter(backend, lame);

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files ({eta} remaining)")?
            .progress_chars("=>-"),
    );

    let mut failed = 0usize;
    for input in inputs {
        match converter.convert(input, out_dir, sample_rate) {
            Ok(out) => pb.println(format!("{} -> {}", input.display(), out.display())),
            Err(err) => {
                failed += 1;
                log::error!("Failed to convert {}: {}", input.display(), err);
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Conversion complete");

    if failed > 0 {
        anyhow::bail!("{} of {} conversions failed", failed, inputs.len());
    }
    Ok(())
}

fn run_features(input: &Path, output: &Path, block_size: usize) -> Result<()> {
    let audio = wav::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    log::info!(
        "Input: {} samples, {}Hz, {:.1}s",
        audio.samples.len(),
        audio.sample_rate,
        audio.duration_secs()
    );

    let time_blocks = blocks::to_blocks(&audio.samples, block_size)?;
    let freq_blocks = spectral::to_frequency_domain(&time_blocks)?;
    log::info!("{} blocks of {} samples", freq_blocks.len(), block_size);

    FeatureFile::new(audio.sample_rate, block_size, freq_blocks)?
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!("Done! Output: {}", output.display());
    Ok(())
}

fn run_reconstruct(input: &Path, output: &Path, residue_tolerance: f32) -> Result<()> {
    let features = FeatureFile::load(input)
        .with_context(|| format!("Failed to load feature file {}", input.display()))?;

    let time_blocks = spectral::from_frequency_domain(&features.blocks)?;
    let residue = spectral::max_imaginary_residue(&time_blocks);
    if residue > residue_tolerance {
        log::warn!(
            "Imaginary residue {:.3e} exceeds tolerance {:.3e}; discarding it",
            residue,
            residue_tolerance
        );
    } else {
        log::debug!("Imaginary residue {:.3e}", residue);
    }

    // Block padding is kept: the tail may carry up to block_size - 1 extra zeros.
    let samples = blocks::from_blocks(&spectral::into_real(&time_blocks))?;
    wav::write(&samples, output, features.sample_rate)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    log::info!(
        "Done! Output: {} ({} samples, {}Hz)",
        output.display(),
        samples.len(),
        features.sample_rate
    );
    Ok(())
}
