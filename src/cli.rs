use audioprep::convert::Backend;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "audioprep", about = "Audio preprocessing for ML pipelines: MP3 to WAV, blocks, spectra")]
pub struct Cli {
    /// Config file (defaults to ./audioprep.toml or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Convert MP3 files to mono 16-bit WAV
    Convert {
        /// Input MP3 files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output directory [config: convert.out_dir]
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Output sample rate in Hz [config: convert.sample_rate]
        #[arg(short, long)]
        sample_rate: Option<u32>,

        /// Conversion backend [config: convert.backend]
        #[arg(short, long, value_enum)]
        backend: Option<Backend>,

        /// Path or name of the lame binary [config: convert.lame_binary]
        #[arg(long)]
        lame: Option<String>,
    },

    /// Split a WAV file into blocks and write their spectra as a JSON feature file
    Features {
        /// Input mono 16-bit WAV file
        input: PathBuf,

        /// Output feature file
        output: PathBuf,

        /// Samples per block [config: features.block_size]
        #[arg(short = 'n', long)]
        block_size: Option<usize>,
    },

    /// Rebuild a WAV file from a feature file
    Reconstruct {
        /// Input feature file
        input: PathBuf,

        /// Output WAV file
        output: PathBuf,
    },
}
