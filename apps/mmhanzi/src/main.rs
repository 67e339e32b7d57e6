//! # mmhanzi Binary
//!
//! Command-line entry point. Argument parsing and logging setup happen
//! here; the work happens in [`mmhanzi::cli`].

use clap::{ArgAction, Parser, Subcommand};
use mmhanzi::cli;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Convert Make Me a Hanzi data into the JSON assets the mobile app uses.
#[derive(Parser)]
#[command(name = "mmhanzi", version, about)]
struct Cli {
    /// Raise log verbosity (repeat for more).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter the stroke-median dataset down to a lesson character set.
    Medians {
        /// The full stroke dataset (JSON lines).
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the filtered JSON lines.
        #[arg(short, long)]
        output: PathBuf,

        /// Lesson characters, inline.
        #[arg(long, conflicts_with = "chars_file")]
        chars: Option<String>,

        /// File whose characters form the lesson set.
        #[arg(long)]
        chars_file: Option<PathBuf>,
    },

    /// Convert graphics.txt / dictionary.txt into normalized JSON maps.
    Convert {
        /// Path to graphics.txt.
        #[arg(short, long, default_value = "graphics.txt")]
        graphics: PathBuf,

        /// Path to dictionary.txt.
        #[arg(short, long, default_value = "dictionary.txt")]
        dict: PathBuf,

        /// Output directory for graphics.json and dict.json.
        #[arg(short, long, default_value = "assets/hanzi")]
        out: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Command::Medians {
            input,
            output,
            chars,
            chars_file,
        } => cli::cmd_medians(&input, &output, chars.as_deref(), chars_file.as_deref()),
        Command::Convert { graphics, dict, out } => cli::cmd_convert(&graphics, &dict, &out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Set up the subscriber; `RUST_LOG` wins over the verbosity flag.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
