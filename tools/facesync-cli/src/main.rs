//! FaceSync CLI: command-line interface for viseme processing and speech.
//!
//! Usage:
//!   facesync process <RECORDING>   Run the animation pipeline on a recording
//!   facesync pauses <RECORDING>    List the pauses the pipeline would fill
//!   facesync speak <TEXT>          Speak text through a scripted engine
//!   facesync ask <PROMPT>          Ask the dialogue model for a reply
//!   facesync init-config           Write the default configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::TuningArgs;
use facesync_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "facesync",
    about = "Viseme-driven facial animation for talking avatars",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the animation pipeline on a viseme recording
    Process {
        /// Viseme recording (JSONL)
        recording: PathBuf,

        /// Output file for the response JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Seed for idle synthesis (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the pauses found after shaping and smoothing
    Pauses {
        /// Viseme recording (JSONL)
        recording: PathBuf,

        /// Activity threshold
        #[arg(long)]
        threshold: Option<f64>,

        /// Minimum pause length (seconds)
        #[arg(long)]
        min_pause: Option<f64>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Speak text through a scripted engine and write the response
    Speak {
        /// Text to speak
        text: String,

        /// Viseme recording the engine replays
        #[arg(long)]
        recording: PathBuf,

        /// Audio the engine returns
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Output file for the response JSON (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        tuning: TuningArgs,

        /// Seed for idle synthesis (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Ask the dialogue model for a reply
    Ask {
        /// What the patient says
        prompt: String,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Print the canned fallback reply instead of failing
        #[arg(long)]
        fallback: bool,
    },

    /// Write the default configuration file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load();

    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    facesync_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Process {
            recording,
            output,
            tuning,
            seed,
        } => commands::process::run(&config, recording, output, tuning, seed),
        Commands::Pauses {
            recording,
            threshold,
            min_pause,
            json,
        } => commands::pauses::run(&config, recording, threshold, min_pause, json),
        Commands::Speak {
            text,
            recording,
            audio,
            output,
            tuning,
            seed,
        } => commands::speak::run(&config, text, recording, audio, output, tuning, seed).await,
        Commands::Ask {
            prompt,
            model,
            fallback,
        } => commands::ask::run(&config, prompt, model, fallback).await,
        Commands::InitConfig { force } => commands::init_config::run(force),
    }
}
