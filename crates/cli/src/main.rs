mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "humanize",
    about = "Rewrite AI-generated drafts so they read as human-written",
    version
)]
pub struct Cli {
    /// Input files (reads stdin if none provided)
    pub files: Vec<PathBuf>,

    /// Content type id (see --list-profiles)
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Writing tone for profiles without a locked tone
    #[arg(short, long)]
    pub tone: Option<String>,

    /// Generation provider: groq, claude or echo
    #[arg(long)]
    pub provider: Option<String>,

    /// Model id passed to the provider
    #[arg(short, long)]
    pub model: Option<String>,

    /// Skip cliché substitution and sentence-rhythm post-processing
    #[arg(long)]
    pub no_stealth: bool,

    /// Reuse cached results for identical input and options
    #[arg(long)]
    pub no_randomize: bool,

    /// Comma-separated detector targets (gptzero,originality,turnitin,zerogpt,quillbot or all)
    #[arg(short, long)]
    pub detectors: Option<String>,

    /// Timeout in seconds for each provider call
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Print results as JSON
    #[arg(long)]
    pub json: bool,

    /// Copy the last result to the clipboard
    #[arg(long)]
    pub copy: bool,

    /// List content types and tones, then exit
    #[arg(long)]
    pub list_profiles: bool,

    /// Write the given options to the settings file as new defaults, then exit
    #[arg(long)]
    pub save_defaults: bool,

    /// Print run metrics to stderr when done
    #[arg(long)]
    pub metrics: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match commands::execute(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
