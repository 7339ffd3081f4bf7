use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "depdice",
    about = "Pick a random dependency from your lockfile and learn about it",
    version,
    color = clap::ColorChoice::Auto
)]
pub struct Cli {
    /// Project directory containing package-lock.json or yarn.lock
    #[arg(short = 'C', long = "dir")]
    pub dir: Option<PathBuf>,

    /// Seconds to wait for each npm / yarn command
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Seed the random pick so runs are repeatable
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
