//! Command-line interface

pub mod commands;

use clap::Parser;

use commands::import::ImportCommands;

#[derive(Parser, Debug)]
#[command(name = "trial-import")]
#[command(about = "Import an agricultural trial workbook into a normalized trial record")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub import: ImportCommands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

impl Cli {
    /// Log filter implied by the -v flags
    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}
