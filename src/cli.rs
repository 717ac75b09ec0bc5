use std::path::PathBuf;

use atlas_fetch::Atlas;
use clap::{Parser, Subcommand};

/// Command line arguments of `atlas-fetch`.
#[derive(Parser)]
#[command(
    version,
    about = "Download and cache neuroimaging atlases",
    long_about = "Downloads the Yeo 2011 cortical parcellations or the MDTB cerebellar\n\
                  parcellation into a local cache and prints the paths of their files.\n\
                  Files that are already cached are not downloaded again."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// More log output (repeatable; -v adds debug detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch an atlas and print its files
    Fetch {
        /// Atlas to fetch: yeo-2011 or mdtb
        atlas: Atlas,

        /// Cache root (default: $ATLAS_FETCH_DATA or ~/atlas_fetch_data)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Archive URL replacing the built-in default
        #[arg(short, long)]
        url: Option<String>,

        /// Restart partial downloads instead of resuming them
        #[arg(long)]
        no_resume: bool,

        /// Print the bundle as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the known atlases
    List,

    /// Print the colour table of a parcellation (.txt / .lut / .tsv)
    Labels {
        /// Colour table file
        path: PathBuf,
    },
}

impl CliArgs {
    /// Verbosity handed to the library: 0 quiet, 1 default, one more per `-v`.
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose.saturating_add(1)
        }
    }

    /// Default `env_logger` filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match (self.quiet, self.verbose) {
            (true, _) => "error",
            (false, 0) => "info",
            _ => "debug",
        }
    }
}
