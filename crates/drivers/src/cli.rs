use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about = "Vehicle condition assessment client", long_about = None)]
pub struct Cli {
    /// Base URL of the comparison service
    #[arg(long, global = true, env = "VCA_SERVICE_URL")]
    pub service_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the pickup / return / report window
    Ui,
    /// Compare a before and an after image and save the annotated report
    Compare {
        /// Files or directories; the first two files are the before/after pair
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Render a saved comparison response without contacting the service
    Render {
        report: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Cli {
    pub fn into_parts(self) -> (Option<String>, Command) {
        (self.service_url, self.command.unwrap_or(Command::Ui))
    }
}
