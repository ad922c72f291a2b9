use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fleet-ctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Inspect API Gateway profiles and chat with the IoT fleet agent")]
#[command(long_about = "Looks up API Gateway URLs and API keys for AWS profiles, and runs the Bedrock-backed IoT fleet assistant with device inventory, connectivity and GPS lookup tools, either once or behind a local HTTP endpoint.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the API Gateway URL and first API key for each AWS profile
    Inspect {
        /// Profile to inspect (repeatable; defaults to the configured list)
        #[arg(short, long = "profile", value_name = "NAME")]
        profiles: Vec<String>,
    },

    /// Run the chat handler once on a local test event
    Invoke {
        /// Message to send to the agent
        #[arg(short, long, conflicts_with = "event")]
        message: Option<String>,

        /// JSON file holding a full event (`{"body": ...}`)
        #[arg(short, long, value_name = "FILE")]
        event: Option<PathBuf>,
    },

    /// Serve the chat handler over HTTP
    Serve {
        /// Host address to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
