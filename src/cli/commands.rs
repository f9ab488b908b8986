//! CLI command definitions and argument parsing

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "jejurag")]
#[command(about = "Jeju travel assistant: place search, live weather and grounded answers")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (default: config.toml, then config.example.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the place index and report its size
    Init,
    /// Semantic search over the place catalog
    Search {
        /// Search text
        query: String,
        /// Maximum number of results
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },
    /// Ask a travel question
    Ask {
        /// The question
        question: String,
    },
    /// Show current weather and a suggestion
    Weather {
        /// Latitude (default: Jeju City Hall)
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude (default: Jeju City Hall)
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Start the REST API server
    Serve {
        /// Bind host (default: from config)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (default: from config)
        #[arg(short, long)]
        port: Option<u16>,
        /// Enable CORS
        #[arg(long)]
        cors: bool,
    },
    /// Show current configuration
    Config,
}
