use std::path::PathBuf;

use clap::{Parser, Subcommand};

use rebm_console::commands;
use rebm_console::config;
use rebm_console::console::render::OutputFormat;
use rebm_console::logging;

#[derive(Parser)]
#[command(name = "rebm", version, about = "Operator console for the ReBM node reservation service")]
struct Cli {
    /// ReBM API base URL (overrides config and REBM_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Path to config file (default: ~/.config/rebm/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Log level (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the API is reachable
    Health,

    /// List all nodes
    List,

    /// Show one node
    Get {
        /// Node name
        name: String,
    },

    /// Create a node
    Create {
        /// Node name
        name: String,

        /// Extra property to store with the node (key=value, repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        props: Vec<String>,
    },

    /// Delete a node
    Delete {
        /// Node name
        name: String,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Reserve a node for a user until an expiry time
    Reserve {
        /// Node name
        name: String,

        /// Who holds the reservation
        #[arg(long)]
        user: String,

        /// Local expiry time, e.g. 2026-10-19T14:30
        #[arg(long, conflicts_with = "hours")]
        expires: Option<String>,

        /// Reserve for this many hours from now
        #[arg(long)]
        hours: Option<i64>,
    },

    /// Release a reserved node
    Release {
        /// Node name
        name: String,
    },

    /// Release every reservation whose expiry has passed
    Cleanup,

    /// Interactive console session
    Console,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load(cli.config.as_deref())?;
    cfg.apply_overrides(cli.api_url, cli.log_level);
    logging::init(&cfg.log_level, cfg.log_format);

    let format = cli.format;
    match cli.command {
        Commands::Health => commands::health::run(&cfg),
        Commands::List => commands::nodes::list(&cfg, format),
        Commands::Get { name } => commands::nodes::get(&cfg, format, &name),
        Commands::Create { name, props } => commands::nodes::create(&cfg, format, &name, &props),
        Commands::Delete { name, yes } => commands::nodes::delete(&cfg, &name, yes),
        Commands::Reserve {
            name,
            user,
            expires,
            hours,
        } => commands::nodes::reserve(&cfg, format, &name, &user, expires.as_deref(), hours),
        Commands::Release { name } => commands::nodes::release(&cfg, format, &name),
        Commands::Cleanup => commands::nodes::cleanup(&cfg, format),
        Commands::Console => commands::console::run(&cfg),
    }
}
