use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tokenswap::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for tokenswap::AppCommand {
    fn from(cmd: Commands) -> tokenswap::AppCommand {
        match cmd {
            Commands::Prices => tokenswap::AppCommand::Prices,
            Commands::Quote { amount, pair } => tokenswap::AppCommand::Quote {
                amount,
                from: pair.from,
                to: pair.to,
            },
            Commands::Rate { pair } => tokenswap::AppCommand::Rate {
                from: pair.from,
                to: pair.to,
            },
            Commands::Swap { amount, pair } => tokenswap::AppCommand::Swap {
                amount,
                from: pair.from,
                to: pair.to,
            },
            Commands::Interactive => tokenswap::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(clap::Args)]
struct PairArgs {
    /// Currency to pay with (defaults to the configured pair)
    #[arg(long)]
    from: Option<String>,

    /// Currency to receive (defaults to the configured pair)
    #[arg(long)]
    to: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the latest price of every currency
    Prices,
    /// Show what an amount converts to
    Quote {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[command(flatten)]
        pair: PairArgs,
    },
    /// Show the exchange rate between two currencies
    Rate {
        #[command(flatten)]
        pair: PairArgs,
    },
    /// Execute a simulated swap
    Swap {
        #[arg(allow_hyphen_values = true)]
        amount: String,
        #[command(flatten)]
        pair: PairArgs,
    },
    /// Fill in the swap form interactively
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => tokenswap::cli::setup::setup_at_path(path),
            None => tokenswap::cli::setup::setup(),
        },
        Some(cmd) => tokenswap::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
