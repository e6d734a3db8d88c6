use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::path::PathBuf;
use tavily_sss::models::AppConfig;
use tavily_sss::Result;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "tavily-sss")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search the web, save results as HTML, send them by email", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file (defaults to ./tavily-sss.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive search session (default)
    Run,

    /// Search once and review the results
    Search {
        /// Search query
        query: String,

        /// Number of results to request
        #[arg(short = 'n', long)]
        max_results: Option<usize>,

        /// Print the response as JSON, including fields not shown interactively
        #[arg(long)]
        json: bool,
    },

    /// Convert Markdown to HTML
    Convert {
        /// Input file (stdin when omitted or `-`)
        input: Option<PathBuf>,

        /// Wrap the fragment in the full result page
        #[arg(long)]
        document: bool,

        /// Page title for --document
        #[arg(long)]
        title: Option<String>,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a default config file
    Init {
        /// Overwrite without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: Failed to create tokio runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = AppConfig::load(cli.config.as_deref())?;
            let config_path = AppConfig::locate(cli.config.as_deref());
            tavily_sss::cli::run::run(&config, config_path).await?;
        }

        Commands::Search {
            query,
            max_results,
            json,
        } => {
            let config = AppConfig::load(cli.config.as_deref())?;
            tavily_sss::cli::search::run(&config, &query, max_results, json).await?;
        }

        Commands::Convert {
            input,
            document,
            title,
            output,
        } => {
            tavily_sss::cli::convert::run(
                input.as_deref(),
                document,
                title.as_deref(),
                output.as_deref(),
            )?;
        }

        Commands::Init { force } => {
            println!("{}", "🚀 Initializing config...".cyan());
            tavily_sss::cli::init::run(cli.config.as_deref(), force)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "tavily-sss", &mut io::stdout());
        }
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
