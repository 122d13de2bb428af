//! eduquest CLI — the user-facing terminal exam portal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "eduquest", version, about = "Terminal exam portal with AI feedback")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Take an exam interactively
    Take {
        /// Student name (login)
        #[arg(long)]
        name: String,

        /// Question bank TOML file (built-in sample questions if omitted)
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Exam length in seconds
        #[arg(long, default_value = "600")]
        duration: u64,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save the exam report as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Manage the question bank (teacher mode)
    Teacher {
        /// Question bank TOML file; changes are saved back on exit
        #[arg(long)]
        bank: Option<PathBuf>,
    },

    /// Validate a question bank file
    Validate {
        /// Question bank TOML file
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and question bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("eduquest=info".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            name,
            bank,
            duration,
            config,
            output,
        } => commands::take::execute(name, bank, duration, config, output).await,
        Commands::Teacher { bank } => commands::teacher::execute(bank),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
