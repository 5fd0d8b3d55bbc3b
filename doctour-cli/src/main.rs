//! doctour CLI - a guided CRUD tour of a MongoDB collection
//!
//! The default command connects, pings the primary, resets the collection and
//! walks through insert / find / update / delete, printing each result.
//! Smaller commands (`ping`, `list`, `reset`) run a single operation.

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::error;

mod commands;
mod config;
mod tracing_setup;
mod ui;

use config::StoreArgs;

#[derive(Parser, Debug)]
#[command(
    name = "doctour",
    author,
    version,
    about = "Guided create/read/update/delete tour of a MongoDB collection",
    long_about = "Connects to MongoDB, resets one collection, and walks through inserting, \
                  querying, updating and deleting account documents, printing every result."
)]
struct Cli {
    /// Suppress spinners (for scripts and piped output)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    debug: bool,

    /// Export traces over OTLP (requires the telemetry feature)
    #[arg(long, global = true)]
    otel: bool,

    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the full CRUD walkthrough (default)
    Run(commands::run::RunArgs),
    /// Connect and ping the primary
    Ping,
    /// Print every document in the collection
    List,
    /// Drop the collection
    Reset,
    /// Manage doctour configuration (path, show, init)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Before parsing, so DOCTOUR_CONFIG from .env reaches clap. A missing
    // .env is normal.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig {
        debug: cli.debug,
        otel: cli.otel,
    })
    .ok();
    ui::init_quiet_mode(cli.quiet);

    let result = run(cli).await;
    tracing_setup::shutdown_otel();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or(Commands::Run(Default::default())) {
        Commands::Run(args) => commands::run_walkthrough(args, cli.store.resolve()?).await,
        Commands::Ping => commands::run_ping(cli.store.resolve()?.store).await,
        Commands::List => commands::run_list(cli.store.resolve()?.store).await,
        Commands::Reset => commands::run_reset(cli.store.resolve()?.store).await,
        Commands::Config(args) => config::run_config(args, &cli.store),
        Commands::Completions(args) => run_completions(args),
    }
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
