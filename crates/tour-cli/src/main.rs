mod cmd;
mod output;
mod portal;
mod root;

use clap::{Parser, Subcommand};
use cmd::{config::ConfigSubcommand, finish::Answer};
use std::path::PathBuf;
use tour_core::types::Role;

#[derive(Parser)]
#[command(
    name = "tour",
    about = "Drive the academic portal's guided product tours from the terminal",
    version,
    propagate_version = true
)]
struct Cli {
    /// Portal root holding .tour/ (default: auto-detect from .tour/ or .git/)
    #[arg(long, global = true, env = "TOUR_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every persisted tour key
    State,

    /// Write a role's full-sequence definition
    Seed {
        #[arg(long)]
        role: Role,
    },

    /// Begin a walkthrough: the full sequence for a role, or a single page
    Launch {
        /// Start the role's full multi-page walkthrough
        #[arg(long, conflicts_with = "page", required_unless_present = "page")]
        role: Option<Role>,

        /// Start only this page's tour
        #[arg(long)]
        page: Option<String>,
    },

    /// Mount a page: resume or auto-start its tour if due
    Visit {
        path: String,

        /// Anchors rendered on the page (default: every catalog anchor)
        #[arg(long, value_delimiter = ',')]
        anchors: Option<Vec<String>>,
    },

    /// Finish the tour on a page and answer the prompt that follows
    Finish {
        path: String,

        /// Report the tour as skipped instead of finished
        #[arg(long)]
        skipped: bool,

        /// Answer to the continue or completion prompt
        #[arg(long, value_enum)]
        answer: Option<Answer>,
    },

    /// Close a page's running tour with the X control
    Stop { path: String },

    /// Remove every tour key from the store
    Reset,

    /// Run a role's full walkthrough in-process, accepting every prompt
    Walk {
        #[arg(long)]
        role: Role,
    },

    /// Inspect and validate .tour/config.yaml
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Walk { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::State => cmd::state::run(&root, cli.json),
        Commands::Seed { role } => cmd::seed::run(&root, role, cli.json),
        Commands::Launch { role, page } => cmd::launch::run(&root, role, page.as_deref(), cli.json),
        Commands::Visit { path, anchors } => cmd::visit::run(&root, &path, anchors, cli.json),
        Commands::Finish {
            path,
            skipped,
            answer,
        } => cmd::finish::run(&root, &path, skipped, answer, cli.json),
        Commands::Stop { path } => cmd::stop::run(&root, &path, cli.json),
        Commands::Reset => cmd::reset::run(&root, cli.json),
        Commands::Walk { role } => cmd::walk::run(&root, role, cli.json),
        Commands::Config { subcommand } => cmd::config::run(&root, subcommand, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
