use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "snapcare", version, about = "SnapCare CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Health task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Calendar view of upcoming tasks
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Personal health profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// First-run permission walkthrough
    Onboard(commands::onboard::OnboardArgs),
    /// Send a photo for analysis
    Analyze(commands::assistant::AnalyzeArgs),
    /// Ask the assistant a question
    Chat(commands::assistant::ChatArgs),
}

fn init_tracing() {
    // Opt-in via RUST_LOG; logs go to stderr so stdout stays parseable.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Task { action } => commands::task::run(action),
        Commands::Calendar { action } => commands::calendar::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Onboard(args) => commands::onboard::run(args),
        Commands::Analyze(args) => commands::assistant::analyze(args),
        Commands::Chat(args) => commands::assistant::chat(args),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
