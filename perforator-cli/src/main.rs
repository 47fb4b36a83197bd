//! Perforator CLI - pull request and issue metrics for GitHub repositories

mod commands;
mod output;
mod progress;

use clap::{Parser, Subcommand};
use perforator_core::{Config, Secrets};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::{
    CommitsArgs, Context, IssueAuthorArgs, IssueLabelsArgs, PrArgs, RejectionRateArgs,
    ReviewTimeArgs,
};

const VERBOSE_FILTER: &str = "perforator=debug,perforator_core=debug,perforator_github=debug";

/// Perforator: metrics over windows of GitHub pull requests and issues
#[derive(Parser, Debug)]
#[command(name = "perforator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Hide progress output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Base URL of the GitHub REST API (overrides config and env)
    #[arg(long, global = true, env = "PERFORATOR_API_URL")]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Share of closed PRs that were not merged
    #[command(visible_alias = "rr")]
    RejectionRate(RejectionRateArgs),

    /// Time from review request to first review
    #[command(visible_alias = "rt")]
    ReviewTime(ReviewTimeArgs),

    /// Issue counts per author
    IssueAuthor(IssueAuthorArgs),

    /// Issue counts per label
    IssueLabels(IssueLabelsArgs),

    /// An author's commits for one day
    Commits(CommitsArgs),

    /// Reviews of a single pull request
    Pr(PrArgs),

    /// Show current configuration
    Config {
        /// Create an empty secrets file to hold a GitHub token
        #[arg(long)]
        init_secrets: bool,
    },

    /// Show version information
    Version,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { "warn" })
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn show_config(config: &Config, init_secrets: bool) -> anyhow::Result<()> {
    if init_secrets {
        let path = Secrets::default_secrets_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine the config directory"))?;
        Secrets::write_template(&path)?;
        println!("Created {}", path.display());
        println!();
    }

    println!("Perforator Configuration");
    println!("========================");
    println!();
    println!("GitHub Settings:");
    println!(
        "  api_url: {}",
        config.github.api_url.as_deref().unwrap_or("(default)")
    );
    println!(
        "  timeout: {}",
        humantime_serde::re::humantime::format_duration(config.github.timeout)
    );
    println!("  max_per_page: {}", config.github.max_per_page);
    println!();
    println!("Defaults:");
    println!("  limit: {}", config.defaults.limit);
    println!("  skip: {}", config.defaults.skip);
    println!("  state: {}", config.defaults.state);
    println!();

    if let Some(path) = Config::default_config_path() {
        println!("Config file: {}", path.display());
        if path.exists() {
            println!("  (exists)");
        } else {
            println!("  (not found - using defaults)");
        }
    }

    let token = Secrets::load()?.github_token();
    println!(
        "GitHub token: {}",
        if token.is_some() {
            "configured"
        } else {
            "not set (anonymous, rate limited)"
        }
    );

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load configuration with overrides
    let config = Config::load_with_overrides(cli.api_url.clone())?;

    tracing::debug!(
        api_url = ?config.github.api_url,
        max_per_page = config.github.max_per_page,
        "Configuration loaded"
    );

    let ctx = Context {
        config,
        json: cli.json,
        quiet: cli.quiet,
    };

    match cli.command {
        Some(Commands::RejectionRate(args)) => args.execute(&ctx).await?,
        Some(Commands::ReviewTime(args)) => args.execute(&ctx).await?,
        Some(Commands::IssueAuthor(args)) => args.execute(&ctx).await?,
        Some(Commands::IssueLabels(args)) => args.execute(&ctx).await?,
        Some(Commands::Commits(args)) => args.execute(&ctx).await?,
        Some(Commands::Pr(args)) => args.execute(&ctx).await?,
        Some(Commands::Config { init_secrets }) => show_config(&ctx.config, init_secrets)?,
        Some(Commands::Version) => {
            println!("perforator {}", env!("CARGO_PKG_VERSION"));
        }
        None => {
            println!("Perforator - pull request and issue metrics for GitHub");
            println!();
            println!("Use --help for usage information");
        }
    }

    Ok(())
}
