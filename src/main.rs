use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;

use comment_guard::config::Config;
use comment_guard::pipeline::{self, RunOptions};

/// comment-guard: moderate a comment with OpenAI and hide it on GitHub if flagged.
///
/// Inputs are read from the environment using the GitHub Actions
/// `INPUT_<NAME>` convention, so the binary runs as-is as an action step.
#[derive(Parser)]
#[command(name = "comment-guard", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Evaluate and publish outputs, but never hide the comment
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Moderate the configured text (the default)
    Run,

    /// Validate configuration and show effective thresholds without calling any API
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Logs go to stderr; stdout is reserved for legacy ::set-output commands
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("comment_guard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let config = Config::load()?;
            let options = RunOptions {
                dry_run: cli.dry_run,
            };

            // A fatal error is printed once, by anyhow, when main returns it
            let outcome = pipeline::execute(&config, options).await?;
            info!(hide = ?outcome.hide, "Run finished");
        }

        Commands::CheckConfig => {
            let config = Config::load()?;
            config.require_moderation()?;

            println!("Configuration OK.");
            println!("  Moderation endpoint: {}", config.moderation_url);
            println!("  GraphQL endpoint:    {}", config.graphql_url);
            println!(
                "  GitHub token:        {}",
                if config.github_token.is_empty() { "missing (hide step will be skipped)" } else { "set" }
            );
            match &config.output_path {
                Some(path) => println!("  Outputs:             {}", path.display()),
                None => println!("  Outputs:             stdout (::set-output)"),
            }
            println!("  Thresholds:");
            for (category, cutoff) in config.thresholds.sorted() {
                println!("    {category:<18} {cutoff}");
            }
        }
    }

    Ok(())
}
