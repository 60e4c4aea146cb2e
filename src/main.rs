//! @ai:module:intent CLI for GitHub Sentinel
//! @ai:module:layer presentation

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use github_sentinel::{
    config::SentinelConfig,
    llm::{Backend, LlmBackendTrait, ReportEngine},
    prompt::{PromptComposer, PromptTemplates},
    report::{GeneratedReport, ReportGenerator, ReportKind, ReportWriter},
    sources::{GitHubClient, HackerNewsClient, Subscriptions},
};
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "sentinel.toml";

#[derive(Parser)]
#[command(name = "sentinel")]
#[command(about = "Summarize GitHub repository progress and Hacker News trends with an LLM")]
#[command(version)]
struct Cli {
    /// Path to configuration file (defaults to ./sentinel.toml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Write the composed messages to disk instead of calling the model
    #[arg(long, global = true)]
    dry_run: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export recent repository activity and generate a progress report
    Github {
        /// Repository in owner/repo form (defaults to every subscribed repository)
        #[arg(short, long)]
        repo: Option<String>,

        /// Number of days to cover
        #[arg(
            short,
            long,
            default_value = "2",
            value_parser = clap::value_parser!(u32).range(1..=7)
        )]
        days: u32,
    },

    /// Export Hacker News top stories and generate a trend report
    HackerNews,

    /// Generate a report from an existing raw export
    Report {
        #[arg(short, long, value_enum)]
        kind: KindArg,

        /// Raw export file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Print the composed system prompt for a report kind
    Prompt {
        #[arg(short, long, value_enum)]
        kind: KindArg,
    },

    /// Manage subscribed repositories
    Subscriptions {
        #[command(subcommand)]
        action: Option<SubscriptionAction>,
    },

    /// Initialize default configuration
    Init {
        /// Output path for config file
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
    },
}

#[derive(Subcommand)]
enum SubscriptionAction {
    /// List subscribed repositories
    List,
    /// Subscribe to a repository
    Add { repo: String },
    /// Unsubscribe from a repository
    Remove { repo: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Github,
    HackerNews,
}

impl From<KindArg> for ReportKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Github => ReportKind::GitHubProgress,
            KindArg::HackerNews => ReportKind::HackerNewsTrend,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("github_sentinel=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = || load_config(cli.config.as_deref(), cli.dry_run);

    match cli.command {
        Commands::Github { repo, days } => run_github(&config()?, repo.as_deref(), days).await,
        Commands::HackerNews => run_hacker_news(&config()?).await,
        Commands::Report { kind, input } => run_report(&config()?, kind.into(), &input).await,
        Commands::Prompt { kind } => print_prompt(&config()?, kind.into()),
        Commands::Subscriptions { action } => manage_subscriptions(&config()?, action),
        Commands::Init { output } => init_config(&output),
    }
}

/// @ai:intent Build the report pipeline; fails fast when the backend is misconfigured
/// @ai:effects env, fs:read
fn build_generator(config: &SentinelConfig) -> Result<ReportGenerator<Backend>> {
    let backend = Backend::from_config(&config.llm)?;
    tracing::info!("Using {} backend", backend.name());

    let engine = ReportEngine::new(backend, &config.llm);
    let templates = PromptTemplates::load(&config.paths.prompts_dir)?;
    let writer = ReportWriter::new(&config.paths.reports_dir);

    Ok(ReportGenerator::new(engine, templates, writer))
}

/// @ai:intent Export progress for one repository or every subscription, then report on each
/// @ai:effects network, fs:read, fs:write
async fn run_github(config: &SentinelConfig, repo: Option<&str>, days: u32) -> Result<()> {
    let subscriptions = Subscriptions::load(&config.github.subscriptions_file)?;
    let targets = subscriptions.report_targets(repo)?;

    let generator = build_generator(config)?;
    let client = GitHubClient::from_env(&config.github, &config.paths.export_dir)?;

    let mut failed = Vec::new();
    for target in &targets {
        let result = async {
            let raw_file = client.export_progress_by_date_range(target, days).await?;
            generator.generate_github_report(&raw_file, target).await
        }
        .await;

        match result {
            Ok(report) => print_report(&report),
            Err(e) => {
                tracing::error!("Report for {} failed: {:#}", target, e);
                failed.push(target.as_str());
            }
        }
    }

    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} report(s) failed: {}",
            failed.len(),
            targets.len(),
            failed.join(", ")
        );
    }
    Ok(())
}

/// @ai:intent Export Hacker News top stories, then report on them
/// @ai:effects network, fs:write
async fn run_hacker_news(config: &SentinelConfig) -> Result<()> {
    let generator = build_generator(config)?;
    let client = HackerNewsClient::new(&config.hacker_news, &config.paths.export_dir)?;

    let raw_file = client.export_top_stories().await?;
    let report = generator.generate_hacker_news_report(&raw_file).await?;

    print_report(&report);
    Ok(())
}

/// @ai:effects network, fs:read, fs:write
async fn run_report(config: &SentinelConfig, kind: ReportKind, input: &Path) -> Result<()> {
    let generator = build_generator(config)?;
    let label = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| kind.as_str().to_string());

    let report = generator.generate_from_file(kind, input, &label).await?;

    print_report(&report);
    Ok(())
}

/// @ai:effects fs:read
fn print_prompt(config: &SentinelConfig, kind: ReportKind) -> Result<()> {
    let templates = PromptTemplates::load(&config.paths.prompts_dir)?;
    let composer = PromptComposer::from_config(&config.llm);
    println!("{}", composer.compose(templates.for_kind(kind)));
    Ok(())
}

/// @ai:effects fs:read, fs:write
fn manage_subscriptions(config: &SentinelConfig, action: Option<SubscriptionAction>) -> Result<()> {
    let path = &config.github.subscriptions_file;
    let mut subscriptions = Subscriptions::load(path)?;

    match action.unwrap_or(SubscriptionAction::List) {
        SubscriptionAction::List => {
            if subscriptions.list().is_empty() {
                println!("No subscriptions. Add one with: sentinel subscriptions add owner/repo");
            }
            for repo in subscriptions.list() {
                println!("{}", repo);
            }
        }
        SubscriptionAction::Add { repo } => {
            if subscriptions.add(&repo)? {
                subscriptions.save(path)?;
                println!("Subscribed to {}", repo);
            } else {
                println!("Already subscribed to {}", repo);
            }
        }
        SubscriptionAction::Remove { repo } => {
            if subscriptions.remove(&repo) {
                subscriptions.save(path)?;
                println!("Unsubscribed from {}", repo);
            } else {
                println!("Not subscribed to {}", repo);
            }
        }
    }

    Ok(())
}

fn print_report(report: &GeneratedReport) {
    match report {
        GeneratedReport::Written { content, path } => {
            println!("{}", content);
            println!();
            println!("Report saved to {}", path.display());
        }
        GeneratedReport::DryRun { messages_path } => {
            println!(
                "Dry run: no report generated. Composed messages written to {}",
                messages_path.display()
            );
        }
    }
}

/// @ai:intent Write the default configuration
/// @ai:effects fs:write
fn init_config(output: &Path) -> Result<()> {
    if output.exists() {
        anyhow::bail!("{} already exists", output.display());
    }
    SentinelConfig::default().save(output)?;
    println!("Configuration written to {}", output.display());
    Ok(())
}

/// @ai:intent Load the config file (or defaults) and apply command-line overrides
/// @ai:effects fs:read
fn load_config(path: Option<&Path>, dry_run: bool) -> Result<SentinelConfig> {
    let mut config = load_or_default_config(path)?;
    if dry_run {
        config.llm.dry_run = true;
    }
    Ok(config)
}

/// @ai:effects fs:read
fn load_or_default_config(path: Option<&Path>) -> Result<SentinelConfig> {
    match path {
        Some(p) => {
            SentinelConfig::load(p).with_context(|| format!("Failed to load {}", p.display()))
        }
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Ok(SentinelConfig::load(default_path)?)
            } else {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                Ok(SentinelConfig::default())
            }
        }
    }
}
