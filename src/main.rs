mod ai;
mod cli;
mod collector;
mod config;
mod error;
mod github;
mod report;
mod slack;

use ai::gemini::GeminiClient;
use ai::prompt::PromptInputs;
use ai::ReportGenerator;
use chrono::{Local, Utc};
use clap::Parser;
use cli::{Cli, Commands};
use collector::{Collector, PrScope};
use config::Config;
use error::{PrDailyError, Result};
use github::{GitHubClient, RepoSlug};
use indicatif::{ProgressBar, ProgressStyle};
use report::{PullRequestRecord, Report};
use slack::{SlackMessage, WebhookClient};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        if let Some(hint) = e.hint() {
            eprintln!("{}", hint);
        }
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pr_daily={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    // Subcommands that manage the config file itself
    match cli.command {
        Commands::Init { force } => return init_config(cli.config, force),
        Commands::Config => return show_config(cli.config),
        _ => {}
    }

    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Collect { user, repo, output } => run_collect(&config, user, repo, output).await,
        Commands::Generate {
            input,
            prompt,
            output,
            model,
        } => run_generate(&config, input, prompt, output, model).await,
        Commands::Notify { input, dry_run } => run_notify(&config, input, dry_run).await,
        Commands::ListModels => run_list_models(&config).await,
        Commands::Init { .. } | Commands::Config => Ok(()),
    }
}

fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from(&path)?,
        None => Config::load_or_default()?,
    };
    config.with_env()
}

async fn run_collect(
    config: &Config,
    user: Option<String>,
    repo: Option<RepoSlug>,
    output: Option<PathBuf>,
) -> Result<()> {
    let token = config.github_token()?;
    let output = output.unwrap_or_else(|| config.report_path.clone());

    let client = GitHubClient::new(token, &config.github_api_url)?;
    let collector = Collector::new(&client)?;

    let user_override = user.or_else(|| config.github_user.clone());
    let user = collector.resolve_user(user_override.as_deref()).await?;
    if user_override.is_some() {
        println!("\nUsing configured user: {}", user);
    } else {
        println!("\nFetching open PRs for: {}", user);
    }

    let scope = PrScope::from_repo(repo.or_else(|| config.github_repo.clone()));
    if let PrScope::Repository(ref repo) = scope {
        println!("Filtering by repo: {}", repo);
    }
    println!("Checking for activity in the last 24 hours...\n");

    let candidates = collector.candidates(&user, &scope).await?;
    debug!(count = candidates.len(), "candidate pull requests");

    let report = if candidates.is_empty() {
        println!("No open pull requests found.");
        Report::new(user, Utc::now(), vec![])
    } else {
        println!("Found {} open pull request(s)\n", candidates.len());

        let progress = ProgressBar::new(candidates.len() as u64);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        progress.set_message("Fetching recent activity...");

        let report = collector
            .collect(user, candidates, Utc::now(), |record| {
                progress.set_message(format!("{}#{}", record.repository, record.number));
                progress.inc(1);
            })
            .await;

        progress.finish_and_clear();

        for (index, pr) in report.pull_requests.iter().enumerate() {
            print_pull_request(index + 1, pr);
        }
        println!("Total: {} open PR(s)", report.total_prs);

        report
    };

    report.write_to(&output)?;
    println!("\n✅ Report saved to: {}", output.display());

    Ok(())
}

fn print_pull_request(index: usize, pr: &PullRequestRecord) {
    println!("{}. {}", index, pr.title);
    println!("   Repository: {}", pr.repository);
    println!("   URL: {}", pr.url);
    println!(
        "   Created: {} ({} day{} open)",
        pr.created_at.with_timezone(&Local).format("%Y-%m-%d"),
        pr.days_open,
        if pr.days_open == 1 { "" } else { "s" }
    );
    println!(
        "   Updated: {}",
        pr.updated_at.with_timezone(&Local).format("%Y-%m-%d")
    );
    println!(
        "   Review status: {}{}",
        pr.review_status.label(),
        if pr.status_changed_in_last_24h { " (changed in the last 24h)" } else { "" }
    );
    if let Some(ref url) = pr.otf_url {
        println!("   Preview: {}", url);
    }

    let activity = &pr.recent_activity;
    if activity.is_empty() {
        println!("   No recent activity in the last 24 hours.");
    } else {
        println!("   📊 Recent Activity (last 24h):");

        if !activity.issue_comments().is_empty() {
            println!("   💬 {} new comment(s):", activity.issue_comments().len());
            for comment in activity.issue_comments() {
                println!("      - {}: \"{}\"", comment.author, comment.excerpt(80));
            }
        }

        if !activity.review_comments().is_empty() {
            println!("   🔍 {} new review comment(s):", activity.review_comments().len());
            for comment in activity.review_comments() {
                println!("      - {}: \"{}\"", comment.author, comment.excerpt(80));
            }
        }

        if !activity.reviews().is_empty() {
            println!("   ✅ {} new review(s):", activity.reviews().len());
            for review in activity.reviews() {
                println!(
                    "      {} {}: {}",
                    review.state.icon(),
                    review.author,
                    review.state.as_str()
                );
            }
        }
    }

    println!();
}

async fn run_generate(
    config: &Config,
    input: Option<PathBuf>,
    prompt: Option<PathBuf>,
    output: Option<PathBuf>,
    model: Option<String>,
) -> Result<()> {
    let api_key = config.google_api_key()?;
    let input = input.unwrap_or_else(|| config.report_path.clone());
    let prompt = prompt.unwrap_or_else(|| config.prompt_path.clone());
    let output = output.unwrap_or_else(|| config.summary_path.clone());

    // Fail before any network call if an input is missing
    let inputs = PromptInputs::load(&input, &prompt)?;

    println!("Generating daily PR report with Gemini...");

    let mut client = GeminiClient::new(
        api_key.to_string(),
        &config.gemini_api_url,
        config.gemini_model.clone(),
    )?;
    if let Some(model) = model {
        client = client.with_model(model);
    }
    let generator = ReportGenerator::new(client);
    generator.generate(&inputs, &output).await?;

    println!("✅ Report generated successfully!");
    println!("✅ Report saved to: {}", output.display());

    Ok(())
}

async fn run_notify(config: &Config, input: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let webhook_url = if dry_run {
        None
    } else {
        Some(config.slack_webhook_url()?)
    };

    let input = input.unwrap_or_else(|| config.summary_path.clone());
    if !input.exists() {
        return Err(PrDailyError::missing_input(
            &input,
            "Generate the report first with `pr-daily generate`.",
        ));
    }

    let markdown = std::fs::read_to_string(&input)?;
    let message = SlackMessage::from_markdown(&markdown, Local::now().naive_local())?;
    debug!(sections = message.section_count(), "built Slack message");

    match webhook_url {
        None => {
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
        Some(url) => {
            println!("Sending report to Slack...");
            WebhookClient::new(url)?.post(&message).await?;
            println!("✅ Report sent to Slack successfully!");
        }
    }

    Ok(())
}

async fn run_list_models(config: &Config) -> Result<()> {
    let client = GeminiClient::new(
        config.google_api_key()?.to_string(),
        &config.gemini_api_url,
        config.gemini_model.clone(),
    )?;

    println!("Fetching available models...\n");
    let models = client.list_models().await?;

    println!("Available models:");
    println!("=================\n");

    let or_na = |v: Option<u64>| v.map(|n| n.to_string()).unwrap_or_else(|| "N/A".to_string());
    for model in models {
        println!("Model: {}", model.name);
        println!(
            "  Display Name: {}",
            model.display_name.as_deref().unwrap_or("N/A")
        );
        let methods = if model.supported_generation_methods.is_empty() {
            "N/A".to_string()
        } else {
            model.supported_generation_methods.join(", ")
        };
        println!("  Supported Methods: {}", methods);
        println!("  Input Token Limit: {}", or_na(model.input_token_limit));
        println!("  Output Token Limit: {}", or_na(model.output_token_limit));
        println!();
    }

    Ok(())
}

fn init_config(path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = match path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };

    Config::create_default_at(&config_path, force)?;
    println!("✓ Created config file at: {}", config_path.display());
    println!("\nCredentials can live in the config file or in the environment:");
    println!("  GH_PAT             GitHub personal access token (collect)");
    println!("  GOOGLE_API_KEY     Gemini API key (generate, list-models)");
    println!("  SLACK_WEBHOOK_URL  Slack incoming webhook (notify)");
    println!("  GH_USER / GH_REPO  optional user and owner/name repository overrides");

    Ok(())
}

fn show_config(path: Option<PathBuf>) -> Result<()> {
    let config = load_config(path)?;
    let toml_str = toml::to_string_pretty(&config.redacted())?;
    println!("Current configuration:\n");
    println!("{}", toml_str);
    Ok(())
}
