use crate::github::RepoSlug;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "pr-daily")]
#[command(author, version, long_about = None)]
#[command(
    about = "Daily digest of your open pull requests",
    long_about = "pr-daily collects your open GitHub pull requests with their last 24 hours of \
                  activity, has Gemini write a daily report from them, and posts that report \
                  to a Slack channel. Each step is a separate command that hands off to the \
                  next through a file, so they can be scheduled independently."
)]
pub struct Cli {
    /// Path to config file (default: ~/.config/pr-daily/config.toml)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Collect open pull requests and their recent activity into a JSON report
    Collect {
        /// Report on this GitHub user instead of the token owner
        #[arg(short, long)]
        user: Option<String>,

        /// Only look at this repository (owner/name)
        #[arg(short, long, value_name = "OWNER/NAME")]
        repo: Option<RepoSlug>,

        /// Where to write the JSON report
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Turn the JSON report into a narrative daily report with Gemini
    Generate {
        /// JSON report written by `collect`
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Instruction template sent ahead of the report
        #[arg(short, long, value_name = "FILE")]
        prompt: Option<PathBuf>,

        /// Where to write the generated report
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Gemini model to use
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Post the generated report to Slack
    Notify {
        /// Report written by `generate`
        #[arg(short, long, value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print the webhook payload instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// List Gemini models available to the configured API key
    ListModels,

    /// Initialize configuration file (at --config when given)
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration
    Config,
}
