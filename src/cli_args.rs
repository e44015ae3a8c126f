use std::path::PathBuf;

use clap::{ArgAction, ArgGroup, Args, Parser, Subcommand};

/// CLI options
#[derive(Parser, Debug)]
#[command(
    name = "prpolish",
    version,
    about = "Draft pull-request titles and descriptions from your branch history"
)]
#[command(group(
    ArgGroup::new("model_group")
        .args(["model", "no_model"])
        .multiple(false)
))]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Repository to inspect
    #[arg(short = 'C', long, default_value = ".", global = true)]
    pub repo: PathBuf,

    /// Model name to use (e.g. gpt-4o-mini). If 'none', acts like --no-model.
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Skip the generation service and draft with heuristics only
    #[arg(long, global = true)]
    pub no_model: bool,

    /// API key (otherwise uses OPENAI_API_KEY env var)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub api_key: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Seconds to wait for each generation call
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands, e.g. `prpolish generate --resource https://...`
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Draft both the PR title and the PR description
    Generate {
        #[command(flatten)]
        draft: DraftArgs,

        /// Also run quality checks on commits and changed files (requires an API key)
        #[arg(long)]
        vibe_check: bool,
    },

    /// Draft only the PR title
    Title {
        /// Custom title template (string or path to file)
        #[arg(long)]
        template: Option<String>,
    },

    /// Draft only the PR description
    Desc {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Check commit messages and changed files for PR quality issues (requires an API key)
    VibeCheck,
}

#[derive(Args, Debug, Clone, Default)]
pub struct DraftArgs {
    /// Custom PR template (string or path to file); supports {commit_messages},
    /// {changed_files} and {branch_name}
    #[arg(long)]
    pub template: Option<String>,

    /// Related resource (issue, ticket, doc link) for the description; repeatable
    #[arg(long = "resource", value_name = "LINE")]
    pub resources: Vec<String>,

    /// Add issue keys and URLs found in commits, branch name and files as related resources
    #[arg(long)]
    pub detect_resources: bool,
}
