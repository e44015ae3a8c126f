mod cli_args;
mod config;
mod context;
mod error;
mod git;
mod llm;
mod logging;
mod pr;
mod setup;
mod vibe;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;

use cli_args::{Cli, Command, DraftArgs};
use config::Config;
use git::{GitCli, Repository};
use llm::LlmClient;
use pr::orchestrator::{Artifacts, DraftOutcome, DraftRequest, NO_CHANGES_MESSAGE, Orchestrator, Origin};

/// Draft the requested artifacts and print them. Returns `false` when the branch has no changes.
fn run_draft(
    repo: &dyn Repository,
    llm: Option<&dyn LlmClient>,
    cfg: &Config,
    artifacts: Artifacts,
    args: &DraftArgs,
) -> Result<bool> {
    let request = DraftRequest {
        artifacts,
        template: args.template.clone(),
        resources: args.resources.clone(),
        detect_resources: args.detect_resources,
    };

    let outcome = Orchestrator::new(repo, llm, cfg.timeout)
        .draft(&request)
        .context("failed to read branch history")?;

    let draft = match outcome {
        DraftOutcome::NoChanges => {
            println!("{NO_CHANGES_MESSAGE}");
            return Ok(false);
        }
        DraftOutcome::Drafted(draft) => draft,
    };

    log::debug!(
        "Drafted {} against {}",
        draft.context.branch,
        draft.context.base
    );

    if let Some(title) = &draft.title {
        println!();
        println!("{}", "🔖 PR Title:".bold());
        println!("{}", title.text);
        print_origin(&title.origin);
    }

    if let Some(description) = &draft.description {
        println!();
        println!("{}", "📝 PR Description:".bold());
        println!("{}", description.text);
        print_origin(&description.origin);
    }

    if !draft.cost.is_zero() {
        println!();
        println!("{}", format!("Estimated cost: {}", draft.cost).dimmed());
    }

    Ok(true)
}

fn print_origin(origin: &Origin) {
    if let Origin::Heuristic(reason) = origin {
        println!("{}", format!("(drafted heuristically: {reason})").dimmed());
    }
}

/// Run the quality checks; a missing API key is fatal here.
fn run_vibe(repo: &dyn Repository, llm: Option<&dyn LlmClient>) -> Result<()> {
    let ctx = context::extract(repo).context("failed to read branch history")?;
    if ctx.is_empty() {
        println!("{NO_CHANGES_MESSAGE}");
        return Ok(());
    }

    let report = vibe::run_vibe_checks(llm, &ctx.commits, &ctx.files)?;

    println!();
    println!("{}", "⚠ Vibe Checks:".bold());
    for warning in &report.warnings {
        println!("- {warning}");
    }
    print_origin(&report.origin);
    if !report.cost.is_zero() {
        println!("{}", format!("Estimated cost: {}", report.cost).dimmed());
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let cfg = Config::from_sources(&cli);
    let boxed_client = setup::build_llm_client(&cfg);
    let llm = boxed_client.as_deref();

    let repo = GitCli::open(&cli.repo)?;

    match &cli.command {
        Command::Generate { draft, vibe_check } => {
            let drafted = run_draft(&repo, llm, &cfg, Artifacts::Both, draft)?;
            if drafted && *vibe_check {
                run_vibe(&repo, llm)?;
            }
            Ok(())
        }
        Command::Title { template } => {
            let args = DraftArgs {
                template: template.clone(),
                ..DraftArgs::default()
            };
            run_draft(&repo, llm, &cfg, Artifacts::Title, &args).map(|_| ())
        }
        Command::Desc { draft } => {
            run_draft(&repo, llm, &cfg, Artifacts::Description, draft).map(|_| ())
        }
        Command::VibeCheck => run_vibe(&repo, llm),
    }
}
