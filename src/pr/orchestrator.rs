use std::fmt;
use std::time::Duration;

use crate::context::{self, BranchContext, DiffText};
use crate::error::{GenerationError, RepoError};
use crate::git::Repository;
use crate::llm::prompt_builder;
use crate::llm::{CallParams, Cost, LlmClient};

use super::heuristic::{self, TITLE_MAX_CHARS};
use super::resources;
use super::sections::{self, Validation};
use super::template;

pub const NO_CHANGES_MESSAGE: &str =
    "No changes detected on this branch. Make sure all changes are added and committed.";

const DIFF_UNAVAILABLE: &str = "[Could not retrieve diff]";
const DIFF_EMPTY: &str = "[No diff available]";

/// Which artifacts a command wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifacts {
    Title,
    Description,
    Both,
}

impl Artifacts {
    fn title(self) -> bool {
        matches!(self, Artifacts::Title | Artifacts::Both)
    }

    fn description(self) -> bool {
        matches!(self, Artifacts::Description | Artifacts::Both)
    }
}

#[derive(Debug, Clone)]
pub struct DraftRequest {
    pub artifacts: Artifacts,
    /// `--template` value: literal text or a path to a file.
    pub template: Option<String>,
    /// Related-resource lines supplied by the caller.
    pub resources: Vec<String>,
    /// Also feed issue keys and URLs found in the branch to the resource labeler.
    pub detect_resources: bool,
}

/// Why a heuristic draft was used instead of generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackReason {
    MissingCredential,
    ServiceError(String),
    EmptyResponse,
    MissingSections(Vec<&'static str>),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::MissingCredential => write!(f, "no API key configured"),
            FallbackReason::ServiceError(e) => write!(f, "generation service error: {e}"),
            FallbackReason::EmptyResponse => write!(f, "generation service returned no text"),
            FallbackReason::MissingSections(missing) => {
                write!(f, "generated text is missing {}", missing.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    Generated,
    Heuristic(FallbackReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drafted {
    pub text: String,
    pub origin: Origin,
}

#[derive(Debug, Clone)]
pub struct PrDraft {
    pub context: BranchContext,
    pub title: Option<Drafted>,
    pub description: Option<Drafted>,
    /// Sum of every generation call made for this draft.
    pub cost: Cost,
}

#[derive(Debug, Clone)]
pub enum DraftOutcome {
    NoChanges,
    Drafted(PrDraft),
}

/// Runs extraction, generation, validation and fallback for one command.
pub struct Orchestrator<'a> {
    repo: &'a dyn Repository,
    client: Option<&'a dyn LlmClient>,
    timeout: Duration,
}

/// Per-invocation state shared by the title and description paths.
struct Session<'c> {
    ctx: &'c BranchContext,
    diff_summary: Option<String>,
    cost: Cost,
}

impl<'a> Orchestrator<'a> {
    /// `client` is `None` when no credential is configured; every artifact then comes from heuristics.
    pub fn new(
        repo: &'a dyn Repository,
        client: Option<&'a dyn LlmClient>,
        timeout: Duration,
    ) -> Self {
        Orchestrator {
            repo,
            client,
            timeout,
        }
    }

    pub fn draft(&self, req: &DraftRequest) -> Result<DraftOutcome, RepoError> {
        let ctx = context::extract(self.repo)?;
        if ctx.is_empty() {
            log::info!("No commits or changed files between {} and {}", ctx.base, ctx.branch);
            return Ok(DraftOutcome::NoChanges);
        }

        let templates = template::resolve(req.template.as_deref(), self.repo.root());
        let mut session = Session {
            ctx: &ctx,
            diff_summary: None,
            cost: Cost::ZERO,
        };

        let title = req
            .artifacts
            .title()
            .then(|| self.draft_title(&mut session, templates.title.as_deref()));

        let description = req.artifacts.description().then(|| {
            let mut drafted =
                self.draft_description(&mut session, templates.description.as_deref());
            drafted.text = finish_description(&drafted.text, req, &ctx);
            drafted
        });

        let cost = session.cost;
        log::info!("Estimated generation cost: {cost}");

        Ok(DraftOutcome::Drafted(PrDraft {
            context: ctx,
            title,
            description,
            cost,
        }))
    }

    fn draft_title(&self, session: &mut Session<'_>, template: Option<&str>) -> Drafted {
        let ctx = session.ctx;
        let fallback = |reason: FallbackReason| {
            log_fallback("title", &reason);
            Drafted {
                text: heuristic::heuristic_title(&ctx.commits, &ctx.files, &ctx.branch, template),
                origin: Origin::Heuristic(reason),
            }
        };

        let Some(client) = self.client else {
            return fallback(FallbackReason::MissingCredential);
        };

        let summary = self.diff_summary(client, session);
        let prompt = prompt_builder::title_prompt(ctx, &summary, template);
        match client.complete(&prompt, &CallParams::title(self.timeout)) {
            Ok(completion) => {
                session.cost += completion.cost();
                let line = completion.text.lines().next().unwrap_or("").trim();
                if line.is_empty() {
                    return fallback(FallbackReason::EmptyResponse);
                }
                Drafted {
                    text: heuristic::truncate_chars(line, TITLE_MAX_CHARS),
                    origin: Origin::Generated,
                }
            }
            Err(e) => fallback(FallbackReason::ServiceError(e.to_string())),
        }
    }

    fn draft_description(&self, session: &mut Session<'_>, template: Option<&str>) -> Drafted {
        let ctx = session.ctx;
        let fallback = |reason: FallbackReason| {
            log_fallback("description", &reason);
            Drafted {
                text: heuristic::heuristic_description(
                    &ctx.commits,
                    &ctx.files,
                    &ctx.branch,
                    template,
                ),
                origin: Origin::Heuristic(reason),
            }
        };

        let Some(client) = self.client else {
            return fallback(FallbackReason::MissingCredential);
        };

        let summary = self.diff_summary(client, session);
        let prompt = prompt_builder::description_prompt(ctx, &summary, template);
        match client.complete(&prompt, &CallParams::description(self.timeout)) {
            Ok(completion) => {
                session.cost += completion.cost();
                match sections::validate(&completion.text) {
                    Validation::Accepted(text) => Drafted {
                        text,
                        origin: Origin::Generated,
                    },
                    Validation::Rejected { missing } => {
                        fallback(FallbackReason::MissingSections(missing))
                    }
                }
            }
            Err(e) => fallback(FallbackReason::ServiceError(e.to_string())),
        }
    }

    /// Summarise the branch diff once per session; failures become placeholder text.
    fn diff_summary(&self, client: &dyn LlmClient, session: &mut Session<'_>) -> String {
        if let Some(summary) = &session.diff_summary {
            return summary.clone();
        }

        let summary = match context::fetch_diff(self.repo, session.ctx) {
            DiffText::Unavailable(reason) => {
                log::debug!("Skipping diff summary: {reason}");
                DIFF_UNAVAILABLE.to_string()
            }
            DiffText::Available(diff) if diff.trim().is_empty() => DIFF_EMPTY.to_string(),
            DiffText::Available(diff) => {
                let prompt = prompt_builder::diff_summary_prompt(&diff);
                match client.complete(&prompt, &CallParams::diff_summary(self.timeout)) {
                    Ok(completion) => {
                        session.cost += completion.cost();
                        completion.text
                    }
                    Err(e) => {
                        log::warn!("Diff summary failed: {e}");
                        summary_error_text(&e)
                    }
                }
            }
        };

        session.diff_summary = Some(summary.clone());
        summary
    }
}

/// Strip fences and rewrite the Related Resources section from caller input.
fn finish_description(text: &str, req: &DraftRequest, ctx: &BranchContext) -> String {
    let text = sections::strip_code_fence(text);

    let mut lines = req.resources.clone();
    if req.detect_resources {
        for found in resources::detect_related_resources(&ctx.commits, &ctx.branch, &ctx.files) {
            if !lines.contains(&found) {
                lines.push(found);
            }
        }
    }

    let labels = resources::label_resources(&lines);
    let body = if labels.labeled.is_empty() && labels.other.is_empty() {
        None
    } else {
        Some(labels.render())
    };

    sections::rewrite_related_resources(text, body.as_deref())
}

fn summary_error_text(e: &GenerationError) -> String {
    format!("[Diff summary unavailable: {e}]")
}

fn log_fallback(artifact: &str, reason: &FallbackReason) {
    match reason {
        FallbackReason::MissingCredential => {
            log::info!("Using heuristic {artifact}: {reason}")
        }
        _ => log::warn!("Falling back to heuristic {artifact}: {reason}"),
    }
}
