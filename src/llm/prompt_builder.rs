use crate::context::BranchContext;
use crate::llm::prompts;

pub struct PromptPair {
    pub system: String,
    pub user: String,
}

impl PromptPair {
    fn new(user: String) -> Self {
        PromptPair {
            system: prompts::SYSTEM.to_owned(),
            user,
        }
    }
}

pub fn diff_summary_prompt(diff: &str) -> PromptPair {
    let user = format!(
        "{instructions}\n\ndiff:\n```diff\n{diff}\n```",
        instructions = prompts::DIFF_SUMMARY,
        diff = diff
    );
    PromptPair::new(user)
}

pub fn title_prompt(
    ctx: &BranchContext,
    diff_summary: &str,
    template: Option<&str>,
) -> PromptPair {
    let mut user = prompts::TITLE_INSTRUCTIONS.to_owned();
    user.push_str("\n\n");
    user.push_str(&render_context(ctx, diff_summary));

    if let Some(t) = template {
        user.push_str("\nUse the following template as a guide for the title:\n");
        user.push_str(t);
        user.push('\n');
    }

    PromptPair::new(user)
}

pub fn description_prompt(
    ctx: &BranchContext,
    diff_summary: &str,
    template: Option<&str>,
) -> PromptPair {
    let mut user = prompts::DESCRIPTION_INSTRUCTIONS.to_owned();
    user.push_str("\n\n");
    user.push_str(&render_context(ctx, diff_summary));

    if let Some(t) = template {
        user.push_str("\nUse the following template as a guide:\n");
        user.push_str(t);
        user.push('\n');
    }

    PromptPair::new(user)
}

pub fn vibe_check_prompt(commits: &[String], files: &[String]) -> PromptPair {
    let mut user = prompts::VIBE_CHECK_INSTRUCTIONS.to_owned();
    user.push_str("\n\n**Context:**\n");
    user.push_str("- Commit messages:\n");
    user.push_str(&render_list(commits));
    user.push_str("- Changed files:\n");
    user.push_str(&render_list(files));
    PromptPair::new(user)
}

fn render_context(ctx: &BranchContext, diff_summary: &str) -> String {
    let mut out = String::from("**Context:**\n");
    out.push_str(&format!("- Branch: `{}`\n", ctx.branch));
    out.push_str("- Commit messages (oldest first):\n");
    out.push_str(&render_list(&ctx.commits));
    out.push_str("- Changed files:\n");
    out.push_str(&render_list(&ctx.files));
    out.push_str(&format!("- Diff summary: {}\n", diff_summary.trim()));
    out
}

/// Nested bullet list; continuation lines of multi-line entries stay indented.
fn render_list(items: &[String]) -> String {
    if items.is_empty() {
        return "  - (none)\n".to_string();
    }

    let mut out = String::new();
    for item in items {
        out.push_str("  - ");
        out.push_str(&item.trim().replace('\n', "\n    "));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pr::sections::REQUIRED_SECTIONS;

    fn ctx() -> BranchContext {
        BranchContext {
            base: "main".into(),
            branch: "feat-uploader-retry".into(),
            commits: vec![
                "feat: add retry logic to uploader".into(),
                "Handle 503s\n\nBack off exponentially".into(),
            ],
            files: vec!["src/uploader.rs".into(), "tests/uploader_test.rs".into()],
        }
    }

    #[test]
    fn description_prompt_lists_every_required_section() {
        let p = description_prompt(&ctx(), "Adds retries.", None);
        for section in REQUIRED_SECTIONS {
            assert!(p.user.contains(section), "missing {section}");
        }
        assert!(p.user.contains("do not add or remove sections"));
    }

    #[test]
    fn prompts_embed_context() {
        let p = title_prompt(&ctx(), "Adds retries.", None);
        assert!(p.user.contains("- Branch: `feat-uploader-retry`"));
        assert!(p.user.contains("  - feat: add retry logic to uploader\n"));
        assert!(p.user.contains("  - Handle 503s\n    \n    Back off exponentially\n"));
        assert!(p.user.contains("  - tests/uploader_test.rs\n"));
        assert!(p.user.contains("- Diff summary: Adds retries."));
        assert!(p.user.contains("Do NOT invent or assume extra context."));
        assert_eq!(p.system, "You are a helpful assistant.");
    }

    #[test]
    fn template_is_appended_as_guide() {
        let without = description_prompt(&ctx(), "s", None);
        let with = description_prompt(&ctx(), "s", Some("## What\n## Why"));
        assert!(!without.user.contains("template as a guide"));
        assert!(with.user.ends_with("Use the following template as a guide:\n## What\n## Why\n"));

        let title = title_prompt(&ctx(), "s", Some("[{branch_name}]"));
        assert!(title.user.contains("template as a guide for the title:\n[{branch_name}]"));
    }

    #[test]
    fn builders_are_deterministic() {
        let a = description_prompt(&ctx(), "s", Some("t"));
        let b = description_prompt(&ctx(), "s", Some("t"));
        assert_eq!(a.user, b.user);
    }

    #[test]
    fn diff_prompt_embeds_raw_diff() {
        let p = diff_summary_prompt("+added line");
        assert!(p.user.contains("```diff\n+added line\n```"));
    }

    #[test]
    fn empty_lists_render_placeholder() {
        let p = vibe_check_prompt(&[], &[]);
        assert!(p.user.contains("- Commit messages:\n  - (none)\n"));
    }
}
