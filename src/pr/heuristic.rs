//! Network-free title and description drafting.
//!
//! Everything here is a pure function of its inputs, so it doubles as the deterministic fallback
//! whenever the generation service is unavailable or misbehaves.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::resources::ISSUE_REF;

pub const TITLE_MAX_CHARS: usize = 80;
pub const FALLBACK_TITLE: &str = "chore: update code";
pub const NO_COMMITS_DESCRIPTION: &str =
    "No detailed commit messages found. Consider explaining why this fix matters.";

const MIN_USABLE_CHARS: usize = 8;

static LOW_INFORMATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)wip|temp|pls work|final|test|update code|bug fix|fix bug|pr for").unwrap()
});

static CONVENTIONAL_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(feat|fix|docs|chore|refactor|test|style|perf|ci|build|revert|merge|release)(\([^)]+\))?: ",
    )
    .unwrap()
});

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(commit_messages|changed_files|branch_name)\}").unwrap());

/// Which artifact a template is filled for; lists are joined differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Title,
    Description,
}

/// Substitute `{commit_messages}`, `{changed_files}` and `{branch_name}`; other text is kept.
pub fn fill_template(
    template: &str,
    kind: TemplateKind,
    commits: &[String],
    files: &[String],
    branch: &str,
) -> String {
    let (commit_sep, file_sep) = match kind {
        TemplateKind::Title => ("; ", ", "),
        TemplateKind::Description => ("\n", "\n"),
    };
    let commit_text = commits.join(commit_sep);
    let file_text = files.join(file_sep);

    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[1] {
            "commit_messages" => commit_text.clone(),
            "changed_files" => file_text.clone(),
            _ => branch.to_string(),
        })
        .into_owned()
}

/// Every title not built from a template, conventional commits included, is capped at 80 characters.
pub fn heuristic_title(
    commits: &[String],
    files: &[String],
    branch: &str,
    template: Option<&str>,
) -> String {
    if let Some(t) = template {
        return fill_template(t, TemplateKind::Title, commits, files, branch);
    }

    if let Some(msg) = commits.iter().find(|m| is_usable_commit(m)) {
        let msg = msg.trim();
        let first_line = first_line(msg);

        if CONVENTIONAL_PREFIX.is_match(msg) {
            return truncate_chars(first_line, TITLE_MAX_CHARS);
        }

        let prefix = prefix_from_keywords(&msg.to_lowercase());
        let refs = ref_suffix(msg);
        return truncate_chars(&format!("{prefix}{first_line}{refs}"), TITLE_MAX_CHARS);
    }

    let branch = branch.trim();
    if branch.is_empty() {
        return FALLBACK_TITLE.to_string();
    }

    let prefix = prefix_from_branch(branch);
    let file_hint = files
        .first()
        .map(|f| format!(" [{f}]"))
        .unwrap_or_default();
    let refs = ref_suffix(branch);
    truncate_chars(
        &format!("{prefix}{}{file_hint}{refs}", branch.replace('-', " ")),
        TITLE_MAX_CHARS,
    )
}

pub fn heuristic_description(
    commits: &[String],
    files: &[String],
    branch: &str,
    template: Option<&str>,
) -> String {
    if commits.is_empty() {
        return NO_COMMITS_DESCRIPTION.to_string();
    }

    if let Some(t) = template {
        return fill_template(t, TemplateKind::Description, commits, files, branch);
    }

    let summary = commits
        .first()
        .map(|c| c.trim().to_string())
        .unwrap_or_else(|| format!("Changes on branch `{branch}`."));
    let related = "(Add links to issues, docs, or tickets here if relevant.)";

    let mut changes = commits
        .iter()
        .map(|c| format!("- {}", c.trim().replace('\n', "\n  ")))
        .collect::<Vec<_>>()
        .join("\n");
    let mut files_summary = files.iter().take(3).cloned().collect::<Vec<_>>().join(", ");
    if files.len() > 3 {
        files_summary.push_str(&format!(", and {} more files", files.len() - 3));
    }
    changes.push_str(&format!("\n\n**Main files changed:** {files_summary}"));

    let test_files: Vec<&str> = files
        .iter()
        .map(String::as_str)
        .filter(|f| is_test_file(f))
        .collect();
    let testing = if test_files.is_empty() {
        "No test files detected. Please describe how this was tested.".to_string()
    } else {
        let more = if test_files.len() > 2 { "..." } else { "" };
        format!(
            "Test files updated: {}{more}.",
            test_files.iter().take(2).copied().collect::<Vec<_>>().join(", ")
        )
    };
    let out_of_scope = "(Note any related work not addressed in this PR.)";

    format!(
        "# Summary\n{summary}\n\n# Related Resources\n{related}\n\n# Changes\n{changes}\n\n# Testing\n{testing}\n\n# Out of Scope\n{out_of_scope}"
    )
}

/// Paths that look like tests.
pub fn is_test_file(path: &str) -> bool {
    path.contains("test") || path.ends_with(".test.js") || path.contains("__tests__")
}

/// Long enough and not one of the usual throwaway messages.
fn is_usable_commit(msg: &str) -> bool {
    let line = first_line(msg.trim());
    line.chars().count() >= MIN_USABLE_CHARS && !LOW_INFORMATION.is_match(line)
}

fn prefix_from_keywords(lower: &str) -> &'static str {
    if lower.contains("fix") {
        "fix: "
    } else if lower.contains("add") || lower.contains("implement") || lower.contains("feature") {
        "feat: "
    } else if lower.contains("doc") {
        "docs: "
    } else if lower.contains("refactor") {
        "refactor: "
    } else if lower.contains("test") {
        "test: "
    } else {
        "chore: "
    }
}

fn prefix_from_branch(branch: &str) -> &'static str {
    if branch.starts_with("feat") {
        "feat: "
    } else if branch.starts_with("fix") {
        "fix: "
    } else if branch.starts_with("docs") {
        "docs: "
    } else if branch.starts_with("refactor") {
        "refactor: "
    } else {
        "chore: "
    }
}

/// `" (#12 ABC-3)"` for every issue reference in `text`, or empty.
fn ref_suffix(text: &str) -> String {
    let refs: Vec<&str> = ISSUE_REF.find_iter(text).map(|m| m.as_str()).collect();
    if refs.is_empty() {
        String::new()
    } else {
        format!(" ({})", refs.join(" "))
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("").trim()
}

pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn conventional_commit_passes_through() {
        let title = heuristic_title(
            &v(&["fix: resolve race condition in cache\n\nLong explanation"]),
            &[],
            "whatever",
            None,
        );
        assert_eq!(title, "fix: resolve race condition in cache");
    }

    #[test]
    fn skips_low_information_commits() {
        let title = heuristic_title(
            &v(&["wip", "temp fix", "feat: add retry logic to uploader"]),
            &[],
            "b",
            None,
        );
        assert_eq!(title, "feat: add retry logic to uploader");
    }

    #[test]
    fn short_commits_are_not_usable() {
        let title = heuristic_title(&v(&["tweak"]), &v(&["a.rs"]), "feat-x", None);
        assert_eq!(title, "feat: feat x [a.rs]");
    }

    #[test]
    fn synthesizes_prefix_and_refs() {
        let title = heuristic_title(&v(&["Resolve crash when saving PAY-12 (#7)"]), &[], "b", None);
        assert_eq!(title, "chore: Resolve crash when saving PAY-12 (#7) (PAY-12 #7)");

        let title = heuristic_title(&v(&["Add export button"]), &[], "b", None);
        assert_eq!(title, "feat: Add export button");

        let title = heuristic_title(&v(&["Fixed the login redirect"]), &[], "b", None);
        assert_eq!(title, "fix: Fixed the login redirect");

        let title = heuristic_title(&v(&["Rewrite docstrings"]), &[], "b", None);
        assert_eq!(title, "docs: Rewrite docstrings");
    }

    #[test]
    fn unmatched_keywords_default_to_chore() {
        let title = heuristic_title(&v(&["Bump dependency versions"]), &[], "b", None);
        assert_eq!(title, "chore: Bump dependency versions");
    }

    #[test]
    fn branch_fallback() {
        let title = heuristic_title(&[], &v(&["src/pay.rs", "x"]), "fix-PAY-12-refund-rounding", None);
        assert_eq!(title, "fix: fix PAY 12 refund rounding [src/pay.rs] (PAY-12)");

        let title = heuristic_title(&v(&["wip"]), &[], "cleanup-logs", None);
        assert_eq!(title, "chore: cleanup logs");
    }

    #[test]
    fn empty_branch_uses_fixed_title() {
        assert_eq!(heuristic_title(&[], &[], "", None), FALLBACK_TITLE);
        assert_eq!(heuristic_title(&v(&["wip"]), &[], "  ", None), FALLBACK_TITLE);
    }

    #[test]
    fn titles_never_exceed_eighty_chars() {
        let long = format!("Add {}", "very ".repeat(40));
        let cases = [
            heuristic_title(&v(&[long.as_str()]), &[], "b", None),
            heuristic_title(&v(&[format!("feat: {long}").as_str()]), &[], "b", None),
            heuristic_title(&[], &v(&["f"]), &"feature-".repeat(20), None),
        ];
        for title in cases {
            assert!(title.chars().count() <= TITLE_MAX_CHARS, "{title}");
        }
    }

    #[test]
    fn title_template_is_filled_verbatim() {
        let title = heuristic_title(
            &v(&["one", "two"]),
            &v(&["a.rs", "b.rs"]),
            "feat-x",
            Some("[{branch_name}] {commit_messages} | {changed_files} {unknown}"),
        );
        assert_eq!(title, "[feat-x] one; two | a.rs, b.rs {unknown}");
    }

    #[test]
    fn description_without_commits_is_fixed_sentence() {
        for (files, branch) in [(v(&[]), ""), (v(&["a", "b"]), "feat-x")] {
            assert_eq!(
                heuristic_description(&[], &files, branch, Some("{branch_name}")),
                NO_COMMITS_DESCRIPTION
            );
        }
    }

    #[test]
    fn description_has_five_sections_in_order() {
        let desc = heuristic_description(
            &v(&["feat: add retries", "fix: handle 503"]),
            &v(&["src/up.rs", "tests/up_test.rs", "README.md", "Cargo.toml", "src/lib.rs"]),
            "feat-retries",
            None,
        );
        let expected = "# Summary\nfeat: add retries\n\n\
            # Related Resources\n(Add links to issues, docs, or tickets here if relevant.)\n\n\
            # Changes\n- feat: add retries\n- fix: handle 503\n\n\
            **Main files changed:** src/up.rs, tests/up_test.rs, README.md, and 2 more files\n\n\
            # Testing\nTest files updated: tests/up_test.rs.\n\n\
            # Out of Scope\n(Note any related work not addressed in this PR.)";
        assert_eq!(desc, expected);
    }

    #[test]
    fn description_testing_section_variants() {
        let none = heuristic_description(&v(&["x"]), &v(&["src/a.rs"]), "b", None);
        assert!(none.contains("No test files detected. Please describe how this was tested."));

        let many = heuristic_description(
            &v(&["x"]),
            &v(&["a.test.js", "src/__tests__/b.js", "tests/c.rs"]),
            "b",
            None,
        );
        assert!(many.contains("Test files updated: a.test.js, src/__tests__/b.js..."));
    }

    #[test]
    fn description_template_joins_with_newlines() {
        let desc = heuristic_description(
            &v(&["one", "two"]),
            &v(&["a.rs"]),
            "b",
            Some("## Commits\n{commit_messages}\n## Files\n{changed_files}"),
        );
        assert_eq!(desc, "## Commits\none\ntwo\n## Files\na.rs");
    }

    #[test]
    fn substitution_is_single_pass() {
        let out = fill_template(
            "{commit_messages}",
            TemplateKind::Title,
            &v(&["mentions {branch_name}"]),
            &[],
            "main",
        );
        assert_eq!(out, "mentions {branch_name}");
    }

    #[test]
    fn heuristics_are_deterministic() {
        let commits = v(&["Add thing", "fix: other"]);
        let files = v(&["a", "b"]);
        assert_eq!(
            heuristic_title(&commits, &files, "b", None),
            heuristic_title(&commits, &files, "b", None)
        );
        assert_eq!(
            heuristic_description(&commits, &files, "b", None),
            heuristic_description(&commits, &files, "b", None)
        );
    }
}
