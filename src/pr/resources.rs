use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Issue and ticket references: `#123` or `PROJ-42`.
pub static ISSUE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\d+|[A-Z]{2,}-\d+").unwrap());

static RELATED_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\d+|[A-Z]{2,}-\d+|https?://\S+").unwrap());

/// Ordered classification rules; the first match wins.
static RESOURCE_RULES: LazyLock<Vec<(Regex, ResourceKind)>> = LazyLock::new(|| {
    vec![
        (
            Regex::new(r"(?i)jira\.com|atlassian\.net").unwrap(),
            ResourceKind::JiraTicket,
        ),
        (
            Regex::new(r"(?i)confluence\.com|confluence\.").unwrap(),
            ResourceKind::Documentation,
        ),
        (
            Regex::new(r"(?i)drive\.google\.com").unwrap(),
            ResourceKind::Documentation,
        ),
        (
            Regex::new(r"(?i)github\.com/.+?/issues/").unwrap(),
            ResourceKind::GitHubIssue,
        ),
        (
            Regex::new(r"(?i)linear\.app").unwrap(),
            ResourceKind::LinearTicket,
        ),
        (
            Regex::new(r"(?i)docs\.google\.com").unwrap(),
            ResourceKind::Documentation,
        ),
    ]
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    JiraTicket,
    Documentation,
    GitHubIssue,
    LinearTicket,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::JiraTicket => "Jira Ticket",
            ResourceKind::Documentation => "Documentation",
            ResourceKind::GitHubIssue => "GitHub Issue",
            ResourceKind::LinearTicket => "Linear Ticket",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference line and the category it was recognised as, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledResource {
    pub text: String,
    pub kind: Option<ResourceKind>,
}

impl LabeledResource {
    pub fn classify(line: &str) -> Self {
        let text = line.trim().to_string();
        let kind = RESOURCE_RULES
            .iter()
            .find(|(pattern, _)| pattern.is_match(&text))
            .map(|(_, kind)| *kind);
        LabeledResource { text, kind }
    }
}

/// Resource lines split into recognised (`"<Label>: <line>"`) and unrecognised ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceLabels {
    pub labeled: Vec<String>,
    pub other: Vec<String>,
}

impl ResourceLabels {
    /// Body for the Related Resources section.
    pub fn render(&self) -> String {
        let mut out = self.labeled.join("\n");
        if !self.other.is_empty() {
            out.push_str("\n\n## Other\n");
            let others: Vec<String> = self.other.iter().map(|l| format!("- {l}")).collect();
            out.push_str(&others.join("\n"));
        }
        out.trim_start().to_string()
    }
}

/// Classify each line; blank lines are skipped, nothing else is dropped.
pub fn label_resources(lines: &[String]) -> ResourceLabels {
    let mut labels = ResourceLabels::default();
    for line in lines.iter().filter(|l| !l.trim().is_empty()) {
        let resource = LabeledResource::classify(line);
        match resource.kind {
            Some(kind) => labels.labeled.push(format!("{kind}: {}", resource.text)),
            None => labels.other.push(resource.text),
        }
    }
    labels
}

/// Issue keys, ticket keys and URLs mentioned in commits, the branch name or file names.
pub fn detect_related_resources(commits: &[String], branch: &str, files: &[String]) -> Vec<String> {
    let mut found = BTreeSet::new();
    let sources = commits
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(branch))
        .chain(files.iter().map(String::as_str));
    for text in sources {
        for m in RELATED_REF.find_iter(text) {
            found.insert(m.as_str().to_string());
        }
    }
    found.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn labels_jira_and_keeps_unknown_as_other() {
        let labels = label_resources(&lines(&[
            "https://jira.mycompany.atlassian.net/TICKET-1",
            "https://example.com/notes",
        ]));
        assert_eq!(
            labels.labeled,
            vec!["Jira Ticket: https://jira.mycompany.atlassian.net/TICKET-1"]
        );
        assert_eq!(labels.other, vec!["https://example.com/notes"]);
    }

    #[test]
    fn classifies_each_known_category() {
        let cases = [
            ("https://acme.jira.com/browse/X-1", Some(ResourceKind::JiraTicket)),
            ("https://acme.confluence.com/page", Some(ResourceKind::Documentation)),
            ("https://drive.google.com/file/d/1", Some(ResourceKind::Documentation)),
            ("https://docs.google.com/document/d/1", Some(ResourceKind::Documentation)),
            ("https://github.com/o/r/issues/12", Some(ResourceKind::GitHubIssue)),
            ("https://github.com/o/r/pull/12", None),
            ("https://linear.app/acme/issue/ENG-1", Some(ResourceKind::LinearTicket)),
        ];
        for (line, kind) in cases {
            assert_eq!(LabeledResource::classify(line).kind, kind, "{line}");
        }
    }

    #[test]
    fn first_matching_rule_wins() {
        // Confluence hosted on atlassian.net hits the Jira rule first.
        let r = LabeledResource::classify("https://acme.atlassian.net/wiki/confluence.page");
        assert_eq!(r.kind, Some(ResourceKind::JiraTicket));
    }

    #[test]
    fn preserves_order_and_skips_blank_lines() {
        let labels = label_resources(&lines(&["b", "  ", "a", " https://linear.app/x "]));
        assert_eq!(labels.other, vec!["b", "a"]);
        assert_eq!(labels.labeled, vec!["Linear Ticket: https://linear.app/x"]);
    }

    #[test]
    fn renders_other_subsection() {
        let labels = ResourceLabels {
            labeled: vec!["Jira Ticket: j".into()],
            other: vec!["x".into(), "y".into()],
        };
        assert_eq!(labels.render(), "Jira Ticket: j\n\n## Other\n- x\n- y");

        let only_other = ResourceLabels {
            labeled: vec![],
            other: vec!["x".into()],
        };
        assert_eq!(only_other.render(), "## Other\n- x");
    }

    #[test]
    fn detects_refs_across_sources() {
        let found = detect_related_resources(
            &lines(&["fix crash (#42)", "See https://linear.app/a/ENG-7"]),
            "feat/PAY-12-refunds",
            &lines(&["docs/ADR-3.md"]),
        );
        assert_eq!(
            found,
            vec!["#42", "ADR-3", "PAY-12", "https://linear.app/a/ENG-7"]
        );
    }
}
