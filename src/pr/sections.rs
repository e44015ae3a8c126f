//! Section schema for PR descriptions.
//!
//! Generated descriptions must carry five level-one headings. This module checks for them,
//! strips the code fences models like to wrap markdown in, and offers a small structured view of
//! a description (preamble plus `(heading, body)` pairs) so individual sections can be rewritten
//! without pattern substitution over the raw text.

/// Headings every description must contain, in canonical order.
pub const REQUIRED_SECTIONS: [&str; 5] = [
    "# Summary",
    "# Related Resources",
    "# Changes",
    "# Testing",
    "# Out of Scope",
];

pub const RELATED_RESOURCES: &str = "# Related Resources";

/// Outcome of checking a generated description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Fence-stripped text containing every required heading.
    Accepted(String),
    Rejected { missing: Vec<&'static str> },
}

/// Strip a fence, then require every heading to appear somewhere in the text.
///
/// Only presence is checked; order and duplicates are not.
pub fn validate(raw: &str) -> Validation {
    let text = strip_code_fence(raw);
    let missing = missing_sections(text);
    if missing.is_empty() {
        Validation::Accepted(text.to_string())
    } else {
        Validation::Rejected { missing }
    }
}

pub fn missing_sections(text: &str) -> Vec<&'static str> {
    REQUIRED_SECTIONS
        .iter()
        .copied()
        .filter(|section| !text.contains(section))
        .collect()
}

/// Remove one wrapping code fence (```` ``` ```` or ```` ```markdown ````) if present.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    let Some(after_fence) = text.strip_prefix("```") else {
        return text;
    };

    // A language tag is a single word on the fence line; anything else is content.
    let body = match after_fence.find('\n') {
        Some(pos) if is_fence_tag(&after_fence[..pos]) => &after_fence[pos + 1..],
        _ if is_fence_tag(after_fence) => "",
        _ => after_fence,
    };

    let body = body.trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn is_fence_tag(s: &str) -> bool {
    s.trim()
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '+' | '_' | '.'))
}

/// One level-one heading and the text below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub heading: String,
    pub body: String,
}

/// A markdown description split on level-one headings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Document {
    pub preamble: String,
    pub sections: Vec<Section>,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let mut doc = Document::default();
        let mut current: Option<(String, Vec<&str>)> = None;
        let mut preamble: Vec<&str> = Vec::new();
        let mut in_fence = false;

        for line in text.lines() {
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
            }

            if !in_fence && is_level_one_heading(line) {
                if let Some((heading, body)) = current.take() {
                    doc.sections.push(Section {
                        heading,
                        body: join_trimmed(&body),
                    });
                }
                current = Some((line.trim_end().to_string(), Vec::new()));
                continue;
            }

            match current.as_mut() {
                Some((_, body)) => body.push(line),
                None => preamble.push(line),
            }
        }

        if let Some((heading, body)) = current {
            doc.sections.push(Section {
                heading,
                body: join_trimmed(&body),
            });
        }
        doc.preamble = join_trimmed(&preamble);
        doc
    }

    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.sections.len() + 1);
        if !self.preamble.is_empty() {
            parts.push(self.preamble.clone());
        }
        for section in &self.sections {
            if section.body.is_empty() {
                parts.push(section.heading.clone());
            } else {
                parts.push(format!("{}\n{}", section.heading, section.body));
            }
        }
        parts.join("\n\n")
    }

    /// Indices of sections whose heading matches `heading`, ignoring case and spacing.
    pub fn find_all(&self, heading: &str) -> Vec<usize> {
        let wanted = normalize_heading(heading);
        self.sections
            .iter()
            .enumerate()
            .filter(|(_, s)| normalize_heading(&s.heading) == wanted)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Replace the Related Resources body with `body`, or drop the section when `body` is `None`.
///
/// Repeated Related Resources sections collapse into the first one. Text without the heading is
/// returned untouched.
pub fn rewrite_related_resources(text: &str, body: Option<&str>) -> String {
    let mut doc = Document::parse(text);
    let matches = doc.find_all(RELATED_RESOURCES);
    let Some(&first) = matches.first() else {
        return text.to_string();
    };

    let mut index = 0;
    doc.sections.retain(|_| {
        let keep = index == first && body.is_some() || !matches.contains(&index);
        index += 1;
        keep
    });

    if let Some(body) = body {
        doc.sections[first].body = body.trim_end().to_string();
    }

    doc.render()
}

fn is_level_one_heading(line: &str) -> bool {
    let line = line.trim_end();
    line == "#" || line.starts_with("# ")
}

fn normalize_heading(heading: &str) -> String {
    heading
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn join_trimmed(lines: &[&str]) -> String {
    let start = lines.iter().position(|l| !l.trim().is_empty());
    let end = lines.iter().rposition(|l| !l.trim().is_empty());
    match (start, end) {
        (Some(s), Some(e)) => lines[s..=e].join("\n"),
        _ => String::new(),
    }
}
