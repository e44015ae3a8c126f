pub const SYSTEM: &str = "You are a helpful assistant.";

pub const DIFF_SUMMARY: &str = r#"Summarize the following git diff for a pull request. Be concise and focus on the main
changes, not line-by-line details."#;

pub const TITLE_INSTRUCTIONS: &str = r#"You are an expert software engineer and code reviewer. Write a high-quality,
professional pull request (PR) TITLE for the following changes, following these best practices:
- Be concise and descriptive (ideally under 50 characters, max 80).
- Use imperative mood ("add", "fix", "update").
- Follow conventional commit style: prefix with feat, fix, docs, chore, etc.
- Reference issues/tickets if present (e.g., closes #123).
- Do NOT include a description, only the title.
- Do NOT invent or assume extra context."#;

pub const DESCRIPTION_INSTRUCTIONS: &str = r#"You are an expert software engineer and code reviewer. Write a high-quality,
professional pull request (PR) description for the following changes, following these best practices:
- ONLY use the information provided below. Do NOT invent, search, or assume any additional information.
- Start with a concise summary of what and why.
- Add a section for related resources (links to issues, docs, tickets, etc. if any).
- Break down the changes in bullet points, explaining what, why, and how.
- Include a section on testing: how to test, scenarios considered, or what should be tested.
- Mention any out-of-scope work (things not addressed but relevant for future work).

Format your response in Markdown with these section headings (do not add or remove sections):

# Summary
# Related Resources
# Changes
# Testing
# Out of Scope"#;

pub const VIBE_CHECK_INSTRUCTIONS: &str = r#"You are an expert code reviewer. Analyze the following commit messages and
changed files for PR quality issues.

Instructions:
- Be concise and direct.
- Return a markdown bullet list of actionable warnings or suggestions.
- Flag low-quality or vague commit messages, missing or insufficient tests, and any other issues that
  could reduce PR quality or maintainability. Examples include commits containing words like "wip",
  "fix", "final", "pls work", "temp", or "test".
- If everything looks good, say so in a single bullet.

Heuristics to apply:
- If more than 10 files are changed and no test files are present, flag this as a concern.
- If no test files are present at all, mention it.
- Flag any commit messages that are empty or just placeholders (like "." or "-")."#;
