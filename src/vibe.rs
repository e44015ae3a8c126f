use std::sync::LazyLock;

use regex::Regex;

use crate::error::GenerationError;
use crate::llm::{prompt_builder, CallParams, Cost, LlmClient};
use crate::pr::heuristic::is_test_file;
use crate::pr::orchestrator::{FallbackReason, Origin};

static LOW_QUALITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)wip|fix|final|pls work|temp|test").unwrap());

const LARGE_CHANGE_FILES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct VibeReport {
    pub warnings: Vec<String>,
    pub origin: Origin,
    pub cost: Cost,
}

/// Review commit and file quality with the model.
///
/// Unlike drafting, a missing credential is an error here. Service failures and replies without
/// a bullet list fall back to [`heuristic_checks`].
pub fn run_vibe_checks(
    client: Option<&dyn LlmClient>,
    commits: &[String],
    files: &[String],
) -> Result<VibeReport, GenerationError> {
    let client = client.ok_or(GenerationError::MissingCredential)?;

    let prompt = prompt_builder::vibe_check_prompt(commits, files);
    let (reason, cost) = match client.complete(&prompt, &CallParams::vibe_check()) {
        Ok(completion) => {
            let warnings = parse_bullets(&completion.text);
            if !warnings.is_empty() {
                return Ok(VibeReport {
                    warnings,
                    origin: Origin::Generated,
                    cost: completion.cost(),
                });
            }
            (FallbackReason::EmptyResponse, completion.cost())
        }
        Err(e) => (FallbackReason::ServiceError(e.to_string()), Cost::ZERO),
    };

    log::warn!("Falling back to heuristic vibe checks: {reason}");
    Ok(VibeReport {
        warnings: heuristic_checks(commits, files),
        origin: Origin::Heuristic(reason),
        cost,
    })
}

/// Lines starting with `-` or `*`, marker and surrounding spaces removed.
fn parse_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-') || line.starts_with('*'))
        .map(|line| line.trim_start_matches(['-', '*', ' ']).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn heuristic_checks(commits: &[String], files: &[String]) -> Vec<String> {
    let mut warnings = Vec::new();

    let low_quality: Vec<&str> = commits
        .iter()
        .map(String::as_str)
        .filter(|m| LOW_QUALITY.is_match(m))
        .collect();
    if low_quality.is_empty() {
        warnings.push("✅ No low-quality commit messages found.".to_string());
    } else {
        let more = if low_quality.len() > 2 { "..." } else { "" };
        warnings.push(format!(
            "❌ {} low-quality commit message(s) found: {}{more}",
            low_quality.len(),
            low_quality.iter().take(2).copied().collect::<Vec<_>>().join(", ")
        ));
    }

    let has_tests = files.iter().any(|f| is_test_file(f));
    if files.len() > LARGE_CHANGE_FILES && !has_tests {
        warnings.push("❌ Large change (>10 files) but no test files detected.".to_string());
    } else if !has_tests {
        warnings.push("⚠ No test files detected in this stack.".to_string());
    } else {
        warnings.push("✅ Test files present.".to_string());
    }

    let placeholders = commits
        .iter()
        .map(|m| m.trim())
        .filter(|m| m.is_empty() || *m == "." || *m == "-")
        .count();
    if placeholders > 0 {
        warnings.push(format!(
            "⚠ {placeholders} commit(s) with empty or placeholder description."
        ));
    } else {
        warnings.push("✅ All commits have descriptions.".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::prompt_builder::PromptPair;
    use crate::llm::{Completion, Usage};

    struct Fixed(Result<&'static str, &'static str>);

    impl LlmClient for Fixed {
        fn complete(
            &self,
            _prompt: &PromptPair,
            params: &CallParams,
        ) -> Result<Completion, GenerationError> {
            assert_eq!(params.max_tokens, 256);
            match self.0 {
                Ok(text) => Ok(Completion {
                    text: text.to_string(),
                    usage: Usage {
                        prompt_tokens: 1000,
                        completion_tokens: 0,
                    },
                }),
                Err(e) => Err(GenerationError::Transport(e.to_string())),
            }
        }
    }

    fn v(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn missing_credential_is_fatal() {
        let err = run_vibe_checks(None, &v(&["x"]), &[]).unwrap_err();
        assert!(matches!(err, GenerationError::MissingCredential));
        assert!(err.to_string().contains("export OPENAI_API_KEY"));
    }

    #[test]
    fn parses_model_bullets() {
        let client = Fixed(Ok("Here you go:\n- Commit `wip` is vague\n* Add tests for uploader\n\nThanks"));
        let report = run_vibe_checks(Some(&client), &v(&["wip"]), &[]).unwrap();
        assert_eq!(
            report.warnings,
            vec!["Commit `wip` is vague", "Add tests for uploader"]
        );
        assert_eq!(report.origin, Origin::Generated);
        assert!((report.cost.as_usd() - 0.0015).abs() < 1e-12);
    }

    #[test]
    fn service_failure_uses_heuristics() {
        let client = Fixed(Err("timeout"));
        let report = run_vibe_checks(Some(&client), &v(&["feat: add x"]), &v(&["src/x_test.rs"])).unwrap();
        assert!(matches!(report.origin, Origin::Heuristic(FallbackReason::ServiceError(_))));
        assert_eq!(
            report.warnings,
            vec![
                "✅ No low-quality commit messages found.",
                "✅ Test files present.",
                "✅ All commits have descriptions.",
            ]
        );
        assert!(report.cost.is_zero());
    }

    #[test]
    fn reply_without_bullets_uses_heuristics() {
        let client = Fixed(Ok("Looks fine to me."));
        let report = run_vibe_checks(Some(&client), &v(&["feat: add x"]), &[]).unwrap();
        assert_eq!(report.origin, Origin::Heuristic(FallbackReason::EmptyResponse));
        assert!(!report.cost.is_zero());
    }

    #[test]
    fn heuristic_flags_problems() {
        let files: Vec<String> = (0..11).map(|i| format!("src/f{i}.rs")).collect();
        let warnings = heuristic_checks(&v(&["wip", "temp", "fix typo", ".", "feat: ok"]), &files);
        assert_eq!(
            warnings,
            vec![
                "❌ 3 low-quality commit message(s) found: wip, temp...",
                "❌ Large change (>10 files) but no test files detected.",
                "⚠ 1 commit(s) with empty or placeholder description.",
            ]
        );
    }

    #[test]
    fn heuristic_small_change_without_tests() {
        let warnings = heuristic_checks(&v(&["feat: add thing"]), &v(&["src/a.rs"]));
        assert_eq!(warnings[1], "⚠ No test files detected in this stack.");
    }
}
