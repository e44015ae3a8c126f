use std::fs;
use std::path::Path;

/// Locations checked, in order, for a repository pull-request template.
const REPO_TEMPLATE_PATHS: [&str; 3] = [
    ".github/pull_request_template.md",
    "docs/pull_request_template.md",
    "pull_request_template.md",
];

/// Templates in effect for one invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Templates {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Resolve templates from the `--template` value or the repository.
///
/// An explicit value is read from disk when it names a readable file and used literally otherwise;
/// it applies to both artifacts. A discovered repository template only guides the description.
pub fn resolve(explicit: Option<&str>, repo_root: &Path) -> Templates {
    if let Some(value) = explicit {
        let text = read_if_file(value).unwrap_or_else(|| value.to_string());
        return Templates {
            title: Some(text.clone()),
            description: Some(text),
        };
    }

    Templates {
        title: None,
        description: discover_repo_template(repo_root),
    }
}

/// First pull-request template found under `repo_root`.
pub fn discover_repo_template(repo_root: &Path) -> Option<String> {
    REPO_TEMPLATE_PATHS.iter().find_map(|rel| {
        let path = repo_root.join(rel);
        let text = fs::read_to_string(&path).ok()?;
        log::debug!("Using repository PR template {}", path.display());
        Some(text)
    })
}

fn read_if_file(value: &str) -> Option<String> {
    let path = Path::new(value);
    if !path.is_file() {
        return None;
    }
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            log::warn!("Could not read template file {value}: {e}; using the value literally");
            None
        }
    }
}
