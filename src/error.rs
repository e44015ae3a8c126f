use std::path::PathBuf;

use thiserror::Error;

/// Failures reading repository state. These are fatal for every command.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{0:?} is not inside a Git repository; run this command from a repository or pass --repo")]
    NotARepository(PathBuf),

    #[error("no base branch found: neither 'main' nor 'master' exists")]
    NoBaseBranch,

    #[error("git {args:?} exited with status {status:?}: {stderr}")]
    Command {
        args: Vec<String>,
        status: Option<i32>,
        stderr: String,
    },

    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Failures talking to the text-generation service.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(
        "the OPENAI_API_KEY environment variable is not set.\n\
         Please set it to use LLM features. Example:\n\n    export OPENAI_API_KEY=sk-...\n"
    )]
    MissingCredential,

    #[error("request to generation service failed: {0}")]
    Transport(String),

    #[error("generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response from generation service: {0}")]
    Malformed(String),
}
