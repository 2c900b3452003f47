use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReleaseBadgeError {
    #[error("GitHub API error: {0}")]
    GitHubApi(Box<octocrab::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error at {path}: {message}")]
    Config { path: String, message: String },

    #[error("Invalid repository format '{input}'. Expected format: owner/repo (e.g., opendrop/opendrop)")]
    InvalidRepo { input: String },

    #[error("No repository configured. Pass OWNER/REPO or set [repository] in the config file")]
    MissingRepo,

    #[error("Cache storage error for key '{key}': {message}")]
    CacheStorage { key: String, message: String },
}

pub type Result<T> = std::result::Result<T, ReleaseBadgeError>;

impl From<octocrab::Error> for ReleaseBadgeError {
    fn from(err: octocrab::Error) -> Self {
        ReleaseBadgeError::GitHubApi(Box::new(err))
    }
}
