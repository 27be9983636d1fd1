use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdoptionError {
    #[error("no csv files found in {0}")]
    MissingInput(PathBuf),
    #[error("unknown java version label {0:?}")]
    UnknownVersion(String),
    #[error("file name {0:?} does not carry a commit id, expected <prefix>_<commit_id>.csv")]
    MissingCommitId(String),
    #[error("commit id {0:?} is not a commit ordinal")]
    InvalidCommitId(String),
    #[error("invalid occurrence count {value:?} for commit {commit_id}")]
    InvalidCount { commit_id: String, value: String },
    #[error("unknown feature version policy {0:?}, expected first-seen or majority")]
    UnknownPolicy(String),
}
