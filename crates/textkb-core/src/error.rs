use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy shared by every operation boundary (`index`, `ask`,
/// `summarize`). Component code constructs these variants and lets them
/// bubble up unmodified; the CLI turns them into a message and a non-zero
/// exit status.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No eligible .txt files under {0}")]
    NoInputFiles(PathBuf),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Collaborator error: {0}")]
    Collaborator(String),

    #[error("Knowledge base corrupted: {0}")]
    IndexCorruption(String),
}

pub type Result<T> = std::result::Result<T, Error>;
