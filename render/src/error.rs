use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unknown format '{0}' (expected github, azure-devops or plain)")]
    UnknownFormat(String),

    #[error("failed to write output: {0}")]
    Fmt(#[from] std::fmt::Error),
}
