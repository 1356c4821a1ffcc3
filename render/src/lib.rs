pub mod error;
pub mod format;
pub mod renderer;

pub use error::RenderError;
pub use format::{
    AzureDevOpsMarkdown, Format, FormatKind, GitHubFlavoredMarkdown, PlainMarkdown, Repository,
    SourceLocation,
};
pub use renderer::Renderer;
