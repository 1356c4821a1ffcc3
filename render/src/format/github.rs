use crate::format::{Format, SourceLocation};

/// Markdown as rendered by GitHub, with heading anchors.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitHubFlavoredMarkdown;

impl Format for GitHubFlavoredMarkdown {
    fn name(&self) -> &str {
        "github"
    }

    fn local_href(&self, anchor: &str) -> Option<String> {
        Some(format!("#{}", slug(anchor)))
    }

    fn code_href(&self, location: &SourceLocation) -> Option<String> {
        let (repo, path) = location.parts()?;
        let lines = if location.end_line > location.start_line {
            format!("L{}-L{}", location.start_line, location.end_line)
        } else {
            format!("L{}", location.start_line)
        };
        Some(format!(
            "{}/blob/{}/{}#{}",
            repo.remote.trim_end_matches('/'),
            repo.default_branch,
            path,
            lines
        ))
    }
}

/// GitHub's heading id: lowercase, spaces become dashes, punctuation other
/// than `-` and `_` is dropped.
fn slug(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}
