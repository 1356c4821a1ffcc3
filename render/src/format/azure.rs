use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::format::{Format, SourceLocation};

/// Characters Azure DevOps leaves unencoded in heading anchors.
const ANCHOR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Characters kept literally in the `path` query parameter.
const PATH: &AsciiSet = &ANCHOR.remove(b'/');

/// Markdown for Azure DevOps wikis and repos.
#[derive(Debug, Clone, Copy, Default)]
pub struct AzureDevOpsMarkdown;

impl Format for AzureDevOpsMarkdown {
    fn name(&self) -> &str {
        "azure-devops"
    }

    fn local_href(&self, anchor: &str) -> Option<String> {
        let id = anchor.trim().to_lowercase().replace(' ', "-");
        Some(format!("#{}", utf8_percent_encode(&id, ANCHOR)))
    }

    fn code_href(&self, location: &SourceLocation) -> Option<String> {
        let (repo, path) = location.parts()?;
        Some(format!(
            "{}?path=/{}&version=GB{}&line={}&lineEnd={}&lineStartColumn=1&lineEndColumn=1",
            repo.remote.trim_end_matches('/'),
            utf8_percent_encode(path, PATH),
            repo.default_branch,
            location.start_line,
            location.end_line.max(location.start_line)
        ))
    }
}
