//! Output formats.
//!
//! A [`Format`] owns all knowledge of the target markup syntax: how headers,
//! code, lists and links are spelled and how anchors are addressed. The
//! renderer only decides which helper to call for each block and span.

mod azure;
mod github;
mod location;
mod plain;

use std::str::FromStr;

use crate::error::RenderError;

pub use azure::AzureDevOpsMarkdown;
pub use github::GitHubFlavoredMarkdown;
pub use location::{Repository, SourceLocation};
pub use plain::PlainMarkdown;

/// Markup helpers for one output flavor.
///
/// Only [`Format::name`] and [`Format::local_href`] are required; the
/// remaining helpers default to CommonMark spellings.
pub trait Format: Send + Sync {
    /// The name of this format (e.g., "github", "plain")
    fn name(&self) -> &str;

    /// In-page link target for an anchor token such as `func Recv Name`,
    /// or `None` when the format cannot address headings.
    fn local_href(&self, anchor: &str) -> Option<String>;

    fn bold(&self, text: &str) -> String {
        format!("**{}**", text)
    }

    fn italic(&self, text: &str) -> String {
        format!("*{}*", text)
    }

    /// A header at `level`, clamped to the 1-6 range markdown supports.
    /// `text` must already be escaped.
    fn header(&self, level: usize, text: &str) -> String {
        format!("{} {}\n\n", "#".repeat(level.clamp(1, 6)), text)
    }

    /// A header whose text is written verbatim.
    fn raw_header(&self, level: usize, text: &str) -> String {
        self.header(level, text)
    }

    /// A fenced block. The fence is longer than any backtick run in `code`.
    fn code_block(&self, language: &str, code: &str) -> String {
        let longest = code
            .split(|c: char| c != '`')
            .map(str::len)
            .max()
            .unwrap_or(0);
        let fence = "`".repeat(longest.max(2) + 1);
        let newline = if code.ends_with('\n') { "" } else { "\n" };
        format!("{fence}{}\n{}{}{fence}\n\n", language, code, newline)
    }

    /// Collapsible section with `title` as its summary line.
    fn accordion(&self, title: &str, body: &str) -> String {
        format!(
            "{}{}\n\n{}",
            self.accordion_header(title),
            body.trim(),
            self.accordion_terminator()
        )
    }

    /// Opening half of an [`Format::accordion`], for bodies written piecewise.
    fn accordion_header(&self, title: &str) -> String {
        format!("<details><summary>{}</summary>\n<p>\n\n", title)
    }

    fn accordion_terminator(&self) -> String {
        "</p>\n</details>\n\n".to_string()
    }

    /// Link to a range of source lines, when the format knows how to address
    /// the repository hosting it.
    fn code_href(&self, _location: &SourceLocation) -> Option<String> {
        None
    }

    fn link(&self, text: &str, href: &str) -> String {
        format!("[{}]({})", text, href)
    }

    /// Link to a documented symbol. `path` is relative to the module root
    /// and empty for the current package. Formats without anchors fall back
    /// to the bare text.
    fn doc_link(&self, text: &str, path: &str, anchor: &str) -> String {
        match self.local_href(anchor) {
            Some(local) if path.is_empty() => self.link(text, &local),
            Some(local) => {
                let href = format!("/{}{}", path.trim_start_matches('/'), local);
                self.link(text, &href)
            }
            None => text.to_string(),
        }
    }

    /// One list entry. An empty marker is a bullet; otherwise it is the
    /// item number. Continuation lines are indented under the text; blank
    /// lines between an item's paragraphs stay empty.
    fn list_entry(&self, marker: &str, text: &str) -> String {
        let prefix = if marker.is_empty() {
            "- ".to_string()
        } else {
            format!("{}. ", marker)
        };
        let indent = " ".repeat(prefix.len());
        let mut entry = prefix;
        for (n, line) in text.trim().lines().enumerate() {
            if n > 0 {
                entry.push('\n');
                if !line.is_empty() {
                    entry.push_str(&indent);
                }
            }
            entry.push_str(line);
        }
        entry.push('\n');
        entry
    }

    fn paragraph(&self, text: &str) -> String {
        format!("{}\n\n", text.trim())
    }

    /// Escape markdown control characters in literal text.
    fn escape(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        for c in text.chars() {
            if matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>' | '|') {
                escaped.push('\\');
            }
            escaped.push(c);
        }
        escaped
    }
}

/// The built-in formats, selectable by name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormatKind {
    #[default]
    GitHub,
    AzureDevOps,
    Plain,
}

impl FormatKind {
    pub fn build(self) -> Box<dyn Format> {
        match self {
            FormatKind::GitHub => Box::new(GitHubFlavoredMarkdown),
            FormatKind::AzureDevOps => Box::new(AzureDevOpsMarkdown),
            FormatKind::Plain => Box::new(PlainMarkdown),
        }
    }
}

impl FromStr for FormatKind {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "github" | "gfm" => Ok(FormatKind::GitHub),
            "azure-devops" | "azure" => Ok(FormatKind::AzureDevOps),
            "plain" => Ok(FormatKind::Plain),
            _ => Err(RenderError::UnknownFormat(s.to_string())),
        }
    }
}
