use std::fmt;

use crate::resolve::SymbolKind;

/// A run of inline content inside a block.
/// Link kinds nest further spans for their visible text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(String),
    Italic(String),
    /// External hyperlink. The URL is passed through verbatim.
    Link { text: Text, url: String },
    /// Documentation link to a symbol, possibly in another package.
    /// `kind` is `None` when the target could not be found; `path` and
    /// `anchor` are empty in that case.
    CrossRef {
        text: Text,
        kind: Option<SymbolKind>,
        path: String,
        anchor: String,
    },
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Span::Plain(text.into())
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Span::Italic(text.into())
    }

    /// The nested spans of a link kind, if any.
    pub fn inner(&self) -> Option<&Text> {
        match self {
            Span::Link { text, .. } | Span::CrossRef { text, .. } => Some(text),
            Span::Plain(_) | Span::Italic(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Span::CrossRef { kind: Some(_), .. })
    }
}

/// An ordered sequence of inline spans.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Text {
    pub spans: Vec<Span>,
}

impl Text {
    pub fn new(spans: Vec<Span>) -> Self {
        Text { spans }
    }

    pub fn empty() -> Self {
        Text { spans: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// Visible text with all formatting and link targets dropped.
    pub fn plain_text(&self) -> String {
        self.to_string()
    }
}

impl From<Vec<Span>> for Text {
    fn from(spans: Vec<Span>) -> Self {
        Text { spans }
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            write!(f, "{}", span)?;
        }
        Ok(())
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Span::Plain(s) | Span::Italic(s) => write!(f, "{}", s),
            Span::Link { text, .. } | Span::CrossRef { text, .. } => write!(f, "{}", text),
        }
    }
}
