use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// Package metadata that could not be loaded, with source location when known.
#[derive(Debug, Clone)]
pub struct MetadataError {
    pub message: String,
    pub span: Option<Range<usize>>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl MetadataError {
    pub fn error(message: impl Into<String>, span: Option<Range<usize>>, file_id: usize) -> Self {
        MetadataError {
            message: message.into(),
            span,
            file_id,
            severity: Severity::Error,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let labels = match &self.span {
            Some(span) => vec![Label::primary(self.file_id, span.clone())],
            None => Vec::new(),
        };
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for MetadataError {}
