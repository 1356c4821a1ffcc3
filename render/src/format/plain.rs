use crate::format::Format;

/// CommonMark without heading anchors. Doc links render as their text.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMarkdown;

impl Format for PlainMarkdown {
    fn name(&self) -> &str {
        "plain"
    }

    fn local_href(&self, _anchor: &str) -> Option<String> {
        None
    }

    // No HTML: the title becomes a bold line and the body follows as is.
    fn accordion_header(&self, title: &str) -> String {
        format!("{}\n\n", self.bold(title))
    }

    fn accordion_terminator(&self) -> String {
        String::new()
    }
}
