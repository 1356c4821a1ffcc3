use std::fmt::Write;

use docmodel::{Block, BlockKind, Document, ListRole, Span, Text};

use crate::error::RenderError;
use crate::format::{Format, FormatKind};

/// Turns a [`Document`] into text in a configured [`Format`].
pub struct Renderer {
    format: Box<dyn Format>,
}

impl Default for Renderer {
    fn default() -> Self {
        Renderer::from_kind(FormatKind::default())
    }
}

impl Renderer {
    pub fn new(format: impl Format + 'static) -> Self {
        Renderer {
            format: Box::new(format),
        }
    }

    pub fn from_kind(kind: FormatKind) -> Self {
        Renderer {
            format: kind.build(),
        }
    }

    pub fn format(&self) -> &dyn Format {
        self.format.as_ref()
    }

    /// Render every block of `doc` in key order.
    pub fn render(&self, doc: &Document) -> Result<String, RenderError> {
        let mut blocks: Vec<&Block> = doc.blocks().iter().collect();
        blocks.sort_by_key(|b| b.key);

        let mut out = String::new();
        for block in blocks {
            self.render_block(&mut out, doc.level(), block)?;
        }

        let trimmed = out.trim_end();
        if trimmed.is_empty() {
            return Ok(String::new());
        }
        log::debug!(
            "rendered {} block(s) as {}",
            doc.blocks().len(),
            self.format.name()
        );
        Ok(format!("{}\n", trimmed))
    }

    fn render_block(&self, out: &mut String, level: usize, block: &Block) -> Result<(), RenderError> {
        match block.kind {
            BlockKind::Paragraph => {
                let text = self.render_text(&block.text)?;
                out.push_str(&self.format.paragraph(&text));
            }
            BlockKind::Header => {
                let text = self.render_text(&block.text)?;
                out.push_str(&self.format.header(level, &text));
            }
            BlockKind::Code => {
                out.push_str(&self.format.code_block("", &block.text.plain_text()));
            }
            BlockKind::List(ListRole::Item) => {
                let (marker, rest) = match block.text.spans() {
                    [Span::Plain(marker), rest @ ..] => (marker.as_str(), rest),
                    spans => ("", spans),
                };
                let mut text = String::new();
                for span in rest {
                    self.write_span(&mut text, span)?;
                }
                out.push_str(&self.format.list_entry(marker, &text));
            }
            // The items were already written; the aggregate only closes the list.
            BlockKind::List(ListRole::Aggregate) => out.push('\n'),
        }
        Ok(())
    }

    /// Render a run of inline spans.
    pub fn render_text(&self, text: &Text) -> Result<String, RenderError> {
        let mut out = String::new();
        for span in text.spans() {
            self.write_span(&mut out, span)?;
        }
        Ok(out)
    }

    fn write_span(&self, out: &mut String, span: &Span) -> Result<(), RenderError> {
        match span {
            Span::Plain(s) => write!(out, "{}", self.format.escape(s))?,
            // Edge whitespace stays outside the markers so they still delimit.
            Span::Italic(s) => {
                let body = s.trim();
                if body.is_empty() {
                    out.push_str(s);
                } else {
                    let lead = &s[..s.len() - s.trim_start().len()];
                    let trail = &s[s.trim_end().len()..];
                    let italic = self.format.italic(&self.format.escape(body));
                    write!(out, "{}{}{}", lead, italic, trail)?;
                }
            }
            Span::Link { text, url } => {
                let inner = self.render_text(text)?;
                write!(out, "{}", self.format.link(&inner, url))?;
            }
            Span::CrossRef {
                text,
                kind: Some(_),
                path,
                anchor,
            } => {
                let inner = self.render_text(text)?;
                write!(out, "{}", self.format.doc_link(&inner, path, anchor))?;
            }
            // Unresolved: inert text.
            Span::CrossRef { text, kind: None, .. } => {
                let inner = self.render_text(text)?;
                out.push_str(&inner);
            }
        }
        Ok(())
    }
}
