pub mod text;

use crate::builder::build_document;
use crate::comment::parser::parse_comment;
use crate::config::Config;
use crate::package::{Package, PackageSet, Scope};

use self::text::Text;

/// A converted documentation comment: the ordered blocks plus the heading
/// level the renderer should use for headers within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    level: usize,
    blocks: Vec<Block>,
}

/// A block-level element of a documentation comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Emission order within the document. Strictly increasing.
    pub key: usize,
    pub kind: BlockKind,
    pub text: Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Code,
    Header,
    List(ListRole),
    Paragraph,
}

/// Which of the blocks produced for a list this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListRole {
    /// A single item: its marker as a leading plain span, then its content.
    Item,
    /// Emitted once after the items: every item's marker and content
    /// flattened into one text.
    Aggregate,
}

impl BlockKind {
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Code => "code",
            BlockKind::Header => "header",
            BlockKind::List(_) => "list",
            BlockKind::Paragraph => "paragraph",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, BlockKind::List(_))
    }
}

impl Document {
    pub fn new(level: usize, blocks: Vec<Block>) -> Self {
        Document { level, blocks }
    }

    /// Parse raw comment text and convert it in one step.
    pub fn from_text(
        config: &Config,
        current: &Package,
        packages: &PackageSet,
        text: &str,
    ) -> Self {
        let scope = Scope::new(current, packages);
        let comment = parse_comment(text, &scope);
        build_document(config, current, packages, &comment)
    }

    /// Default level at which headers inside the documentation are rendered.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// First sentence of the first paragraph, with whitespace collapsed.
    pub fn summary(&self) -> Option<String> {
        let paragraph = self
            .blocks
            .iter()
            .find(|b| b.kind == BlockKind::Paragraph)?;
        let flat = paragraph
            .text
            .plain_text()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if flat.is_empty() {
            return None;
        }
        let end = flat
            .match_indices('.')
            .map(|(i, _)| i + 1)
            .find(|&i| flat[i..].is_empty() || flat[i..].starts_with(' '))
            .unwrap_or(flat.len());
        Some(flat[..end].to_string())
    }
}
