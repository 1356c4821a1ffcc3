use crate::comment::{Comment, Inline, List, Node};
use crate::config::Config;
use crate::document::text::{Span, Text};
use crate::document::{Block, BlockKind, Document, ListRole};
use crate::package::{Package, PackageSet};
use crate::resolve::Resolver;

/// Convert a parsed comment of `current` into its block model.
///
/// Every doc link is resolved against `packages`; links that resolve to
/// nothing still produce a cross-reference span, just an inert one.
pub fn build_document(
    config: &Config,
    current: &Package,
    packages: &PackageSet,
    comment: &Comment,
) -> Document {
    let resolver = Resolver::new(current, packages, &config.module_root);
    let mut builder = DocBuilder::new(resolver);
    for node in &comment.content {
        builder.node(node);
    }
    log::debug!(
        "built {} block(s) for a comment of {}",
        builder.blocks.len(),
        current.import_path
    );
    Document::new(config.level, builder.blocks)
}

struct DocBuilder<'a> {
    resolver: Resolver<'a>,
    /// Key of the next emitted block.
    next_key: usize,
    blocks: Vec<Block>,
}

impl<'a> DocBuilder<'a> {
    fn new(resolver: Resolver<'a>) -> Self {
        DocBuilder {
            resolver,
            next_key: 0,
            blocks: Vec::new(),
        }
    }

    fn emit(&mut self, kind: BlockKind, text: Text) {
        self.blocks.push(Block {
            key: self.next_key,
            kind,
            text,
        });
        self.next_key += 1;
    }

    fn node(&mut self, node: &Node) {
        match node {
            Node::Code(code) => {
                self.emit(BlockKind::Code, Text::new(vec![Span::plain(code.as_str())]));
            }
            Node::Heading(inlines) => {
                let text = self.inlines(inlines);
                self.emit(BlockKind::Header, text);
            }
            Node::List(list) => self.list(list),
            Node::Paragraph(inlines) => {
                let text = self.inlines(inlines);
                self.emit(BlockKind::Paragraph, text);
            }
            Node::Html(_) | Node::Rule => {
                log::debug!("skipping comment node without a block form: {:?}", node);
            }
        }
    }

    /// One block per item, then the aggregate of the whole list. Paragraphs
    /// of one item are separated by a blank line.
    fn list(&mut self, list: &List) {
        let mut aggregate = Vec::new();
        if list.blank_before() {
            aggregate.push(Span::plain("\n"));
        }

        for item in &list.items {
            let mut spans = vec![Span::plain(item.number.as_str())];
            for (n, paragraph) in item.content.iter().enumerate() {
                if n > 0 {
                    spans.push(Span::plain("\n\n"));
                }
                spans.extend(self.inlines(paragraph).spans);
            }
            aggregate.extend(spans.iter().cloned());
            self.emit(BlockKind::List(ListRole::Item), Text::new(spans));
        }

        self.emit(BlockKind::List(ListRole::Aggregate), Text::new(aggregate));
    }

    fn inlines(&self, inlines: &[Inline]) -> Text {
        let mut spans = Vec::with_capacity(inlines.len());
        for inline in inlines {
            match inline {
                Inline::Plain(s) => spans.push(Span::plain(s.as_str())),
                Inline::Italic(s) => spans.push(Span::italic(s.as_str())),
                Inline::Link { text, url } => spans.push(Span::Link {
                    text: self.inlines(text),
                    url: url.clone(),
                }),
                Inline::DocLink(link) => {
                    let resolution = self.resolver.resolve(link);
                    spans.push(Span::CrossRef {
                        text: self.inlines(&link.text),
                        kind: resolution.kind,
                        path: resolution.path,
                        anchor: resolution.anchor,
                    });
                }
                Inline::Html(_) => {
                    log::trace!("skipping inline html");
                }
            }
        }
        Text::new(spans)
    }
}
