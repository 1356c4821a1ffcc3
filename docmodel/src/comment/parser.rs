use std::ops::Range;

use pulldown_cmark::{
    BrokenLink, CowStr, Event, LinkType, Options, Parser as CmarkParser, Tag, TagEnd,
};

use crate::comment::link::parse_doc_link;
use crate::comment::{Comment, Inline, Item, LinkLookup, List, Node};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Segment raw comment text into block and inline nodes.
///
/// Bracketed text with no link definition (`[Name]`, `[text][pkg.Name]`)
/// becomes a doc link when `lookup` knows the name it refers to, and stays
/// literal text otherwise. Parsing never fails: anything unrecognized is
/// dropped or kept as plain text.
pub fn parse_comment<'a>(source: &'a str, lookup: &dyn LinkLookup) -> Comment {
    let options = Options::ENABLE_STRIKETHROUGH;
    let callback = |link: BrokenLink<'a>| -> Option<(CowStr<'a>, CowStr<'a>)> {
        parse_doc_link(&link.reference, lookup)
            .map(|_| (link.reference.clone(), CowStr::Borrowed("")))
    };
    let parser = CmarkParser::new_with_broken_link_callback(source, options, Some(callback));
    let events: Vec<(Event<'a>, Range<usize>)> = parser.into_offset_iter().collect();

    let mut state = ParseState::new(source, lookup);
    state.process_events(&events);
    log::debug!("parsed comment into {} block node(s)", state.nodes.len());
    Comment {
        content: state.nodes,
    }
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

struct ParseState<'a, 'l> {
    source: &'a str,
    lookup: &'l dyn LinkLookup,
    nodes: Vec<Node>,
}

impl<'a, 'l> ParseState<'a, 'l> {
    fn new(source: &'a str, lookup: &'l dyn LinkLookup) -> Self {
        ParseState {
            source,
            lookup,
            nodes: Vec::new(),
        }
    }

    fn process_events(&mut self, events: &[(Event<'_>, Range<usize>)]) {
        let mut i = 0;

        while i < events.len() {
            let (ref ev, ref range) = events[i];

            match ev {
                Event::Start(Tag::Paragraph) => {
                    i += 1;
                    let inlines =
                        self.collect_inlines(events, &mut i, &|e| matches!(e, TagEnd::Paragraph));
                    self.nodes.push(Node::Paragraph(inlines));
                }

                Event::Start(Tag::Heading { .. }) => {
                    i += 1;
                    let inlines =
                        self.collect_inlines(events, &mut i, &|e| matches!(e, TagEnd::Heading(_)));
                    self.nodes.push(Node::Heading(inlines));
                }

                Event::Start(Tag::CodeBlock(_)) => {
                    i += 1;
                    let code = collect_text_until(events, &mut i, |e| {
                        matches!(e, TagEnd::CodeBlock)
                    });
                    self.nodes.push(Node::Code(code));
                }

                Event::Start(Tag::List(start)) => {
                    let force_blank_before = blank_line_before(self.source, range.start);
                    i += 1;
                    let mut list = self.collect_list(events, &mut i, *start);
                    list.force_blank_before = force_blank_before;
                    self.nodes.push(Node::List(list));
                }

                Event::Start(Tag::HtmlBlock) => {
                    i += 1;
                    let html = collect_text_until(events, &mut i, |e| {
                        matches!(e, TagEnd::HtmlBlock)
                    });
                    self.nodes.push(Node::Html(html));
                }

                Event::Rule => {
                    self.nodes.push(Node::Rule);
                    i += 1;
                }

                // Block quotes have no counterpart in comment syntax; their
                // paragraphs are taken as ordinary paragraphs.
                _ => {
                    i += 1;
                }
            }
        }
    }

    /// Collect the items of a list until its End tag.
    fn collect_list(
        &self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
        start: Option<u64>,
    ) -> List {
        let mut list = List::default();

        while *i < events.len() {
            let (ref ev, _) = events[*i];
            match ev {
                Event::End(TagEnd::List(_)) => {
                    *i += 1;
                    break;
                }
                Event::Start(Tag::Item) => {
                    *i += 1;
                    let number = start
                        .map(|n| (n + list.items.len() as u64).to_string())
                        .unwrap_or_default();
                    let (content, loose) = self.collect_item(events, i);
                    list.force_blank_between |= loose;
                    list.items.push(Item { number, content });
                }
                _ => {
                    *i += 1;
                }
            }
        }

        list
    }

    /// Collect the paragraphs of one list item until End(Item).
    /// Returns whether the item was loose (its text wrapped in paragraphs).
    fn collect_item(
        &self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
    ) -> (Vec<Vec<Inline>>, bool) {
        let mut content = Vec::new();
        let mut current = Vec::new();
        let mut loose = false;

        while *i < events.len() {
            let (ref ev, _) = events[*i];
            match ev {
                Event::End(TagEnd::Item) => {
                    *i += 1;
                    break;
                }
                Event::Start(Tag::Paragraph) => {
                    loose = true;
                    flush_paragraph(&mut content, &mut current);
                    *i += 1;
                    content.push(self.collect_inlines(events, i, &|e| {
                        matches!(e, TagEnd::Paragraph)
                    }));
                }
                Event::Start(Tag::Heading { .. }) => {
                    flush_paragraph(&mut content, &mut current);
                    *i += 1;
                    content.push(self.collect_inlines(events, i, &|e| {
                        matches!(e, TagEnd::Heading(_))
                    }));
                }
                // A nested list continues the item's last paragraph, one line
                // per nested paragraph. It never adds paragraphs of its own.
                Event::Start(Tag::List(start)) => {
                    *i += 1;
                    let nested = self.collect_list(events, i, *start);
                    let target = match content.last_mut() {
                        Some(last) if current.is_empty() => last,
                        _ => &mut current,
                    };
                    for paragraph in nested.items.into_iter().flat_map(|item| item.content) {
                        if !target.is_empty() {
                            push_plain(target, "\n");
                        }
                        for inline in paragraph {
                            match inline {
                                Inline::Plain(s) => push_plain(target, &s),
                                other => target.push(other),
                            }
                        }
                    }
                }
                Event::Start(Tag::CodeBlock(_)) => {
                    flush_paragraph(&mut content, &mut current);
                    *i += 1;
                    let code = collect_text_until(events, i, |e| matches!(e, TagEnd::CodeBlock));
                    content.push(vec![Inline::Plain(code)]);
                }
                Event::Start(Tag::BlockQuote(_)) | Event::End(TagEnd::BlockQuote(_)) => {
                    *i += 1;
                }
                _ => self.push_inline(events, i, &mut current),
            }
        }

        flush_paragraph(&mut content, &mut current);
        (content, loose)
    }

    /// Collect inline nodes until a matching End tag.
    fn collect_inlines(
        &self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
        is_end: &dyn Fn(&TagEnd) -> bool,
    ) -> Vec<Inline> {
        let mut inlines = Vec::new();

        while *i < events.len() {
            if let Event::End(tag_end) = &events[*i].0 {
                if is_end(tag_end) {
                    *i += 1;
                    break;
                }
            }
            self.push_inline(events, i, &mut inlines);
        }

        inlines
    }

    /// Consume the inline event at `*i` (and, for links, everything up to
    /// its End tag), appending the converted node to `out`.
    fn push_inline(
        &self,
        events: &[(Event<'_>, Range<usize>)],
        i: &mut usize,
        out: &mut Vec<Inline>,
    ) {
        let (ref ev, _) = events[*i];
        *i += 1;

        match ev {
            Event::Text(s) | Event::Code(s) => push_plain(out, s),
            Event::SoftBreak | Event::HardBreak => push_plain(out, "\n"),
            Event::InlineHtml(s) | Event::Html(s) => out.push(Inline::Html(s.to_string())),
            Event::Start(Tag::Emphasis) => {
                let inner = self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Emphasis));
                for inline in italicize(inner) {
                    match inline {
                        Inline::Italic(s) => push_italic(out, &s),
                        other => out.push(other),
                    }
                }
            }
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                ..
            }) => {
                let text = self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Link));
                if is_unknown_reference(*link_type) {
                    match parse_doc_link(dest_url, self.lookup) {
                        Some(link) => out.push(Inline::DocLink(link.with_text(text))),
                        None => out.extend(text),
                    }
                } else {
                    out.push(Inline::Link {
                        text,
                        url: dest_url.to_string(),
                    });
                }
            }
            Event::Start(Tag::Image { dest_url, .. }) => {
                let text = self.collect_inlines(events, i, &|e| matches!(e, TagEnd::Image));
                out.push(Inline::Link {
                    text,
                    url: dest_url.to_string(),
                });
            }
            // Strong and strikethrough markers are dropped; their content
            // flows into the surrounding run.
            _ => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Links produced by the broken-link callback, i.e. doc link candidates.
fn is_unknown_reference(link_type: LinkType) -> bool {
    matches!(
        link_type,
        LinkType::ShortcutUnknown | LinkType::CollapsedUnknown | LinkType::ReferenceUnknown
    )
}

/// Append plain text, merging with a preceding plain run.
fn push_plain(out: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Plain(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Inline::Plain(text.to_string()));
    }
}

fn flush_paragraph(content: &mut Vec<Vec<Inline>>, current: &mut Vec<Inline>) {
    if !current.is_empty() {
        content.push(std::mem::take(current));
    }
}

/// Append italic text, merging with a preceding italic run.
fn push_italic(out: &mut Vec<Inline>, text: &str) {
    if let Some(Inline::Italic(last)) = out.last_mut() {
        last.push_str(text);
    } else {
        out.push(Inline::Italic(text.to_string()));
    }
}

/// Emphasize a run of inline nodes. Text becomes italic; links keep their
/// targets and have their display text emphasized instead.
fn italicize(inlines: Vec<Inline>) -> Vec<Inline> {
    let mut out = Vec::with_capacity(inlines.len());
    for inline in inlines {
        match inline {
            Inline::Plain(s) | Inline::Italic(s) => push_italic(&mut out, &s),
            Inline::Link { text, url } => out.push(Inline::Link {
                text: italicize(text),
                url,
            }),
            Inline::DocLink(mut link) => {
                let text = italicize(std::mem::take(&mut link.text));
                out.push(Inline::DocLink(link.with_text(text)));
            }
            Inline::Html(s) => out.push(Inline::Html(s)),
        }
    }
    out
}

/// Collect all text content until a matching End tag.
fn collect_text_until(
    events: &[(Event<'_>, Range<usize>)],
    i: &mut usize,
    is_end: impl Fn(&TagEnd) -> bool,
) -> String {
    let mut text = String::new();
    while *i < events.len() {
        let (ref ev, _) = events[*i];
        match ev {
            Event::End(tag_end) if is_end(tag_end) => {
                *i += 1;
                break;
            }
            Event::Text(s) | Event::Html(s) => {
                text.push_str(s);
                *i += 1;
            }
            _ => {
                *i += 1;
            }
        }
    }
    text
}

/// Whether the line above the one containing `offset` is blank.
/// A list at the very start of the comment has nothing before it.
fn blank_line_before(source: &str, offset: usize) -> bool {
    let before = &source[..offset.min(source.len())];
    if before.trim().is_empty() {
        return false;
    }
    let mut lines = before.rsplit('\n');
    // The (partial) line the list starts on.
    lines.next();
    lines.next().is_some_and(|line| line.trim().is_empty())
}
