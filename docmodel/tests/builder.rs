use docmodel::comment::{Comment, DocLink, Inline, Item, List, Node};
use docmodel::{
    Block, BlockKind, Config, Document, ListRole, Package, PackageSet, Span, SymbolKind, Text,
    build_document,
};

fn current() -> Package {
    Package::new("example.com/mod/cur")
        .with_type("T")
        .with_const(["Limit"])
}

fn packages() -> PackageSet {
    PackageSet::new(vec![
        current(),
        Package::new("example.com/mod/pkg").with_func("Recv", "Name"),
    ])
}

fn config() -> Config {
    Config::new(3, "example.com/mod/")
}

fn build(content: Vec<Node>) -> Document {
    build_document(&config(), &current(), &packages(), &Comment { content })
}

fn plain(s: &str) -> Inline {
    Inline::Plain(s.to_string())
}

fn kinds(doc: &Document) -> Vec<BlockKind> {
    doc.blocks().iter().map(|b| b.kind).collect()
}

#[test]
fn blocks_follow_source_order() {
    let doc = build(vec![
        Node::Paragraph(vec![plain("intro")]),
        Node::Heading(vec![plain("Usage")]),
        Node::Code("x := 1\n".to_string()),
        Node::Paragraph(vec![plain("outro")]),
    ]);

    assert_eq!(doc.level(), 3);
    assert_eq!(
        kinds(&doc),
        vec![
            BlockKind::Paragraph,
            BlockKind::Header,
            BlockKind::Code,
            BlockKind::Paragraph
        ]
    );
    let keys: Vec<usize> = doc.blocks().iter().map(|b| b.key).collect();
    assert_eq!(keys, vec![0, 1, 2, 3]);
    assert_eq!(doc.blocks()[3].text.plain_text(), "outro");
}

#[test]
fn code_is_verbatim() {
    let code = "  indented\n\ttabbed  \n";
    let doc = build(vec![Node::Code(code.to_string())]);
    assert_eq!(
        doc.blocks(),
        &[Block {
            key: 0,
            kind: BlockKind::Code,
            text: Text::new(vec![Span::plain(code)]),
        }]
    );
}

#[test]
fn list_items_then_aggregate() {
    let list = List {
        items: vec![
            Item {
                number: "1".to_string(),
                content: vec![vec![plain("first")]],
            },
            Item {
                number: "2".to_string(),
                content: vec![vec![plain("second")]],
            },
        ],
        force_blank_before: false,
        force_blank_between: false,
    };
    let doc = build(vec![Node::List(list), Node::Paragraph(vec![plain("after")])]);

    assert_eq!(
        kinds(&doc),
        vec![
            BlockKind::List(ListRole::Item),
            BlockKind::List(ListRole::Item),
            BlockKind::List(ListRole::Aggregate),
            BlockKind::Paragraph,
        ]
    );
    let blocks = doc.blocks();
    assert_eq!(
        blocks[0].text.spans(),
        &[Span::plain("1"), Span::plain("first")]
    );
    assert_eq!(
        blocks[1].text.spans(),
        &[Span::plain("2"), Span::plain("second")]
    );
    assert_eq!(
        blocks[2].text.spans(),
        &[
            Span::plain("1"),
            Span::plain("first"),
            Span::plain("2"),
            Span::plain("second")
        ]
    );
    assert!(blocks.windows(2).all(|w| w[0].key < w[1].key));
}

#[test]
fn aggregate_blank_line_marker() {
    let item = Item {
        number: String::new(),
        content: vec![vec![plain("bullet")]],
    };
    let spaced = List {
        items: vec![item.clone()],
        force_blank_before: true,
        force_blank_between: false,
    };
    let doc = build(vec![Node::List(spaced)]);
    assert_eq!(
        doc.blocks()[1].text.spans(),
        &[Span::plain("\n"), Span::plain(""), Span::plain("bullet")]
    );
    // The item block itself never carries the marker.
    assert_eq!(
        doc.blocks()[0].text.spans(),
        &[Span::plain(""), Span::plain("bullet")]
    );

    let tight = List {
        items: vec![item],
        force_blank_before: false,
        force_blank_between: false,
    };
    let doc = build(vec![Node::List(tight)]);
    assert_eq!(
        doc.blocks()[1].text.spans(),
        &[Span::plain(""), Span::plain("bullet")]
    );
}

#[test]
fn multi_paragraph_item_implies_blank_before() {
    let list = List {
        items: vec![Item {
            number: "1".to_string(),
            content: vec![vec![plain("one")], vec![plain("two")]],
        }],
        force_blank_before: false,
        force_blank_between: false,
    };
    assert!(list.blank_between());
    let doc = build(vec![Node::List(list)]);
    assert_eq!(
        doc.blocks()[0].text.spans(),
        &[
            Span::plain("1"),
            Span::plain("one"),
            Span::plain("\n\n"),
            Span::plain("two"),
        ]
    );
    assert_eq!(doc.blocks()[1].text.spans()[0], Span::plain("\n"));
}

#[test]
fn doc_links_become_cross_references() {
    let doc = build(vec![Node::Paragraph(vec![
        plain("See "),
        Inline::DocLink(DocLink::new("", "", "T").with_text(vec![plain("T")])),
        plain(" and "),
        Inline::DocLink(
            DocLink::new("example.com/mod/pkg", "Recv", "Name")
                .with_text(vec![plain("pkg.Recv.Name")]),
        ),
    ])]);

    let spans = doc.blocks()[0].text.spans();
    assert_eq!(
        spans[1],
        Span::CrossRef {
            text: Text::new(vec![Span::plain("T")]),
            kind: Some(SymbolKind::Type),
            path: String::new(),
            anchor: "type T".to_string(),
        }
    );
    assert_eq!(
        spans[3],
        Span::CrossRef {
            text: Text::new(vec![Span::plain("pkg.Recv.Name")]),
            kind: Some(SymbolKind::Func),
            path: "pkg".to_string(),
            anchor: "func Recv Name".to_string(),
        }
    );
}

#[test]
fn unresolved_link_keeps_its_text() {
    let doc = build(vec![Node::Paragraph(vec![Inline::DocLink(
        DocLink::new("", "", "Gone").with_text(vec![Inline::Italic("gone".to_string())]),
    )])]);

    let span = &doc.blocks()[0].text.spans()[0];
    assert!(!span.is_resolved());
    assert_eq!(
        span,
        &Span::CrossRef {
            text: Text::new(vec![Span::italic("gone")]),
            kind: None,
            path: String::new(),
            anchor: String::new(),
        }
    );
    assert_eq!(doc.blocks()[0].text.plain_text(), "gone");
}

#[test]
fn hyperlink_preserves_nested_italic() {
    let doc = build(vec![Node::Paragraph(vec![Inline::Link {
        text: vec![plain("the "), Inline::Italic("manual".to_string())],
        url: "https://example.com/manual".to_string(),
    }])]);

    let Span::Link { text, url } = &doc.blocks()[0].text.spans()[0] else {
        panic!("expected a link span");
    };
    assert_eq!(url, "https://example.com/manual");
    assert_eq!(text.spans(), &[Span::plain("the "), Span::italic("manual")]);
}

#[test]
fn unsupported_nodes_are_skipped() {
    let doc = build(vec![
        Node::Html("<div>x</div>".to_string()),
        Node::Paragraph(vec![plain("a"), Inline::Html("<br>".to_string()), plain("b")]),
        Node::Rule,
    ]);
    assert_eq!(kinds(&doc), vec![BlockKind::Paragraph]);
    assert_eq!(doc.blocks()[0].key, 0);
    assert_eq!(
        doc.blocks()[0].text.spans(),
        &[Span::plain("a"), Span::plain("b")]
    );
}

#[test]
fn rebuilding_is_identical() {
    let content = vec![
        Node::List(List {
            items: vec![Item {
                number: String::new(),
                content: vec![vec![plain("x")]],
            }],
            force_blank_before: true,
            force_blank_between: false,
        }),
        Node::Paragraph(vec![Inline::DocLink(
            DocLink::new("", "", "Limit").with_text(vec![plain("Limit")]),
        )]),
    ];
    let first = build(content.clone());
    let second = build(content);
    assert_eq!(first, second);
    assert_eq!(first.blocks()[0].key, 0);
}

#[test]
fn documents_build_in_parallel() {
    let cur = current();
    let set = packages();
    let cfg = config();
    let comment = Comment {
        content: vec![Node::Paragraph(vec![Inline::DocLink(
            DocLink::new("example.com/mod/pkg", "Recv", "Name").with_text(vec![plain("Name")]),
        )])],
    };

    let docs: Vec<Document> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| build_document(&cfg, &cur, &set, &comment)))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("builder thread panicked"))
            .collect()
    });

    assert!(docs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn from_text_and_summary() {
    let doc = Document::from_text(
        &config(),
        &current(),
        &packages(),
        "Package cur wraps [T]. It also\nexports more.\n\n- one\n- two\n",
    );
    assert_eq!(
        kinds(&doc),
        vec![
            BlockKind::Paragraph,
            BlockKind::List(ListRole::Item),
            BlockKind::List(ListRole::Item),
            BlockKind::List(ListRole::Aggregate),
        ]
    );
    assert_eq!(doc.summary().as_deref(), Some("Package cur wraps T."));
}

#[test]
fn summary_without_sentence_end() {
    let doc = build(vec![Node::Paragraph(vec![plain("v1.2 is\nthe version")])]);
    assert_eq!(doc.summary().as_deref(), Some("v1.2 is the version"));
    assert_eq!(build(vec![]).summary(), None);
}

#[test]
fn doc_link_inside_emphasis_resolves() {
    let doc = Document::from_text(
        &config(),
        &current(),
        &packages(),
        "See *the [T] type* here.\n",
    );
    assert_eq!(
        doc.blocks()[0].text.spans(),
        &[
            Span::plain("See "),
            Span::italic("the "),
            Span::CrossRef {
                text: Text::new(vec![Span::italic("T")]),
                kind: Some(SymbolKind::Type),
                path: String::new(),
                anchor: "type T".to_string(),
            },
            Span::italic(" type"),
            Span::plain(" here."),
        ]
    );
}

#[test]
fn nested_list_adds_no_blank_marker() {
    let doc = Document::from_text(&config(), &current(), &packages(), "Intro\n- a\n  - b\n");
    assert_eq!(
        kinds(&doc),
        vec![
            BlockKind::Paragraph,
            BlockKind::List(ListRole::Item),
            BlockKind::List(ListRole::Aggregate),
        ]
    );
    assert_eq!(
        doc.blocks()[2].text.spans(),
        &[Span::plain(""), Span::plain("a\nb")]
    );
}

#[test]
fn item_paragraphs_are_separated() {
    let doc = Document::from_text(
        &config(),
        &current(),
        &packages(),
        "- first para\n\n  second para\n- next\n",
    );
    assert_eq!(
        doc.blocks()[0].text.spans(),
        &[
            Span::plain(""),
            Span::plain("first para"),
            Span::plain("\n\n"),
            Span::plain("second para"),
        ]
    );
}
