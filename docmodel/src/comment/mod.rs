pub mod link;
pub mod parser;

pub use link::parse_doc_link;
pub use parser::parse_comment;

/// A parsed documentation comment: block-level nodes in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub content: Vec<Node>,
}

/// A block-level node of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Preformatted code, verbatim including its trailing newline.
    Code(String),
    Heading(Vec<Inline>),
    List(List),
    Paragraph(Vec<Inline>),
    /// Raw HTML block. Carried through parsing but not part of the block model.
    Html(String),
    /// Thematic break.
    Rule,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    pub items: Vec<Item>,
    /// The list was preceded by a blank line in the source.
    pub force_blank_before: bool,
    /// Items were separated by blank lines in the source.
    pub force_blank_between: bool,
}

impl List {
    /// Whether items should be separated by blank lines: forced, or some
    /// item holds more than one paragraph.
    pub fn blank_between(&self) -> bool {
        self.force_blank_between || self.items.iter().any(|item| item.content.len() > 1)
    }

    /// Whether a blank line belongs before the list.
    pub fn blank_before(&self) -> bool {
        self.force_blank_before || self.blank_between()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Item {
    /// Decimal item number for numbered lists, empty for bullets.
    pub number: String,
    /// Paragraphs of the item.
    pub content: Vec<Vec<Inline>>,
}

/// An inline node of a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Plain(String),
    Italic(String),
    Link { text: Vec<Inline>, url: String },
    DocLink(DocLink),
    /// Raw inline HTML.
    Html(String),
}

/// A link to a documented symbol.
///
/// An empty `import_path` refers to the package the comment belongs to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocLink {
    pub text: Vec<Inline>,
    pub import_path: String,
    pub recv: String,
    pub name: String,
}

impl DocLink {
    pub fn new(
        import_path: impl Into<String>,
        recv: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        DocLink {
            text: Vec::new(),
            import_path: import_path.into(),
            recv: recv.into(),
            name: name.into(),
        }
    }

    pub fn with_text(mut self, text: Vec<Inline>) -> Self {
        self.text = text;
        self
    }
}

/// Names known while parsing a comment, used to decide whether bracketed
/// text is a doc link.
pub trait LinkLookup {
    /// Import path of the package known by this short name.
    fn lookup_package(&self, name: &str) -> Option<&str>;

    /// Whether the current package declares `recv.name` (or `name` when
    /// `recv` is empty).
    fn lookup_sym(&self, recv: &str, name: &str) -> bool;
}
