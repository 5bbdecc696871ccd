//! Element kinds and the per-node payload stored in the document arena.

use std::fmt;

use generational_arena::Index;

/// Handle of a node inside a [`DocumentTree`](crate::domain::DocumentTree).
pub type NodeId = Index;

/// Tags that form the fixed document skeleton.
pub const RESERVED_TAGS: [&str; 4] = ["html", "head", "body", "title"];

/// Closed set of element kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Html,
    Head,
    Body,
    Title,
    Div,
    Paragraph,
    /// `h1`..`h3`, level taken from the digit suffix
    Header(u8),
    /// Any tag without specialized construction; keeps the literal tag
    Generic(String),
}

impl ElementKind {
    /// Tag table used for new and parsed elements.
    ///
    /// Matching is case-insensitive. `html`, `head` and `body` are not in the
    /// table: they only exist as singletons of a [`DocumentTree`].
    ///
    /// [`DocumentTree`]: crate::domain::DocumentTree
    pub fn for_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "div" => ElementKind::Div,
            "p" => ElementKind::Paragraph,
            "h1" => ElementKind::Header(1),
            "h2" => ElementKind::Header(2),
            "h3" => ElementKind::Header(3),
            "title" => ElementKind::Title,
            _ => ElementKind::Generic(tag.to_string()),
        }
    }

    pub fn tag(&self) -> String {
        match self {
            ElementKind::Html => "html".into(),
            ElementKind::Head => "head".into(),
            ElementKind::Body => "body".into(),
            ElementKind::Title => "title".into(),
            ElementKind::Div => "div".into(),
            ElementKind::Paragraph => "p".into(),
            ElementKind::Header(level) => format!("h{level}"),
            ElementKind::Generic(tag) => tag.clone(),
        }
    }

    /// Reserved elements are never rendered with an `id` attribute.
    pub fn is_reserved(&self) -> bool {
        match self {
            ElementKind::Html | ElementKind::Head | ElementKind::Body | ElementKind::Title => true,
            ElementKind::Generic(tag) => is_reserved_tag(tag),
            _ => false,
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

pub fn is_reserved_tag(tag: &str) -> bool {
    RESERVED_TAGS
        .iter()
        .any(|reserved| reserved.eq_ignore_ascii_case(tag))
}

/// Data payload of one document node.
#[derive(Debug, Clone)]
pub struct Element {
    pub kind: ElementKind,
    /// Empty means anonymous: not addressable by id
    pub id: String,
    pub content: String,
    /// Set by the spell checker; stale until it runs again
    pub spell_error: bool,
    /// Handle of the parent node, None for the root
    pub parent: Option<NodeId>,
    /// Child handles in document order
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn new(kind: ElementKind, id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
            content: content.into(),
            spell_error: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn tag(&self) -> String {
        self.kind.tag()
    }

    pub fn is_reserved(&self) -> bool {
        self.kind.is_reserved()
    }

    /// Label used by the decorated tree view.
    pub fn label(&self, show_id: bool) -> String {
        if show_id && !self.is_reserved() && !self.id.is_empty() {
            format!("{}#{}", self.tag(), self.id)
        } else {
            self.tag()
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label(true))
    }
}
