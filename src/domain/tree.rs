//! Arena-backed document tree.

use generational_arena::Arena;
use tracing::instrument;

use crate::domain::element::{Element, ElementKind, NodeId};

/// Id of the singleton title element.
pub const TITLE_ID: &str = "title";

/// One line of a structural outline: depth-first, document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub depth: usize,
    pub tag: String,
    pub id: String,
    pub content: String,
}

/// Document tree with an `html` root and `head`/`body`/`title` singletons.
///
/// Nodes live in a generational arena and refer to each other by handle:
/// parents own their children through `children`, `parent` is only a lookup.
/// Cloning the tree copies the arena by value, so a clone never aliases the
/// original.
#[derive(Debug, Clone)]
pub struct DocumentTree {
    arena: Arena<Element>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    title: NodeId,
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentTree {
    /// Empty document: `html` holding `head` (with an empty `title`) and `body`.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(Element::new(ElementKind::Html, "html", ""));
        let mut tree = Self {
            arena,
            root,
            head: root,
            body: root,
            title: root,
        };
        tree.head = tree.attach(Element::new(ElementKind::Head, "head", ""), root, None);
        tree.body = tree.attach(Element::new(ElementKind::Body, "body", ""), root, None);
        tree.title = tree.attach(Element::new(ElementKind::Title, TITLE_ID, ""), tree.head, None);
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn title(&self) -> NodeId {
        self.title
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&Element> {
        self.arena.get(idx)
    }

    pub fn get_node_mut(&mut self, idx: NodeId) -> Option<&mut Element> {
        self.arena.get_mut(idx)
    }

    pub fn children(&self, idx: NodeId) -> &[NodeId] {
        self.arena
            .get(idx)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, idx: NodeId) -> Option<NodeId> {
        self.arena.get(idx).and_then(|node| node.parent)
    }

    pub fn is_singleton(&self, idx: NodeId) -> bool {
        idx == self.root || idx == self.head || idx == self.body || idx == self.title
    }

    /// First node in document order carrying `id`. Empty ids never match.
    #[instrument(level = "trace", skip(self))]
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        self.iter()
            .find(|(_, element)| element.id == id)
            .map(|(idx, _)| idx)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find_by_id(id).is_some()
    }

    pub fn element_by_id(&self, id: &str) -> Option<&Element> {
        self.find_by_id(id).and_then(|idx| self.get_node(idx))
    }

    pub fn title_text(&self) -> &str {
        self.get_node(self.title)
            .map(|title| title.content.as_str())
            .unwrap_or("")
    }

    pub fn set_title(&mut self, content: impl Into<String>) {
        let title = self.title;
        if let Some(node) = self.get_node_mut(title) {
            node.content = content.into();
        }
    }

    /// Insert `element` as a child of `parent`, at `position` or last.
    ///
    /// Positions past the end append. The element's own `parent`/`children`
    /// fields are overwritten.
    #[instrument(level = "trace", skip(self, element))]
    pub(crate) fn attach(
        &mut self,
        mut element: Element,
        parent: NodeId,
        position: Option<usize>,
    ) -> NodeId {
        element.parent = Some(parent);
        element.children.clear();
        let idx = self.arena.insert(element);
        if let Some(parent_node) = self.arena.get_mut(parent) {
            let at = position
                .unwrap_or(parent_node.children.len())
                .min(parent_node.children.len());
            parent_node.children.insert(at, idx);
        }
        idx
    }

    /// Detach `idx` from its parent and drop it with all descendants.
    ///
    /// Returns the number of removed nodes. The root is never removed.
    #[instrument(level = "trace", skip(self))]
    pub(crate) fn remove_subtree(&mut self, idx: NodeId) -> usize {
        let Some(parent) = self.parent(idx) else {
            return 0;
        };
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.retain(|&child| child != idx);
        }

        let mut removed = 0;
        let mut stack = vec![idx];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.arena.remove(current) {
                stack.extend(node.children);
                removed += 1;
            }
        }
        removed
    }

    /// Independent deep copy of the whole tree.
    #[instrument(level = "trace", skip(self))]
    pub fn snapshot(&self) -> Self {
        self.clone()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Distance from the root; the root has depth 0.
    pub fn depth_of(&self, idx: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(idx);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Height of the tree counted in levels.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, idx: NodeId) -> usize {
        1 + self
            .children(idx)
            .iter()
            .map(|&child| self.calculate_depth(child))
            .max()
            .unwrap_or(0)
    }

    /// (depth, tag, id, content) of every node in document order.
    pub fn outline(&self) -> Vec<OutlineEntry> {
        self.iter()
            .map(|(idx, element)| OutlineEntry {
                depth: self.depth_of(idx),
                tag: element.tag(),
                id: element.id.clone(),
                content: element.content.clone(),
            })
            .collect()
    }

    /// Non-empty ids in document order.
    pub fn ids(&self) -> Vec<&str> {
        self.iter()
            .map(|(_, element)| element.id.as_str())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

/// Structural equality: same tags, ids and contents in the same shape.
impl PartialEq for DocumentTree {
    fn eq(&self, other: &Self) -> bool {
        self.outline() == other.outline()
    }
}

impl Eq for DocumentTree {}

/// Pre-order (document order) traversal.
pub struct TreeIterator<'a> {
    tree: &'a DocumentTree,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a DocumentTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a Element);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current, node));
            }
        }
        None
    }
}
