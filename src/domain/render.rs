//! Text views of a document tree.
//!
//! Both views walk the tree depth-first in document order and never modify it.

use termtree::Tree;

use crate::domain::element::NodeId;
use crate::domain::tree::DocumentTree;

/// Prefix for elements flagged by the spell checker.
pub const ERROR_MARKER: &str = "[X] ";

/// Default indent width of the nested (persisted) form.
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Options of the decorated tree view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoratedOptions {
    /// Append `#id` to labels of non-reserved elements
    pub show_id: bool,
    /// Prefix flagged elements and their text with [`ERROR_MARKER`]
    pub mark_errors: bool,
    /// Draw branch connectors; plain indentation otherwise
    pub connectors: bool,
    /// Spaces per level when `connectors` is off
    pub indent_width: usize,
}

impl Default for DecoratedOptions {
    fn default() -> Self {
        Self {
            show_id: true,
            mark_errors: false,
            connectors: true,
            indent_width: 2,
        }
    }
}

/// Serialized form: one element per line, children indented one level deeper.
pub fn render_nested(tree: &DocumentTree, indent_width: usize) -> String {
    let mut out = String::new();
    write_nested(tree, tree.root(), 0, indent_width, &mut out);
    out
}

fn write_nested(tree: &DocumentTree, idx: NodeId, level: usize, width: usize, out: &mut String) {
    let Some(element) = tree.get_node(idx) else {
        return;
    };
    let indent = " ".repeat(level * width);
    let tag = element.tag();

    out.push_str(&indent);
    out.push('<');
    out.push_str(&tag);
    if !element.is_reserved() && !element.id.is_empty() {
        out.push_str(&format!(" id=\"{}\"", element.id));
    }
    out.push('>');
    out.push_str(&element.content);

    if element.children.is_empty() {
        out.push_str(&format!("</{tag}>"));
        return;
    }

    out.push('\n');
    for &child in &element.children {
        write_nested(tree, child, level + 1, width, out);
        out.push('\n');
    }
    out.push_str(&format!("{indent}</{tag}>"));
}

/// Inspection view: element labels with optional ids, text as extra leaves.
pub fn render_decorated(tree: &DocumentTree, options: &DecoratedOptions) -> String {
    if options.connectors {
        to_termtree(tree, tree.root(), options).to_string()
    } else {
        let mut out = String::new();
        write_indented(tree, tree.root(), 0, options, &mut out);
        out
    }
}

/// Builds the labelled tree; content comes first, before the real children.
fn to_termtree(tree: &DocumentTree, idx: NodeId, options: &DecoratedOptions) -> Tree<String> {
    let Some(element) = tree.get_node(idx) else {
        return Tree::new(String::new());
    };
    let marked = options.mark_errors && element.spell_error;

    let mut node = Tree::new(marker(marked, element.label(options.show_id)));
    if !element.content.is_empty() {
        node.push(Tree::new(marker(marked, element.content.clone())));
    }
    for &child in &element.children {
        node.push(to_termtree(tree, child, options));
    }
    node
}

fn write_indented(
    tree: &DocumentTree,
    idx: NodeId,
    level: usize,
    options: &DecoratedOptions,
    out: &mut String,
) {
    let Some(element) = tree.get_node(idx) else {
        return;
    };
    let marked = options.mark_errors && element.spell_error;
    let indent = " ".repeat(level * options.indent_width);
    out.push_str(&format!("{indent}{}\n", marker(marked, element.label(options.show_id))));

    if !element.content.is_empty() {
        let text_indent = " ".repeat((level + 1) * options.indent_width);
        out.push_str(&format!("{text_indent}{}\n", marker(marked, element.content.clone())));
    }
    for &child in &element.children {
        write_indented(tree, child, level + 1, options, out);
    }
}

fn marker(marked: bool, text: String) -> String {
    if marked {
        format!("{ERROR_MARKER}{text}")
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DocumentTree {
        let mut tree = DocumentTree::new();
        tree.set_title("Demo");
        tree.append_child("div", "d1", "body", "hello").unwrap();
        tree.append_child("p", "p1", "d1", "").unwrap();
        tree
    }

    #[test]
    fn given_tree_when_rendering_nested_then_matches_layout() {
        let expected = "\
<html>
  <head>
    <title>Demo</title>
  </head>
  <body>
    <div id=\"d1\">hello
      <p id=\"p1\"></p>
    </div>
  </body>
</html>";
        assert_eq!(render_nested(&sample(), 2), expected);
    }

    #[test]
    fn given_tree_when_rendering_with_connectors_then_draws_branches() {
        let expected = "\
html
├── head
│   └── title
│       └── Demo
└── body
    └── div#d1
        ├── hello
        └── p#p1
";
        assert_eq!(render_decorated(&sample(), &DecoratedOptions::default()), expected);
    }

    #[test]
    fn given_tree_when_rendering_indented_then_uses_fixed_width() {
        let options = DecoratedOptions {
            show_id: false,
            connectors: false,
            indent_width: 2,
            ..DecoratedOptions::default()
        };
        let expected = "\
html
  head
    title
      Demo
  body
    div
      hello
      p
";
        assert_eq!(render_decorated(&sample(), &options), expected);
    }

    #[test]
    fn given_flagged_element_when_marking_errors_then_prefixes_label_and_text() {
        let mut tree = sample();
        let d1 = tree.find_by_id("d1").unwrap();
        tree.get_node_mut(d1).unwrap().spell_error = true;

        let marked = render_decorated(
            &tree,
            &DecoratedOptions {
                mark_errors: true,
                ..DecoratedOptions::default()
            },
        );
        assert!(marked.contains("[X] div#d1"));
        assert!(marked.contains("[X] hello"));

        let unmarked = render_decorated(&tree, &DecoratedOptions::default());
        assert!(!unmarked.contains(ERROR_MARKER));
    }
}
