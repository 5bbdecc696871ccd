//! Line-oriented reader for the serialized document form.
//!
//! One element per line: an opening tag, optional inline text and optionally
//! the matching closing tag. Lines that cannot be read are skipped, the
//! result is always a complete tree.

use regex::Regex;
use tracing::{debug, instrument, trace, warn};

use crate::domain::element::{Element, ElementKind, NodeId};
use crate::domain::tree::DocumentTree;

/// Rebuilds a [`DocumentTree`] from text written by the nested renderer.
pub struct DocumentParser {
    id_pattern: Regex,
}

impl Default for DocumentParser {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentParser {
    pub fn new() -> Self {
        Self {
            id_pattern: Regex::new(r#"(?:^|\s)id="([^"]*)""#).expect("valid id attribute pattern"),
        }
    }

    #[instrument(level = "debug", skip_all)]
    pub fn parse(&self, content: &str) -> DocumentTree {
        let mut tree = DocumentTree::new();
        // open elements; the root is never popped
        let mut stack: Vec<NodeId> = vec![tree.root()];

        for (line_no, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if !line.starts_with('<') || !line.contains('>') {
                trace!("line {}: no tag, skipped", line_no + 1);
                continue;
            }
            if line.starts_with("</") {
                if stack.len() > 1 {
                    stack.pop();
                }
                continue;
            }

            let Some(parts) = read_tag_line(line) else {
                trace!("line {}: unreadable tag, skipped", line_no + 1);
                continue;
            };
            let tag = parts.tag;
            let stays_open = !parts.closed;

            let resolved = match tag.to_ascii_lowercase().as_str() {
                "" => {
                    trace!("line {}: empty tag name, skipped", line_no + 1);
                    continue;
                }
                "html" => continue,
                "title" => {
                    tree.set_title(parts.content);
                    continue;
                }
                "head" => Some(tree.head()),
                "body" => Some(tree.body()),
                _ => None,
            };

            // head/body are already attached, they only become the open element
            if let Some(singleton) = resolved {
                if stays_open {
                    stack.push(singleton);
                }
                continue;
            }

            let mut id = self.extract_id(parts.open_tag);
            if tree.contains_id(&id) {
                warn!("line {}: duplicate id '{}' dropped", line_no + 1, id);
                id.clear();
            }
            let parent = stack.last().copied().unwrap_or_else(|| tree.root());
            let idx = tree.attach(
                Element::new(ElementKind::for_tag(tag), id, parts.content),
                parent,
                None,
            );

            let is_list = tag.eq_ignore_ascii_case("ul") || tag.eq_ignore_ascii_case("ol");
            if stays_open && !is_list {
                stack.push(idx);
            }
        }

        debug!("parsed {} elements", tree.len());
        tree
    }

    /// Value of the first `id="..."` attribute of an opening tag, empty if absent.
    fn extract_id(&self, open_tag: &str) -> String {
        self.id_pattern
            .captures(open_tag)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default()
    }
}

/// Convenience wrapper around [`DocumentParser::parse`].
pub fn parse_document(content: &str) -> DocumentTree {
    DocumentParser::new().parse(content)
}

/// Tag name: text after `<` up to the first whitespace, `>` or `/`.
fn tag_name(line: &str) -> &str {
    let rest = line.strip_prefix('<').unwrap_or(line);
    let end = rest
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(rest.len());
    &rest[..end]
}

/// One element line split into its parts.
#[derive(Debug, PartialEq, Eq)]
struct TagLine<'a> {
    tag: &'a str,
    /// Everything up to and including the first `>`
    open_tag: &'a str,
    /// Inline text, trimmed
    content: &'a str,
    /// Self-closing, or closed by `</tag>` at the end of the line
    closed: bool,
}

/// Split `<tag ...>text</tag>` into tag, opening tag, text and closed state.
///
/// Only a trailing closing tag for the line's own tag ends the element, so
/// markup-like text (`a </b> c`, `x/>`) stays content. Without it the rest of
/// the line is the content, which is how elements with children carry their
/// text.
fn read_tag_line(line: &str) -> Option<TagLine<'_>> {
    let gt = line.find('>')?;
    let (open_tag, rest) = line.split_at(gt + 1);
    let tag = tag_name(line);

    if open_tag.ends_with("/>") {
        return Some(TagLine {
            tag,
            open_tag,
            content: "",
            closed: true,
        });
    }

    let closing = format!("</{tag}>");
    let (content, closed) = match rest.len().checked_sub(closing.len()) {
        Some(at) if rest.is_char_boundary(at) && rest[at..].eq_ignore_ascii_case(&closing) => {
            (&rest[..at], true)
        }
        _ => (rest, false),
    };

    Some(TagLine {
        tag,
        open_tag,
        content: content.trim(),
        closed,
    })
}
