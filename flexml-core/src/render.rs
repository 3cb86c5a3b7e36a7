//! Rendering trees back to markup.
//!
//! `Display` gives the compact form: no added whitespace, so re-parsing it
//! reproduces the same tree as long as text nodes contain no `<`. Elements
//! without children render self-closing. No escaping is applied; attribute
//! values switch to single quotes when they contain a double quote.
//!
//! [`Node::pretty`] gives the indented form meant for humans. Its added
//! newlines and indentation become text nodes when re-parsed.

use std::fmt::{self, Display, Formatter, Write};

use crate::event::Attributes;
use crate::tree::{Document, Node, NodeKind, StreamDocument, Tree};

impl Display for Node<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_compact(f, *self)
    }
}

impl Display for Tree {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_compact(f, self.root())
    }
}

/// Top-level nodes only; the synthetic root is not rendered.
impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for child in self.children() {
            write_compact(f, child)?;
        }
        Ok(())
    }
}

/// Each top-level node followed by a newline.
impl Display for StreamDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for root in self.roots() {
            write_compact(f, root)?;
            f.write_char('\n')?;
        }
        Ok(())
    }
}

fn write_compact(f: &mut Formatter<'_>, node: Node<'_>) -> fmt::Result {
    match node.kind() {
        NodeKind::Element { name, attributes } => {
            write_start_tag(f, name, attributes)?;
            if node.first_child().is_none() {
                return f.write_str("/>");
            }
            f.write_char('>')?;
            for child in node.children() {
                write_compact(f, child)?;
            }
            write!(f, "</{name}>")
        }
        NodeKind::Text(text) => f.write_str(text),
        NodeKind::Comment(body) => write!(f, "<!--{body}-->"),
        NodeKind::ProcessingInstruction { target, data } => write_pi(f, target, data),
    }
}

fn write_start_tag(f: &mut Formatter<'_>, name: &str, attributes: &Attributes) -> fmt::Result {
    write!(f, "<{name}")?;
    for (key, value) in attributes.iter() {
        let quote = if value.contains('"') && !value.contains('\'') {
            '\''
        } else {
            '"'
        };
        write!(f, " {key}={quote}{value}{quote}")?;
    }
    Ok(())
}

fn write_pi(f: &mut Formatter<'_>, target: &str, data: &str) -> fmt::Result {
    if data.is_empty() {
        write!(f, "<?{target}?>")
    } else {
        write!(f, "<?{target} {data}?>")
    }
}

/// Indented rendering, see [`Node::pretty`].
#[derive(Clone, Copy)]
pub struct Pretty<'t> {
    node: Node<'t>,
}

impl<'t> Node<'t> {
    /// Indented rendering: two spaces per level, child elements on their
    /// own lines, text kept inline.
    pub fn pretty(&self) -> Pretty<'t> {
        Pretty { node: *self }
    }
}

impl Display for Pretty<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_pretty(f, self.node, 0)
    }
}

impl Document {
    /// Every top-level node in indented form, one per line.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        for child in self.children() {
            // Writing into a String cannot fail.
            let _ = writeln!(out, "{}", child.pretty());
        }
        out
    }
}

fn write_pretty(f: &mut Formatter<'_>, node: Node<'_>, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node.kind() {
        NodeKind::Element { name, attributes } => {
            f.write_str(&indent)?;
            write_start_tag(f, name, attributes)?;
            if node.first_child().is_none() {
                return f.write_str("/>");
            }
            f.write_char('>')?;

            let mut nested = false;
            for child in node.children() {
                if child.is_element() {
                    nested = true;
                    f.write_char('\n')?;
                    write_pretty(f, child, depth + 1)?;
                } else {
                    write_pretty(f, child, 0)?;
                }
            }
            if nested {
                write!(f, "\n{indent}")?;
            }
            write!(f, "</{name}>")
        }
        NodeKind::Text(text) => f.write_str(text),
        NodeKind::Comment(body) => write!(f, "{indent}<!--{body}-->"),
        NodeKind::ProcessingInstruction { target, data } => {
            f.write_str(&indent)?;
            write_pi(f, target, data)
        }
    }
}
