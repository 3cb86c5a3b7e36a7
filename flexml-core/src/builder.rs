//! Tree materializer: turns scanner events into trees.
//!
//! One stack of open elements drives both modes. They differ only in what
//! happens when a node lands at root level:
//!
//! - [`Mode::Document`] keeps it under the synthetic root of one [`Document`].
//! - [`Mode::TopLevel`] hands each finished root-level tree back to the caller
//!   as soon as it completes, so a long stream never has to be held in memory
//!   as one tree.

use tracing::{debug, trace};

use crate::error::ParseError;
use crate::event::Event;
use crate::options::Options;
use crate::session::Session;
use crate::tree::{Document, NodeId, NodeKind, Tree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Document,
    TopLevel,
}

/// Builds trees from events.
#[derive(Debug)]
pub(crate) struct TreeBuilder {
    mode: Mode,
    /// Tree under construction: the document in `Document` mode, the current
    /// top-level node (if any) in `TopLevel` mode.
    tree: Option<Tree>,
    /// Open elements, innermost last. Never contains the synthetic root.
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    pub(crate) fn new(mode: Mode) -> Self {
        let tree = match mode {
            Mode::Document => Some(Document::new().into_tree()),
            Mode::TopLevel => None,
        };
        TreeBuilder {
            mode,
            tree,
            stack: Vec::new(),
        }
    }

    /// Feed one event. In `TopLevel` mode, returns a tree once a root-level
    /// node is complete.
    pub(crate) fn handle_event(&mut self, event: Event) -> Option<Tree> {
        match event {
            Event::ElementStart {
                name,
                attributes,
                self_closing,
                ..
            } => {
                let id = self.attach(NodeKind::Element { name, attributes });
                if self_closing {
                    return self.complete_root();
                }
                self.stack.push(id);
                None
            }
            Event::ElementEnd { name, .. } => {
                if self.close(&name) {
                    self.complete_root()
                } else {
                    None
                }
            }
            Event::Text { content, .. } => {
                self.attach(NodeKind::Text(content));
                self.complete_root()
            }
            Event::Comment { content, .. } => {
                self.attach(NodeKind::Comment(content));
                self.complete_root()
            }
            Event::ProcessingInstruction { target, data, .. } => {
                self.attach(NodeKind::ProcessingInstruction { target, data });
                self.complete_root()
            }
        }
    }

    /// Append a node under the innermost open element, or at root level.
    fn attach(&mut self, kind: NodeKind) -> NodeId {
        let parent = self.stack.last().copied();
        if let Some(tree) = self.tree.as_mut() {
            if let Some(parent) = parent {
                return tree.append(parent, kind);
            }
            if self.mode == Mode::Document {
                let root = tree.root_id();
                return tree.append(root, kind);
            }
        }
        let tree = Tree::with_root(kind);
        let root = tree.root_id();
        self.tree = Some(tree);
        root
    }

    /// Pop the innermost open element for an end tag, whatever its name.
    /// Returns whether anything was closed. A stray end tag at root level is
    /// ignored.
    fn close(&mut self, name: &str) -> bool {
        if self.stack.pop().is_none() {
            trace!(name, "ignoring end tag with nothing open");
            return false;
        }
        true
    }

    /// In `TopLevel` mode, detach the current tree once nothing is open.
    fn complete_root(&mut self) -> Option<Tree> {
        if self.mode == Mode::TopLevel && self.stack.is_empty() {
            self.tree.take()
        } else {
            None
        }
    }

    /// `TopLevel` mode: take a root-level element that never closed.
    pub(crate) fn flush(&mut self) -> Option<Tree> {
        if self.mode != Mode::TopLevel {
            return None;
        }
        let tree = self.tree.take()?;
        debug!(open = self.stack.len(), "flushing unclosed top-level element");
        self.stack.clear();
        Some(tree)
    }

    /// `Document` mode: the finished document. Open elements stay as they are.
    pub(crate) fn into_document(self) -> Document {
        match self.tree {
            Some(tree) if self.mode == Mode::Document => Document::from_tree(tree),
            _ => Document::new(),
        }
    }
}

/// Parse a complete input into a [`Document`].
///
/// Never fails: the document holds everything that could be structured, and
/// the error (if any) is the first one recovered in document order.
///
/// ```
/// let (doc, error) = flexml_core::parse("<key>Hello");
/// assert!(error.is_none());
/// assert_eq!(doc.find_one("key").unwrap().text(), "Hello");
/// ```
pub fn parse(input: impl AsRef<[u8]>) -> (Document, Option<ParseError>) {
    let mut session = Session::new();
    session.feed(input.as_ref());
    session.close();
    build_document(session)
}

/// Drain a session into a document. The session should already be closed;
/// otherwise only the events available so far are used.
pub(crate) fn build_document(mut session: Session) -> (Document, Option<ParseError>) {
    if !session.is_closed() {
        debug!(buffered = session.buffered(), "building document from an open session");
    }
    let mut builder = TreeBuilder::new(Mode::Document);
    while let Some(event) = session.next_event() {
        builder.handle_event(event);
    }
    let error = session.error().cloned();
    (builder.into_document(), error)
}

/// Push-driven top-level node reader.
///
/// Feed bytes as they arrive and pull finished top-level trees with
/// [`NodeStream::next_node`]. `None` means either "need more input" or, after
/// [`NodeStream::close`], "done" (see [`NodeStream::is_finished`]).
///
/// ```
/// use flexml_core::NodeStream;
///
/// let mut stream = NodeStream::new();
/// stream.feed(b"<a>1</a><b>");
/// assert_eq!(stream.next_node().unwrap().root().name(), Some("a"));
/// assert!(stream.next_node().is_none());
///
/// stream.feed(b"2</b>");
/// assert_eq!(stream.next_node().unwrap().root().text(), "2");
/// ```
#[derive(Debug)]
pub struct NodeStream {
    session: Session,
    builder: TreeBuilder,
    finished: bool,
}

impl Default for NodeStream {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeStream {
    pub fn new() -> Self {
        Self::with_options(Options::default())
    }

    pub fn with_options(options: Options) -> Self {
        NodeStream {
            session: Session::with_options(options),
            builder: TreeBuilder::new(Mode::TopLevel),
            finished: false,
        }
    }

    pub fn feed(&mut self, bytes: &[u8]) {
        if !bytes.is_empty() {
            self.finished = false;
        }
        self.session.feed(bytes);
    }

    /// Mark end of input. A root element still open at the end is returned
    /// as the final node instead of being lost.
    pub fn close(&mut self) {
        self.session.close();
    }

    /// Next completed top-level tree, if one is available now.
    pub fn next_node(&mut self) -> Option<Tree> {
        while let Some(event) = self.session.next_event() {
            if let Some(tree) = self.builder.handle_event(event) {
                return Some(tree);
            }
        }
        if self.session.is_exhausted() {
            self.finished = true;
            return self.builder.flush();
        }
        None
    }

    /// Closed, drained and flushed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// First error recovered so far.
    pub fn error(&self) -> Option<&ParseError> {
        self.session.error()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }
}

impl Iterator for NodeStream {
    type Item = Tree;

    fn next(&mut self) -> Option<Tree> {
        self.next_node()
    }
}
