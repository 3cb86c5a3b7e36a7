//! Tree representation for parsed markup.
//!
//! Each tree is an index-based arena: children are owned as `NodeId` lists,
//! and the parent link is a plain `Option<NodeId>` used only for navigation.
//! Dropping a tree releases one `Vec`, with no reference counting or cycles.
//!
//! Two containers own trees:
//! - [`Document`] holds one tree under a synthetic root element.
//! - [`StreamDocument`] holds a list of top-level trees, one per root-level
//!   node, as returned by the top-level node reader.
//!
//! # Example
//!
//! ```
//! let (doc, error) = flexml_core::parse("<think>plan</think><answer>42</answer>");
//! assert!(error.is_none());
//!
//! let answer = doc.find_one("answer").unwrap();
//! assert_eq!(answer.text(), "42");
//! ```

use crate::event::Attributes;

// ============================================================================
// Core Types
// ============================================================================

/// Index into a tree's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    fn new(index: usize) -> Self {
        NodeId(index as u32)
    }

    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Internal node storage.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// The kind of node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element: `<name attr="v">...</name>`
    Element { name: String, attributes: Attributes },

    /// Raw character run.
    Text(String),

    /// Comment body, not re-parsed.
    Comment(String),

    /// Processing instruction: `<?target data?>`
    ProcessingInstruction { target: String, data: String },
}

// ============================================================================
// Tree
// ============================================================================

/// One node and everything under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<NodeData>,
}

impl Tree {
    const ROOT: NodeId = NodeId(0);

    /// A tree holding a single parentless node.
    pub(crate) fn with_root(kind: NodeKind) -> Self {
        Tree {
            nodes: vec![NodeData {
                parent: None,
                children: Vec::new(),
                kind,
            }],
        }
    }

    /// Append a new last child under `parent`.
    pub(crate) fn append(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    pub(crate) fn root_id(&self) -> NodeId {
        Self::ROOT
    }

    /// Get the root node.
    pub fn root(&self) -> Node<'_> {
        Node {
            tree: self,
            id: Self::ROOT,
        }
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<Node<'_>> {
        if id.index() < self.nodes.len() {
            Some(Node { tree: self, id })
        } else {
            None
        }
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn node_data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

// ============================================================================
// Document
// ============================================================================

/// A fully parsed input: every top-level node under one synthetic root.
///
/// The root is an element named [`Document::ROOT_NAME`]. The scanner can never
/// produce that name, and document-level queries skip the root, so it is
/// never returned by name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    tree: Tree,
}

impl Document {
    /// Name of the synthetic root element.
    pub const ROOT_NAME: &'static str = "#document";

    pub(crate) fn new() -> Self {
        Document {
            tree: Tree::with_root(NodeKind::Element {
                name: Self::ROOT_NAME.to_string(),
                attributes: Attributes::new(),
            }),
        }
    }

    pub(crate) fn from_tree(tree: Tree) -> Self {
        Document { tree }
    }

    pub(crate) fn into_tree(self) -> Tree {
        self.tree
    }

    /// The synthetic root.
    pub fn root(&self) -> Node<'_> {
        self.tree.root()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Top-level nodes in input order.
    pub fn children(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.root().children()
    }

    /// Every element named `name`, depth-first pre-order.
    pub fn find_all(&self, name: &str) -> Vec<Node<'_>> {
        self.children()
            .flat_map(|child| child.find_all(name))
            .collect()
    }

    /// First element named `name` in document order.
    pub fn find_one(&self, name: &str) -> Option<Node<'_>> {
        self.children().find_map(|child| child.find_one(name))
    }

    /// Concatenated text of the whole document.
    pub fn text(&self) -> String {
        self.root().text()
    }

    pub fn is_empty(&self) -> bool {
        self.root().first_child().is_none()
    }
}

// ============================================================================
// StreamDocument
// ============================================================================

/// Top-level trees collected from a node stream, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamDocument {
    nodes: Vec<Tree>,
}

impl StreamDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tree: Tree) {
        self.nodes.push(tree);
    }

    pub fn nodes(&self) -> &[Tree] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Tree> {
        self.nodes
    }

    /// Root node of each tree.
    pub fn roots(&self) -> impl Iterator<Item = Node<'_>> + '_ {
        self.nodes.iter().map(Tree::root)
    }

    pub fn find_all(&self, name: &str) -> Vec<Node<'_>> {
        self.roots().flat_map(|root| root.find_all(name)).collect()
    }

    pub fn find_one(&self, name: &str) -> Option<Node<'_>> {
        self.roots().find_map(|root| root.find_one(name))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl FromIterator<Tree> for StreamDocument {
    fn from_iter<I: IntoIterator<Item = Tree>>(iter: I) -> Self {
        StreamDocument {
            nodes: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Node (navigation handle)
// ============================================================================

/// A handle for navigating a tree.
///
/// Lightweight and `Copy`; it borrows the tree it points into.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> Node<'t> {
    /// Get the node's ID.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the node's kind.
    pub fn kind(&self) -> &'t NodeKind {
        &self.tree.node_data(self.id).kind
    }

    /// Get the parent node, if any.
    pub fn parent(&self) -> Option<Node<'t>> {
        let tree = self.tree;
        tree.node_data(self.id).parent.map(|id| Node { tree, id })
    }

    /// Iterate over child nodes.
    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        tree.node_data(self.id)
            .children
            .iter()
            .map(move |&id| Node { tree, id })
    }

    /// Get the first child node.
    pub fn first_child(&self) -> Option<Node<'t>> {
        let tree = self.tree;
        tree.node_data(self.id).children.first().map(|&id| Node { tree, id })
    }

    /// Get the last child node.
    pub fn last_child(&self) -> Option<Node<'t>> {
        let tree = self.tree;
        tree.node_data(self.id).children.last().map(|&id| Node { tree, id })
    }

    /// Get the next sibling node.
    pub fn next_sibling(&self) -> Option<Node<'t>> {
        let siblings = self.siblings()?;
        let pos = siblings.iter().position(|&id| id == self.id)?;
        siblings.get(pos + 1).map(|&id| Node { tree: self.tree, id })
    }

    /// Get the previous sibling node.
    pub fn prev_sibling(&self) -> Option<Node<'t>> {
        let siblings = self.siblings()?;
        let pos = siblings.iter().position(|&id| id == self.id)?;
        pos.checked_sub(1).map(|prev| Node {
            tree: self.tree,
            id: siblings[prev],
        })
    }

    fn siblings(&self) -> Option<&'t [NodeId]> {
        let parent = self.tree.node_data(self.id).parent?;
        Some(self.tree.node_data(parent).children.as_slice())
    }

    /// This node and everything below it, depth-first pre-order.
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants {
            tree: self.tree,
            stack: vec![self.id],
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind(), NodeKind::Element { .. })
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind(), NodeKind::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind(), NodeKind::Comment(_))
    }

    pub fn is_processing_instruction(&self) -> bool {
        matches!(self.kind(), NodeKind::ProcessingInstruction { .. })
    }

    /// Get element view if this is an element.
    pub fn as_element(&self) -> Option<ElementView<'t>> {
        match self.kind() {
            NodeKind::Element { name, attributes } => Some(ElementView {
                node: *self,
                name: name.as_str(),
                attributes,
            }),
            _ => None,
        }
    }

    /// Element name.
    pub fn name(&self) -> Option<&'t str> {
        match self.kind() {
            NodeKind::Element { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Attribute value, for elements.
    pub fn attr(&self, name: &str) -> Option<&'t str> {
        match self.kind() {
            NodeKind::Element { attributes, .. } => attributes.get(name),
            _ => None,
        }
    }

    /// Raw content of a text node.
    pub fn text_content(&self) -> Option<&'t str> {
        match self.kind() {
            NodeKind::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Concatenated content of every text node at or below this node.
    /// Comments and processing instructions contribute nothing.
    pub fn text(&self) -> String {
        self.descendants()
            .filter_map(|node| node.text_content())
            .collect()
    }

    /// Every element named `name` at or below this node, pre-order.
    pub fn find_all(&self, name: &str) -> Vec<Node<'t>> {
        self.descendants()
            .filter(|node| node.name() == Some(name))
            .collect()
    }

    /// First element named `name` at or below this node.
    pub fn find_one(&self, name: &str) -> Option<Node<'t>> {
        self.descendants().find(|node| node.name() == Some(name))
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kind", self.kind())
            .finish()
    }
}

/// Pre-order walk with an explicit stack, so deep trees cannot overflow.
pub struct Descendants<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl<'t> Iterator for Descendants<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        let id = self.stack.pop()?;
        let data = self.tree.node_data(id);
        self.stack.extend(data.children.iter().rev().copied());
        Some(Node {
            tree: self.tree,
            id,
        })
    }
}

// ============================================================================
// ElementView (typed access to elements)
// ============================================================================

/// A typed view for element nodes.
#[derive(Clone, Copy)]
pub struct ElementView<'t> {
    node: Node<'t>,
    name: &'t str,
    attributes: &'t Attributes,
}

impl<'t> ElementView<'t> {
    /// Get the underlying node.
    pub fn node(&self) -> Node<'t> {
        self.node
    }

    /// Get the element name.
    pub fn name(&self) -> &'t str {
        self.name
    }

    /// All attributes, in first-insertion order.
    pub fn attributes(&self) -> &'t Attributes {
        self.attributes
    }

    /// Get an attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&'t str> {
        self.attributes.get(name)
    }

    /// Iterate over child nodes.
    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + 't {
        self.node.children()
    }
}

impl std::fmt::Debug for ElementView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementView")
            .field("name", &self.name)
            .field("attributes", self.attributes)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
