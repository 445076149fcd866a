//! Arena-based output tree.
//!
//! All nodes live in one vector and refer to each other by index, so the
//! builder's cursor is a plain [`NodeId`] that can always be resolved back to
//! a node reachable from the root. Node 0 is the root element, created with
//! the tree and never closed.

mod attributes;

pub use attributes::{Attribute, Attributes};

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// The root element.
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Element { name: String, attrs: Attributes },
    Text(String),
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// The output document under construction.
#[derive(Debug)]
pub struct OutputDom {
    nodes: Vec<Node>,
}

impl OutputDom {
    /// Create a tree holding only a root element with the given name.
    pub fn new(root_name: &str) -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Element {
                name: root_name.to_string(),
                attrs: Attributes::new(),
            })],
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    /// Create an element and append it as the last child of `parent`.
    pub fn append_element(&mut self, parent: NodeId, name: &str, attrs: Attributes) -> NodeId {
        let id = self.alloc(Node::new(NodeData::Element {
            name: name.to_string(),
            attrs,
        }));
        self.append(parent, id);
        id
    }

    /// Append text to `parent`, merging with a trailing text node if present.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if text.is_empty() {
            return;
        }

        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(last) = self.get_mut(last_child)
            && let NodeData::Text(ref mut existing) = last.data
        {
            existing.push_str(text);
            return;
        }

        let id = self.alloc(Node::new(NodeData::Text(text.to_string())));
        self.append(parent, id);
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Parent of a node, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).map(|n| n.parent).filter(NodeId::is_some)
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// Element name, or `None` for text nodes.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name.as_str()),
            NodeData::Text(_) => None,
        })
    }

    pub fn attrs(&self, id: NodeId) -> Option<&Attributes> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => Some(attrs),
            NodeData::Text(_) => None,
        })
    }

    pub fn attrs_mut(&mut self, id: NodeId) -> Option<&mut Attributes> {
        self.get_mut(id).and_then(|n| match &mut n.data {
            NodeData::Element { attrs, .. } => Some(attrs),
            NodeData::Text(_) => None,
        })
    }

    /// Get an attribute value.
    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id).and_then(|attrs| attrs.get(name))
    }

    /// Concatenated text of all descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.get(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element { .. }) => {
                for child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
            None => {}
        }
    }

    /// Element nodes with the given name, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            if self.element_name(id) == Some(tag) {
                found.push(id);
            }
            let mut children: Vec<_> = self.children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        found
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds only the root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a OutputDom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}
