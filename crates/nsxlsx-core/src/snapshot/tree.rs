//! Snapshot tree
//!
//! An ordered tree of named string values. The root's children are sheets,
//! each sheet's children are leaf fields. Nodes live in an arena and refer to
//! each other by `NodeId`, so the parent edge is a plain index and never an
//! ownership edge.

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

use crate::errors::{NsxError, Result};

/// Handle to a node inside one `SnapshotTree`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default, PartialEq)]
struct Children {
    order: Vec<NodeId>,
    by_key: HashMap<String, NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
enum NodeBody {
    /// Freshly added, neither value nor children yet
    Empty,
    Leaf(String),
    Group(Children),
}

#[derive(Debug, Clone, PartialEq)]
struct Node {
    key: String,
    parent: Option<NodeId>,
    body: NodeBody,
}

/// Shape of a node as seen by readers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Empty,
    Leaf(&'a str),
    Group,
}

/// One acquired snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotTree {
    nodes: Vec<Node>,
}

impl Default for SnapshotTree {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotTree {
    /// Id of the root node of every tree
    pub const ROOT: NodeId = NodeId(0);

    /// Create a tree holding only an unnamed root
    pub fn new() -> Self {
        Self::with_root_key("")
    }

    /// Create a tree whose root carries the given key
    pub fn with_root_key(key: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                key: key.into(),
                parent: None,
                body: NodeBody::Empty,
            }],
        }
    }

    /// Read-only cursor on the root
    pub fn root(&self) -> NodeRef<'_> {
        self.node(Self::ROOT)
    }

    /// Read-only cursor on any node of this tree
    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the tree holds nothing but its root
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn key(&self, id: NodeId) -> &str {
        &self.nodes[id.0].key
    }

    /// Value of a leaf; `None` for groups and empty nodes
    pub fn value(&self, id: NodeId) -> Option<&str> {
        match &self.nodes[id.0].body {
            NodeBody::Leaf(value) => Some(value),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children in insertion order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].body {
            NodeBody::Group(children) => &children.order,
            _ => &[],
        }
    }

    /// Children keyed by their key
    pub fn children_by_key(&self, id: NodeId) -> BTreeMap<&str, NodeId> {
        self.children(id)
            .iter()
            .map(|child| (self.key(*child), *child))
            .collect()
    }

    /// Look up one direct child by key
    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        match &self.nodes[id.0].body {
            NodeBody::Group(children) => children.by_key.get(key).copied(),
            _ => None,
        }
    }

    /// Keys from the root down to this node, both ends included
    pub fn path(&self, id: NodeId) -> Vec<&str> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            path.push(self.key(node));
            current = self.parent(node);
        }
        path.reverse();
        path
    }

    /// Set the value of a node, turning an empty node into a leaf
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if the node already has children.
    pub fn set_value(&mut self, id: NodeId, value: impl Into<String>) -> Result<()> {
        let node = &mut self.nodes[id.0];
        if matches!(node.body, NodeBody::Group(_)) {
            return Err(NsxError::InvalidSnapshot {
                reason: format!("node '{}' has children and cannot hold a value", node.key),
            });
        }
        node.body = NodeBody::Leaf(value.into());
        Ok(())
    }

    /// Return the child with `key`, creating an empty one if absent
    ///
    /// An existing child is returned untouched, so trees can be built
    /// incrementally from nested name/value pairs.
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if `parent` is a leaf.
    pub fn add_or_get_child(&mut self, parent: NodeId, key: &str) -> Result<NodeId> {
        if let Some(existing) = self.child(parent, key) {
            return Ok(existing);
        }

        let new_id = NodeId(self.nodes.len());
        let parent_node = &mut self.nodes[parent.0];
        if matches!(parent_node.body, NodeBody::Leaf(_)) {
            return Err(NsxError::InvalidSnapshot {
                reason: format!(
                    "node '{}' holds a value and cannot have children",
                    parent_node.key
                ),
            });
        }
        if matches!(parent_node.body, NodeBody::Empty) {
            parent_node.body = NodeBody::Group(Children::default());
        }
        if let NodeBody::Group(children) = &mut parent_node.body {
            children.order.push(new_id);
            children.by_key.insert(key.to_string(), new_id);
        }

        self.nodes.push(Node {
            key: key.to_string(),
            parent: Some(parent),
            body: NodeBody::Empty,
        });
        Ok(new_id)
    }

    /// Add (or overwrite) a leaf under `parent`
    pub fn insert_leaf(
        &mut self,
        parent: NodeId,
        key: &str,
        value: impl Into<String>,
    ) -> Result<NodeId> {
        let child = self.add_or_get_child(parent, key)?;
        self.set_value(child, value)?;
        Ok(child)
    }

    /// Build a tree from nested JSON objects
    ///
    /// Strings, numbers and booleans become leaves; objects become groups.
    /// Object key order is kept.
    ///
    /// # Errors
    ///
    /// `InvalidSnapshot` if the top level is not an object, or a value is an
    /// array or null.
    pub fn from_json(value: &Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| NsxError::InvalidSnapshot {
            reason: "snapshot JSON must be an object".to_string(),
        })?;
        let mut tree = Self::new();
        tree.extend_from_json(Self::ROOT, object)?;
        Ok(tree)
    }

    fn extend_from_json(&mut self, parent: NodeId, object: &Map<String, Value>) -> Result<()> {
        for (key, value) in object {
            let child = self.add_or_get_child(parent, key)?;
            match value {
                Value::String(s) => self.set_value(child, s.as_str())?,
                Value::Number(n) => self.set_value(child, n.to_string())?,
                Value::Bool(b) => self.set_value(child, b.to_string())?,
                Value::Object(nested) => self.extend_from_json(child, nested)?,
                Value::Array(_) | Value::Null => {
                    return Err(NsxError::InvalidSnapshot {
                        reason: format!(
                            "unsupported value at '{}': expected string, number, bool or object",
                            self.path(child).join("/")
                        ),
                    })
                }
            }
        }
        Ok(())
    }

    /// Render the tree below the root as nested JSON objects
    pub fn to_json(&self) -> Value {
        self.node_to_json(Self::ROOT)
    }

    fn node_to_json(&self, id: NodeId) -> Value {
        match &self.nodes[id.0].body {
            NodeBody::Leaf(value) => Value::String(value.clone()),
            NodeBody::Empty => Value::Object(Map::new()),
            NodeBody::Group(children) => Value::Object(
                children
                    .order
                    .iter()
                    .map(|child| (self.key(*child).to_string(), self.node_to_json(*child)))
                    .collect(),
            ),
        }
    }
}

/// Borrowed read-only view of one node
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a SnapshotTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn key(&self) -> &'a str {
        self.tree.key(self.id)
    }

    pub fn value(&self) -> Option<&'a str> {
        self.tree.value(self.id)
    }

    pub fn kind(&self) -> NodeKind<'a> {
        let tree = self.tree;
        match &tree.nodes[self.id.0].body {
            NodeBody::Empty => NodeKind::Empty,
            NodeBody::Leaf(value) => NodeKind::Leaf(value),
            NodeBody::Group(_) => NodeKind::Group,
        }
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.tree.parent(self.id).map(|id| self.tree.node(id))
    }

    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a>> + 'a {
        let tree = self.tree;
        tree.children(self.id).iter().map(move |id| tree.node(*id))
    }

    pub fn children_by_key(&self) -> BTreeMap<&'a str, NodeRef<'a>> {
        self.children().map(|child| (child.key(), child)).collect()
    }

    pub fn child(&self, key: &str) -> Option<NodeRef<'a>> {
        self.tree.child(self.id, key).map(|id| self.tree.node(id))
    }

    pub fn path(&self) -> Vec<&'a str> {
        self.tree.path(self.id)
    }
}
