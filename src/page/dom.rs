//! Document Tree
//!
//! Arena-backed element/text tree standing in for the host page's DOM.
//! Detached nodes stay in the arena but are unreachable from the root.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use super::events::{DispatchedEvent, Listener};
use super::range::BoundaryPoint;

/// Every `type` an input can declare; anything else falls back to "text"
const INPUT_TYPES: [&str; 22] = [
    "button",
    "checkbox",
    "color",
    "date",
    "datetime-local",
    "email",
    "file",
    "hidden",
    "image",
    "month",
    "number",
    "password",
    "radio",
    "range",
    "reset",
    "search",
    "submit",
    "tel",
    "text",
    "time",
    "url",
    "week",
];

/// Handle to a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("node {0:?} cannot have children")]
    NotAContainer(NodeId),

    #[error("malformed document: {0}")]
    Malformed(String),
}

/// Value and caret of an `input` or `textarea`, in characters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub value: String,
    #[serde(default)]
    pub selection_start: usize,
    #[serde(default)]
    pub selection_end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<ControlState>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            control: None,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Effective `type` of an input; missing or unknown values mean "text"
    pub fn input_type(&self) -> String {
        let declared = self
            .attribute("type")
            .map(|t| t.trim().to_ascii_lowercase())
            .unwrap_or_default();
        if INPUT_TYPES.contains(&declared.as_str()) {
            declared
        } else {
            "text".to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeData {
    Element(Element),
    Text { content: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub data: NodeData,
    #[serde(default)]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub children: Vec<NodeId>,
}

/// The page's node tree plus its event listeners and dispatch log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawDocument")]
pub struct Document {
    pub(super) nodes: Vec<Node>,
    pub(super) listeners: Vec<Listener>,
    pub(super) events: Vec<DispatchedEvent>,
}

/// A document as read from a snapshot, before its tree is checked
#[derive(Deserialize)]
struct RawDocument {
    nodes: Vec<Node>,
    #[serde(default)]
    listeners: Vec<Listener>,
    #[serde(default)]
    events: Vec<DispatchedEvent>,
}

impl TryFrom<RawDocument> for Document {
    type Error = DomError;

    fn try_from(raw: RawDocument) -> Result<Self, DomError> {
        let doc = Self {
            nodes: raw.nodes,
            listeners: raw.listeners,
            events: raw.events,
        };
        doc.validate()?;
        Ok(doc)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document rooted at a `body` element
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Element(Element::new("body")),
                parent: None,
                children: Vec::new(),
            }],
            listeners: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Check that parent and child links agree and form a tree under the root.
    ///
    /// Tree walks assume this holds; a snapshot that breaks it would never
    /// finish walking.
    pub fn validate(&self) -> Result<(), DomError> {
        let root = self
            .node(self.root())
            .ok_or_else(|| DomError::Malformed("no root node".to_string()))?;
        if root.parent.is_some() || !matches!(root.data, NodeData::Element(_)) {
            return Err(DomError::Malformed(
                "root must be an element without a parent".to_string(),
            ));
        }

        let mut listed = vec![false; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            let id = NodeId(index);
            if !node.children.is_empty() && !matches!(node.data, NodeData::Element(_)) {
                return Err(DomError::NotAContainer(id));
            }
            for &child in &node.children {
                let listed_parent = self.node(child).ok_or(DomError::UnknownNode(child))?.parent;
                if listed_parent != Some(id) {
                    return Err(DomError::Malformed(format!(
                        "{child:?} is a child of {id:?} but names {listed_parent:?} as parent"
                    )));
                }
                if std::mem::replace(&mut listed[child.0], true) {
                    return Err(DomError::Malformed(format!("{child:?} is listed twice")));
                }
            }
            if let Some(parent) = node.parent {
                self.node(parent).ok_or(DomError::UnknownNode(parent))?;
                if !self.children(parent).contains(&id) {
                    return Err(DomError::Malformed(format!(
                        "{id:?} names {parent:?} as parent but is not among its children"
                    )));
                }
            }
        }

        for index in 0..self.nodes.len() {
            let mut current = NodeId(index);
            for _ in 0..=self.nodes.len() {
                match self.parent(current) {
                    Some(parent) => current = parent,
                    None => break,
                }
            }
            if self.parent(current).is_some() {
                return Err(DomError::Malformed(format!(
                    "{:?} is its own ancestor",
                    NodeId(index)
                )));
            }
        }
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id.0).ok_or(DomError::UnknownNode(id))
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text { .. } => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text { .. } => None,
        }
    }

    /// Content of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.data {
            NodeData::Text { content } => Some(content),
            NodeData::Element(_) => None,
        }
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.text(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn index_in_parent(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|c| *c == id)
    }

    /// True when `ancestor` is `node` or one of its ancestors
    pub fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        self.node(id).is_some() && self.is_inclusive_ancestor(self.root(), id)
    }

    /// Length of a node for boundary purposes: chars for text, children otherwise
    pub fn node_length(&self, id: NodeId) -> usize {
        match self.text(id) {
            Some(content) => content.chars().count(),
            None => self.children(id).len(),
        }
    }

    /// Child indices leading from the root to `id`
    pub fn path(&self, id: NodeId) -> Vec<usize> {
        let mut path = Vec::new();
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            path.push(self.index_in_parent(current).unwrap_or(0));
            current = parent;
        }
        path.reverse();
        path
    }

    /// Attached nodes in document (pre-)order
    pub fn tree_order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Concatenated text of `id` and its descendants
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(content) = self.text(id) {
            return content.to_string();
        }
        self.children(id)
            .iter()
            .map(|child| self.text_content(*child))
            .collect()
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let el = self.element_mut(id).ok_or(DomError::UnknownNode(id))?;
        el.attributes.insert(name.to_string(), value.to_string());
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.element_mut(id) {
            el.attributes.remove(name);
        }
    }

    /// First attached element whose `id` attribute equals `value`
    pub fn get_element_by_id(&self, value: &str) -> Option<NodeId> {
        self.query_attribute("id", value)
    }

    /// First attached element carrying `name="value"`
    pub fn query_attribute(&self, name: &str, value: &str) -> Option<NodeId> {
        self.tree_order()
            .into_iter()
            .find(|id| self.attribute(*id, name) == Some(value))
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element::new(tag)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(NodeData::Text {
            content: content.to_string(),
        })
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> Result<NodeId, DomError> {
        let id = self.create_element(tag);
        self.append_child(parent, id)?;
        Ok(id)
    }

    pub fn append_text(&mut self, parent: NodeId, content: &str) -> Result<NodeId, DomError> {
        let id = self.create_text(content);
        self.append_child(parent, id)?;
        Ok(id)
    }

    /// Append an `input` (with optional `type`) or `textarea` holding `value`
    pub fn append_control(
        &mut self,
        parent: NodeId,
        tag: &str,
        input_type: Option<&str>,
        value: &str,
    ) -> Result<NodeId, DomError> {
        let id = self.append_element(parent, tag)?;
        if let Some(el) = self.element_mut(id) {
            if let Some(kind) = input_type {
                el.attributes.insert("type".to_string(), kind.to_string());
            }
            el.control = Some(ControlState {
                value: value.to_string(),
                selection_start: 0,
                selection_end: 0,
            });
        }
        Ok(id)
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let index = self.children(parent).len();
        self.insert_child(parent, index, child)
    }

    /// Insert `child` into `parent` at `index` (clamped), detaching it first
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), DomError> {
        if self.element(parent).is_none() {
            return match self.node(parent) {
                Some(_) => Err(DomError::NotAContainer(parent)),
                None => Err(DomError::UnknownNode(parent)),
            };
        }
        self.node(child).ok_or(DomError::UnknownNode(child))?;
        self.remove(child);

        let siblings = &mut self.node_mut(parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach a node (and its subtree) from its parent
    pub fn remove(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        if let Ok(node) = self.node_mut(parent) {
            node.children.retain(|c| *c != id);
        }
        if let Ok(node) = self.node_mut(id) {
            node.parent = None;
        }
    }

    /// Split a text node at a char offset; the tail becomes a new next sibling
    pub fn split_text(&mut self, id: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let content = self.text(id).ok_or(DomError::UnknownNode(id))?.to_string();
        let at = byte_index(&content, offset);
        let tail = self.create_text(&content[at..]);
        if let NodeData::Text { content: head } = &mut self.node_mut(id)?.data {
            head.truncate(at);
        }
        if let Some(parent) = self.parent(id) {
            let index = self.index_in_parent(id).unwrap_or(0);
            self.insert_child(parent, index + 1, tail)?;
        }
        Ok(tail)
    }

    /// Insert `node` at a boundary point, splitting a text node when needed
    pub fn insert_at(&mut self, point: BoundaryPoint, node: NodeId) -> Result<(), DomError> {
        if !self.is_text(point.node) {
            return self.insert_child(point.node, point.offset, node);
        }

        let parent = self
            .parent(point.node)
            .ok_or(DomError::NotAContainer(point.node))?;
        let index = self.index_in_parent(point.node).unwrap_or(0);
        let length = self.node_length(point.node);
        match point.offset {
            0 => self.insert_child(parent, index, node),
            offset if offset >= length => self.insert_child(parent, index + 1, node),
            offset => {
                self.split_text(point.node, offset)?;
                self.insert_child(parent, index + 1, node)
            }
        }
    }

    /// Remove chars `[start, end)` from a text node
    pub(super) fn delete_text(&mut self, id: NodeId, start: usize, end: usize) {
        if let Some(Node {
            data: NodeData::Text { content },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            let from = byte_index(content, start);
            let to = byte_index(content, end);
            content.replace_range(from..to, "");
        }
    }
}

/// Byte position of the `offset`-th char, clamped to the end
pub(crate) fn byte_index(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}
