//! Owned render tree the view layer writes into and the clamp primitive measures.
//!
//! Semantics:
//! - Node ids are unique within a tree and never reused.
//! - A node has at most one parent. Appending an attached node moves it; a node is
//!   never present in two places.
//! - Detaching an already detached node is a no-op.

use std::fmt;

use crate::error::ClampError;

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    pub fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum NodeKind {
    Element { classes: Vec<String>, hidden: bool },
    Text(String),
}

#[derive(Debug)]
struct NodeSlot {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug, Default)]
pub struct NodeTree {
    nodes: Vec<Option<NodeSlot>>,
}

impl NodeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_element(&mut self, classes: &[&str]) -> NodeId {
        self.insert(NodeKind::Element {
            classes: classes.iter().map(|class| (*class).to_string()).collect(),
            hidden: false,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.insert(NodeKind::Text(text.into()))
    }

    fn insert(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(NodeSlot {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    fn slot(&self, id: NodeId) -> Result<&NodeSlot, ClampError> {
        self.nodes
            .get(id.0)
            .and_then(|slot| slot.as_ref())
            .ok_or(ClampError::UnknownNode(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut NodeSlot, ClampError> {
        self.nodes
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .ok_or(ClampError::UnknownNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slot(id).is_ok()
    }

    /// Number of live nodes (attached or not).
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.slot(id).ok().map(|slot| &slot.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).ok().and_then(|slot| slot.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id)
            .map(|slot| slot.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Append `child` as the last child of `parent`, detaching it from any previous parent.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), ClampError> {
        self.slot(parent)?;
        self.detach(child)?;
        self.slot_mut(parent)?.children.push(child);
        self.slot_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn detach(&mut self, id: NodeId) -> Result<(), ClampError> {
        let Some(parent) = self.slot(id)?.parent else {
            return Ok(());
        };
        self.slot_mut(parent)?.children.retain(|child| *child != id);
        self.slot_mut(id)?.parent = None;
        Ok(())
    }

    /// Detach `id` and free it together with its whole subtree.
    pub fn remove(&mut self, id: NodeId) -> Result<(), ClampError> {
        self.detach(id)?;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(slot) = self.nodes.get_mut(next.0).and_then(Option::take) {
                stack.extend(slot.children);
            }
        }
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        matches!(
            self.kind(id),
            Some(NodeKind::Element { classes, .. }) if classes.iter().any(|c| c == class)
        )
    }

    pub fn set_hidden(&mut self, id: NodeId, value: bool) -> Result<(), ClampError> {
        if let NodeKind::Element { hidden, .. } = &mut self.slot_mut(id)?.kind {
            *hidden = value;
        }
        Ok(())
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Element { hidden: true, .. }))
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn set_text(&mut self, id: NodeId, value: impl Into<String>) -> Result<(), ClampError> {
        if let NodeKind::Text(text) = &mut self.slot_mut(id)?.kind {
            *text = value.into();
        }
        Ok(())
    }

    /// Pre-order walk of `root` and its descendants.
    pub fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !self.contains(id) {
                continue;
            }
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn find_by_class(&self, root: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(root)
            .into_iter()
            .find(|id| self.has_class(*id, class))
    }

    pub fn count_class(&self, root: NodeId, class: &str) -> usize {
        self.descendants(root)
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .count()
    }

    /// Text nodes under `root` in document order, skipping hidden subtrees.
    pub fn text_nodes(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_text_nodes(root, &mut out);
        out
    }

    fn collect_text_nodes(&self, id: NodeId, out: &mut Vec<NodeId>) {
        match self.kind(id) {
            Some(NodeKind::Text(_)) => out.push(id),
            Some(NodeKind::Element { hidden: false, .. }) => {
                for child in self.children(id) {
                    self.collect_text_nodes(*child, out);
                }
            }
            _ => {}
        }
    }

    /// Concatenated visible text under `root`.
    pub fn text_content(&self, root: NodeId) -> String {
        self.text_nodes(root)
            .into_iter()
            .filter_map(|id| self.text(id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::NodeTree;
    use crate::error::ClampError;

    #[test]
    fn append_moves_instead_of_duplicating() {
        let mut tree = NodeTree::new();
        let a = tree.create_element(&["a"]);
        let b = tree.create_element(&["b"]);
        let child = tree.create_text("x");
        tree.append_child(a, child).unwrap();
        tree.append_child(b, child).unwrap();

        assert!(tree.children(a).is_empty());
        assert_eq!(tree.children(b), &[child]);
        assert_eq!(tree.parent(child), Some(b));
    }

    #[test]
    fn detach_twice_is_noop() {
        let mut tree = NodeTree::new();
        let root = tree.create_element(&[]);
        let child = tree.create_text("x");
        tree.append_child(root, child).unwrap();
        tree.detach(child).unwrap();
        tree.detach(child).unwrap();
        assert!(tree.children(root).is_empty());
        assert!(tree.contains(child));
    }

    #[test]
    fn remove_frees_subtree() {
        let mut tree = NodeTree::new();
        let root = tree.create_element(&[]);
        let inner = tree.create_element(&["inner"]);
        let leaf = tree.create_text("leaf");
        tree.append_child(root, inner).unwrap();
        tree.append_child(inner, leaf).unwrap();

        tree.remove(inner).unwrap();
        assert!(!tree.contains(inner));
        assert!(!tree.contains(leaf));
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.append_child(root, leaf), Err(ClampError::UnknownNode(leaf)));
    }

    #[test]
    fn text_content_skips_hidden_subtrees() {
        let mut tree = NodeTree::new();
        let root = tree.create_element(&[]);
        let visible = tree.create_text("shown ");
        let hidden = tree.create_element(&["hidden"]);
        let secret = tree.create_text("secret");
        tree.append_child(root, visible).unwrap();
        tree.append_child(root, hidden).unwrap();
        tree.append_child(hidden, secret).unwrap();
        tree.set_hidden(hidden, true).unwrap();

        assert_eq!(tree.text_content(root), "shown ");
        assert_eq!(tree.find_by_class(root, "hidden"), Some(hidden));
    }
}
