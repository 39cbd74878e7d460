//! Tree nodes: a topic version plus the children attached under it.
//!
//! The leaf/composite classification is fixed when the node is built. A
//! composite's children can be empty if every child failed to expand; it
//! still serializes as a composite.

use serde::{Deserialize, Serialize};

use crate::types::Topic;

/// One node of a topic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    Leaf { topic: Topic },
    Composite { topic: Topic, children: Vec<TreeNode> },
}

/// Variant tag in the serialized form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Leaf,
    Composite,
}

/// Plain nested form of a [`TreeNode`]: the topic's own fields, the child
/// array and the computed counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializedTreeNode {
    #[serde(flatten)]
    pub topic: Topic,
    pub kind: NodeKind,
    pub children: Vec<SerializedTreeNode>,
    pub child_count: usize,
    pub total_descendants: usize,
}

impl TreeNode {
    /// Pick the variant from what was found at construction time.
    pub fn new(topic: Topic, has_children: bool, children: Vec<TreeNode>) -> Self {
        if has_children {
            TreeNode::Composite { topic, children }
        } else {
            TreeNode::Leaf { topic }
        }
    }

    pub fn topic(&self) -> &Topic {
        match self {
            TreeNode::Leaf { topic } | TreeNode::Composite { topic, .. } => topic,
        }
    }

    pub fn id(&self) -> &str {
        &self.topic().id
    }

    pub fn name(&self) -> &str {
        &self.topic().name
    }

    pub fn content(&self) -> &str {
        &self.topic().content
    }

    pub fn version(&self) -> u32 {
        self.topic().version
    }

    pub fn is_latest(&self) -> bool {
        self.topic().is_latest
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            TreeNode::Leaf { .. } => NodeKind::Leaf,
            TreeNode::Composite { .. } => NodeKind::Composite,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, TreeNode::Leaf { .. })
    }

    pub fn children(&self) -> &[TreeNode] {
        match self {
            TreeNode::Leaf { .. } => &[],
            TreeNode::Composite { children, .. } => children,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    /// Every node below this one, at any depth.
    pub fn total_descendants(&self) -> usize {
        let mut total = 0;
        let mut stack: Vec<&TreeNode> = self.children().iter().collect();
        while let Some(node) = stack.pop() {
            total += 1;
            stack.extend(node.children());
        }
        total
    }

    /// Topics of every descendant in pre-order, excluding `self`.
    pub fn descendants(&self) -> Vec<&Topic> {
        let mut out = Vec::new();
        let mut stack: Vec<&TreeNode> = self.children().iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node.topic());
            stack.extend(node.children().iter().rev());
        }
        out
    }

    /// Serialize bottom-up with an explicit stack; depth is bounded by the
    /// heap, not the call stack.
    pub fn to_serialized(&self) -> SerializedTreeNode {
        // (node, serialized forms of the children finished so far)
        let mut stack: Vec<(&TreeNode, Vec<SerializedTreeNode>)> = vec![(self, Vec::new())];
        while let Some((node, built)) = stack.pop() {
            if let Some(child) = node.children().get(built.len()) {
                stack.push((node, built));
                stack.push((child, Vec::with_capacity(child.child_count())));
                continue;
            }
            let serialized = SerializedTreeNode::from_parts(node, built);
            match stack.last_mut() {
                Some((_, parent_built)) => parent_built.push(serialized),
                None => return serialized,
            }
        }
        unreachable!("the root frame is always finished last")
    }
}

// Nested nodes are torn down with a work stack; the derived drop glue would
// recurse once per level.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let TreeNode::Composite { children, .. } = self else {
            return;
        };
        let mut stack = std::mem::take(children);
        while let Some(mut node) = stack.pop() {
            if let TreeNode::Composite { children, .. } = &mut node {
                stack.append(children);
            }
        }
    }
}

impl SerializedTreeNode {
    fn from_parts(node: &TreeNode, children: Vec<SerializedTreeNode>) -> Self {
        let total_descendants = children.iter().map(|c| 1 + c.total_descendants).sum();
        Self {
            topic: node.topic().clone(),
            kind: node.kind(),
            child_count: children.len(),
            total_descendants,
            children,
        }
    }
}

impl Drop for SerializedTreeNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn leaf(id: &str) -> TreeNode {
        TreeNode::new(Topic::first_version(id, id.to_uppercase(), None), false, vec![])
    }

    /// root -> (a -> (a1, a2), b)
    fn sample() -> TreeNode {
        let a = TreeNode::new(
            Topic::first_version("a", "A", Some("root")),
            true,
            vec![leaf("a1"), leaf("a2")],
        );
        TreeNode::new(
            Topic::first_version("root", "Root", None),
            true,
            vec![a, leaf("b")],
        )
    }

    #[test]
    fn factory_chooses_variant() {
        assert!(leaf("x").is_leaf());
        assert_eq!(leaf("x").kind(), NodeKind::Leaf);
        let empty_composite =
            TreeNode::new(Topic::first_version("c", "C", None), true, Vec::new());
        assert_eq!(empty_composite.kind(), NodeKind::Composite);
        assert_eq!(empty_composite.child_count(), 0);
    }

    #[test]
    fn accessors_expose_topic_fields() {
        let node = sample();
        assert_eq!(node.id(), "root");
        assert_eq!(node.name(), "Root");
        assert_eq!(node.content(), "");
        assert_eq!(node.version(), 1);
        assert!(node.is_latest());
    }

    #[test]
    fn counts() {
        let node = sample();
        assert_eq!(node.child_count(), 2);
        assert_eq!(node.total_descendants(), 4);
        assert_eq!(leaf("x").total_descendants(), 0);
    }

    #[test]
    fn descendants_are_pre_order() {
        let node = sample();
        let ids: Vec<&str> = node.descendants().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a1", "a2", "b"]);
    }

    #[test]
    fn serialized_form_carries_counts() {
        let serialized = sample().to_serialized();
        assert_eq!(serialized.kind, NodeKind::Composite);
        assert_eq!(serialized.child_count, 2);
        assert_eq!(serialized.total_descendants, 4);
        assert_eq!(serialized.children[0].child_count, 2);
        assert_eq!(serialized.children[0].total_descendants, 2);
        assert_eq!(serialized.children[1].kind, NodeKind::Leaf);
        assert!(serialized.children[1].children.is_empty());
        assert_eq!(serialized.children[1].total_descendants, 0);
    }

    #[test]
    fn serialized_json_is_flat_camel_case() {
        let json = serde_json::to_value(leaf("x").to_serialized()).unwrap();
        assert_eq!(json["id"], "x");
        assert_eq!(json["kind"], "leaf");
        assert_eq!(json["childCount"], 0);
        assert_eq!(json["totalDescendants"], 0);
        assert_eq!(json["children"], serde_json::json!([]));
        assert_eq!(json["isLatest"], true);
    }

    /// Chain `n0 -> n1 -> ... -> n{depth}` assembled leaf-up.
    fn chain(depth: usize) -> TreeNode {
        let mut node = leaf(&format!("n{depth}"));
        for i in (0..depth).rev() {
            node = TreeNode::new(Topic::first_version(format!("n{i}"), "N", None), true, vec![node]);
        }
        node
    }

    #[test]
    fn deep_chain_serializes_and_drops_on_a_small_stack() {
        let handle = std::thread::Builder::new()
            .stack_size(256 * 1024)
            .spawn(|| {
                let tree = chain(100_000);
                let serialized = tree.to_serialized();
                let counts = (serialized.child_count, serialized.total_descendants);
                drop(serialized);
                drop(tree);
                counts
            })
            .unwrap();
        assert_eq!(handle.join().unwrap(), (1, 100_000));
    }
}
