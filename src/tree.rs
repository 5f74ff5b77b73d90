//! Reference hierarchy
//!
//! The tree is an arena of nodes addressed by [`NodeId`]. Index `0` is the
//! root. Every prefix of every published reference has a node; nodes that
//! no section owns are grouping nodes. Sibling order is computed when asked
//! for and never depends on how children are stored.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::error::{KssError, Result};
use crate::section::{segment_sort_key, Section};

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    segment: Option<String>,
    path: Vec<String>,
    section: Option<&'a Section>,
    parent: Option<NodeId>,
    children: HashMap<String, NodeId>,
}

impl<'a> TreeNode<'a> {
    fn root() -> Self {
        Self {
            segment: None,
            path: Vec::new(),
            section: None,
            parent: None,
            children: HashMap::new(),
        }
    }

    /// `None` for the root
    pub fn segment_text(&self) -> Option<&str> {
        self.segment.as_deref()
    }

    pub fn full_reference_path(&self) -> &[String] {
        &self.path
    }

    /// Dot-joined path, e.g. `buttons.fancy`
    pub fn reference(&self) -> String {
        self.path.join(".")
    }

    pub fn section(&self) -> Option<&'a Section> {
        self.section
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn is_grouping(&self) -> bool {
        self.section.is_none() && self.segment.is_some()
    }

    /// A node owned by a section takes the section's key, which keeps an
    /// explicit `N:` prefix; grouping nodes fall back to a numeric segment.
    pub fn sort_key(&self) -> Option<u64> {
        match self.section {
            Some(section) => section.sort_key(),
            None => self.segment.as_deref().and_then(segment_sort_key),
        }
    }

    fn cmp_siblings(&self, other: &Self) -> Ordering {
        let by_key = match (self.sort_key(), other.sort_key()) {
            (Some(a), Some(b)) => a.cmp(&b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_key.then_with(|| self.segment.cmp(&other.segment))
    }
}

#[derive(Debug, Clone)]
pub struct ReferenceTree<'a> {
    nodes: Vec<TreeNode<'a>>,
}

impl<'a> ReferenceTree<'a> {
    pub const ROOT: NodeId = 0;

    pub fn build<I>(sections: I) -> Self
    where
        I: IntoIterator<Item = &'a Section>,
    {
        let mut tree = Self {
            nodes: vec![TreeNode::root()],
        };

        for section in sections {
            let segments = section.reference_segments();
            if segments.is_empty() {
                continue;
            }

            let mut cursor = Self::ROOT;
            for (depth, segment) in segments.iter().enumerate() {
                cursor = match tree.nodes[cursor].children.get(segment) {
                    Some(&child) => child,
                    None => {
                        let child = tree.nodes.len();
                        tree.nodes.push(TreeNode {
                            segment: Some(segment.clone()),
                            path: segments[..=depth].to_vec(),
                            section: None,
                            parent: Some(cursor),
                            children: HashMap::new(),
                        });
                        tree.nodes[cursor].children.insert(segment.clone(), child);
                        child
                    }
                };
            }
            tree.nodes[cursor].section = Some(section);
        }

        tree
    }

    pub fn root(&self) -> &TreeNode<'a> {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode<'a>> {
        self.nodes.get(id)
    }

    /// Number of nodes, root excluded
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sorted_children(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(id) else {
            return Vec::new();
        };
        let mut children: Vec<NodeId> = node.children.values().copied().collect();
        children.sort_by(|&a, &b| self.nodes[a].cmp_siblings(&self.nodes[b]));
        children
    }

    /// 1-based position of the node and each ancestor among sorted siblings,
    /// e.g. `2.3`. Empty for the root.
    pub fn dotted_numbered_path(&self, id: NodeId) -> String {
        let mut positions = Vec::new();
        let mut current = id;

        while let Some(parent) = self.nodes.get(current).and_then(|n| n.parent) {
            let index = self
                .sorted_children(parent)
                .iter()
                .position(|&child| child == current)
                .unwrap_or(0);
            positions.push((index + 1).to_string());
            current = parent;
        }

        positions.reverse();
        positions.join(".")
    }

    /// Walk the normalized reference segment by segment
    pub fn find(&self, reference: &str) -> Result<NodeId> {
        let mut cursor = Self::ROOT;
        for segment in reference.split('.') {
            cursor = *self.nodes[cursor]
                .children
                .get(segment)
                .ok_or_else(|| KssError::SectionNotFound(reference.to_string()))?;
        }
        Ok(cursor)
    }

    /// Like [`find`](Self::find), but grouping nodes do not count
    pub fn section(&self, reference: &str) -> Result<&'a Section> {
        let id = self.find(reference)?;
        self.nodes[id]
            .section
            .ok_or_else(|| KssError::SectionNotFound(reference.to_string()))
    }

    /// Every node below the root in depth-first pre-order
    pub fn iter_sorted_nodes(&self) -> Vec<NodeId> {
        self.sorted_nodes_below(Self::ROOT)
    }

    fn sorted_nodes_below(&self, start: NodeId) -> Vec<NodeId> {
        let mut ordered = Vec::new();
        let mut stack: Vec<NodeId> = self.sorted_children(start).into_iter().rev().collect();

        while let Some(id) = stack.pop() {
            ordered.push(id);
            stack.extend(self.sorted_children(id).into_iter().rev());
        }

        ordered
    }

    pub fn iter_sorted_sections(&self) -> Vec<&'a Section> {
        self.iter_sorted_nodes()
            .into_iter()
            .filter_map(|id| self.nodes[id].section)
            .collect()
    }

    /// Serializable view of the whole hierarchy in sorted order
    pub fn outline(&self) -> Vec<OutlineNode> {
        self.outline_children(Self::ROOT)
    }

    fn outline_children(&self, id: NodeId) -> Vec<OutlineNode> {
        self.sorted_children(id)
            .into_iter()
            .map(|child| {
                let node = &self.nodes[child];
                OutlineNode {
                    number: self.dotted_numbered_path(child),
                    segment: node.segment.clone().unwrap_or_default(),
                    reference: node.reference(),
                    title: node.section.and_then(|s| s.title.clone()),
                    sort_key: node.sort_key(),
                    children: self.outline_children(child),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutlineNode {
    pub number: String,
    pub segment: String,
    pub reference: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_key: Option<u64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}
