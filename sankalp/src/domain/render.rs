//! Hierarchy renderer: turns the forest plus expanded set into a view tree.

use termtree::Tree;
use tracing::instrument;

use crate::domain::entities::{Branch, BranchId, BranchKind};
use crate::domain::expansion::ExpandedSet;

/// State of the expand/collapse affordance of a rendered branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Expanded,
    Collapsed,
}

impl Toggle {
    pub fn marker(&self) -> &'static str {
        match self {
            Toggle::Expanded => "▾",
            Toggle::Collapsed => "▸",
        }
    }
}

/// Rendered branch: summary fields, affordance and visible children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchView {
    pub id: BranchId,
    pub name: String,
    pub kind: BranchKind,
    pub location: String,
    pub head: String,
    pub depth: usize,
    /// Present only when the branch has children
    pub toggle: Option<Toggle>,
    /// Empty unless the branch is expanded
    pub children: Vec<BranchView>,
}

/// Render `node` at `depth`. Children appear only when the node is expanded.
pub fn render(node: &Branch, expanded: &ExpandedSet, depth: usize) -> BranchView {
    let is_expanded = expanded.is_expanded(&node.id);
    let toggle = node.has_children().then_some(if is_expanded {
        Toggle::Expanded
    } else {
        Toggle::Collapsed
    });

    let children = if is_expanded {
        node.children
            .iter()
            .map(|child| render(child, expanded, depth + 1))
            .collect()
    } else {
        Vec::new()
    };

    BranchView {
        id: node.id.clone(),
        name: node.name.clone(),
        kind: node.kind,
        location: node.location.clone(),
        head: node.head.clone(),
        depth,
        toggle,
        children,
    }
}

#[instrument(level = "debug", skip_all, fields(roots = forest.len(), expanded = expanded.len()))]
pub fn render_forest(forest: &[Branch], expanded: &ExpandedSet) -> Vec<BranchView> {
    forest.iter().map(|b| render(b, expanded, 0)).collect()
}

impl BranchView {
    /// Number of rendered nodes, this one included.
    pub fn visible_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.visible_count()).sum::<usize>()
    }

    pub fn label(&self, details: bool) -> String {
        let marker = self.toggle.map(|t| t.marker()).unwrap_or("·");
        if details {
            format!(
                "{} {} [{}] ({}) {} | head: {}",
                marker, self.name, self.id, self.kind, self.location, self.head
            )
        } else {
            format!("{} {}", marker, self.name)
        }
    }

    /// Indented text lines, two spaces per level.
    pub fn to_lines(&self, details: bool) -> Vec<String> {
        let mut lines = vec![format!("{}{}", "  ".repeat(self.depth), self.label(details))];
        for child in &self.children {
            lines.extend(child.to_lines(details));
        }
        lines
    }
}

pub trait TreeNodeConvert {
    fn to_tree_string(&self, details: bool) -> Tree<String>;
}

impl TreeNodeConvert for BranchView {
    fn to_tree_string(&self, details: bool) -> Tree<String> {
        let leaves: Vec<_> = self
            .children
            .iter()
            .map(|c| c.to_tree_string(details))
            .collect();

        Tree::new(self.label(details)).with_leaves(leaves)
    }
}
