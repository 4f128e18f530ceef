use std::collections::HashSet;
use stylebridge_canvas::{CanvasElement, HierarchyNode};

/// Decides parent/child relationships between elements.
///
/// Implementations can use any structural signal; callers only rely on
/// `is_child` being irreflexive.
pub trait HierarchyBuilder {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// True when `candidate` should be treated as nested inside `parent`
    fn is_child(&self, parent: &CanvasElement, candidate: &CanvasElement) -> bool;
}

/// Selector-text containment: `.card .title` is a child of `.card`.
///
/// A candidate is a child when its selector contains the parent selector
/// with the leading class or id marker stripped, and the selectors differ.
/// This approximates DOM nesting from text alone, so unrelated selectors
/// sharing a prefix (`.card` and `.cardholder`) are misclassified as nested.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextualContainmentHeuristic;

impl TextualContainmentHeuristic {
    fn stripped(selector: &str) -> &str {
        let selector = selector.trim();
        selector
            .strip_prefix('.')
            .or_else(|| selector.strip_prefix('#'))
            .unwrap_or(selector)
    }
}

impl HierarchyBuilder for TextualContainmentHeuristic {
    fn name(&self) -> &'static str {
        "textual-containment"
    }

    fn is_child(&self, parent: &CanvasElement, candidate: &CanvasElement) -> bool {
        let needle = Self::stripped(&parent.css_selector);
        !needle.is_empty()
            && parent.css_selector != candidate.css_selector
            && candidate.css_selector.contains(needle)
    }
}

/// Parent relation over element indices with mutual containment broken in
/// favour of the earlier element
struct ParentMatrix {
    parent: Vec<Vec<bool>>,
}

impl ParentMatrix {
    fn new(builder: &dyn HierarchyBuilder, elements: &[CanvasElement]) -> Self {
        let n = elements.len();
        let contains: Vec<Vec<bool>> = (0..n)
            .map(|p| {
                (0..n)
                    .map(|c| p != c && builder.is_child(&elements[p], &elements[c]))
                    .collect()
            })
            .collect();

        let parent = (0..n)
            .map(|p| {
                (0..n)
                    .map(|c| contains[p][c] && !(contains[c][p] && c < p))
                    .collect()
            })
            .collect();

        Self { parent }
    }

    fn is_parent(&self, p: usize, c: usize) -> bool {
        self.parent[p][c]
    }

    fn has_parent(&self, c: usize) -> bool {
        (0..self.parent.len()).any(|p| self.parent[p][c])
    }

    /// Children with no intermediate element between them and `p`
    fn direct_children(&self, p: usize) -> Vec<usize> {
        let n = self.parent.len();
        (0..n)
            .filter(|&c| self.is_parent(p, c))
            .filter(|&c| {
                !(0..n).any(|m| m != p && m != c && self.is_parent(p, m) && self.is_parent(m, c))
            })
            .collect()
    }
}

/// Build the selector hierarchy forest. Every element appears exactly once.
pub fn build_forest(builder: &dyn HierarchyBuilder, elements: &[CanvasElement]) -> Vec<HierarchyNode> {
    let matrix = ParentMatrix::new(builder, elements);
    let mut visited = HashSet::new();
    let mut forest = Vec::new();

    for index in 0..elements.len() {
        if !matrix.has_parent(index) {
            forest.push(build_node(index, &matrix, elements, &mut visited));
        }
    }

    // Elements only reachable through a containment cycle
    for index in 0..elements.len() {
        if !visited.contains(&index) {
            forest.push(build_node(index, &matrix, elements, &mut visited));
        }
    }

    forest
}

fn build_node(
    index: usize,
    matrix: &ParentMatrix,
    elements: &[CanvasElement],
    visited: &mut HashSet<usize>,
) -> HierarchyNode {
    visited.insert(index);
    let element = &elements[index];
    let mut node = HierarchyNode::leaf(element.id.clone(), element.css_selector.clone());

    for child in matrix.direct_children(index) {
        if visited.contains(&child) {
            continue;
        }
        node.children.push(build_node(child, matrix, elements, visited));
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylebridge_canvas::ElementType;

    fn el(id: &str, selector: &str) -> CanvasElement {
        CanvasElement::new(id, ElementType::Rectangle, selector)
    }

    #[test]
    fn test_textual_containment() {
        let h = TextualContainmentHeuristic;
        assert!(h.is_child(&el("1", ".card"), &el("2", ".card .title")));
        assert!(!h.is_child(&el("2", ".card .title"), &el("1", ".card")));
        assert!(!h.is_child(&el("1", ".card"), &el("1b", ".card")));
        // Known limitation: shared prefixes read as nesting
        assert!(h.is_child(&el("1", ".card"), &el("3", ".cardholder")));
    }

    #[test]
    fn test_forest_attaches_direct_children() {
        let elements = vec![
            el("nav", ".nav"),
            el("item", ".nav .item"),
            el("icon", ".nav .item .icon"),
            el("footer", ".footer"),
        ];
        let forest = build_forest(&TextualContainmentHeuristic, &elements);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].element, "nav");
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].element, "item");
        assert_eq!(forest[0].children[0].children[0].element, "icon");
        assert_eq!(forest[1].element, "footer");
    }

    #[test]
    fn test_mutual_containment_stays_acyclic() {
        // ".card" and "card" contain each other once the marker is stripped
        let elements = vec![el("a", ".card"), el("b", "card")];
        let forest = build_forest(&TextualContainmentHeuristic, &elements);

        let total: usize = forest.iter().map(HierarchyNode::size).sum();
        assert_eq!(total, 2);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].element, "a");
        assert_eq!(forest[0].children[0].element, "b");
    }
}
