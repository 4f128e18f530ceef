use crate::hierarchy::{build_forest, HierarchyBuilder, TextualContainmentHeuristic};
use crate::options::DEFAULT_PROXIMITY_THRESHOLD;
use stylebridge_canvas::{CanvasElement, ContainerEntry, GroupEntry, LayoutAnalysis};
use tracing::{debug, instrument};

/// Infers containers, proximity groups and the selector hierarchy from a
/// flat element list
pub struct LayoutAnalyzer {
    threshold: f64,
    hierarchy: Box<dyn HierarchyBuilder>,
}

impl Default for LayoutAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_PROXIMITY_THRESHOLD)
    }
}

impl LayoutAnalyzer {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            hierarchy: Box::new(TextualContainmentHeuristic),
        }
    }

    /// Swap the strategy used for container children and the hierarchy
    pub fn with_hierarchy(mut self, builder: Box<dyn HierarchyBuilder>) -> Self {
        self.hierarchy = builder;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Analyze the full element universe
    #[instrument(skip(self, elements), fields(elements = elements.len(), hierarchy = self.hierarchy.name()))]
    pub fn analyze(&self, elements: &[CanvasElement]) -> LayoutAnalysis {
        let analysis = LayoutAnalysis {
            containers: self.containers(elements),
            groups: self.proximity_groups(elements),
            hierarchies: build_forest(self.hierarchy.as_ref(), elements),
        };
        debug!(
            containers = analysis.containers.len(),
            groups = analysis.groups.len(),
            roots = analysis.hierarchies.len(),
            "Layout analysis complete"
        );
        analysis
    }

    /// Elements with a flexbox or grid layout, in element order
    pub fn containers(&self, elements: &[CanvasElement]) -> Vec<ContainerEntry> {
        elements
            .iter()
            .filter_map(|container| {
                let layout = container.layout.as_ref()?;
                let children = elements
                    .iter()
                    .filter(|candidate| self.hierarchy.is_child(container, candidate))
                    .map(|child| child.id.clone())
                    .collect();

                Some(ContainerEntry {
                    id: container.id.clone(),
                    kind: layout.kind,
                    selector: container.css_selector.clone(),
                    properties: layout.clone(),
                    children,
                })
            })
            .collect()
    }

    /// Greedy proximity clustering in insertion order.
    ///
    /// Each unprocessed element seeds a group and absorbs every unprocessed
    /// element within the threshold of the seed. Only groups with at least
    /// two members are kept. Unplaced elements count as sitting at the origin.
    pub fn proximity_groups(&self, elements: &[CanvasElement]) -> Vec<GroupEntry> {
        let mut processed = vec![false; elements.len()];
        let mut groups = Vec::new();

        for (seed_index, seed) in elements.iter().enumerate() {
            if processed[seed_index] {
                continue;
            }
            processed[seed_index] = true;

            let seed_position = seed.position_or_origin();
            let mut members = vec![seed.id.clone()];
            let mut bounds = seed.bounds();

            for (index, other) in elements.iter().enumerate() {
                if processed[index] {
                    continue;
                }
                if seed_position.distance_to(&other.position_or_origin()) <= self.threshold {
                    processed[index] = true;
                    members.push(other.id.clone());
                    bounds = bounds.union(&other.bounds());
                }
            }

            if members.len() >= 2 {
                groups.push(GroupEntry {
                    id: format!("group-{}", groups.len() + 1),
                    elements: members,
                    bounds,
                });
            }
        }

        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylebridge_canvas::{Bounds, ElementType, FlexDirection, LayoutSpec};

    fn at(id: &str, x: f64, y: f64) -> CanvasElement {
        CanvasElement::new(id, ElementType::Rectangle, format!(".{}", id))
            .with_size(20.0, 20.0)
            .with_position(x, y)
    }

    #[test]
    fn test_proximity_grouping() {
        let elements = vec![at("a", 0.0, 0.0), at("b", 10.0, 10.0), at("c", 500.0, 500.0)];
        let groups = LayoutAnalyzer::default().proximity_groups(&elements);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "group-1");
        assert_eq!(groups[0].elements, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(groups[0].bounds, Bounds::new(0.0, 0.0, 30.0, 30.0));
        assert!(LayoutAnalysis {
            groups,
            ..Default::default()
        }
        .group_of("c")
        .is_none());
    }

    #[test]
    fn test_grouping_measures_from_the_seed() {
        // b is near a and c is near b, but c is too far from the seed a
        let elements = vec![at("a", 0.0, 0.0), at("b", 40.0, 0.0), at("c", 80.0, 0.0)];
        let groups = LayoutAnalyzer::new(50.0).proximity_groups(&elements);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].elements, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_grouping_depends_on_insertion_order() {
        let forward = vec![at("a", 0.0, 0.0), at("b", 40.0, 0.0), at("c", 80.0, 0.0)];
        let reversed: Vec<_> = forward.iter().rev().cloned().collect();

        let analyzer = LayoutAnalyzer::new(50.0);
        assert_eq!(analyzer.proximity_groups(&forward)[0].elements[0], "a");
        assert_eq!(analyzer.proximity_groups(&reversed)[0].elements[0], "c");
    }

    #[test]
    fn test_containers_and_children() {
        let elements = vec![
            CanvasElement::new("card", ElementType::Group, ".card")
                .with_layout(LayoutSpec::flexbox(FlexDirection::Column)),
            CanvasElement::new("title", ElementType::Text, ".card .title"),
            CanvasElement::new("body", ElementType::Text, ".card .body"),
            CanvasElement::new("other", ElementType::Rectangle, ".other"),
        ];
        let analysis = LayoutAnalyzer::default().analyze(&elements);

        assert_eq!(analysis.containers.len(), 1);
        let card = analysis.container("card").unwrap();
        assert_eq!(card.selector, ".card");
        assert_eq!(card.children, vec!["title".to_string(), "body".to_string()]);

        assert_eq!(analysis.hierarchies.len(), 2);
        assert_eq!(analysis.hierarchies[0].children.len(), 2);
    }
}
