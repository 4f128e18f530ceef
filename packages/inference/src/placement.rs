use crate::options::PlacementOptions;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use stylebridge_canvas::{CanvasElement, FlexDirection, LayoutAnalysis, LayoutKind, Position};
use tracing::{debug, instrument};

/// Supplies the x offset for elements no container placed
pub trait FallbackPlacement {
    fn name(&self) -> &'static str;

    /// Offset from the left margin for the `index`-th fallback element
    fn x_offset(&mut self, index: usize) -> f64;
}

/// Pure index-based staircase: 0, step, 2*step, ... wrapping every `period`
#[derive(Debug, Clone)]
pub struct IndexOffset {
    pub step: f64,
    pub period: usize,
}

impl Default for IndexOffset {
    fn default() -> Self {
        Self {
            step: 24.0,
            period: 8,
        }
    }
}

impl FallbackPlacement for IndexOffset {
    fn name(&self) -> &'static str {
        "index-offset"
    }

    fn x_offset(&mut self, index: usize) -> f64 {
        (index % self.period.max(1)) as f64 * self.step
    }
}

/// Reproducible random jitter from a seeded generator
#[derive(Debug, Clone)]
pub struct SeededJitter {
    rng: StdRng,
    max_offset: f64,
}

impl SeededJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_offset: 200.0,
        }
    }
}

impl FallbackPlacement for SeededJitter {
    fn name(&self) -> &'static str {
        "seeded-jitter"
    }

    fn x_offset(&mut self, _index: usize) -> f64 {
        self.rng.gen_range(0.0..self.max_offset).round()
    }
}

/// Ids of the elements that received a position, in placement order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlacementReport {
    pub by_container: Vec<String>,
    pub by_fallback: Vec<String>,
}

impl PlacementReport {
    pub fn len(&self) -> usize {
        self.by_container.len() + self.by_fallback.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Assigns initial coordinates to elements lacking a manual position
pub struct PlacementEngine {
    options: PlacementOptions,
    fallback: Box<dyn FallbackPlacement>,
}

impl PlacementEngine {
    pub fn new(options: PlacementOptions) -> Self {
        Self {
            options,
            fallback: Box::new(IndexOffset::default()),
        }
    }

    pub fn with_fallback(mut self, fallback: Box<dyn FallbackPlacement>) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn options(&self) -> &PlacementOptions {
        &self.options
    }

    fn may_place(&self, element: &CanvasElement, placed: &HashSet<usize>, index: usize) -> bool {
        !placed.contains(&index) && (!self.options.preserve_positions || element.needs_placement())
    }

    /// Fill in positions: containers stack top to bottom, children follow
    /// their container's direction, everything else goes to the fallback.
    #[instrument(skip_all, fields(elements = elements.len(), fallback = self.fallback.name()))]
    pub fn place(
        &mut self,
        elements: &mut [CanvasElement],
        analysis: &LayoutAnalysis,
    ) -> PlacementReport {
        let index_of: HashMap<String, usize> = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
        let mut placed: HashSet<usize> = HashSet::new();
        let mut report = PlacementReport::default();
        let mut cursor_y = self.options.margin;

        for container in &analysis.containers {
            let Some(&container_index) = index_of.get(&container.id) else {
                continue;
            };

            let stacked = self.may_place(&elements[container_index], &placed, container_index);
            if stacked {
                elements[container_index].position =
                    Some(Position::new(self.options.margin, cursor_y));
                placed.insert(container_index);
                report.by_container.push(container.id.clone());
            }

            let origin = elements[container_index].position_or_origin();
            let children: Vec<usize> = container
                .children
                .iter()
                .filter_map(|id| index_of.get(id).copied())
                .filter(|&i| self.may_place(&elements[i], &placed, i))
                .collect();

            let mut bottom = origin.y + elements[container_index].size.height;
            for (slot, &child) in children.iter().enumerate() {
                let position = self.child_position(
                    container.kind,
                    container.properties.effective_direction(),
                    origin,
                    slot,
                    &children,
                    elements,
                );
                elements[child].position = Some(position);
                placed.insert(child);
                report.by_container.push(elements[child].id.clone());
                bottom = bottom.max(position.y + elements[child].size.height + self.options.gutter);
            }

            if stacked {
                cursor_y = bottom + self.options.spacing;
            }
        }

        let mut fallback_index = 0;
        for index in 0..elements.len() {
            if !self.may_place(&elements[index], &placed, index) {
                continue;
            }
            let x = self.options.margin + self.fallback.x_offset(fallback_index);
            elements[index].position = Some(Position::new(x, cursor_y));
            cursor_y += elements[index].size.height + self.options.gutter;
            placed.insert(index);
            report.by_fallback.push(elements[index].id.clone());
            fallback_index += 1;
        }

        debug!(
            by_container = report.by_container.len(),
            by_fallback = report.by_fallback.len(),
            "Placement complete"
        );
        report
    }

    /// Position of the `slot`-th child being laid out in a container
    fn child_position(
        &self,
        kind: LayoutKind,
        direction: FlexDirection,
        origin: Position,
        slot: usize,
        children: &[usize],
        elements: &[CanvasElement],
    ) -> Position {
        let gutter = self.options.gutter;
        let start_x = origin.x + gutter;
        let start_y = origin.y + gutter;
        let preceding = &children[..slot];

        match (kind, direction) {
            (LayoutKind::Grid, _) => {
                let columns = self.options.grid_columns.max(1);
                let cell_width = children
                    .iter()
                    .map(|&i| elements[i].size.width)
                    .fold(0.0, f64::max);
                let cell_height = children
                    .iter()
                    .map(|&i| elements[i].size.height)
                    .fold(0.0, f64::max);
                let (row, col) = (slot / columns, slot % columns);
                Position::new(
                    start_x + col as f64 * (cell_width + gutter),
                    start_y + row as f64 * (cell_height + gutter),
                )
            }
            (LayoutKind::Flexbox, FlexDirection::Row) => {
                let offset: f64 = preceding
                    .iter()
                    .map(|&i| elements[i].size.width + gutter)
                    .sum();
                Position::new(start_x + offset, start_y)
            }
            (LayoutKind::Flexbox, FlexDirection::Column) => {
                let offset: f64 = preceding
                    .iter()
                    .map(|&i| elements[i].size.height + gutter)
                    .sum();
                Position::new(start_x, start_y + offset)
            }
        }
    }
}
