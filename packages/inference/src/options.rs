/// Distance under which two elements count as visually grouped
pub const DEFAULT_PROXIMITY_THRESHOLD: f64 = 50.0;

/// Configuration for the placement engine
#[derive(Debug, Clone)]
pub struct PlacementOptions {
    /// Left edge for stacked containers and fallback placement
    pub margin: f64,

    /// Vertical space between stacked containers
    pub spacing: f64,

    /// Space between children inside a container, and container padding
    pub gutter: f64,

    /// Columns used when laying out grid container children
    pub grid_columns: usize,

    /// When true an existing non-origin position is never overwritten.
    /// When false every element is re-placed.
    pub preserve_positions: bool,
}

impl Default for PlacementOptions {
    fn default() -> Self {
        Self {
            margin: 40.0,
            spacing: 40.0,
            gutter: 16.0,
            grid_columns: 3,
            preserve_positions: true,
        }
    }
}

impl PlacementOptions {
    /// Options that let the engine overwrite every position
    pub fn overwrite() -> Self {
        Self {
            preserve_positions: false,
            ..Default::default()
        }
    }
}
