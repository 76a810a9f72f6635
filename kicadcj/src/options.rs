use serde::{Deserialize, Serialize};

/// Tunables for a conversion run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    /// Steps a single stage may take before it is force-finished
    pub max_stage_iterations: usize,
    /// Target length of one polyline segment when discretizing arcs and circles
    pub arc_resolution: f64,
    /// Multiplier from KiCad text height to Circuit JSON font size
    pub font_scale: f64,
    /// Schematic units per Circuit JSON unit
    pub schematic_scale: f64,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            max_stage_iterations: 100,
            arc_resolution: 0.1,
            font_scale: 1.5,
            schematic_scale: 15.0,
        }
    }
}
