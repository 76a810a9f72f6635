//! Fallback values for data a KiCad file leaves out, grouped per entity kind.

pub mod pad {
    /// Pad size when `(size ...)` is missing (width, height)
    pub const SIZE: (f64, f64) = (1.0, 1.0);
    /// Plated hole drill when `(drill ...)` is missing
    pub const PLATED_DRILL: f64 = 0.8;
}

pub mod hole {
    /// Non-plated hole drill when `(drill ...)` is missing
    pub const DRILL: f64 = 1.0;
}

pub mod via {
    pub const OUTER_DIAMETER: f64 = 0.8;
    pub const HOLE_DIAMETER: f64 = 0.4;
    pub const FROM_LAYER: &str = "F.Cu";
    pub const TO_LAYER: &str = "B.Cu";
}

pub mod trace {
    pub const WIDTH: f64 = 0.2;
}

pub mod silkscreen {
    /// Board-level (`gr_*`) stroke width
    pub const BOARD_STROKE_WIDTH: f64 = 0.15;
    /// Footprint-level (`fp_*`) stroke width
    pub const FOOTPRINT_STROKE_WIDTH: f64 = 0.12;
}

pub mod text {
    /// Declared text height when `(effects (font (size ...)))` is missing
    pub const FONT_SIZE: f64 = 1.0;
    pub const FONT: &str = "tscircuit2024";
    /// Substituted for `${REFERENCE}` when the footprint has no reference
    pub const REFERENCE: &str = "?";
    /// Substituted for `${VALUE}` when the footprint has no value
    pub const VALUE: &str = "";
}

pub mod board {
    pub const THICKNESS: f64 = 1.6;
}

pub mod component {
    /// Name used when a footprint or symbol has neither reference nor library id
    pub const NAME: &str = "U?";
}

pub mod schematic {
    /// A4 landscape, in mm, used when the sheet declares no paper. The sheet
    /// center always follows the declared paper, so points are not centered
    /// on a fixed portrait A4 center of (105, 148.5).
    pub const PAPER_SIZE: (f64, f64) = (297.0, 210.0);
    /// Smallest emitted schematic component edge
    pub const MIN_COMPONENT_SIZE: f64 = 1.0;
}
