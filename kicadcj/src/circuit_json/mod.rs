//! Circuit JSON record types
//!
//! Every record carries a store-assigned id field named `<table>_id` and
//! serializes with a `type` tag equal to its table name once wrapped in
//! [`CircuitJsonElement`]. All coordinates are target space: Y up, origin at
//! the board center (board) or the sheet center (schematic).

pub mod db;

pub use db::{CircuitJsonDb, CircuitJsonRecord, Table};

use serde::{Serialize, Serializer};
use std::fmt;

/// Target-space point
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Board layer as seen by Circuit JSON consumers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayerRef {
    #[default]
    Top,
    Bottom,
    /// `In1.Cu` → `inner1`
    Inner(u32),
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerRef::Top => write!(f, "top"),
            LayerRef::Bottom => write!(f, "bottom"),
            LayerRef::Inner(n) => write!(f, "inner{}", n),
        }
    }
}

impl Serialize for LayerRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Electrical type of a source component
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentType {
    Resistor,
    Capacitor,
    Inductor,
    Diode,
    Led,
    Transistor,
    #[default]
    Chip,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SourceComponent {
    pub source_component_id: String,
    pub name: String,
    pub ftype: ComponentType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_part_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchematicComponent {
    pub schematic_component_id: String,
    pub source_component_id: String,
    pub center: Point,
    pub size: Size,
    pub rotation: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingDirection {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchematicPort {
    pub schematic_port_id: String,
    pub schematic_component_id: String,
    /// Relative to the owning component's center
    pub center: Point,
    pub facing_direction: FacingDirection,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pin_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SchematicEdge {
    pub from: Point,
    pub to: Point,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchematicTrace {
    pub schematic_trace_id: String,
    pub edges: Vec<SchematicEdge>,
    pub junctions: Vec<Point>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSide {
    #[default]
    Left,
    Right,
    Top,
    Bottom,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchematicNetLabel {
    pub schematic_net_label_id: String,
    pub text: String,
    pub center: Point,
    pub anchor_side: AnchorSide,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcbBoard {
    pub pcb_board_id: String,
    pub center: Point,
    pub width: f64,
    pub height: f64,
    pub thickness: f64,
    pub outline: Vec<Point>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcbComponent {
    pub pcb_component_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_component_id: Option<String>,
    pub center: Point,
    pub layer: LayerRef,
    pub rotation: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmtPadShape {
    Circle,
    #[default]
    Rect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcbSmtPad {
    pub pcb_smtpad_id: String,
    pub pcb_component_id: String,
    pub x: f64,
    pub y: f64,
    pub shape: SmtPadShape,
    pub width: f64,
    pub height: f64,
    pub layer: LayerRef,
    pub port_hints: Vec<String>,
}

/// Plated hole geometry, flattened into the record with a `shape` tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PlatedHoleShape {
    Circle {
        hole_diameter: f64,
        outer_diameter: f64,
    },
    Pill {
        hole_width: f64,
        hole_height: f64,
        outer_width: f64,
        outer_height: f64,
    },
    CircularHoleWithRectPad {
        hole_diameter: f64,
        rect_pad_width: f64,
        rect_pad_height: f64,
    },
    PillHoleWithRectPad {
        hole_width: f64,
        hole_height: f64,
        rect_pad_width: f64,
        rect_pad_height: f64,
    },
}

impl Default for PlatedHoleShape {
    fn default() -> Self {
        PlatedHoleShape::Circle {
            hole_diameter: 0.0,
            outer_diameter: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcbPlatedHole {
    pub pcb_plated_hole_id: String,
    pub pcb_component_id: String,
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub shape: PlatedHoleShape,
    pub layers: Vec<LayerRef>,
    pub port_hints: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HoleShape {
    #[default]
    Circle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcbHole {
    pub pcb_hole_id: String,
    pub x: f64,
    pub y: f64,
    pub hole_shape: HoleShape,
    pub hole_diameter: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcbVia {
    pub pcb_via_id: String,
    pub x: f64,
    pub y: f64,
    pub outer_diameter: f64,
    pub hole_diameter: f64,
    pub from_layer: LayerRef,
    pub to_layer: LayerRef,
    pub layers: Vec<LayerRef>,
    pub net_name: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteType {
    #[default]
    Wire,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PcbTraceRoutePoint {
    pub route_type: RouteType,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub layer: LayerRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcbTrace {
    pub pcb_trace_id: String,
    pub net_name: String,
    pub route: Vec<PcbTraceRoutePoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcbSilkscreenText {
    pub pcb_silkscreen_text_id: String,
    /// Empty for board-level text
    pub pcb_component_id: String,
    pub font: String,
    pub font_size: f64,
    pub text: String,
    pub anchor_position: Point,
    pub layer: LayerRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PcbSilkscreenPath {
    pub pcb_silkscreen_path_id: String,
    /// Empty for board-level paths
    pub pcb_component_id: String,
    pub layer: LayerRef,
    pub route: Vec<Point>,
    pub stroke_width: f64,
}

/// One output element, tagged with its table name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CircuitJsonElement {
    SourceComponent(SourceComponent),
    SchematicComponent(SchematicComponent),
    SchematicPort(SchematicPort),
    SchematicTrace(SchematicTrace),
    SchematicNetLabel(SchematicNetLabel),
    PcbBoard(PcbBoard),
    PcbComponent(PcbComponent),
    PcbSmtpad(PcbSmtPad),
    PcbPlatedHole(PcbPlatedHole),
    PcbHole(PcbHole),
    PcbVia(PcbVia),
    PcbTrace(PcbTrace),
    PcbSilkscreenText(PcbSilkscreenText),
    PcbSilkscreenPath(PcbSilkscreenPath),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layer_ref_serializes_as_name() {
        assert_eq!(serde_json::to_value(LayerRef::Bottom).unwrap(), json!("bottom"));
        assert_eq!(serde_json::to_value(LayerRef::Inner(2)).unwrap(), json!("inner2"));
    }

    #[test]
    fn test_element_carries_type_tag() {
        let element = CircuitJsonElement::PcbSmtpad(PcbSmtPad {
            pcb_smtpad_id: "pcb_smtpad_0".to_string(),
            shape: SmtPadShape::Circle,
            ..Default::default()
        });
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["type"], "pcb_smtpad");
        assert_eq!(value["shape"], "circle");
        assert_eq!(value["layer"], "top");
    }

    #[test]
    fn test_plated_hole_shape_is_flattened() {
        let element = CircuitJsonElement::PcbPlatedHole(PcbPlatedHole {
            pcb_plated_hole_id: "pcb_plated_hole_0".to_string(),
            shape: PlatedHoleShape::Pill {
                hole_width: 0.6,
                hole_height: 1.2,
                outer_width: 1.2,
                outer_height: 2.0,
            },
            layers: vec![LayerRef::Top, LayerRef::Bottom],
            ..Default::default()
        });
        let value = serde_json::to_value(&element).unwrap();
        assert_eq!(value["type"], "pcb_plated_hole");
        assert_eq!(value["shape"], "pill");
        assert_eq!(value["outer_height"], 2.0);
        assert_eq!(value["layers"], json!(["top", "bottom"]));
    }

    #[test]
    fn test_optional_fields_are_omitted() {
        let value = serde_json::to_value(CircuitJsonElement::SourceComponent(SourceComponent {
            source_component_id: "source_component_0".to_string(),
            name: "Device:R".to_string(),
            ftype: ComponentType::Resistor,
            manufacturer_part_number: None,
        }))
        .unwrap();
        assert_eq!(value["ftype"], "resistor");
        assert!(value.get("manufacturer_part_number").is_none());
    }
}
