//! PCB Schema Definitions
//!
//! Data structures for a parsed KiCad PCB file (.kicad_pcb).
//! Every geometric field is optional: the converter decides what a missing
//! value means, the parser only records what the file declares.

use serde::{Deserialize, Serialize};

/// A complete parsed board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PcbDocument {
    pub filename: String,
    pub version: Option<String>,
    pub generator: Option<String>,
    pub thickness: Option<f64>,   // Board thickness in mm
    pub layers: Vec<PcbLayer>,
    pub nets: Vec<PcbNet>,
    pub footprints: Vec<Footprint>,
    pub segments: Vec<Segment>,
    pub vias: Vec<Via>,
    pub graphics: Vec<GraphicItem>,
}

/// Layer table entry: `(0 "F.Cu" signal)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcbLayer {
    pub ordinal: u32,
    pub canonical_name: String,
    pub layer_type: String,
    pub user_name: Option<String>,
}

/// `(net 3 "VCC")`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PcbNet {
    pub id: u32,
    pub name: Option<String>,
}

/// Source-space point (mm, Y down)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// `(at X Y [ANGLE])`
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub angle: Option<f64>,
}

impl Position {
    pub fn point(&self) -> Point2 {
        Point2::new(self.x, self.y)
    }

    pub fn angle_or_zero(&self) -> f64 {
        self.angle.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

/// Footprint placed on the board
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Footprint {
    /// `uuid`, or `tstamp` on files written before KiCad 6
    pub uuid: Option<String>,
    pub library_link: Option<String>,
    pub layer: Option<String>,
    pub position: Option<Position>,
    pub properties: Vec<FootprintProperty>,
    pub texts: Vec<FootprintText>,
    pub pads: Vec<Pad>,
    pub graphics: Vec<GraphicItem>,
}

impl Footprint {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn text_of_kind(&self, kind: &FootprintTextKind) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| &t.kind == kind)
            .map(|t| t.text.as_str())
    }

    /// Reference designator from the property (KiCad 7+) or fp_text (KiCad 6 and older).
    pub fn reference(&self) -> Option<&str> {
        self.property("Reference")
            .or_else(|| self.text_of_kind(&FootprintTextKind::Reference))
            .filter(|r| !r.is_empty())
    }

    pub fn value(&self) -> Option<&str> {
        self.property("Value")
            .or_else(|| self.text_of_kind(&FootprintTextKind::Value))
            .filter(|v| !v.is_empty())
    }
}

/// `(property "Reference" "R1" (at 0 -1.5 0) (layer "F.SilkS") (effects ...))`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FootprintProperty {
    pub key: String,
    pub value: String,
    pub position: Option<Position>,
    pub layer: Option<String>,
    pub font_size: Option<f64>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum FootprintTextKind {
    Reference,
    Value,
    User,
    Other(String),
}

impl From<&str> for FootprintTextKind {
    fn from(s: &str) -> Self {
        match s {
            "reference" => FootprintTextKind::Reference,
            "value" => FootprintTextKind::Value,
            "user" => FootprintTextKind::User,
            other => FootprintTextKind::Other(other.to_string()),
        }
    }
}

/// `(fp_text user "${REFERENCE}" (at 0 0) (layer "F.SilkS") ...)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FootprintText {
    pub kind: FootprintTextKind,
    pub text: String,
    pub position: Option<Position>,
    pub layer: Option<String>,
    pub font_size: Option<f64>,
    pub hidden: bool,
}

/// Pad on a footprint; `position` is relative to the footprint anchor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pad {
    pub number: Option<String>,
    pub pad_type: Option<PadType>,
    pub shape: Option<PadShape>,
    pub position: Option<Position>,
    pub size: Option<Size2D>,
    pub drill: Option<Drill>,
    pub layers: Vec<String>,
    pub net: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PadType {
    ThruHole,
    Smd,
    Connect,
    NpThruHole,
    Other(String),
}

impl From<&str> for PadType {
    fn from(s: &str) -> Self {
        match s {
            "thru_hole" => PadType::ThruHole,
            "smd" => PadType::Smd,
            "connect" => PadType::Connect,
            "np_thru_hole" => PadType::NpThruHole,
            other => PadType::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum PadShape {
    Circle,
    Rect,
    Square,
    Oval,
    Trapezoid,
    RoundRect,
    Custom,
    Other(String),
}

impl From<&str> for PadShape {
    fn from(s: &str) -> Self {
        match s {
            "circle" => PadShape::Circle,
            "rect" => PadShape::Rect,
            "square" => PadShape::Square,
            "oval" => PadShape::Oval,
            "trapezoid" => PadShape::Trapezoid,
            "roundrect" => PadShape::RoundRect,
            "custom" => PadShape::Custom,
            other => PadShape::Other(other.to_string()),
        }
    }
}

/// `(drill 0.8)` or `(drill oval 1.0 2.0 (offset 0 0.1))`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Drill {
    pub oval: bool,
    pub diameter: Option<f64>,
    /// Second dimension of an oval drill
    pub height: Option<f64>,
    pub offset: Option<Point2>,
}

impl Drill {
    /// Width and height of an oval drill; a round drill is its diameter both ways.
    pub fn dimensions(&self) -> Option<(f64, f64)> {
        let width = self.diameter?;
        Some((width, self.height.unwrap_or(width)))
    }
}

/// Straight copper track: `(segment (start ..) (end ..) (width ..) (layer ..) (net ..))`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Segment {
    pub uuid: Option<String>,
    pub start: Option<Point2>,
    pub end: Option<Point2>,
    pub width: Option<f64>,
    pub layer: Option<String>,
    pub net: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Via {
    pub uuid: Option<String>,
    pub position: Option<Position>,
    pub size: Option<f64>,
    pub drill: Option<f64>,
    pub layers: Vec<String>,
    pub net: Option<u32>,
}

/// Board- or footprint-level graphic primitive (`gr_*` / `fp_*`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphicItem {
    pub kind: GraphicKind,
    pub layer: Option<String>,
    pub start: Option<Point2>,
    pub mid: Option<Point2>,
    pub end: Option<Point2>,
    pub center: Option<Point2>,
    pub points: Vec<Point2>,
    pub width: Option<f64>,
    pub fill: bool,
    /// Text content and placement, only for `GraphicKind::Text`
    pub text: Option<String>,
    pub position: Option<Position>,
    pub font_size: Option<f64>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GraphicKind {
    #[default]
    Line,
    Arc,
    Circle,
    Rect,
    Polygon,
    Text,
}

impl GraphicKind {
    /// Maps `gr_line`/`fp_line` style tags, ignoring the prefix.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let suffix = tag
            .strip_prefix("gr_")
            .or_else(|| tag.strip_prefix("fp_"))?;
        match suffix {
            "line" => Some(GraphicKind::Line),
            "arc" => Some(GraphicKind::Arc),
            "circle" => Some(GraphicKind::Circle),
            "rect" => Some(GraphicKind::Rect),
            "poly" => Some(GraphicKind::Polygon),
            "text" => Some(GraphicKind::Text),
            _ => None,
        }
    }
}
