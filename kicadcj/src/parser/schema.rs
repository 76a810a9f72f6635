//! Schematic Schema Definitions
//!
//! Data structures for a parsed KiCad schematic (.kicad_sch). Reuses the
//! board's [`Point2`]/[`Position`] types; schematic units are also mm.

use crate::parser::pcb_schema::{Point2, Position};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchematicDocument {
    pub filename: String,
    pub version: Option<String>,
    pub paper: Option<Paper>,
    pub lib_symbols: Vec<LibSymbol>,
    pub symbols: Vec<SymbolInstance>,
    pub wires: Vec<Wire>,
    pub junctions: Vec<Junction>,
    pub labels: Vec<Label>,
}

impl SchematicDocument {
    pub fn lib_symbol(&self, lib_id: &str) -> Option<&LibSymbol> {
        self.lib_symbols.iter().find(|s| s.lib_id == lib_id)
    }
}

/// `(paper "A4")`, `(paper "A3" portrait)` or `(paper "User" 200 100)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub size: String,
    pub portrait: bool,
    /// Only present for `User` paper
    pub custom: Option<(f64, f64)>,
}

/// A symbol definition from the embedded `(lib_symbols ...)` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibSymbol {
    pub lib_id: String,
    /// Pins of every unit, in file order
    pub pins: Vec<LibPin>,
}

/// `(pin passive line (at 0 3.81 270) (length 1.27) (name "~") (number "1"))`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibPin {
    pub electrical_type: Option<String>,
    /// Connection point, library coordinates (Y up)
    pub position: Option<Position>,
    pub length: Option<f64>,
    pub name: Option<String>,
    pub number: Option<String>,
    /// Unit the pin belongs to; 0 means shared by every unit
    pub unit: u32,
}

/// A placed symbol
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolInstance {
    pub uuid: Option<String>,
    pub lib_id: Option<String>,
    pub position: Option<Position>,
    pub unit: Option<u32>,
    pub properties: Vec<(String, String)>,
}

impl SymbolInstance {
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn reference(&self) -> Option<&str> {
        self.property("Reference").filter(|r| !r.is_empty())
    }

    pub fn value(&self) -> Option<&str> {
        self.property("Value").filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wire {
    pub uuid: Option<String>,
    pub points: Vec<Point2>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Junction {
    pub uuid: Option<String>,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Label {
    pub uuid: Option<String>,
    pub text: String,
    pub position: Option<Position>,
    pub label_type: LabelType,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LabelType {
    Local,
    Global,
    Hierarchical,
}
