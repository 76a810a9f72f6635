//! KiCad Schematic Parser
//!
//! Parses KiCad 6+ schematic files (.kicad_sch) following the S-expression
//! file format:
//! https://dev-docs.kicad.org/en/file-formats/sexpr-schematic/
//!
//! Key format details:
//! - All values are in millimeters, Y grows downward on the sheet
//! - Library symbols are embedded under (lib_symbols ...), with pins nested
//!   inside per-unit sub-symbols and positioned with Y growing upward
//! - Placed symbols reference their library symbol through (lib_id "Lib:Name")
//! - Points: (pts (xy X Y) ...)

use crate::parser::pcb::{parse_at, parse_pts};
use crate::parser::schema::*;
use crate::parser::sexp::{ParseError, SExp, SExpParser};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchematicParseError {
    #[error("S-expression parse error: {0}")]
    SExpParse(#[from] ParseError),
    #[error("Invalid schematic format: {0}")]
    InvalidFormat(String),
}

/// Parser for KiCad schematic files
pub struct SchematicParser;

impl SchematicParser {
    pub fn parse_schematic_str(
        content: &str,
        filename: &str,
    ) -> Result<SchematicDocument, SchematicParseError> {
        let root = SExpParser::new(content).parse()?;

        // Root should be (kicad_sch ...)
        let tag = root
            .tag()
            .ok_or_else(|| SchematicParseError::InvalidFormat("Expected kicad_sch root".to_string()))?;
        if tag != "kicad_sch" {
            return Err(SchematicParseError::InvalidFormat(format!(
                "Expected kicad_sch, found {}",
                tag
            )));
        }

        let mut schematic = SchematicDocument {
            filename: filename.to_string(),
            version: root.string_value("version"),
            ..Default::default()
        };

        for item in root.children() {
            match item.tag() {
                Some("paper") => schematic.paper = Self::parse_paper(item),
                Some("lib_symbols") => {
                    schematic.lib_symbols = item
                        .find_all("symbol")
                        .filter_map(Self::parse_lib_symbol)
                        .collect();
                }
                Some("symbol") => schematic.symbols.push(Self::parse_symbol(item)),
                Some("wire") => schematic.wires.push(Wire {
                    uuid: item.string_value("uuid"),
                    points: parse_pts(item),
                }),
                Some("junction") => schematic.junctions.push(Junction {
                    uuid: item.string_value("uuid"),
                    position: parse_at(item),
                }),
                Some("label") => schematic.labels.extend(Self::parse_label(item, LabelType::Local)),
                Some("global_label") => {
                    schematic.labels.extend(Self::parse_label(item, LabelType::Global))
                }
                Some("hierarchical_label") => {
                    schematic.labels.extend(Self::parse_label(item, LabelType::Hierarchical))
                }
                _ => {
                    // Ignore unknown elements
                }
            }
        }

        tracing::debug!(
            "Parsed {}: {} symbols, {} library symbols, {} wires, {} labels",
            filename,
            schematic.symbols.len(),
            schematic.lib_symbols.len(),
            schematic.wires.len(),
            schematic.labels.len()
        );

        Ok(schematic)
    }

    fn parse_paper(sexp: &SExp) -> Option<Paper> {
        let size = sexp.atom_at(0)?.to_string();
        let custom = if size == "User" {
            Some((sexp.float_at(1)?, sexp.float_at(2)?))
        } else {
            None
        };
        Some(Paper {
            size,
            portrait: sexp.has_flag("portrait"),
            custom,
        })
    }

    fn parse_lib_symbol(sexp: &SExp) -> Option<LibSymbol> {
        let lib_id = sexp.atom_at(0)?.to_string();
        let mut pins = Vec::new();
        Self::collect_pins(sexp, 0, &mut pins);
        Some(LibSymbol { lib_id, pins })
    }

    /// Pins live either directly on the symbol or inside unit sub-symbols
    /// named `NAME_UNIT_STYLE`, such as `(symbol "R_1_1" ...)`.
    fn collect_pins(sexp: &SExp, unit: u32, pins: &mut Vec<LibPin>) {
        for child in sexp.children() {
            match child.tag() {
                Some("pin") => pins.push(LibPin {
                    electrical_type: child.atom_at(0).map(|s| s.to_string()),
                    position: parse_at(child),
                    length: child.float_value("length"),
                    name: child.string_value("name"),
                    number: child.string_value("number"),
                    unit,
                }),
                Some("symbol") => {
                    let sub_unit = child.atom_at(0).and_then(sub_symbol_unit).unwrap_or(unit);
                    Self::collect_pins(child, sub_unit, pins)
                }
                _ => {}
            }
        }
    }

    fn parse_symbol(sexp: &SExp) -> SymbolInstance {
        // Format: (property "KEY" "VALUE" ...)
        let properties = sexp
            .find_all("property")
            .filter_map(|p| Some((p.atom_at(0)?.to_string(), p.atom_at(1)?.to_string())))
            .collect();

        SymbolInstance {
            uuid: sexp.string_value("uuid"),
            lib_id: sexp.string_value("lib_id"),
            position: parse_at(sexp),
            unit: sexp.string_value("unit").and_then(|u| u.parse().ok()),
            properties,
        }
    }

    /// Label text is the first argument: (label "TEXT" (at ...) ...)
    fn parse_label(sexp: &SExp, label_type: LabelType) -> Option<Label> {
        Some(Label {
            uuid: sexp.string_value("uuid"),
            text: sexp.atom_at(0)?.to_string(),
            position: parse_at(sexp),
            label_type,
        })
    }
}

/// Unit number from a sub-symbol name: `"OpAmp_2_1"` → 2.
fn sub_symbol_unit(name: &str) -> Option<u32> {
    let mut parts = name.rsplitn(3, '_');
    let _style = parts.next()?;
    let unit = parts.next()?.parse().ok()?;
    parts.next()?;
    Some(unit)
}
