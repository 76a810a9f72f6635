//! KiCad PCB Parser
//!
//! Reads `.kicad_pcb` S-expression text into a [`PcbDocument`].
//!
//! Key format details:
//! - All values are in millimeters, Y grows downward
//! - Footprint children (pads, fp_text, fp_* graphics) are positioned
//!   relative to the footprint anchor
//! - Traces are stored as (segment ...) elements
//! - Anything not needed for conversion (zones, dimensions, setup) is skipped

use crate::parser::pcb_schema::*;
use crate::parser::sexp::{ParseError, SExp, SExpParser};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PcbParseError {
    #[error("S-expression parse error: {0}")]
    SExpParse(#[from] ParseError),
    #[error("Invalid PCB format: {0}")]
    InvalidFormat(String),
}

/// Parser for KiCad 6+ PCB files
pub struct PcbParser;

impl PcbParser {
    pub fn parse_pcb_str(content: &str, filename: &str) -> Result<PcbDocument, PcbParseError> {
        let root = SExpParser::new(content).parse()?;

        match root.tag() {
            Some("kicad_pcb") => {}
            Some(other) => {
                return Err(PcbParseError::InvalidFormat(format!(
                    "Expected kicad_pcb, found {}",
                    other
                )))
            }
            None => {
                return Err(PcbParseError::InvalidFormat(
                    "Expected kicad_pcb root".to_string(),
                ))
            }
        }

        let mut pcb = PcbDocument {
            filename: filename.to_string(),
            version: root.string_value("version"),
            generator: root.string_value("generator"),
            ..Default::default()
        };

        for item in root.children() {
            let Some(tag) = item.tag() else { continue };
            match tag {
                "general" => pcb.thickness = item.float_value("thickness"),
                "layers" => pcb.layers = Self::parse_layers(item),
                "net" => {
                    if let Some(net) = Self::parse_net(item) {
                        pcb.nets.push(net);
                    }
                }
                "footprint" | "module" => pcb.footprints.push(Self::parse_footprint(item)),
                "segment" => pcb.segments.push(Self::parse_segment(item)),
                "via" => pcb.vias.push(Self::parse_via(item)),
                _ => {
                    if let Some(kind) = tag.strip_prefix("gr_").and_then(|_| GraphicKind::from_tag(tag)) {
                        pcb.graphics.push(parse_graphic(item, kind));
                    }
                }
            }
        }

        tracing::debug!(
            "Parsed {}: {} footprints, {} segments, {} vias, {} graphics",
            filename,
            pcb.footprints.len(),
            pcb.segments.len(),
            pcb.vias.len(),
            pcb.graphics.len()
        );

        Ok(pcb)
    }

    fn parse_layers(sexp: &SExp) -> Vec<PcbLayer> {
        sexp.children()
            .filter_map(|layer| {
                let items = layer.as_list()?;
                let ordinal = items.first()?.as_atom()?.parse().ok()?;
                let canonical_name = items.get(1)?.as_atom()?.to_string();
                let layer_type = items
                    .get(2)
                    .and_then(|t| t.as_atom())
                    .unwrap_or("signal")
                    .to_string();
                let user_name = items.get(3).and_then(|n| n.as_atom()).map(|s| s.to_string());
                Some(PcbLayer {
                    ordinal,
                    canonical_name,
                    layer_type,
                    user_name,
                })
            })
            .collect()
    }

    fn parse_net(sexp: &SExp) -> Option<PcbNet> {
        let id = sexp.atom_at(0)?.parse().ok()?;
        let name = sexp.atom_at(1).map(|s| s.to_string());
        Some(PcbNet { id, name })
    }

    fn parse_footprint(sexp: &SExp) -> Footprint {
        let mut footprint = Footprint {
            uuid: sexp
                .string_value("uuid")
                .or_else(|| sexp.string_value("tstamp")),
            library_link: sexp.atom_at(0).map(|s| s.to_string()),
            layer: sexp.string_value("layer"),
            position: parse_at(sexp),
            ..Default::default()
        };

        for child in sexp.children() {
            let Some(tag) = child.tag() else { continue };
            match tag {
                "property" => {
                    if let Some(property) = Self::parse_property(child) {
                        footprint.properties.push(property);
                    }
                }
                "fp_text" => {
                    if let Some(text) = Self::parse_fp_text(child) {
                        footprint.texts.push(text);
                    }
                }
                "pad" => footprint.pads.push(Self::parse_pad(child)),
                _ => {
                    if let Some(kind) = tag.strip_prefix("fp_").and_then(|_| GraphicKind::from_tag(tag)) {
                        footprint.graphics.push(parse_graphic(child, kind));
                    }
                }
            }
        }

        footprint
    }

    fn parse_property(sexp: &SExp) -> Option<FootprintProperty> {
        Some(FootprintProperty {
            key: sexp.atom_at(0)?.to_string(),
            value: sexp.atom_at(1).unwrap_or("").to_string(),
            position: parse_at(sexp),
            layer: sexp.string_value("layer"),
            font_size: parse_font_size(sexp),
            hidden: is_hidden(sexp),
        })
    }

    fn parse_fp_text(sexp: &SExp) -> Option<FootprintText> {
        Some(FootprintText {
            kind: FootprintTextKind::from(sexp.atom_at(0)?),
            text: sexp.atom_at(1).unwrap_or("").to_string(),
            position: parse_at(sexp),
            layer: sexp.string_value("layer"),
            font_size: parse_font_size(sexp),
            hidden: is_hidden(sexp),
        })
    }

    fn parse_pad(sexp: &SExp) -> Pad {
        let size = sexp.find("size").and_then(|s| {
            Some(Size2D {
                width: s.float_at(0)?,
                height: s.float_at(1).or(s.float_at(0))?,
            })
        });

        let layers = sexp
            .find("layers")
            .map(|l| {
                l.args()
                    .iter()
                    .filter_map(|a| a.as_atom())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Pad {
            number: sexp.atom_at(0).map(|s| s.to_string()),
            pad_type: sexp.atom_at(1).map(PadType::from),
            shape: sexp.atom_at(2).map(PadShape::from),
            position: parse_at(sexp),
            size,
            drill: sexp.find("drill").map(Self::parse_drill),
            layers,
            net: sexp
                .find("net")
                .and_then(|n| n.atom_at(0))
                .and_then(|s| s.parse().ok()),
        }
    }

    fn parse_drill(sexp: &SExp) -> Drill {
        let oval = sexp.has_flag("oval");
        let mut dims = sexp
            .args()
            .iter()
            .filter_map(|a| a.as_atom())
            .filter_map(|s| s.parse::<f64>().ok());
        let diameter = dims.next();
        let height = dims.next();
        let offset = sexp.find("offset").and_then(|o| {
            Some(Point2::new(o.float_at(0)?, o.float_at(1)?))
        });
        Drill {
            oval,
            diameter,
            height,
            offset,
        }
    }

    fn parse_segment(sexp: &SExp) -> Segment {
        Segment {
            uuid: sexp.string_value("uuid").or_else(|| sexp.string_value("tstamp")),
            start: parse_point(sexp, "start"),
            end: parse_point(sexp, "end"),
            width: sexp.float_value("width"),
            layer: sexp.string_value("layer"),
            net: sexp
                .string_value("net")
                .and_then(|s| s.parse().ok()),
        }
    }

    fn parse_via(sexp: &SExp) -> Via {
        let layers = sexp
            .find("layers")
            .map(|l| {
                l.args()
                    .iter()
                    .filter_map(|a| a.as_atom())
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default();

        Via {
            uuid: sexp.string_value("uuid").or_else(|| sexp.string_value("tstamp")),
            position: parse_at(sexp),
            size: sexp.float_value("size"),
            drill: sexp.float_value("drill"),
            layers,
            net: sexp
                .string_value("net")
                .and_then(|s| s.parse().ok()),
        }
    }
}

/// `(at X Y [ANGLE])`
pub(crate) fn parse_at(sexp: &SExp) -> Option<Position> {
    let at = sexp.find("at")?;
    Some(Position {
        x: at.float_at(0)?,
        y: at.float_at(1)?,
        angle: at.float_at(2),
    })
}

/// `(KEY X Y)` such as `(start 1 2)`
pub(crate) fn parse_point(sexp: &SExp, key: &str) -> Option<Point2> {
    let p = sexp.find(key)?;
    Some(Point2::new(p.float_at(0)?, p.float_at(1)?))
}

/// `(pts (xy X Y) ...)`
pub(crate) fn parse_pts(sexp: &SExp) -> Vec<Point2> {
    sexp.find("pts")
        .map(|pts| {
            pts.find_all("xy")
                .filter_map(|xy| Some(Point2::new(xy.float_at(0)?, xy.float_at(1)?)))
                .collect()
        })
        .unwrap_or_default()
}

/// Text height from `(effects (font (size H W)))`
pub(crate) fn parse_font_size(sexp: &SExp) -> Option<f64> {
    sexp.find("effects")?
        .find("font")?
        .find("size")?
        .float_at(0)
}

/// `hide` as a bare flag (KiCad 6), `(hide yes)` (KiCad 8), or either inside `effects`
pub(crate) fn is_hidden(sexp: &SExp) -> bool {
    fn hidden_here(s: &SExp) -> bool {
        s.has_flag("hide")
            || s
                .find("hide")
                .map(|h| h.atom_at(0).map_or(true, |v| v == "yes"))
                .unwrap_or(false)
    }
    hidden_here(sexp) || sexp.find("effects").map(hidden_here).unwrap_or(false)
}

/// Stroke width from `(stroke (width W))` (KiCad 7+) or a bare `(width W)`
fn parse_stroke_width(sexp: &SExp) -> Option<f64> {
    sexp.find("stroke")
        .and_then(|s| s.float_value("width"))
        .or_else(|| sexp.float_value("width"))
}

fn parse_graphic(sexp: &SExp, kind: GraphicKind) -> GraphicItem {
    let fill = sexp
        .find("fill")
        .and_then(|f| f.atom_at(0).map(|s| s.to_string()).or_else(|| f.string_value("type")))
        .map(|v| v == "solid" || v == "yes")
        .unwrap_or(false);

    let mut item = GraphicItem {
        kind,
        layer: sexp.string_value("layer"),
        start: parse_point(sexp, "start"),
        mid: parse_point(sexp, "mid"),
        end: parse_point(sexp, "end"),
        center: parse_point(sexp, "center"),
        points: parse_pts(sexp),
        width: parse_stroke_width(sexp),
        fill,
        ..Default::default()
    };

    if kind == GraphicKind::Text {
        item.text = sexp.atom_at(0).map(|s| s.to_string());
        item.position = parse_at(sexp);
        item.font_size = parse_font_size(sexp);
        item.hidden = is_hidden(sexp);
    }

    item
}
