//! KiCad layer names → Circuit JSON layers

use crate::circuit_json::LayerRef;

/// Footprints and pads: anything on `B.Cu` or a `Back` layer is bottom.
pub fn is_back(layer: &str) -> bool {
    layer.contains("B.Cu") || layer.contains("Back")
}

pub fn side_of(layer: Option<&str>) -> LayerRef {
    match layer {
        Some(l) if is_back(l) => LayerRef::Bottom,
        _ => LayerRef::Top,
    }
}

pub fn pad_layer(layers: &[String]) -> LayerRef {
    if layers.iter().any(|l| l == "B.Cu" || l == "Back") {
        LayerRef::Bottom
    } else {
        LayerRef::Top
    }
}

/// Silkscreen, text and other non-copper layers: any `B.` layer is bottom.
pub fn graphic_layer(layer: Option<&str>) -> LayerRef {
    match layer {
        Some(l) if l.contains("B.") || l.contains("Back") => LayerRef::Bottom,
        _ => LayerRef::Top,
    }
}

/// Copper routing layers, including inner layers (`In2.Cu` → `inner2`).
pub fn copper_layer(layer: &str) -> LayerRef {
    if let Some(n) = layer
        .strip_prefix("In")
        .and_then(|rest| rest.strip_suffix(".Cu"))
        .and_then(|n| n.parse().ok())
    {
        return LayerRef::Inner(n);
    }
    if is_back(layer) {
        LayerRef::Bottom
    } else {
        LayerRef::Top
    }
}

pub fn is_silkscreen(layer: &str) -> bool {
    layer.contains("SilkS") || layer.contains("Silk")
}

pub fn is_edge_cuts(layer: &str) -> bool {
    layer.contains("Edge.Cuts")
}
