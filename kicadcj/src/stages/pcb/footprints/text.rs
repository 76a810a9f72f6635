use super::Placement;
use crate::circuit_json::PcbSilkscreenText;
use crate::context::ConverterContext;
use crate::defaults;
use crate::parser::{Footprint, FootprintTextKind, Position};
use crate::stages::pcb::layers::{graphic_layer, is_silkscreen};

/// Silkscreen text from layered properties (KiCad 7+) and `fp_text` items.
///
/// Only silkscreen layers are kept and hidden text is skipped. An `fp_text`
/// reference or value is dropped when a property with the same key exists.
pub(super) fn process_text(
    ctx: &mut ConverterContext,
    placement: &Placement,
    component_id: &str,
    footprint: &Footprint,
) {
    for property in &footprint.properties {
        if property.hidden {
            continue;
        }
        emit(
            ctx,
            placement,
            component_id,
            footprint,
            TextItem {
                text: &property.value,
                position: property.position,
                layer: property.layer.as_deref(),
                font_size: property.font_size,
            },
        );
    }

    for text in &footprint.texts {
        let shadowed = match text.kind {
            FootprintTextKind::Reference => footprint.property("Reference").is_some(),
            FootprintTextKind::Value => footprint.property("Value").is_some(),
            _ => false,
        };
        if shadowed || text.hidden {
            continue;
        }
        emit(
            ctx,
            placement,
            component_id,
            footprint,
            TextItem {
                text: &text.text,
                position: text.position,
                layer: text.layer.as_deref(),
                font_size: text.font_size,
            },
        );
    }
}

struct TextItem<'a> {
    text: &'a str,
    position: Option<Position>,
    layer: Option<&'a str>,
    font_size: Option<f64>,
}

fn emit(
    ctx: &mut ConverterContext,
    placement: &Placement,
    component_id: &str,
    footprint: &Footprint,
    item: TextItem<'_>,
) {
    match item.layer {
        Some(layer) if is_silkscreen(layer) => {}
        _ => return,
    }

    let local = item.position.map(|p| p.point()).unwrap_or_default();
    let font_size = item.font_size.unwrap_or(defaults::text::FONT_SIZE) * ctx.options.font_scale;

    ctx.db.pcb_silkscreen_text.insert(PcbSilkscreenText {
        pcb_component_id: component_id.to_string(),
        font: defaults::text::FONT.to_string(),
        font_size,
        text: substitute_variables(item.text, footprint),
        anchor_position: placement.to_board(local),
        layer: graphic_layer(item.layer),
        ..Default::default()
    });
}

/// Expand `${REFERENCE}` and `${VALUE}` from the footprint.
pub(crate) fn substitute_variables(text: &str, footprint: &Footprint) -> String {
    if !text.contains("${") {
        return text.to_string();
    }
    text.replace(
        "${REFERENCE}",
        footprint.reference().unwrap_or(defaults::text::REFERENCE),
    )
    .replace("${VALUE}", footprint.value().unwrap_or(defaults::text::VALUE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::FootprintProperty;

    fn footprint(reference: Option<&str>, value: Option<&str>) -> Footprint {
        let mut properties = Vec::new();
        if let Some(r) = reference {
            properties.push(FootprintProperty {
                key: "Reference".to_string(),
                value: r.to_string(),
                ..Default::default()
            });
        }
        if let Some(v) = value {
            properties.push(FootprintProperty {
                key: "Value".to_string(),
                value: v.to_string(),
                ..Default::default()
            });
        }
        Footprint {
            properties,
            ..Default::default()
        }
    }

    #[test]
    fn test_substitution() {
        let fp = footprint(Some("R7"), Some("4k7"));
        assert_eq!(substitute_variables("${REFERENCE}: ${VALUE}", &fp), "R7: 4k7");
        assert_eq!(substitute_variables("plain", &fp), "plain");
    }

    #[test]
    fn test_substitution_defaults() {
        let fp = footprint(None, None);
        assert_eq!(substitute_variables("${REFERENCE}", &fp), "?");
        assert_eq!(substitute_variables("[${VALUE}]", &fp), "[]");
    }
}
