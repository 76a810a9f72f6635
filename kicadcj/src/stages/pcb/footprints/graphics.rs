use super::Placement;
use crate::circuit_json::PcbSilkscreenPath;
use crate::context::ConverterContext;
use crate::defaults;
use crate::parser::Footprint;
use crate::stages::pcb::layers::graphic_layer;
use crate::stages::pcb::shapes::graphic_route;

/// Lines, arcs, circles, rects and polygons of one footprint, from any layer.
pub(super) fn process_graphics(
    ctx: &mut ConverterContext,
    placement: &Placement,
    component_id: &str,
    footprint: &Footprint,
) {
    let resolution = ctx.options.arc_resolution;
    let scale = placement.transform.scale_factor();

    for item in &footprint.graphics {
        let Some(route) = graphic_route(item, |p| placement.to_board(p), scale, resolution) else {
            continue;
        };
        ctx.db.pcb_silkscreen_path.insert(PcbSilkscreenPath {
            pcb_component_id: component_id.to_string(),
            layer: graphic_layer(item.layer.as_deref()),
            route,
            stroke_width: item
                .width
                .unwrap_or(defaults::silkscreen::FOOTPRINT_STROKE_WIDTH),
            ..Default::default()
        });
    }
}
