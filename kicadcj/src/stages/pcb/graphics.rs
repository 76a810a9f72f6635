use crate::circuit_json::{PcbBoard, PcbSilkscreenPath, PcbSilkscreenText};
use crate::context::ConverterContext;
use crate::defaults;
use crate::geometry::{assemble_outline, bounds};
use crate::parser::{GraphicItem, GraphicKind, PcbDocument};
use crate::stages::pcb::layers::{graphic_layer, is_edge_cuts, is_silkscreen};
use crate::stages::pcb::shapes::{graphic_route, route_segments};
use crate::stages::{stage_state, ConverterStage};
use crate::transform::Transform;

/// Board-level graphics: the Edge.Cuts outline becomes the `pcb_board`,
/// silkscreen shapes become paths, and text becomes silkscreen text.
#[derive(Debug, Default)]
pub struct CollectGraphicsStage {
    finished: bool,
}

impl ConverterStage for CollectGraphicsStage {
    stage_state!("CollectGraphicsStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        self.finished = true;
        let (Some(pcb), Some(transform)) = (ctx.kicad_pcb.clone(), ctx.pcb_transform) else {
            return false;
        };

        collect_outline(ctx, &pcb, &transform);

        let resolution = ctx.options.arc_resolution;
        let scale = transform.scale_factor();
        for item in &pcb.graphics {
            let layer = item.layer.as_deref().unwrap_or_default();
            if item.kind == GraphicKind::Text {
                // Fab text is kept here, unlike footprint text
                if layer.contains("SilkS") || layer.contains(".Cu") || layer.contains("Fab") {
                    emit_text(ctx, item, &transform);
                }
                continue;
            }
            if !is_silkscreen(layer) {
                continue;
            }
            let Some(route) = graphic_route(item, |p| transform.apply(p), scale, resolution)
            else {
                continue;
            };
            ctx.db.pcb_silkscreen_path.insert(PcbSilkscreenPath {
                pcb_component_id: String::new(),
                layer: graphic_layer(item.layer.as_deref()),
                route,
                stroke_width: item
                    .width
                    .unwrap_or(defaults::silkscreen::BOARD_STROKE_WIDTH),
                ..Default::default()
            });
        }

        false
    }
}

/// Assemble Edge.Cuts geometry into the board outline. An existing board
/// record is updated in place.
fn collect_outline(ctx: &mut ConverterContext, pcb: &PcbDocument, transform: &Transform) {
    let resolution = ctx.options.arc_resolution;
    let scale = transform.scale_factor();

    let mut segments = Vec::new();
    for item in pcb
        .graphics
        .iter()
        .filter(|g| g.layer.as_deref().map_or(false, is_edge_cuts))
    {
        if let Some(route) = graphic_route(item, |p| transform.apply(p), scale, resolution) {
            segments.extend(route_segments(&route));
        }
    }
    if segments.is_empty() {
        return;
    }

    let outline = assemble_outline(segments);
    let Some(bb) = bounds(outline.iter().copied()) else {
        return;
    };
    let thickness = pcb.thickness.unwrap_or(defaults::board::THICKNESS);

    tracing::debug!(
        "Board outline: {} points, {:.3} x {:.3}",
        outline.len(),
        bb.width(),
        bb.height()
    );

    if let Some(board) = ctx.db.pcb_board.first_mut() {
        board.center = bb.center();
        board.width = bb.width();
        board.height = bb.height();
        board.thickness = thickness;
        board.outline = outline;
        return;
    }
    ctx.db.pcb_board.insert(PcbBoard {
        center: bb.center(),
        width: bb.width(),
        height: bb.height(),
        thickness,
        outline,
        ..Default::default()
    });
}

fn emit_text(ctx: &mut ConverterContext, item: &GraphicItem, transform: &Transform) {
    if item.hidden {
        return;
    }
    let anchor = item.position.map(|p| p.point()).unwrap_or_default();
    let font_size = item.font_size.unwrap_or(defaults::text::FONT_SIZE) * ctx.options.font_scale;
    ctx.db.pcb_silkscreen_text.insert(PcbSilkscreenText {
        pcb_component_id: String::new(),
        font: defaults::text::FONT.to_string(),
        font_size,
        text: item.text.clone().unwrap_or_default(),
        anchor_position: transform.apply(anchor),
        layer: graphic_layer(item.layer.as_deref()),
        ..Default::default()
    });
}
