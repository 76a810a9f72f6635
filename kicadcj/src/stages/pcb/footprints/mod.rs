//! Footprints → `pcb_component` plus pads, silkscreen graphics and text.
//!
//! Every child is positioned by [`Placement::to_board`]: the local offset is
//! rotated by the negated footprint angle, added to the anchor, then mapped
//! through the board transform.

mod graphics;
mod pads;
mod text;

use std::collections::HashSet;

use crate::circuit_json::{PcbComponent, Point, SourceComponent};
use crate::context::{infer_component_type, ConverterContext};
use crate::defaults;
use crate::geometry::{bounds, place_local};
use crate::parser::{Footprint, Point2};
use crate::stages::pcb::layers::side_of;
use crate::stages::{stage_state, ConverterStage};
use crate::transform::Transform;

#[derive(Debug, Default)]
pub struct CollectFootprintsStage {
    finished: bool,
    processed: HashSet<String>,
}

impl ConverterStage for CollectFootprintsStage {
    stage_state!("CollectFootprintsStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        self.finished = true;
        let (Some(pcb), Some(transform)) = (ctx.kicad_pcb.clone(), ctx.pcb_transform) else {
            return false;
        };

        for footprint in &pcb.footprints {
            let Some(uuid) = footprint.uuid.as_deref() else {
                ctx.warn(format!(
                    "Skipping footprint {} without uuid",
                    footprint.library_link.as_deref().unwrap_or("<unnamed>")
                ));
                continue;
            };
            if !self.processed.insert(uuid.to_string()) {
                continue;
            }
            process_footprint(ctx, &transform, uuid, footprint);
        }

        tracing::debug!("Collected {} footprints", self.processed.len());
        false
    }
}

/// Where a footprint sits on the board
#[derive(Debug, Clone, Copy)]
pub(crate) struct Placement {
    pub transform: Transform,
    pub anchor: Point2,
    pub angle: f64,
}

impl Placement {
    pub fn to_board(&self, local: Point2) -> Point {
        self.transform.apply(place_local(self.anchor, local, self.angle))
    }
}

/// Emit one footprint. Reprocessing a uuid that already has a component is
/// a no-op.
pub(crate) fn process_footprint(
    ctx: &mut ConverterContext,
    transform: &Transform,
    uuid: &str,
    footprint: &Footprint,
) {
    if ctx.footprint_uuid_to_component_id.contains_key(uuid) {
        return;
    }

    let placement = Placement {
        transform: *transform,
        anchor: footprint.position.map(|p| p.point()).unwrap_or_default(),
        angle: footprint.position.map(|p| p.angle_or_zero()).unwrap_or(0.),
    };

    let reference = footprint.reference();
    let key = footprint
        .library_link
        .as_deref()
        .or(reference)
        .unwrap_or(defaults::component::NAME)
        .to_string();
    let source_component_id = ctx.ensure_source_component(&key, || SourceComponent {
        name: key.clone(),
        ftype: infer_component_type(
            footprint.library_link.as_deref().unwrap_or_default(),
            reference.unwrap_or_default(),
        ),
        manufacturer_part_number: footprint.value().map(|v| v.to_string()),
        ..Default::default()
    });

    let (width, height) = pad_extents(footprint, placement.angle);
    let component_id = ctx
        .db
        .pcb_component
        .insert(PcbComponent {
            source_component_id: Some(source_component_id),
            center: transform.apply(placement.anchor),
            layer: side_of(footprint.layer.as_deref()),
            rotation: placement.angle,
            width,
            height,
            ..Default::default()
        })
        .pcb_component_id
        .clone();
    ctx.footprint_uuid_to_component_id
        .insert(uuid.to_string(), component_id.clone());

    for pad in &footprint.pads {
        pads::process_pad(ctx, &placement, &component_id, pad);
    }
    graphics::process_graphics(ctx, &placement, &component_id, footprint);
    text::process_text(ctx, &placement, &component_id, footprint);

    ctx.stats.components += 1;
}

/// Width and height covered by the pads, in board orientation.
fn pad_extents(footprint: &Footprint, angle: f64) -> (f64, f64) {
    let corners = footprint.pads.iter().flat_map(|pad| {
        let at = pad.position.map(|p| p.point()).unwrap_or_default();
        let (w, h) = pad
            .size
            .map(|s| (s.width, s.height))
            .unwrap_or(defaults::pad::SIZE);
        [
            Point::new(at.x - w / 2., at.y - h / 2.),
            Point::new(at.x + w / 2., at.y + h / 2.),
        ]
    });
    let Some(bb) = bounds(corners) else {
        return (0., 0.);
    };
    if is_quarter_turn(angle) {
        (bb.height(), bb.width())
    } else {
        (bb.width(), bb.height())
    }
}

/// True when `angle` normalizes into [45, 135) or [225, 315).
pub(crate) fn is_quarter_turn(angle: f64) -> bool {
    let a = angle.rem_euclid(360.);
    (45. ..135.).contains(&a) || (225. ..315.).contains(&a)
}
