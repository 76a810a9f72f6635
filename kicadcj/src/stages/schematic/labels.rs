use crate::circuit_json::{AnchorSide, SchematicNetLabel};
use crate::context::ConverterContext;
use crate::stages::{stage_state, ConverterStage};

/// Local, global and hierarchical labels → `schematic_net_label`.
#[derive(Debug, Default)]
pub struct CollectSchematicLabelsStage {
    finished: bool,
}

impl ConverterStage for CollectSchematicLabelsStage {
    stage_state!("CollectSchematicLabelsStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        self.finished = true;
        let (Some(sch), Some(transform)) = (ctx.kicad_sch.clone(), ctx.sch_transform) else {
            return false;
        };

        for label in &sch.labels {
            let Some(position) = label.position else {
                ctx.warn(format!("Skipping label {:?} without position", label.text));
                continue;
            };
            ctx.db.schematic_net_label.insert(SchematicNetLabel {
                text: label.text.clone(),
                center: transform.apply(position.point()),
                anchor_side: anchor_side(position.angle_or_zero()),
                ..Default::default()
            });
            ctx.stats.labels += 1;
        }

        false
    }
}

/// The side of the text the connection point sits on.
fn anchor_side(angle: f64) -> AnchorSide {
    match quadrant(angle) {
        1 => AnchorSide::Bottom,
        2 => AnchorSide::Right,
        3 => AnchorSide::Top,
        _ => AnchorSide::Left,
    }
}

/// Nearest quarter turn: 0, 1, 2 or 3.
pub(crate) fn quadrant(angle: f64) -> u8 {
    ((angle.rem_euclid(360.) / 90.).round() as u8) % 4
}
