use crate::circuit_json::PcbVia;
use crate::context::ConverterContext;
use crate::defaults;
use crate::stages::pcb::layers::copper_layer;
use crate::stages::{stage_state, ConverterStage};

#[derive(Debug, Default)]
pub struct CollectViasStage {
    finished: bool,
}

impl ConverterStage for CollectViasStage {
    stage_state!("CollectViasStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        self.finished = true;
        let (Some(pcb), Some(transform), Some(nets)) = (
            ctx.kicad_pcb.clone(),
            ctx.pcb_transform,
            ctx.net_names.as_ref(),
        ) else {
            return false;
        };

        for via in &pcb.vias {
            let Some(position) = via.position else {
                // ctx.warn() would reborrow the net table
                let message = format!(
                    "Skipping via {} without position",
                    via.uuid.as_deref().unwrap_or("<no uuid>")
                );
                tracing::warn!("{}", message);
                ctx.warnings.push(message);
                continue;
            };
            let center = transform.apply(position.point());

            // Span collapses to the outermost layers
            let from = via
                .layers
                .first()
                .map(String::as_str)
                .unwrap_or(defaults::via::FROM_LAYER);
            let to = via
                .layers
                .last()
                .map(String::as_str)
                .unwrap_or(defaults::via::TO_LAYER);
            let (from_layer, to_layer) = (copper_layer(from), copper_layer(to));

            ctx.db.pcb_via.insert(PcbVia {
                x: center.x,
                y: center.y,
                outer_diameter: via.size.unwrap_or(defaults::via::OUTER_DIAMETER),
                hole_diameter: via.drill.unwrap_or(defaults::via::HOLE_DIAMETER),
                from_layer,
                to_layer,
                layers: vec![from_layer, to_layer],
                net_name: nets.name(via.net.unwrap_or(0)),
                ..Default::default()
            });
            ctx.stats.vias += 1;
        }

        false
    }
}
