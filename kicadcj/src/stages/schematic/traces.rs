use crate::circuit_json::{SchematicEdge, SchematicTrace};
use crate::context::ConverterContext;
use crate::stages::{stage_state, ConverterStage};

/// Wires become one trace each. Junctions become their own edge-less
/// traces; they are not merged into the wires they touch.
#[derive(Debug, Default)]
pub struct CollectSchematicTracesStage {
    finished: bool,
}

impl ConverterStage for CollectSchematicTracesStage {
    stage_state!("CollectSchematicTracesStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        self.finished = true;
        let (Some(sch), Some(transform)) = (ctx.kicad_sch.clone(), ctx.sch_transform) else {
            return false;
        };

        for wire in sch.wires.iter().filter(|w| w.points.len() >= 2) {
            let edges = wire
                .points
                .windows(2)
                .map(|pair| SchematicEdge {
                    from: transform.apply(pair[0]),
                    to: transform.apply(pair[1]),
                })
                .collect();
            ctx.db.schematic_trace.insert(SchematicTrace {
                edges,
                ..Default::default()
            });
            ctx.stats.traces += 1;
        }

        for junction in &sch.junctions {
            let Some(position) = junction.position else {
                continue;
            };
            ctx.db.schematic_trace.insert(SchematicTrace {
                edges: Vec::new(),
                junctions: vec![transform.apply(position.point())],
                ..Default::default()
            });
        }

        false
    }
}
