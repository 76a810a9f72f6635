use crate::context::ConverterContext;
use crate::stages::{stage_state, ConverterStage};
use crate::transform::schematic_transform;

/// Builds the schematic transform around the sheet center.
#[derive(Debug, Default)]
pub struct InitializeSchematicContextStage {
    finished: bool,
}

impl ConverterStage for InitializeSchematicContextStage {
    stage_state!("InitializeSchematicContextStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        if let Some(sch) = ctx.kicad_sch.as_deref() {
            ctx.sch_transform = Some(schematic_transform(sch, ctx.options.schematic_scale));
        }
        self.finished = true;
        false
    }
}
