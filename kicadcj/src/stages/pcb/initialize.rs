use crate::context::ConverterContext;
use crate::stages::{stage_state, ConverterStage};
use crate::transform::board_transform;

/// Builds the board transform from the Edge.Cuts outline.
#[derive(Debug, Default)]
pub struct InitializePcbContextStage {
    finished: bool,
}

impl ConverterStage for InitializePcbContextStage {
    stage_state!("InitializePcbContextStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        if let Some(pcb) = ctx.kicad_pcb.as_deref() {
            let transform = board_transform(pcb);
            tracing::debug!(
                "Board transform for {}: offset ({:.3}, {:.3})",
                pcb.filename,
                transform.b[0],
                transform.b[1]
            );
            ctx.pcb_transform = Some(transform);
        }
        self.finished = true;
        false
    }
}
