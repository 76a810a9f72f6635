use crate::context::{ConverterContext, NetNameTable};
use crate::stages::{stage_state, ConverterStage};

/// Resolves net ids to names once, before anything looks them up.
#[derive(Debug, Default)]
pub struct CollectNetsStage {
    finished: bool,
}

impl ConverterStage for CollectNetsStage {
    stage_state!("CollectNetsStage");

    fn step(&mut self, ctx: &mut ConverterContext) -> bool {
        if ctx.net_names.is_none() {
            if let Some(pcb) = ctx.kicad_pcb.as_deref() {
                let table = NetNameTable::from_nets(&pcb.nets);
                tracing::debug!("Resolved {} nets", table.len());
                ctx.net_names = Some(table);
            }
        }
        self.finished = true;
        false
    }
}
