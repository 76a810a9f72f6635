//! # Conversion stages
//!
//! A run is a fixed sequence of [`Stage`]s. Each stage reads the parsed
//! documents from the [`ConverterContext`], emits records into its store and
//! marks itself finished. Stages whose document or prerequisite is missing
//! finish without emitting anything.

use enum_dispatch::enum_dispatch;

use crate::context::ConverterContext;

pub mod pcb;
pub mod schematic;

pub use pcb::{
    CollectFootprintsStage, CollectGraphicsStage, CollectNetsStage, CollectTracesStage,
    CollectViasStage, InitializePcbContextStage,
};
pub use schematic::{
    CollectLibrarySymbolsStage, CollectSchematicLabelsStage, CollectSchematicTracesStage,
    InitializeSchematicContextStage,
};

/// # ConverterStage
///
/// Common stage operations, dispatched from the [Stage] enum to its variants by [enum_dispatch].
#[enum_dispatch]
pub trait ConverterStage {
    /// Name used in logs and warnings
    fn name(&self) -> &'static str;
    /// Perform one unit of work. Returns `true` while more work remains.
    fn step(&mut self, ctx: &mut ConverterContext) -> bool;
    fn finished(&self) -> bool;
    /// Stop the stage where it is
    fn force_finish(&mut self);
}

/// `name`, `finished` and `force_finish` for a stage struct with a
/// `finished: bool` field.
macro_rules! stage_state {
    ($name:literal) => {
        fn name(&self) -> &'static str {
            $name
        }

        fn finished(&self) -> bool {
            self.finished
        }

        fn force_finish(&mut self) {
            self.finished = true;
        }
    };
}
pub(crate) use stage_state;

#[enum_dispatch(ConverterStage)]
#[derive(Debug)]
pub enum Stage {
    InitializeSchematicContextStage(InitializeSchematicContextStage),
    CollectLibrarySymbolsStage(CollectLibrarySymbolsStage),
    CollectSchematicTracesStage(CollectSchematicTracesStage),
    CollectSchematicLabelsStage(CollectSchematicLabelsStage),
    InitializePcbContextStage(InitializePcbContextStage),
    CollectNetsStage(CollectNetsStage),
    CollectFootprintsStage(CollectFootprintsStage),
    CollectTracesStage(CollectTracesStage),
    CollectViasStage(CollectViasStage),
    CollectGraphicsStage(CollectGraphicsStage),
}

/// Stages run when a schematic is present, in order
pub fn schematic_stages() -> Vec<Stage> {
    vec![
        InitializeSchematicContextStage::default().into(),
        CollectLibrarySymbolsStage::default().into(),
        CollectSchematicTracesStage::default().into(),
        CollectSchematicLabelsStage::default().into(),
    ]
}

/// Stages run when a board is present, in order
pub fn pcb_stages() -> Vec<Stage> {
    vec![
        InitializePcbContextStage::default().into(),
        CollectNetsStage::default().into(),
        CollectFootprintsStage::default().into(),
        CollectTracesStage::default().into(),
        CollectViasStage::default().into(),
        CollectGraphicsStage::default().into(),
    ]
}
