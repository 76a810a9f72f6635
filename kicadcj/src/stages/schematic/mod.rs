//! Schematic stages: context init, symbols, wires and junctions, labels.

mod initialize;
mod labels;
mod symbols;
mod traces;

pub use initialize::InitializeSchematicContextStage;
pub use labels::CollectSchematicLabelsStage;
pub use symbols::CollectLibrarySymbolsStage;
pub use traces::CollectSchematicTracesStage;
