//! Board stages: context init, nets, footprints, traces, vias, graphics.

mod footprints;
mod graphics;
mod initialize;
pub mod layers;
mod nets;
pub mod shapes;
mod traces;
mod vias;

pub use footprints::CollectFootprintsStage;
pub use graphics::CollectGraphicsStage;
pub use initialize::InitializePcbContextStage;
pub use nets::CollectNetsStage;
pub use traces::CollectTracesStage;
pub use vias::CollectViasStage;
