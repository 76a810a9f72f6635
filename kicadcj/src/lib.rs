//! kicadcj - KiCad PCB and schematic to Circuit JSON conversion
//!
//! This library reads KiCad board (`.kicad_pcb`) and schematic
//! (`.kicad_sch`) files and emits a flat list of Circuit JSON records:
//! components, pads, holes, vias, traces, silkscreen, board outline,
//! schematic ports, wires and net labels.
//!
//! # Quick Start
//!
//! ```no_run
//! use kicadcj::{ConversionOptions, KicadToCircuitJsonConverter};
//!
//! let mut converter = KicadToCircuitJsonConverter::with_options(ConversionOptions::default());
//! converter.add_file("board.kicad_pcb", std::fs::read_to_string("board.kicad_pcb").unwrap());
//! converter.run_until_finished().unwrap();
//!
//! println!("{}", converter.output_json(true).unwrap());
//! for warning in converter.warnings() {
//!     eprintln!("warning: {}", warning);
//! }
//! ```
//!
//! # Features
//!
//! - **Board conversion**: footprints, SMD pads, plated and bare holes, vias,
//!   traces grouped per net and layer, silkscreen text and paths, board outline
//! - **Schematic conversion**: symbols with pin ports, wires, junctions, labels
//! - **Stepwise pipeline**: drive stages one step at a time or all at once

pub mod circuit_json;
pub mod context;
pub mod converter;
pub mod defaults;
pub mod error;
pub mod geometry;
pub mod options;
pub mod parser;
pub mod stages;
pub mod transform;

// Re-export main types
pub use circuit_json::{CircuitJsonDb, CircuitJsonElement};
pub use context::ConversionStats;
pub use converter::{KicadToCircuitJsonConverter, PipelineState};
pub use error::ConvertError;
pub use options::ConversionOptions;
pub use parser::{PcbDocument, PcbParser, SchematicDocument, SchematicParser};

use std::path::Path;

/// Read `paths` from disk and convert them in one run (convenience wrapper).
pub fn convert_files<P: AsRef<Path>>(
    paths: &[P],
    options: ConversionOptions,
) -> Result<KicadToCircuitJsonConverter, ConvertError> {
    let mut converter = KicadToCircuitJsonConverter::with_options(options);
    for path in paths {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        converter.add_file(path.to_string_lossy(), contents);
    }
    converter.run_until_finished()?;
    Ok(converter)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        convert_files, CircuitJsonElement, ConversionOptions, ConversionStats, ConvertError,
        KicadToCircuitJsonConverter,
    };
}
