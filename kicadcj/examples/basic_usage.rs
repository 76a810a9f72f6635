//! Basic usage: convert KiCad files and print a summary of the output.

use kicadcj::prelude::*;
use std::collections::BTreeMap;
use std::path::PathBuf;

fn main() -> Result<(), ConvertError> {
    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("Usage: cargo run --example basic_usage <file.kicad_pcb> [file.kicad_sch]");
        std::process::exit(1);
    }

    let options = ConversionOptions {
        arc_resolution: 0.05,
        ..Default::default()
    };
    let converter = convert_files(&paths, options)?;

    let mut counts: BTreeMap<&'static str, usize> = BTreeMap::new();
    for element in converter.output() {
        *counts.entry(element_type(&element)).or_default() += 1;
    }

    println!("Records:");
    for (kind, count) in &counts {
        println!("  {:<24} {}", kind, count);
    }

    let stats = converter.stats();
    println!();
    println!(
        "{} components, {} pads, {} vias, {} traces, {} labels",
        stats.components, stats.pads, stats.vias, stats.traces, stats.labels
    );

    if !converter.warnings().is_empty() {
        println!();
        println!("Warnings:");
        for warning in converter.warnings() {
            println!("  - {}", warning);
        }
    }

    Ok(())
}

fn element_type(element: &CircuitJsonElement) -> &'static str {
    match element {
        CircuitJsonElement::SourceComponent(_) => "source_component",
        CircuitJsonElement::SchematicComponent(_) => "schematic_component",
        CircuitJsonElement::SchematicPort(_) => "schematic_port",
        CircuitJsonElement::SchematicTrace(_) => "schematic_trace",
        CircuitJsonElement::SchematicNetLabel(_) => "schematic_net_label",
        CircuitJsonElement::PcbBoard(_) => "pcb_board",
        CircuitJsonElement::PcbComponent(_) => "pcb_component",
        CircuitJsonElement::PcbSmtpad(_) => "pcb_smtpad",
        CircuitJsonElement::PcbPlatedHole(_) => "pcb_plated_hole",
        CircuitJsonElement::PcbHole(_) => "pcb_hole",
        CircuitJsonElement::PcbVia(_) => "pcb_via",
        CircuitJsonElement::PcbTrace(_) => "pcb_trace",
        CircuitJsonElement::PcbSilkscreenText(_) => "pcb_silkscreen_text",
        CircuitJsonElement::PcbSilkscreenPath(_) => "pcb_silkscreen_path",
    }
}
