//! kicadcj CLI - convert KiCad PCB and schematic files to Circuit JSON from the command line.

use clap::{Parser, Subcommand};
use kicadcj::stages::{pcb_stages, schematic_stages, ConverterStage};
use kicadcj::{convert_files, ConversionOptions, ConvertError, KicadToCircuitJsonConverter};
use std::path::{Path, PathBuf};
use std::process;

/// Bad input set or unparseable file
const EXIT_INPUT: i32 = 1;
/// Reading an input or writing the output failed
const EXIT_IO: i32 = 2;

#[derive(Parser)]
#[command(name = "kicadcj")]
#[command(about = "Convert KiCad PCB and schematic files to Circuit JSON", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a .kicad_pcb and/or .kicad_sch file into one Circuit JSON array
    Convert {
        /// Input files; at most one per extension
        #[arg(value_name = "FILES", required = true)]
        files: Vec<PathBuf>,

        /// Write the JSON here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,

        /// Print record counts to stderr
        #[arg(long)]
        stats: bool,

        /// Steps a stage may take before it is force-finished
        #[arg(long, value_name = "N")]
        max_stage_iterations: Option<usize>,
    },

    /// List conversion stages in run order
    Stages,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match cli.command {
        Commands::Convert {
            files,
            output,
            pretty,
            stats,
            max_stage_iterations,
        } => handle_convert(&files, output.as_deref(), pretty, stats, max_stage_iterations),
        Commands::Stages => {
            handle_stages();
            0
        }
    };

    process::exit(exit_code);
}

/// Logs go to stderr so stdout stays valid JSON.
fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_convert(
    files: &[PathBuf],
    output: Option<&Path>,
    pretty: bool,
    stats: bool,
    max_stage_iterations: Option<usize>,
) -> i32 {
    let mut options = ConversionOptions::default();
    if let Some(n) = max_stage_iterations {
        options.max_stage_iterations = n;
    }

    let converter = match convert_files(files, options) {
        Ok(converter) => converter,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_code_for(&e);
        }
    };

    let json = match converter.output_json(pretty) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_INPUT;
        }
    };

    let written = match output {
        Some(path) => {
            tracing::debug!(path = %path.display(), "Writing Circuit JSON");
            std::fs::write(path, json + "\n")
        }
        None => {
            println!("{}", json);
            Ok(())
        }
    };
    if let Err(e) = written {
        eprintln!("Error: IO error: {}", e);
        return EXIT_IO;
    }

    if stats {
        output_stats(&converter);
    }
    0
}

fn exit_code_for(error: &ConvertError) -> i32 {
    if error.is_io() {
        EXIT_IO
    } else {
        EXIT_INPUT
    }
}

fn output_stats(converter: &KicadToCircuitJsonConverter) {
    let stats = converter.stats();
    eprintln!("Records:    {}", converter.db().len());
    eprintln!("Components: {}", stats.components);
    eprintln!("Pads:       {}", stats.pads);
    eprintln!("Vias:       {}", stats.vias);
    eprintln!("Traces:     {}", stats.traces);
    eprintln!("Labels:     {}", stats.labels);
    eprintln!("Warnings:   {}", converter.warnings().len());
}

fn handle_stages() {
    println!("Schematic stages (when a .kicad_sch is given):");
    for stage in schematic_stages() {
        println!("  {}", stage.name());
    }
    println!();
    println!("Board stages (when a .kicad_pcb is given):");
    for stage in pcb_stages() {
        println!("  {}", stage.name());
    }
}
