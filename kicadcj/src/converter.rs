//! Pipeline controller
//!
//! Owns the input files, the conversion context and the stage list. Stages
//! are built lazily on the first [`KicadToCircuitJsonConverter::step`] so
//! that configuration and parse errors surface in one place.

use std::path::Path;
use std::rc::Rc;

use tracing::{debug, info};

use crate::circuit_json::{CircuitJsonDb, CircuitJsonElement};
use crate::context::{ConversionStats, ConverterContext};
use crate::error::ConvertError;
use crate::options::ConversionOptions;
use crate::parser::{PcbParser, SchematicParser};
use crate::stages::{pcb_stages, schematic_stages, ConverterStage, Stage};

const PCB_EXTENSION: &str = "kicad_pcb";
const SCH_EXTENSION: &str = "kicad_sch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    NotStarted,
    /// Index of the stage currently being stepped
    Running(usize),
    Finished,
}

pub struct KicadToCircuitJsonConverter {
    /// (path, contents) in the order they were added
    files: Vec<(String, String)>,
    ctx: ConverterContext,
    stages: Vec<Stage>,
    state: PipelineState,
    /// Steps taken by the current stage
    iterations: usize,
}

impl KicadToCircuitJsonConverter {
    pub fn new() -> Self {
        Self::with_options(ConversionOptions::default())
    }

    pub fn with_options(options: ConversionOptions) -> Self {
        Self {
            files: Vec::new(),
            ctx: ConverterContext::new(options),
            stages: Vec::new(),
            state: PipelineState::NotStarted,
            iterations: 0,
        }
    }

    /// Add an input file. Adding the same path twice replaces its contents.
    /// Files added after the pipeline started are ignored.
    pub fn add_file(&mut self, path: impl Into<String>, contents: impl Into<String>) {
        let path = path.into();
        let contents = contents.into();
        match self.files.iter_mut().find(|(p, _)| *p == path) {
            Some(entry) => entry.1 = contents,
            None => self.files.push((path, contents)),
        }
    }

    /// Pick the board and schematic inputs, parse them and build the stage
    /// list. Idempotent once it has succeeded.
    pub fn initialize_pipeline(&mut self) -> Result<(), ConvertError> {
        if self.state != PipelineState::NotStarted {
            return Ok(());
        }

        let pcb_file = single_file_with_extension(&self.files, PCB_EXTENSION)?;
        let sch_file = single_file_with_extension(&self.files, SCH_EXTENSION)?;

        let mut stages = Vec::new();
        if let Some((path, contents)) = sch_file {
            debug!(file = %path, "Parsing schematic");
            let doc = SchematicParser::parse_schematic_str(contents, path)?;
            self.ctx.kicad_sch = Some(Rc::new(doc));
            stages.extend(schematic_stages());
        }
        if let Some((path, contents)) = pcb_file {
            debug!(file = %path, "Parsing board");
            let doc = PcbParser::parse_pcb_str(contents, path)?;
            self.ctx.kicad_pcb = Some(Rc::new(doc));
            stages.extend(pcb_stages());
        }

        self.stages = stages;
        self.iterations = 0;
        if self.stages.is_empty() {
            self.finish();
        } else {
            self.state = PipelineState::Running(0);
        }
        Ok(())
    }

    /// Perform one step of the current stage, initializing the pipeline first
    /// if needed. Does nothing once finished.
    pub fn step(&mut self) -> Result<(), ConvertError> {
        if self.state == PipelineState::NotStarted {
            self.initialize_pipeline()?;
        }
        let PipelineState::Running(index) = self.state else {
            return Ok(());
        };
        if index >= self.stages.len() {
            self.finish();
            return Ok(());
        }
        let stage = &mut self.stages[index];

        if self.iterations == 0 {
            debug!(stage = stage.name(), "Starting stage");
        }

        let ceiling = self.ctx.options.max_stage_iterations;
        if self.iterations >= ceiling {
            stage.force_finish();
            self.ctx.warn(format!(
                "Stage {} exceeded {} iterations, force-finishing",
                stage.name(),
                ceiling
            ));
        } else {
            stage.step(&mut self.ctx);
            self.iterations += 1;
        }

        if stage.finished() {
            debug!(
                stage = stage.name(),
                iterations = self.iterations,
                "Finished stage"
            );
            self.iterations = 0;
            if index + 1 < self.stages.len() {
                self.state = PipelineState::Running(index + 1);
            } else {
                self.finish();
            }
        }
        Ok(())
    }

    pub fn run_until_finished(&mut self) -> Result<(), ConvertError> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.state == PipelineState::Finished
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Name of the stage the next `step` will run
    pub fn current_stage(&self) -> Option<&'static str> {
        match self.state {
            PipelineState::Running(index) => self.stages.get(index).map(|s| s.name()),
            _ => None,
        }
    }

    /// Names of every stage in run order (empty before initialization)
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn db(&self) -> &CircuitJsonDb {
        &self.ctx.db
    }

    /// All emitted records, flattened in table order
    pub fn output(&self) -> Vec<CircuitJsonElement> {
        self.ctx.db.to_elements()
    }

    pub fn output_json(&self, pretty: bool) -> serde_json::Result<String> {
        let elements = self.output();
        if pretty {
            serde_json::to_string_pretty(&elements)
        } else {
            serde_json::to_string(&elements)
        }
    }

    pub fn warnings(&self) -> &[String] {
        &self.ctx.warnings
    }

    pub fn stats(&self) -> &ConversionStats {
        &self.ctx.stats
    }

    fn finish(&mut self) {
        self.state = PipelineState::Finished;
        let stats = &self.ctx.stats;
        info!(
            records = self.ctx.db.len(),
            components = stats.components,
            pads = stats.pads,
            vias = stats.vias,
            traces = stats.traces,
            labels = stats.labels,
            warnings = self.ctx.warnings.len(),
            "Conversion finished"
        );
    }
}

impl Default for KicadToCircuitJsonConverter {
    fn default() -> Self {
        Self::new()
    }
}

/// The one file whose extension matches, or an error naming the first two.
fn single_file_with_extension<'a>(
    files: &'a [(String, String)],
    extension: &str,
) -> Result<Option<(&'a str, &'a str)>, ConvertError> {
    let mut matching = files
        .iter()
        .filter(|(path, _)| Path::new(path).extension().and_then(|e| e.to_str()) == Some(extension));
    let first = matching.next();
    if let (Some((first, _)), Some((second, _))) = (first, matching.next()) {
        return Err(ConvertError::DuplicateFile {
            extension: format!(".{}", extension),
            first: first.clone(),
            second: second.clone(),
        });
    }
    Ok(first.map(|(path, contents)| (path.as_str(), contents.as_str())))
}
