//! Shared state for one conversion run
//!
//! The context is created by the converter, handed to each stage by `&mut`
//! and dropped with the converter. Stages never talk to each other except
//! through the fields here.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use serde::Serialize;

use crate::circuit_json::{CircuitJsonDb, ComponentType, SourceComponent};
use crate::options::ConversionOptions;
use crate::parser::{PcbDocument, PcbNet, SchematicDocument};
use crate::transform::Transform;

/// Counters reported after a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub components: usize,
    pub pads: usize,
    pub vias: usize,
    pub traces: usize,
    pub labels: usize,
}

impl ConversionStats {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Net id → net name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetNameTable {
    names: BTreeMap<u32, String>,
}

impl NetNameTable {
    /// Declared names win. Unnamed nets become `Net-<id>`, except net 0
    /// ("no connection") which is always the empty string when unnamed.
    pub fn from_nets(nets: &[PcbNet]) -> Self {
        let mut names = BTreeMap::new();
        for net in nets {
            let name = match (net.id, net.name.as_deref()) {
                (_, Some(name)) if !name.is_empty() => name.to_string(),
                (0, _) => String::new(),
                (id, _) => format!("Net-{}", id),
            };
            names.insert(net.id, name);
        }
        names.entry(0).or_insert_with(String::new);
        Self { names }
    }

    /// Never fails: undeclared ids resolve to `Net-<id>`.
    pub fn name(&self, id: u32) -> String {
        self.names
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("Net-{}", id))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

pub struct ConverterContext {
    pub kicad_pcb: Option<Rc<PcbDocument>>,
    pub kicad_sch: Option<Rc<SchematicDocument>>,
    pub pcb_transform: Option<Transform>,
    pub sch_transform: Option<Transform>,
    pub net_names: Option<NetNameTable>,
    pub footprint_uuid_to_component_id: HashMap<String, String>,
    pub symbol_uuid_to_component_id: HashMap<String, String>,
    /// Dedup key (library id or footprint link) → source_component_id
    pub source_component_ids: HashMap<String, String>,
    pub warnings: Vec<String>,
    pub stats: ConversionStats,
    pub db: CircuitJsonDb,
    pub options: ConversionOptions,
}

impl ConverterContext {
    pub fn new(options: ConversionOptions) -> Self {
        Self {
            kicad_pcb: None,
            kicad_sch: None,
            pcb_transform: None,
            sch_transform: None,
            net_names: None,
            footprint_uuid_to_component_id: HashMap::new(),
            symbol_uuid_to_component_id: HashMap::new(),
            source_component_ids: HashMap::new(),
            warnings: Vec::new(),
            stats: ConversionStats::default(),
            db: CircuitJsonDb::new(),
            options,
        }
    }

    /// Record a diagnostic and log it.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    /// Id of the source component for `key`, inserting one built by `make`
    /// the first time the key is seen.
    pub fn ensure_source_component(
        &mut self,
        key: &str,
        make: impl FnOnce() -> SourceComponent,
    ) -> String {
        if let Some(id) = self.source_component_ids.get(key) {
            return id.clone();
        }
        let id = self.db.source_component.insert(make()).source_component_id.clone();
        self.source_component_ids.insert(key.to_string(), id.clone());
        id
    }
}

impl Default for ConverterContext {
    fn default() -> Self {
        Self::new(ConversionOptions::default())
    }
}

/// Electrical type from a library id (`Device:R_Small`) or a reference
/// designator (`R12`). LED is checked before the single-letter prefixes.
pub fn infer_component_type(lib_id: &str, reference: &str) -> ComponentType {
    let part = lib_id
        .rsplit(':')
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    let prefix: String = reference
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_uppercase();

    let part_is = |name: &str| part == name || part.starts_with(&format!("{}_", name));

    if part.starts_with("led") || prefix == "LED" {
        ComponentType::Led
    } else if part_is("r") || prefix == "R" {
        ComponentType::Resistor
    } else if part_is("c") || prefix == "C" {
        ComponentType::Capacitor
    } else if part_is("l") || prefix == "L" {
        ComponentType::Inductor
    } else if part_is("d") || prefix == "D" {
        ComponentType::Diode
    } else if part_is("q") || prefix == "Q" {
        ComponentType::Transistor
    } else {
        ComponentType::Chip
    }
}
