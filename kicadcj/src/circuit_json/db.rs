//! Append-only record store
//!
//! One [`Table`] per record kind. Records are never removed; the board table
//! additionally allows in-place updates of its single record.

use super::*;

/// A record that lives in a [`Table`] and owns a store-assigned id.
pub trait CircuitJsonRecord {
    /// Table name, also the id prefix and the output `type` tag
    const TABLE: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
}

macro_rules! impl_record {
    ($($ty:ty => $table:literal, $field:ident;)*) => {
        $(
            impl CircuitJsonRecord for $ty {
                const TABLE: &'static str = $table;

                fn id(&self) -> &str {
                    &self.$field
                }

                fn set_id(&mut self, id: String) {
                    self.$field = id;
                }
            }
        )*
    };
}

impl_record! {
    SourceComponent => "source_component", source_component_id;
    SchematicComponent => "schematic_component", schematic_component_id;
    SchematicPort => "schematic_port", schematic_port_id;
    SchematicTrace => "schematic_trace", schematic_trace_id;
    SchematicNetLabel => "schematic_net_label", schematic_net_label_id;
    PcbBoard => "pcb_board", pcb_board_id;
    PcbComponent => "pcb_component", pcb_component_id;
    PcbSmtPad => "pcb_smtpad", pcb_smtpad_id;
    PcbPlatedHole => "pcb_plated_hole", pcb_plated_hole_id;
    PcbHole => "pcb_hole", pcb_hole_id;
    PcbVia => "pcb_via", pcb_via_id;
    PcbTrace => "pcb_trace", pcb_trace_id;
    PcbSilkscreenText => "pcb_silkscreen_text", pcb_silkscreen_text_id;
    PcbSilkscreenPath => "pcb_silkscreen_path", pcb_silkscreen_path_id;
}

#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: CircuitJsonRecord> Table<T> {
    /// Assigns `<table>_<n>` and stores the record.
    pub fn insert(&mut self, mut record: T) -> &T {
        let index = self.rows.len();
        record.set_id(format!("{}_{}", T::TABLE, index));
        self.rows.push(record);
        &self.rows[index]
    }

    /// Records in insertion order
    pub fn list(&self) -> &[T] {
        &self.rows
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Table<PcbBoard> {
    /// The board singleton, for in-place outline updates
    pub fn first_mut(&mut self) -> Option<&mut PcbBoard> {
        self.rows.first_mut()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CircuitJsonDb {
    pub source_component: Table<SourceComponent>,
    pub schematic_component: Table<SchematicComponent>,
    pub schematic_port: Table<SchematicPort>,
    pub schematic_trace: Table<SchematicTrace>,
    pub schematic_net_label: Table<SchematicNetLabel>,
    pub pcb_board: Table<PcbBoard>,
    pub pcb_component: Table<PcbComponent>,
    pub pcb_smtpad: Table<PcbSmtPad>,
    pub pcb_plated_hole: Table<PcbPlatedHole>,
    pub pcb_hole: Table<PcbHole>,
    pub pcb_via: Table<PcbVia>,
    pub pcb_trace: Table<PcbTrace>,
    pub pcb_silkscreen_text: Table<PcbSilkscreenText>,
    pub pcb_silkscreen_path: Table<PcbSilkscreenPath>,
}

impl CircuitJsonDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// All tables flattened in a fixed order.
    pub fn to_elements(&self) -> Vec<CircuitJsonElement> {
        use CircuitJsonElement as E;

        let mut out = Vec::with_capacity(self.len());
        out.extend(self.source_component.list().iter().cloned().map(E::SourceComponent));
        out.extend(self.schematic_component.list().iter().cloned().map(E::SchematicComponent));
        out.extend(self.schematic_port.list().iter().cloned().map(E::SchematicPort));
        out.extend(self.schematic_trace.list().iter().cloned().map(E::SchematicTrace));
        out.extend(self.schematic_net_label.list().iter().cloned().map(E::SchematicNetLabel));
        out.extend(self.pcb_board.list().iter().cloned().map(E::PcbBoard));
        out.extend(self.pcb_component.list().iter().cloned().map(E::PcbComponent));
        out.extend(self.pcb_smtpad.list().iter().cloned().map(E::PcbSmtpad));
        out.extend(self.pcb_plated_hole.list().iter().cloned().map(E::PcbPlatedHole));
        out.extend(self.pcb_hole.list().iter().cloned().map(E::PcbHole));
        out.extend(self.pcb_via.list().iter().cloned().map(E::PcbVia));
        out.extend(self.pcb_trace.list().iter().cloned().map(E::PcbTrace));
        out.extend(self.pcb_silkscreen_text.list().iter().cloned().map(E::PcbSilkscreenText));
        out.extend(self.pcb_silkscreen_path.list().iter().cloned().map(E::PcbSilkscreenPath));
        out
    }

    /// Total record count across all tables
    pub fn len(&self) -> usize {
        self.source_component.len()
            + self.schematic_component.len()
            + self.schematic_port.len()
            + self.schematic_trace.len()
            + self.schematic_net_label.len()
            + self.pcb_board.len()
            + self.pcb_component.len()
            + self.pcb_smtpad.len()
            + self.pcb_plated_hole.len()
            + self.pcb_hole.len()
            + self.pcb_via.len()
            + self.pcb_trace.len()
            + self.pcb_silkscreen_text.len()
            + self.pcb_silkscreen_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
