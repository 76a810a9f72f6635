use crate::parser::{PcbParseError, SchematicParseError};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Multiple {extension} files provided: {first} and {second}")]
    DuplicateFile {
        extension: String,
        first: String,
        second: String,
    },
    #[error("Failed to parse PCB: {0}")]
    Pcb(#[from] PcbParseError),
    #[error("Failed to parse schematic: {0}")]
    Schematic(#[from] SchematicParseError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Whether the input set itself was invalid, as opposed to a file's contents
    pub fn is_configuration(&self) -> bool {
        matches!(self, ConvertError::DuplicateFile { .. })
    }

    pub fn is_io(&self) -> bool {
        matches!(self, ConvertError::Io(_))
    }
}
