use crate::model::{Family, RelationshipType};

/// Errors surfaced by the genogram container, document import, and the
/// detail-form edits.
///
/// All variants are recoverable: the in-memory model is left untouched when
/// an operation returns an error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenogramError {
    /// An insert was attempted with an id that is already present.
    #[error("id {0} is already present")]
    DuplicateId(String),
    /// A relationship refers to a person that is not in the container.
    #[error("relationship {relationship} refers to missing person {person}")]
    DanglingReference { relationship: String, person: String },
    /// An imported payload does not have the expected shape.
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    /// A relationship type from the wrong family was offered to a
    /// restricted chooser.
    #[error("{found} is not a {expected} relationship")]
    WrongFamily {
        expected: Family,
        found: RelationshipType,
    },
}

impl From<serde_json::Error> for GenogramError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedDocument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GenogramError>;
