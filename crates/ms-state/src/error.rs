use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("sub-space {0:?} already exists")]
    DuplicateSpace(String),

    #[error("entity {entity:?} already registered in {sub_space:?}")]
    DuplicateEntity { sub_space: String, entity: String },

    #[error("cell {0:?} already defined")]
    DuplicateCell(String),

    #[error("{what} {name:?} not found")]
    NotFound { what: &'static str, name: String },

    #[error("type mismatch at {cell}: expected {expected}, got {got}")]
    TypeMismatch {
        cell:     String,
        expected: &'static str,
        got:      &'static str,
    },

    #[error("cell {cell} holds {kind}, which is not numeric")]
    NotNumeric { cell: String, kind: &'static str },

    #[error("journal stopped after {applied} of {total} changes: {source}")]
    PartialJournal {
        applied: usize,
        total:   usize,
        #[source]
        source:  Box<StateError>,
    },
}

impl StateError {
    pub(crate) fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        StateError::NotFound { what, name: name.into() }
    }
}

pub type StateResult<T> = Result<T, StateError>;
