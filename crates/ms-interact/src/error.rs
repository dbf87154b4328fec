use ms_state::StateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InteractError {
    /// The action cannot be performed in the current state.  Expected;
    /// reported to the caller as an unsuccessful action.
    #[error("infeasible: {0}")]
    Infeasible(String),

    /// The effect function itself broke.
    #[error("effect fault: {0}")]
    Fault(String),

    #[error("{what} {name:?} not found")]
    NotFound { what: &'static str, name: String },

    #[error("{what} {name:?} already registered")]
    Duplicate { what: &'static str, name: String },

    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl InteractError {
    pub fn infeasible(msg: impl Into<String>) -> Self {
        InteractError::Infeasible(msg.into())
    }

    pub fn is_infeasible(&self) -> bool {
        matches!(self, InteractError::Infeasible(_))
    }
}

pub type InteractResult<T> = Result<T, InteractError>;
