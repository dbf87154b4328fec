use ms_interact::InteractError;
use ms_motion::MotionError;
use ms_state::StateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{what} {name:?} not found")]
    NotFound { what: &'static str, name: String },

    #[error("{what} {name:?} already registered")]
    Duplicate { what: &'static str, name: String },

    #[error("infeasible action: {0}")]
    Infeasible(String),

    /// The effect broke, or its journal stopped part way.  Changes applied
    /// before the failure stay applied.
    #[error("execution fault in {action} after {applied}/{total} changes: {detail}")]
    ExecutionFault {
        action:  String,
        applied: usize,
        total:   usize,
        detail:  String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("state error: {0}")]
    State(#[from] StateError),

    #[error("motion error: {0}")]
    Motion(#[from] MotionError),

    #[error("roster parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<InteractError> for ServerError {
    fn from(e: InteractError) -> Self {
        match e {
            InteractError::NotFound { what, name }  => ServerError::NotFound { what, name },
            InteractError::Duplicate { what, name } => ServerError::Duplicate { what, name },
            InteractError::Infeasible(msg)          => ServerError::Infeasible(msg),
            InteractError::Fault(msg)               => ServerError::ExecutionFault {
                action:  String::new(),
                applied: 0,
                total:   0,
                detail:  msg,
            },
            InteractError::State(s)                 => ServerError::State(s),
        }
    }
}

impl ServerError {
    pub(crate) fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        ServerError::NotFound { what, name: name.into() }
    }
}

pub type ServerResult<T> = Result<T, ServerError>;
