use ms_server::ServerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedError {
    #[error("scheduler configuration error: {0}")]
    Config(String),

    #[error("server error: {0}")]
    Server(#[from] ServerError),
}

pub type SchedResult<T> = Result<T, SchedError>;
