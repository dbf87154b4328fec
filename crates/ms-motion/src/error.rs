use thiserror::Error;

#[derive(Debug, Error)]
pub enum MotionError {
    #[error("invalid field: {0}")]
    InvalidField(String),

    #[error("invalid robot descriptor: {0}")]
    InvalidRobot(String),
}

pub type MotionResult<T> = Result<T, MotionError>;
