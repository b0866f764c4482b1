use protocol::NoticeLevel;
use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("start a stage first")]
    NoActiveStage,
    #[error("spin the wheel first")]
    WheelNotSpun,
    #[error("pick an option first")]
    NoSelection,
    #[error("load a question first")]
    NoQuestion,
    #[error("there is no stage {0}")]
    InvalidStage(u8),
    #[error("not available in stage {0}")]
    WrongStage(u8),
    #[error("option {0} does not exist")]
    OptionOutOfRange(usize),
    #[error("stage 3 needs at least 2 contestants, {remaining} left")]
    InsufficientContestants { remaining: usize },
    #[error("contestant {0} not found")]
    ContestantNotFound(u32),
    #[error("point amount cannot be 0")]
    ZeroPoints,
    #[error("contestant name is empty")]
    EmptyName,
    #[error("{0:?} is not a colour")]
    InvalidColor(String),
    #[error("database schema mismatch, reloading: {0}")]
    Schema(String),
    #[error(transparent)]
    Collaborator(ApiError),
}

impl From<ApiError> for ConsoleError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Schema(msg) => ConsoleError::Schema(msg),
            other => ConsoleError::Collaborator(other),
        }
    }
}

impl ConsoleError {
    pub fn level(&self) -> NoticeLevel {
        match self {
            ConsoleError::ZeroPoints => NoticeLevel::Warning,
            _ => NoticeLevel::Error,
        }
    }

    /// Schema mismatches are recovered by reloading every panel.
    pub fn needs_reload(&self) -> bool {
        matches!(self, ConsoleError::Schema(_))
    }
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;
