use serde::{Deserialize, Serialize};
use crate::BinCodeMessage;

/// Everything an operator panel can ask the console to do.
#[derive(Deserialize, Serialize, PartialEq, Debug, Clone)]
pub enum PanelRequest {
    StartStage {
        stage: u8,
    },
    StartEliminationStage,
    ResetGame,
    ShowLogo,
    ShowWaiting,
    ShowScoreboard,
    HideScoreboard,
    SetBackground {
        use_background: bool,
        color: String,
    },

    SpinWheel,
    BringWheel,

    LoadQuestion,
    SelectOption {
        index: u8,
    },
    LockAnswer,
    ShowResult,
    NextQuestion,

    JudgeStatement {
        index: u8,
        is_true: bool,
    },
    SelectStatement {
        index: u8,
    },
    MarkStatement {
        is_true: bool,
    },
    ResetStatements,

    LoadContestants,
    AddContestant {
        name: String,
        photo: Option<String>,
    },
    AdjustPoints {
        id: u32,
        points: i32,
    },
    Eliminate {
        id: u32,
    },
    DeleteContestant {
        id: u32,
    },
}

impl BinCodeMessage<'_> for PanelRequest {}
