use serde::{Serialize, Deserialize};
use crate::BinCodeMessage;
use crate::Contestant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Operator-side marks of one answer slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OptionMark {
    pub selected: bool,
    pub correct: bool,
    pub wrong: bool,
    pub disabled: bool,
    /// Stage-2 judgement shown on the true/false indicator.
    pub judged: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct QuestionView {
    pub id: u32,
    pub text: String,
    pub options: Vec<String>,
    pub points: u32,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BoardState {
    pub stage: u8,
    pub stage_showed: bool,
    pub wheel_result: Option<String>,
    pub question: Option<QuestionView>,
    pub selected: Option<u8>,
    pub marks: Vec<OptionMark>,
    pub answer_locked: bool,
    pub controls_disabled: bool,
    pub question_locked: bool,
    pub is_time_out: bool,
    pub current_player: u8,
    pub finalists: Vec<Contestant>,
    pub engine_ready: bool,
    pub wall_connected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PanelResponse {
    Notice {
        level: NoticeLevel,
        msg: String,
    },
    Board(BoardState),
    Contestants(Vec<Contestant>),
    CountDown(u8),
    /// Raw json of a button click relayed from the display.
    ButtonClick {
        data: String,
    },
    Reload,
}

impl BinCodeMessage<'_> for PanelResponse {}
