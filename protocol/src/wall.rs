use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Contestant, JsonMessage};

/// Per-statement outcome of a stage-2 reveal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementResult {
    pub index: usize,
    pub player_answer: bool,
    pub correct_answer: bool,
    pub is_correct: bool,
    pub was_answered: bool,
}

/// Messages sent to the display, framed as `{action, data}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "data", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WallNotice {
    ShowStageTransition {
        stage: u8,
    },
    ShowEliminateStage {},
    ShowLogo {},
    Waiting {},

    ShowQuestion {
        question: String,
        answers: Vec<String>,
        count_down: u32,
    },
    ShowStage2Question {
        question: String,
        statements: Vec<String>,
        correct: u8,
        points: u32,
        count_down: u32,
    },
    ShowStage3Question {
        text: String,
        options: Vec<String>,
        contestants: Vec<Contestant>,
        cur_player_index: usize,
    },
    HideQuestion {},
    HideStage2Question {},
    HideStage3Question {},

    HideUnityWheel {},
    ShowUnityWheel {
        wheel_type: u8,
        delay: f32,
    },
    SpinUnityWheel {
        result: String,
        stage: u8,
        target_date: String,
        spin_id: u64,
    },

    LockAnswerAt {
        option_index: usize,
    },
    SelectStage3Option {
        option_index: usize,
    },
    /// `selected_answer` is -1 when nothing was picked.
    ShowResult {
        selected_answer: i32,
        correct_answer: usize,
    },
    ShowStage2Result {
        results: Vec<StatementResult>,
    },
    ShowStage3Result {
        selected_index: usize,
        is_correct: bool,
    },
    SetStage2OptionState {
        index: usize,
        answer: bool,
    },
    UpdateStage3UpdatePlayerScore {
        contestants: Vec<Contestant>,
    },

    ShowScoreboard {
        contestants: Vec<Contestant>,
        stage: u8,
    },
    HideScoreboard {},
    SetColor {
        use_background: bool,
        color_hex: String,
    },
    Eliminate {
        name: String,
        id: u32,
    },
}

impl JsonMessage for WallNotice {}

/// Messages the display (and the engine embedded in it) sends back.
#[derive(Debug, Clone, PartialEq)]
pub enum WallSignal {
    Register,
    EngineReady,
    EngineState {
        wheel_result: Option<String>,
    },
    Stage2TimeUp,
    StopStage3Timer,
    Stage3PlayerTimeOut,
    ButtonClick(String),
}

#[derive(Debug, Default, Deserialize)]
struct Envelope {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    data: Value,
}

impl WallSignal {
    /// Unknown or malformed frames yield `None`.
    pub fn parse(text: &str) -> Option<Self> {
        let envelope: Envelope = serde_json::from_str(text).ok()?;
        match envelope.kind.as_deref() {
            Some("registerWall") => return Some(WallSignal::Register),
            Some("unityReady") => return Some(WallSignal::EngineReady),
            Some("unity_game_state") => {
                let wheel_result = envelope.data
                    .pointer("/wheelState/result")
                    .and_then(Value::as_str)
                    .filter(|result| !result.is_empty())
                    .map(str::to_string);
                return Some(WallSignal::EngineState { wheel_result });
            },
            Some("unity_button_click") => return Some(WallSignal::ButtonClick(envelope.data.to_string())),
            _ => {}
        }
        match envelope.action.as_deref()? {
            "stage2TimeUp" => Some(WallSignal::Stage2TimeUp),
            "stopStage3Timer" => Some(WallSignal::StopStage3Timer),
            "stage3PlayerTimeOut" => Some(WallSignal::Stage3PlayerTimeOut),
            _ => None,
        }
    }
}
