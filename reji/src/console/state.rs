use std::collections::{BTreeMap, HashMap};

use protocol::{BoardState, Contestant, OptionMark};

use crate::consts::*;
use super::question::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    NotStarted,
    First,
    Second,
    Third,
}

impl Stage {
    pub fn number(self) -> u8 {
        match self {
            Stage::NotStarted => 0,
            Stage::First => 1,
            Stage::Second => 2,
            Stage::Third => 3,
        }
    }

    /// Only the playable stages; `0` is never entered explicitly.
    pub fn playable(number: u8) -> Option<Self> {
        match number {
            1 => Some(Stage::First),
            2 => Some(Stage::Second),
            3 => Some(Stage::Third),
            _ => None,
        }
    }

    pub fn is_active(self) -> bool {
        self != Stage::NotStarted
    }
}

/// What the operator sees next to the question: marks per answer slot,
/// the lock indicator and whether the answer buttons are disabled.
#[derive(Debug, Clone, Default)]
pub struct Board {
    pub marks: [OptionMark; BOARD_SIZE],
    pub answer_locked: bool,
    pub controls_disabled: bool,
}

impl Board {
    pub fn reset(&mut self) {
        *self = Board::default();
    }

    pub fn select_only(&mut self, index: usize) {
        for (idx, mark) in self.marks.iter_mut().enumerate() {
            mark.selected = idx == index;
        }
    }
}

pub struct GameState {
    pub stage: Stage,
    pub stage_showed: bool,
    pub question: Option<Question>,
    pub selected: Option<usize>,
    pub question_locked: bool,
    pub wheel_result: Option<String>,
    pub is_time_out: bool,

    pub true_false: BTreeMap<usize, bool>,
    pub stage2_cursor: Option<usize>,

    pub stage3_current_player: usize,
    /// Last option each finalist picked, by finalist index.
    pub stage3_selections: HashMap<usize, usize>,
    pub finalists: Vec<Contestant>,
    pub finalists_fixed: bool,

    pub contestants: Vec<Contestant>,
    pub board: Board,
    pub epoch: u64,
    pub engine_ready: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self {
            stage: Stage::NotStarted,
            stage_showed: false,
            question: None,
            selected: None,
            question_locked: false,
            wheel_result: None,
            is_time_out: false,

            true_false: BTreeMap::new(),
            stage2_cursor: None,

            stage3_current_player: 0,
            stage3_selections: HashMap::new(),
            finalists: Vec::new(),
            finalists_fixed: false,

            contestants: Vec::new(),
            board: Board::default(),
            epoch: 0,
            engine_ready: false,
        }
    }

    /// Invalidates every timer tick and deferred reveal issued so far.
    pub fn next_epoch(&mut self) -> u64 {
        self.epoch += 1;
        self.epoch
    }

    /// Drops selection, lock and judgement state of the running question.
    pub fn clear_round(&mut self) {
        self.selected = None;
        self.question_locked = false;
        self.true_false.clear();
        self.stage2_cursor = None;
        self.board.reset();
    }

    /// Finalists once they are fixed, the whole roster before that.
    pub fn stage3_roster(&self) -> &[Contestant] {
        if self.finalists_fixed {
            &self.finalists
        } else {
            &self.contestants
        }
    }

    pub fn snapshot(&self, wall_connected: bool) -> BoardState {
        BoardState {
            stage: self.stage.number(),
            stage_showed: self.stage_showed,
            wheel_result: self.wheel_result.clone(),
            question: self.question.as_ref().map(Question::view),
            selected: self.selected.map(|idx| idx as u8),
            marks: self.board.marks.to_vec(),
            answer_locked: self.board.answer_locked,
            controls_disabled: self.board.controls_disabled,
            question_locked: self.question_locked,
            is_time_out: self.is_time_out,
            current_player: self.stage3_current_player as u8,
            finalists: self.finalists.clone(),
            engine_ready: self.engine_ready,
            wall_connected,
        }
    }
}
