use log::info;

use protocol::{QuestionView, RawQuestion, RawStatement, WallNotice};

use crate::api::GameApi;
use crate::consts::*;
use super::{Console, ConsoleError, ConsoleResult, Stage};

#[derive(Debug, Clone, PartialEq)]
pub struct Classic {
    pub id: u32,
    pub text: String,
    pub options: [String; CLASSIC_OPTIONS],
    pub correct: usize,
    pub points: u32,
    pub hint: Option<String>,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub text: String,
    /// `None` when the bank gives no verdict; such statements are not scored.
    pub is_correct: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrueFalse {
    pub id: u32,
    pub text: String,
    pub statements: Vec<Statement>,
    pub points: u32,
    pub hint: Option<String>,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Elimination {
    pub id: u32,
    pub text: String,
    pub options: [String; BOARD_SIZE],
    pub correct: usize,
    pub points: u32,
    pub hint: Option<String>,
    pub date: String,
}

/// A loaded question, shaped by the stage it was fetched for.
#[derive(Debug, Clone, PartialEq)]
pub enum Question {
    Classic(Classic),
    TrueFalse(TrueFalse),
    Elimination(Elimination),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Classic,
    TrueFalse,
    Elimination,
}

fn placeholder(idx: usize) -> String {
    format!("Option {}", (b'A' + idx as u8) as char)
}

/// Answer letter to index. Unknown letters fall through to the last option.
fn answer_index(letter: Option<&str>, last: usize) -> usize {
    letter
        .and_then(|l| l.trim().chars().next())
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_uppercase)
        .map(|c| (c as u8 - b'A') as usize)
        .map_or(last, |idx| idx.min(last))
}

fn lettered<const N: usize>(raw: &RawQuestion) -> [String; N] {
    let given = raw.lettered_options();
    std::array::from_fn(|idx| given[idx].cloned().unwrap_or_else(|| placeholder(idx)))
}

impl Question {
    /// `None` for the not-started stage, which has no questions.
    pub fn normalize(stage: Stage, raw: RawQuestion) -> Option<Self> {
        let hint = raw.ipucu.clone().filter(|hint| !hint.is_empty());
        let date = raw.tarih.clone().unwrap_or_default();
        let points = raw.puan.unwrap_or(0);
        let question = match stage {
            Stage::NotStarted => return None,
            Stage::First => Question::Classic(Classic {
                id: raw.id,
                text: raw.soru_metni.clone(),
                options: lettered::<CLASSIC_OPTIONS>(&raw),
                correct: answer_index(raw.dogru_cevap.as_deref(), CLASSIC_OPTIONS - 1),
                points,
                hint,
                date,
            }),
            Stage::Second => {
                let statements = (0..STATEMENT_COUNT)
                    .map(|idx| match raw.secenekler.get(idx) {
                        Some(RawStatement::Judged { metin, dogru_mu }) => Statement {
                            text: metin.clone(),
                            is_correct: dogru_mu.as_deref().map(|verdict| verdict == "D"),
                        },
                        Some(RawStatement::Text(text)) => Statement { text: text.clone(), is_correct: None },
                        None => Statement { text: placeholder(idx), is_correct: None },
                    })
                    .collect();
                Question::TrueFalse(TrueFalse {
                    id: raw.id,
                    text: raw.soru_metni.clone(),
                    statements,
                    points,
                    hint,
                    date,
                })
            },
            Stage::Third => Question::Elimination(Elimination {
                id: raw.id,
                text: raw.soru_metni.clone(),
                options: lettered::<BOARD_SIZE>(&raw),
                correct: answer_index(raw.dogru_cevap.as_deref(), BOARD_SIZE - 1),
                points,
                hint,
                date,
            }),
        };
        Some(question)
    }

    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Classic(_) => QuestionKind::Classic,
            Question::TrueFalse(_) => QuestionKind::TrueFalse,
            Question::Elimination(_) => QuestionKind::Elimination,
        }
    }

    pub fn option_count(&self) -> usize {
        match self {
            Question::Classic(_) => CLASSIC_OPTIONS,
            Question::TrueFalse(q) => q.statements.len(),
            Question::Elimination(_) => BOARD_SIZE,
        }
    }

    pub fn view(&self) -> QuestionView {
        match self {
            Question::Classic(q) => QuestionView {
                id: q.id,
                text: q.text.clone(),
                options: q.options.to_vec(),
                points: q.points,
                hint: q.hint.clone(),
            },
            Question::TrueFalse(q) => QuestionView {
                id: q.id,
                text: q.text.clone(),
                options: q.statements.iter().map(|s| s.text.clone()).collect(),
                points: q.points,
                hint: q.hint.clone(),
            },
            Question::Elimination(q) => QuestionView {
                id: q.id,
                text: q.text.clone(),
                options: q.options.to_vec(),
                points: q.points,
                hint: q.hint.clone(),
            },
        }
    }
}

fn hide_notice(stage: Stage) -> WallNotice {
    match stage {
        Stage::Second => WallNotice::HideStage2Question {},
        Stage::Third => WallNotice::HideStage3Question {},
        _ => WallNotice::HideQuestion {},
    }
}

impl<A: GameApi> Console<A> {
    pub(crate) fn question_kind(&self) -> Option<QuestionKind> {
        self.state.question.as_ref().map(Question::kind)
    }

    pub(crate) async fn load_question(&mut self) -> ConsoleResult<()> {
        let stage = self.state.stage;
        if !stage.is_active() {
            return Err(ConsoleError::NoActiveStage);
        }
        let token = self.state.wheel_result.clone().ok_or(ConsoleError::WheelNotSpun)?;
        let raw = self.api.fetch_question(stage.number(), &token).await?;
        let question = Question::normalize(stage, raw).ok_or(ConsoleError::NoActiveStage)?;
        info!("loaded question #{} for stage {} ({})", question.view().id, stage.number(), token);

        self.post(WallNotice::HideUnityWheel {});
        self.stop_timer();
        self.state.next_epoch();
        self.state.clear_round();
        self.state.stage_showed = false;
        self.state.is_time_out = false;
        self.state.question = Some(question);

        let setup = match stage {
            Stage::Second => self.reset_statements().await,
            Stage::Third => {
                self.state.stage3_selections.clear();
                self.prepare_finalists()
            },
            _ => Ok(()),
        };
        self.reveal_later();
        setup
    }

    /// Sends the reveal payload of the current question and starts its countdown.
    pub(crate) fn show_question_on_wall(&mut self) {
        let notice = match self.state.question {
            Some(Question::Classic(ref q)) => WallNotice::ShowQuestion {
                question: q.text.clone(),
                answers: q.options.to_vec(),
                count_down: self.config.classic_countdown,
            },
            Some(Question::TrueFalse(ref q)) => WallNotice::ShowStage2Question {
                question: q.text.clone(),
                statements: q.statements.iter().map(|s| s.text.clone()).collect(),
                correct: 0,
                points: q.points,
                count_down: self.config.true_false_countdown,
            },
            Some(Question::Elimination(ref q)) => WallNotice::ShowStage3Question {
                text: q.text.clone(),
                options: q.options.to_vec(),
                contestants: self.state.stage3_roster().to_vec(),
                cur_player_index: self.state.stage3_current_player,
            },
            None => return,
        };
        self.post(notice);
        match self.question_kind() {
            Some(QuestionKind::Classic) => self.set_timer(self.config.classic_countdown as usize),
            Some(QuestionKind::TrueFalse) => self.set_timer(self.config.true_false_countdown as usize),
            _ => {},
        }
    }

    /// Picking an option locks it in straight away.
    pub(crate) fn select_option(&mut self, index: usize) -> ConsoleResult<()> {
        let (kind, count) = match self.state.question {
            Some(ref q) => (q.kind(), q.option_count()),
            None => return Err(ConsoleError::NoQuestion),
        };
        if kind == QuestionKind::TrueFalse {
            return Err(ConsoleError::WrongStage(self.state.stage.number()));
        }
        if index >= count {
            return Err(ConsoleError::OptionOutOfRange(index));
        }
        if self.state.question_locked {
            return Ok(());
        }
        match kind {
            QuestionKind::Elimination => {
                if !self.select_elimination(index) {
                    return Ok(());
                }
            },
            _ => {
                self.state.selected = Some(index);
                self.state.board.select_only(index);
                info!("option {} selected", index);
            },
        }
        self.lock_answer()
    }

    /// Shows the answer as locked on the board and the wall. The global
    /// `question_locked` flag is left alone; only stage-2 completion and
    /// the timer paths set it.
    pub(crate) fn lock_answer(&mut self) -> ConsoleResult<()> {
        let selected = self.state.selected.ok_or(ConsoleError::NoSelection)?;
        self.state.board.answer_locked = true;
        if self.question_kind() != Some(QuestionKind::Classic) {
            self.state.board.controls_disabled = true;
        }
        info!("answer locked at {}", selected);
        self.post(WallNotice::LockAnswerAt { option_index: selected });
        Ok(())
    }

    pub(crate) async fn reveal_result(&mut self) -> ConsoleResult<()> {
        match self.question_kind() {
            None => Err(ConsoleError::NoQuestion),
            Some(QuestionKind::Classic) => self.reveal_classic(),
            Some(QuestionKind::TrueFalse) => self.reveal_statements(),
            Some(QuestionKind::Elimination) => self.reveal_elimination().await,
        }
    }

    /// No points are awarded here; the operator adjusts scores by hand.
    fn reveal_classic(&mut self) -> ConsoleResult<()> {
        let correct = match self.state.question {
            Some(Question::Classic(ref q)) => q.correct,
            _ => return Err(ConsoleError::NoQuestion),
        };
        let selected = self.state.selected;
        info!("stage 1 result: selected {:?}, correct {}, hit {}", selected, correct, selected == Some(correct));

        for (idx, mark) in self.state.board.marks.iter_mut().enumerate().take(CLASSIC_OPTIONS) {
            mark.selected = false;
            mark.correct = idx == correct;
            mark.wrong = idx != correct && Some(idx) == selected;
        }
        self.post(WallNotice::ShowResult {
            selected_answer: selected.map_or(-1, |idx| idx as i32),
            correct_answer: correct,
        });
        Ok(())
    }

    pub(crate) fn next_question(&mut self) {
        self.post(hide_notice(self.state.stage));
        self.stop_timer();
        self.state.next_epoch();
        self.state.wheel_result = None;
        self.state.clear_round();
        self.state.question = None;
    }

    pub(crate) fn on_question_timeout(&mut self) -> ConsoleResult<()> {
        info!("question time is up");
        match self.question_kind() {
            Some(QuestionKind::Classic) if self.state.selected.is_some() => self.lock_answer(),
            Some(QuestionKind::Classic) => {
                info!("stage 1 time ran out without a pick");
                Ok(())
            },
            Some(QuestionKind::TrueFalse) => {
                self.statements_time_up();
                Ok(())
            },
            _ => Ok(()),
        }
    }
}
