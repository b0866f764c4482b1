use std::collections::BTreeMap;

use log::info;

use protocol::{OptionState, StatementResult, WallNotice};

use crate::api::GameApi;
use crate::consts::*;
use super::question::{Question, Statement};
use super::{Console, ConsoleError, ConsoleResult, Stage};

/// Scores every statement that carries a verdict. An unanswered statement
/// counts as answered with the opposite of the verdict, so it is always wrong.
pub fn score_statements(statements: &[Statement], judged: &BTreeMap<usize, bool>) -> Vec<StatementResult> {
    statements
        .iter()
        .enumerate()
        .take(STATEMENT_COUNT)
        .filter_map(|(index, statement)| {
            let correct_answer = statement.is_correct?;
            let answer = judged.get(&index).copied();
            Some(StatementResult {
                index,
                player_answer: answer.unwrap_or(!correct_answer),
                correct_answer,
                is_correct: answer == Some(correct_answer),
                was_answered: answer.is_some(),
            })
        })
        .collect()
}

impl<A: GameApi> Console<A> {
    fn ensure_statement(&self, index: usize) -> ConsoleResult<()> {
        if self.state.stage != Stage::Second {
            return Err(ConsoleError::WrongStage(self.state.stage.number()));
        }
        if index >= STATEMENT_COUNT {
            return Err(ConsoleError::OptionOutOfRange(index));
        }
        Ok(())
    }

    /// The local judgement is kept even when persisting it fails.
    pub(crate) async fn judge_statement(&mut self, index: usize, is_true: bool) -> ConsoleResult<()> {
        self.ensure_statement(index)?;
        if self.state.question_locked || self.state.board.controls_disabled {
            return Ok(());
        }
        self.state.true_false.insert(index, is_true);
        self.state.board.marks[index].judged = Some(is_true);
        info!("statement {} judged {}", index, is_true);

        self.api.set_stage2_option_state(index, OptionState::from(is_true)).await?;
        self.post(WallNotice::SetStage2OptionState { index, answer: is_true });
        Ok(())
    }

    pub(crate) fn select_statement(&mut self, index: usize) -> ConsoleResult<()> {
        self.ensure_statement(index)?;
        self.state.stage2_cursor = Some(index);
        self.state.board.select_only(index);
        Ok(())
    }

    pub(crate) async fn mark_statement(&mut self, is_true: bool) -> ConsoleResult<()> {
        match self.state.stage2_cursor {
            Some(index) => self.judge_statement(index, is_true).await,
            None => Ok(()),
        }
    }

    pub(crate) async fn reset_statements(&mut self) -> ConsoleResult<()> {
        self.state.true_false.clear();
        for mark in self.state.board.marks.iter_mut().take(STATEMENT_COUNT) {
            mark.judged = None;
        }
        self.api.reset_stage2_options().await?;
        Ok(())
    }

    pub(crate) fn reveal_statements(&mut self) -> ConsoleResult<()> {
        let results = match self.state.question {
            Some(Question::TrueFalse(ref q)) => score_statements(&q.statements, &self.state.true_false),
            _ => return Err(ConsoleError::NoQuestion),
        };
        for mark in self.state.board.marks.iter_mut() {
            mark.selected = false;
            mark.correct = false;
            mark.wrong = false;
        }
        for result in results.iter().filter(|r| r.was_answered) {
            let mark = &mut self.state.board.marks[result.index];
            mark.correct = result.is_correct;
            mark.wrong = !result.is_correct;
        }
        let answered = results.iter().filter(|r| r.was_answered).count();
        let correct = results.iter().filter(|r| r.is_correct).count();
        info!("stage 2 result: answered {}, correct {}", answered, correct);

        self.post(WallNotice::ShowStage2Result { results });
        if answered == STATEMENT_COUNT {
            self.stop_timer();
            self.state.question_locked = true;
        }
        Ok(())
    }

    pub(crate) fn statements_time_up(&mut self) {
        info!("stage 2 time is up");
        self.stop_timer();
        self.state.question_locked = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleReq;
    use crate::console::testing::*;
    use protocol::{RawQuestion, RawStatement, WallSignal};

    fn raw_statements() -> RawQuestion {
        let verdicts = ["D", "Y", "D", "D", "Y", "Y"];
        RawQuestion {
            id: 21,
            soru_metni: "True or false?".to_string(),
            secenekler: verdicts
                .iter()
                .enumerate()
                .map(|(idx, v)| RawStatement::Judged {
                    metin: format!("statement {}", idx),
                    dogru_mu: Some(v.to_string()),
                })
                .collect(),
            puan: Some(20),
            ..RawQuestion::default()
        }
    }

    async fn loaded_stage2() -> (Console<FakeApi>, tokio::sync::mpsc::Receiver<crate::types::WsMsg>) {
        let api = FakeApi::default();
        *api.question.lock().unwrap() = Some(raw_statements());
        let (mut console, mut rx) = console_with(api);
        console.start_stage(2, false).await.unwrap();
        console.spin_wheel().await.unwrap();
        console.load_question().await.unwrap();
        drain(&mut rx);
        (console, rx)
    }

    #[test]
    fn statements_without_verdict_are_not_scored() {
        let statements = vec![
            Statement { text: "a".to_string(), is_correct: Some(true) },
            Statement { text: "b".to_string(), is_correct: None },
            Statement { text: "c".to_string(), is_correct: Some(false) },
        ];
        let mut judged = BTreeMap::new();
        judged.insert(0, false);
        judged.insert(1, true);

        let results = score_statements(&statements, &judged);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0], StatementResult {
            index: 0,
            player_answer: false,
            correct_answer: true,
            is_correct: false,
            was_answered: true,
        });
        assert_eq!(results[1], StatementResult {
            index: 2,
            player_answer: true,
            correct_answer: false,
            is_correct: false,
            was_answered: false,
        });
    }

    #[tokio::test]
    async fn reveal_without_answers_marks_everything_wrong() {
        let (mut console, mut rx) = loaded_stage2().await;
        console.reveal_result().await.unwrap();

        let frames = drain(&mut rx);
        assert_eq!(actions(&frames), vec!["showStage2Result"]);
        let results = frames[0]["data"]["results"].as_array().unwrap();
        assert_eq!(results.len(), 6);
        for result in results {
            assert_eq!(result["isCorrect"], false);
            assert_eq!(result["wasAnswered"], false);
            assert_ne!(result["playerAnswer"], result["correctAnswer"]);
        }
        assert!(!console.state.question_locked);
    }

    #[tokio::test]
    async fn judging_persists_and_mirrors_to_the_wall() {
        let (mut console, mut rx) = loaded_stage2().await;
        console.judge_statement(1, false).await.unwrap();
        assert_eq!(console.state.true_false.get(&1), Some(&false));
        assert_eq!(console.state.board.marks[1].judged, Some(false));
        assert_eq!(console.api.option_states.lock().unwrap().get(&1), Some(&OptionState::False));

        let frames = drain(&mut rx);
        assert_eq!(actions(&frames), vec!["setStage2OptionState"]);
        assert_eq!(frames[0]["data"]["index"], 1);
        assert_eq!(frames[0]["data"]["answer"], false);
    }

    #[tokio::test]
    async fn failed_persist_keeps_the_local_judgement() {
        let (mut console, mut rx) = loaded_stage2().await;
        console.api.fail(true);
        assert!(console.judge_statement(4, true).await.is_err());
        assert_eq!(console.state.true_false.get(&4), Some(&true));
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn judging_is_bounded_and_stops_once_locked() {
        let (mut console, _rx) = loaded_stage2().await;
        assert!(matches!(console.judge_statement(6, true).await, Err(ConsoleError::OptionOutOfRange(6))));

        console.state.question_locked = true;
        console.judge_statement(0, true).await.unwrap();
        assert!(console.state.true_false.is_empty());
    }

    #[tokio::test]
    async fn all_six_answered_locks_the_question() {
        let (mut console, mut rx) = loaded_stage2().await;
        let answers = [true, false, true, false, false, false];
        for (idx, answer) in answers.iter().enumerate() {
            console.judge_statement(idx, *answer).await.unwrap();
        }
        drain(&mut rx);

        console.reveal_result().await.unwrap();
        assert!(console.state.question_locked);
        assert!(console.state.board.marks[0].correct);
        assert!(console.state.board.marks[3].wrong);

        let frames = drain(&mut rx);
        let results = frames[0]["data"]["results"].as_array().unwrap();
        assert_eq!(results.iter().filter(|r| r["isCorrect"] == true).count(), 5);
    }

    #[tokio::test]
    async fn cursor_shortcuts_judge_the_selected_statement() {
        let (mut console, _rx) = loaded_stage2().await;
        console.mark_statement(true).await.unwrap();
        assert!(console.state.true_false.is_empty());

        console.select_statement(2).unwrap();
        console.mark_statement(true).await.unwrap();
        assert_eq!(console.state.true_false.get(&2), Some(&true));
        assert!(console.state.board.marks[2].selected);
    }

    #[tokio::test]
    async fn statements_are_a_stage_two_control() {
        let (mut console, _rx) = console_with(FakeApi::default());
        console.start_stage(1, false).await.unwrap();
        assert!(matches!(console.select_statement(0), Err(ConsoleError::WrongStage(1))));
        assert!(matches!(console.judge_statement(0, true).await, Err(ConsoleError::WrongStage(1))));
    }

    #[tokio::test]
    async fn reveal_needs_a_statement_question() {
        let (mut console, _rx) = console_with(FakeApi::default());
        console.start_stage(2, false).await.unwrap();
        assert!(matches!(console.reveal_statements(), Err(ConsoleError::NoQuestion)));
    }

    #[tokio::test]
    async fn wall_time_up_locks_the_question() {
        let (mut console, _rx) = loaded_stage2().await;
        console.handle(ConsoleReq::RevealQuestion(console.state.epoch)).await;
        assert!(console.stopper.is_some());

        console.handle(ConsoleReq::WallSignal(1, WallSignal::Stage2TimeUp)).await;
        assert!(console.state.question_locked);
        assert!(console.stopper.is_none());
        console.judge_statement(0, true).await.unwrap();
        assert!(console.state.true_false.is_empty());
    }

    #[tokio::test]
    async fn reset_clears_local_and_persisted_states() {
        let (mut console, _rx) = loaded_stage2().await;
        console.judge_statement(0, true).await.unwrap();
        console.reset_statements().await.unwrap();
        assert!(console.state.true_false.is_empty());
        assert_eq!(console.state.board.marks[0].judged, None);
        assert!(console.api.option_states.lock().unwrap().is_empty());
    }
}
