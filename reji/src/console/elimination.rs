use log::{info, warn};

use protocol::{Contestant, PanelResponse, WallNotice};

use crate::api::GameApi;
use crate::consts::*;
use super::question::Question;
use super::{Console, ConsoleError, ConsoleResult};

/// Top two non-eliminated contestants by score. Ties keep roster order.
fn pick_finalists(contestants: &[Contestant]) -> ConsoleResult<Vec<Contestant>> {
    let mut remaining: Vec<Contestant> = contestants.iter().filter(|c| !c.eliminated).cloned().collect();
    if remaining.len() < FINALIST_COUNT {
        return Err(ConsoleError::InsufficientContestants { remaining: remaining.len() });
    }
    remaining.sort_by(|a, b| b.score.cmp(&a.score));
    remaining.truncate(FINALIST_COUNT);
    Ok(remaining)
}

impl<A: GameApi> Console<A> {
    /// Fixes the finalists once per game; later calls keep the first pick.
    pub(crate) fn prepare_finalists(&mut self) -> ConsoleResult<()> {
        if self.state.finalists_fixed {
            return Ok(());
        }
        let finalists = pick_finalists(&self.state.contestants)?;
        info!(
            "finalists: {}",
            finalists.iter().map(|c| format!("{}({})", c.name, c.score)).collect::<Vec<_>>().join(", ")
        );
        self.state.finalists = finalists;
        self.state.finalists_fixed = true;
        self.state.stage3_selections.clear();
        Ok(())
    }

    /// Returns whether the pick was taken. Outside timeout mode an option
    /// struck out earlier in this question cannot be picked again.
    pub(crate) fn select_elimination(&mut self, index: usize) -> bool {
        if self.state.is_time_out {
            for mark in self.state.board.marks.iter_mut() {
                mark.selected = false;
                mark.disabled = false;
                mark.wrong = false;
            }
        } else if self.state.board.marks[index].disabled {
            return false;
        }
        self.state.selected = Some(index);
        self.state.board.select_only(index);
        self.state.stage3_selections.insert(self.state.stage3_current_player, index);
        info!("finalist {} picked option {}", self.state.stage3_current_player, index);
        self.post(WallNotice::SelectStage3Option { option_index: index });
        true
    }

    pub(crate) async fn reveal_elimination(&mut self) -> ConsoleResult<()> {
        let correct = match self.state.question {
            Some(Question::Elimination(ref q)) => q.correct,
            _ => return Err(ConsoleError::NoQuestion),
        };
        let selected = self.state.selected.ok_or(ConsoleError::NoSelection)?;
        let is_correct = selected == correct;
        info!("stage 3 result: selected {}, correct {}, timeout mode {}", selected, correct, self.state.is_time_out);

        if self.state.is_time_out {
            for mark in self.state.board.marks.iter_mut() {
                mark.selected = false;
            }
            self.post(WallNotice::ShowStage3Result { selected_index: selected, is_correct });
            if is_correct {
                self.award_current_player().await?;
            }
        } else {
            let mark = &mut self.state.board.marks[selected];
            mark.selected = false;
            if is_correct {
                mark.correct = true;
            } else {
                mark.wrong = true;
                mark.disabled = true;
            }
            self.post(WallNotice::ShowStage3Result { selected_index: selected, is_correct });
        }
        Ok(())
    }

    async fn award_current_player(&mut self) -> ConsoleResult<()> {
        let roster = self.state.stage3_roster();
        let player = roster
            .get(self.state.stage3_current_player)
            .cloned()
            .ok_or(ConsoleError::InsufficientContestants { remaining: roster.len() })?;

        let score = self.api.adjust_score(player.id, self.config.stage3_award).await?;
        info!("{} awarded {} points, now {}", player.name, self.config.stage3_award, score);
        for c in self.state.finalists.iter_mut().chain(self.state.contestants.iter_mut()) {
            if c.id == player.id {
                c.score = score;
            }
        }
        self.broadcast(PanelResponse::Contestants(self.state.contestants.clone())).await;
        self.post(WallNotice::UpdateStage3UpdatePlayerScore {
            contestants: self.state.stage3_roster().to_vec(),
        });
        Ok(())
    }

    /// The turn passes to the other finalist, who gets a fully enabled board.
    pub(crate) fn on_player_timeout(&mut self) {
        let count = self.state.stage3_roster().len();
        if count == 0 {
            warn!("player timeout without finalists");
        }
        self.state.is_time_out = true;
        self.state.selected = None;
        self.state.stage3_current_player = match count {
            0 => 0,
            n => (self.state.stage3_current_player + 1) % n,
        };
        for mark in self.state.board.marks.iter_mut() {
            mark.disabled = false;
        }
        self.state.board.answer_locked = false;
        self.state.board.controls_disabled = false;
        self.state.question_locked = false;
        info!("turn passed to finalist {}", self.state.stage3_current_player);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ConsoleReq;
    use crate::console::testing::*;
    use protocol::{RawQuestion, WallSignal};

    fn raw_elimination() -> RawQuestion {
        RawQuestion {
            id: 31,
            soru_metni: "Which date is the oldest?".to_string(),
            secenek_a: Some("A".to_string()),
            secenek_b: Some("B".to_string()),
            secenek_c: Some("C".to_string()),
            secenek_d: Some("D".to_string()),
            secenek_e: Some("E".to_string()),
            secenek_f: Some("F".to_string()),
            secenek_g: Some("G".to_string()),
            dogru_cevap: Some("E".to_string()),
            puan: Some(10),
            ..RawQuestion::default()
        }
    }

    async fn loaded_stage3(scores: &[i32]) -> (Console<FakeApi>, tokio::sync::mpsc::Receiver<crate::types::WsMsg>) {
        let api = FakeApi::with_contestants(scores);
        *api.question.lock().unwrap() = Some(raw_elimination());
        let (mut console, mut rx) = console_with(api);
        console.load_contestants().await.unwrap();
        console.start_stage(3, false).await.unwrap();
        console.spin_wheel().await.unwrap();
        console.load_question().await.unwrap();
        drain(&mut rx);
        (console, rx)
    }

    #[tokio::test]
    async fn finalists_are_the_top_two_and_fixed_once() {
        let (mut console, _rx) = console_with(FakeApi::with_contestants(&[10, 30, 20]));
        console.load_contestants().await.unwrap();

        console.prepare_finalists().unwrap();
        let scores: Vec<i32> = console.state.finalists.iter().map(|c| c.score).collect();
        assert_eq!(scores, vec![30, 20]);

        console.state.contestants[0].score = 99;
        console.prepare_finalists().unwrap();
        let ids: Vec<u32> = console.state.finalists.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn finalists_need_two_active_contestants() {
        let api = FakeApi::with_contestants(&[10, 50]);
        api.contestants.lock().unwrap()[1].eliminated = true;
        let (mut console, _rx) = console_with(api);
        console.load_contestants().await.unwrap();

        match console.prepare_finalists() {
            Err(ConsoleError::InsufficientContestants { remaining }) => assert_eq!(remaining, 1),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!console.state.finalists_fixed);
        assert!(console.state.finalists.is_empty());
        assert_eq!(console.state.contestants.len(), 2);
    }

    #[tokio::test]
    async fn load_still_reveals_without_finalists() {
        let api = FakeApi::with_contestants(&[10]);
        *api.question.lock().unwrap() = Some(raw_elimination());
        let (mut console, mut rx) = console_with(api);
        console.load_contestants().await.unwrap();
        console.start_stage(3, false).await.unwrap();
        console.spin_wheel().await.unwrap();

        assert!(matches!(
            console.load_question().await,
            Err(ConsoleError::InsufficientContestants { .. })
        ));
        assert!(console.state.question.is_some());
        drain(&mut rx);

        console.handle(ConsoleReq::RevealQuestion(console.state.epoch)).await;
        let frames = drain(&mut rx);
        assert_eq!(actions(&frames), vec!["showStage3Question"]);
        assert_eq!(frames[0]["data"]["options"].as_array().unwrap().len(), 7);
        assert!(console.stopper.is_none());
    }

    #[tokio::test]
    async fn reveal_shows_the_finalists() {
        let (mut console, mut rx) = loaded_stage3(&[10, 30, 20]).await;
        console.handle(ConsoleReq::RevealQuestion(console.state.epoch)).await;
        let frames = drain(&mut rx);
        assert_eq!(frames[0]["data"]["contestants"].as_array().unwrap().len(), 2);
        assert_eq!(frames[0]["data"]["curPlayerIndex"], 0);
    }

    #[tokio::test]
    async fn selecting_notifies_then_locks() {
        let (mut console, mut rx) = loaded_stage3(&[10, 30, 20]).await;
        console.select_option(2).unwrap();
        assert_eq!(console.state.selected, Some(2));
        assert_eq!(console.state.stage3_selections.get(&0), Some(&2));
        assert!(console.state.board.controls_disabled);
        assert_eq!(actions(&drain(&mut rx)), vec!["selectStage3Option", "lockAnswerAt"]);
    }

    #[tokio::test]
    async fn wrong_pick_is_struck_out_without_points() {
        let (mut console, mut rx) = loaded_stage3(&[10, 30, 20]).await;
        console.select_option(1).unwrap();
        drain(&mut rx);

        console.reveal_result().await.unwrap();
        assert!(console.state.board.marks[1].wrong);
        assert!(console.state.board.marks[1].disabled);
        let frames = drain(&mut rx);
        assert_eq!(actions(&frames), vec!["showStage3Result"]);
        assert_eq!(frames[0]["data"]["selectedIndex"], 1);
        assert_eq!(frames[0]["data"]["isCorrect"], false);

        console.select_option(1).unwrap();
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn correct_pick_in_normal_mode_awards_nothing() {
        let (mut console, mut rx) = loaded_stage3(&[10, 30, 20]).await;
        console.select_option(4).unwrap();
        console.reveal_result().await.unwrap();
        assert!(console.state.board.marks[4].correct);
        assert_eq!(console.state.finalists[0].score, 30);
        let frames = drain(&mut rx);
        assert!(!actions(&frames).contains(&"updateStage3UpdatePlayerScore".to_string()));
    }

    #[tokio::test]
    async fn reveal_needs_a_pick() {
        let (mut console, _rx) = loaded_stage3(&[10, 30, 20]).await;
        assert!(matches!(console.reveal_result().await, Err(ConsoleError::NoSelection)));
    }

    #[tokio::test]
    async fn timeouts_rotate_between_the_finalists() {
        let (mut console, _rx) = loaded_stage3(&[10, 30, 20]).await;
        assert_eq!(console.state.stage3_current_player, 0);
        console.handle(ConsoleReq::WallSignal(1, WallSignal::Stage3PlayerTimeOut)).await;
        assert_eq!(console.state.stage3_current_player, 1);
        assert!(console.state.is_time_out);
        console.on_player_timeout();
        assert_eq!(console.state.stage3_current_player, 0);
    }

    #[tokio::test]
    async fn timeout_without_finalists_stays_put() {
        let (mut console, _rx) = console_with(FakeApi::default());
        console.on_player_timeout();
        assert_eq!(console.state.stage3_current_player, 0);
        assert!(console.state.is_time_out);
    }

    #[tokio::test]
    async fn incoming_player_may_pick_a_struck_option() {
        let (mut console, mut rx) = loaded_stage3(&[10, 30, 20]).await;
        console.select_option(1).unwrap();
        console.reveal_result().await.unwrap();
        assert!(console.state.board.marks[1].disabled);

        console.handle(ConsoleReq::WallSignal(1, WallSignal::StopStage3Timer)).await;
        assert!(console.state.question_locked);
        console.on_player_timeout();
        assert_eq!(console.state.selected, None);
        drain(&mut rx);

        console.select_option(1).unwrap();
        assert_eq!(console.state.selected, Some(1));
        assert!(!console.state.board.marks[1].wrong);
        assert_eq!(console.state.stage3_selections.get(&1), Some(&1));
        assert_eq!(actions(&drain(&mut rx)), vec!["selectStage3Option", "lockAnswerAt"]);
    }

    #[tokio::test]
    async fn correct_pick_after_timeout_awards_the_current_player() {
        let (mut console, mut rx) = loaded_stage3(&[10, 30, 20]).await;
        console.on_player_timeout();
        console.select_option(4).unwrap();
        drain(&mut rx);

        console.reveal_result().await.unwrap();
        assert_eq!(console.state.finalists[1].id, 3);
        assert_eq!(console.state.finalists[1].score, 30);
        assert_eq!(console.api.contestants.lock().unwrap()[2].score, 30);
        assert!(!console.state.board.marks[4].selected);
        assert!(!console.state.board.marks[4].correct);

        let frames = drain(&mut rx);
        assert_eq!(actions(&frames), vec!["showStage3Result", "updateStage3UpdatePlayerScore"]);
        assert_eq!(frames[1]["data"]["contestants"][1]["score"], 30);
    }

    #[tokio::test]
    async fn wrong_pick_after_timeout_awards_nothing() {
        let (mut console, mut rx) = loaded_stage3(&[10, 30, 20]).await;
        console.on_player_timeout();
        console.select_option(0).unwrap();
        drain(&mut rx);
        console.reveal_result().await.unwrap();
        assert_eq!(console.state.finalists[1].score, 20);
        assert_eq!(actions(&drain(&mut rx)), vec!["showStage3Result"]);
    }
}
