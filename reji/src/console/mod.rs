mod error;
mod request;
mod state;
mod question;
mod stage;
mod true_false;
mod elimination;
mod roster;
mod wheel;

use std::collections::HashMap;

use log::{debug, info, warn};
use tokio::sync::mpsc::{Sender, Receiver, channel};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use tokio::time::{sleep, Duration};

use protocol::{NoticeLevel, PanelRequest, PanelResponse, WallNotice, WallSignal};

use crate::api::GameApi;
use crate::config::Config;
use crate::consts::DEFAULT_COLOR;
use crate::panel::Panel;
use crate::types::*;
use crate::wall::Wall;

pub use error::{ConsoleError, ConsoleResult};
pub use request::Request as ConsoleReq;
pub use state::{GameState, Stage};
use question::QuestionKind;

/// Single owner of the game state. Panels, the wall, timers and deferred
/// reveals only talk to it through its inbox, so every mutation runs to
/// completion before the next one starts.
pub struct Console<A: GameApi> {
    config: Config,
    state: GameState,
    api: A,

    wall: Option<Wall>,
    wall_seq: u64,
    panels: HashMap<String, Panel>,

    rm_rx: Receiver<ConsoleReq>,
    loopback: Sender<ConsoleReq>,
    stopper: Option<oneshot::Sender<()>>,
}

impl<A: GameApi> Console<A> {
    pub fn new(api: A, config: Config) -> Self {
        let (loopback, rm_rx) = channel::<ConsoleReq>(64);
        Self {
            config,
            state: GameState::new(),
            api,

            wall: None,
            wall_seq: 0,
            panels: HashMap::new(),

            rm_rx,
            loopback,
            stopper: None,
        }
    }

    pub fn get_tx(&self) -> Sender<ConsoleReq> {
        self.loopback.clone()
    }

    pub async fn run(&mut self) {
        if let Err(err) = self.refresh_contestants().await {
            warn!("initial contestant load failed: {}", err);
        }
        while let Some(req) = self.rm_rx.recv().await {
            self.handle(req).await;
        }
    }

    async fn handle(&mut self, req: ConsoleReq) {
        match req {
            ConsoleReq::PanelLogin { addr, ws_stream } => self.login_panel(addr, ws_stream).await,
            ConsoleReq::PanelLogout(addr) => self.logout_panel(&addr),
            ConsoleReq::WallLogin { ws_stream } => self.login_wall(ws_stream).await,
            ConsoleReq::WallLogout(id) => self.logout_wall(id).await,
            ConsoleReq::PanelReq(addr, req) => {
                debug!("panel {} -> {:?}", addr, req);
                let result = self.dispatch(req).await;
                self.settle(result).await;
            },
            ConsoleReq::WallSignal(id, signal) => {
                debug!("wall #{} -> {:?}", id, signal);
                let result = self.on_wall_signal(signal).await;
                self.settle(result).await;
            },
            ConsoleReq::RevealQuestion(epoch) => {
                if epoch == self.state.epoch {
                    self.show_question_on_wall();
                } else {
                    debug!("dropping reveal of stale question epoch {}", epoch);
                }
            },
            ConsoleReq::CountDown(epoch, rest) => {
                if epoch == self.state.epoch {
                    self.broadcast(PanelResponse::CountDown(rest as u8)).await;
                }
            },
            ConsoleReq::TimesUp(epoch) => {
                if epoch == self.state.epoch {
                    self.stopper.take();
                    let result = self.on_question_timeout();
                    self.settle(result).await;
                } else {
                    debug!("dropping stale timer of epoch {}", epoch);
                }
            },
        }
    }

    async fn dispatch(&mut self, req: PanelRequest) -> ConsoleResult<()> {
        match req {
            PanelRequest::StartStage { stage } => self.start_stage(stage, false).await,
            PanelRequest::StartEliminationStage => self.start_elimination_stage().await,
            PanelRequest::ResetGame => self.reset_game().await,
            PanelRequest::ShowLogo => {
                self.post(WallNotice::ShowLogo {});
                Ok(())
            },
            PanelRequest::ShowWaiting => {
                self.post(WallNotice::Waiting {});
                Ok(())
            },
            PanelRequest::ShowScoreboard => self.show_scoreboard().await,
            PanelRequest::HideScoreboard => {
                self.post(WallNotice::HideScoreboard {});
                Ok(())
            },
            PanelRequest::SetBackground { use_background, color } => self.set_background(use_background, &color),

            PanelRequest::SpinWheel => self.spin_wheel().await,
            PanelRequest::BringWheel => self.bring_wheel(),

            PanelRequest::LoadQuestion => self.load_question().await,
            PanelRequest::SelectOption { index } => self.select_option(index as usize),
            PanelRequest::LockAnswer => self.lock_answer(),
            PanelRequest::ShowResult => self.reveal_result().await,
            PanelRequest::NextQuestion => {
                self.next_question();
                Ok(())
            },

            PanelRequest::JudgeStatement { index, is_true } => self.judge_statement(index as usize, is_true).await,
            PanelRequest::SelectStatement { index } => self.select_statement(index as usize),
            PanelRequest::MarkStatement { is_true } => self.mark_statement(is_true).await,
            PanelRequest::ResetStatements => self.reset_statements().await,

            PanelRequest::LoadContestants => self.load_contestants().await,
            PanelRequest::AddContestant { name, photo } => self.add_contestant(&name, photo.as_deref()).await,
            PanelRequest::AdjustPoints { id, points } => self.adjust_points(id, points).await,
            PanelRequest::Eliminate { id } => self.eliminate(id).await,
            PanelRequest::DeleteContestant { id } => self.delete_contestant(id).await,
        }
    }

    async fn on_wall_signal(&mut self, signal: WallSignal) -> ConsoleResult<()> {
        match signal {
            WallSignal::Register => info!("wall registered"),
            WallSignal::EngineReady => {
                info!("visual engine ready");
                self.state.engine_ready = true;
            },
            WallSignal::EngineState { wheel_result } => {
                if let Some(result) = wheel_result {
                    info!("engine wheel stopped at {}", result);
                    self.state.wheel_result = Some(result);
                }
            },
            WallSignal::Stage2TimeUp => {
                if self.question_kind() == Some(QuestionKind::TrueFalse) {
                    self.statements_time_up();
                }
            },
            WallSignal::StopStage3Timer => {
                if self.question_kind() == Some(QuestionKind::Elimination) {
                    self.stop_timer();
                    self.state.question_locked = true;
                }
            },
            WallSignal::Stage3PlayerTimeOut => {
                if self.question_kind() == Some(QuestionKind::Elimination) {
                    self.on_player_timeout();
                }
            },
            WallSignal::ButtonClick(data) => {
                self.broadcast(PanelResponse::ButtonClick { data }).await;
            },
        }
        Ok(())
    }

    async fn settle(&mut self, result: ConsoleResult<()>) {
        if let Err(err) = result {
            self.report(err).await;
        }
        self.feed_board().await;
    }

    async fn report(&mut self, err: ConsoleError) {
        warn!("{}", err);
        self.broadcast(PanelResponse::Notice { level: err.level(), msg: err.to_string() }).await;
        if err.needs_reload() {
            self.broadcast(PanelResponse::Reload).await;
        }
    }

    async fn notify(&self, level: NoticeLevel, msg: impl ToString) {
        self.broadcast(PanelResponse::Notice { level, msg: msg.to_string() }).await;
    }

    async fn feed_board(&self) {
        let wall_connected = self.wall.as_ref().map_or(false, |wall| !wall.is_closed());
        self.broadcast(PanelResponse::Board(self.state.snapshot(wall_connected))).await;
    }

    async fn broadcast(&self, resp: PanelResponse) {
        for panel in self.panels.values() {
            panel.send(resp.clone()).await;
        }
    }

    /// Fire and forget. Without a live wall the notice is dropped.
    pub(crate) fn post(&mut self, notice: WallNotice) {
        if self.wall.as_ref().map_or(false, Wall::is_closed) {
            info!("wall link closed");
            self.wall = None;
        }
        match self.wall {
            Some(ref wall) => {
                if !wall.post(&notice) {
                    debug!("wall busy, dropped {:?}", notice);
                }
            },
            None => debug!("no wall, dropped {:?}", notice),
        }
    }

    /// Queue the wall reveal of the current question after the reveal delay.
    fn reveal_later(&self) {
        let loopback_tx = self.loopback.clone();
        let epoch = self.state.epoch;
        let delay = self.config.reveal_delay;
        tokio::spawn(async move {
            sleep(delay).await;
            loopback_tx.send(ConsoleReq::RevealQuestion(epoch)).await.unwrap_or_default();
        });
    }

    fn set_timer(&mut self, secs: usize) {
        self.stop_timer();
        let (tx, mut rx) = oneshot::channel::<()>();
        let loopback_tx = self.loopback.clone();
        let epoch = self.state.epoch;
        tokio::spawn(async move {
            for passed in 0..secs {
                sleep(Duration::from_secs(1)).await;
                if !matches!(rx.try_recv(), Err(TryRecvError::Empty)) {
                    return;
                }
                loopback_tx.send(ConsoleReq::CountDown(epoch, secs - passed - 1)).await.unwrap_or_default();
            }
            loopback_tx.send(ConsoleReq::TimesUp(epoch)).await.unwrap_or_default();
        });
        self.stopper = Some(tx);
    }

    fn stop_timer(&mut self) {
        if let Some(stopper) = self.stopper.take() {
            let _ = stopper.send(());
        }
    }

    async fn login_panel(&mut self, addr: String, ws_stream: WsStream) {
        info!("panel {} connected", addr);
        let panel = Panel::new(addr.clone(), ws_stream, self.get_tx());
        self.panels.insert(addr.clone(), panel);
        if let Some(panel) = self.panels.get(&addr) {
            panel.send(PanelResponse::Contestants(self.state.contestants.clone())).await;
        }
        self.feed_board().await;
    }

    fn logout_panel(&mut self, addr: &String) {
        info!("panel {} left", addr);
        self.panels.remove(addr);
    }

    async fn login_wall(&mut self, ws_stream: WsStream) {
        self.wall_seq += 1;
        info!("wall #{} connected", self.wall_seq);
        self.wall = Some(Wall::new(self.wall_seq, ws_stream, self.get_tx()));
        self.greet_wall();
        self.feed_board().await;
    }

    /// A fresh wall starts on the background image with a white tint.
    fn greet_wall(&mut self) {
        self.post(WallNotice::SetColor {
            use_background: true,
            color_hex: DEFAULT_COLOR.to_string(),
        });
    }

    async fn logout_wall(&mut self, id: u64) {
        if self.wall.as_ref().map_or(false, |wall| wall.id == id) {
            info!("wall #{} left", id);
            self.wall = None;
            self.state.engine_ready = false;
            self.notify(NoticeLevel::Warning, "wall disconnected").await;
            self.feed_board().await;
        }
    }
}
