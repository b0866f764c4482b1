use log::info;
use once_cell::sync::Lazy;
use regex::Regex;

use protocol::{PanelResponse, WallNotice};

use crate::api::GameApi;
use super::{Console, ConsoleError, ConsoleResult, GameState, Stage};

static INVISIBLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\x{FEFF}\x{200B}]").expect("invisible-char pattern"));
static HEX_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#(?:[0-9A-F]{3}|[0-9A-F]{6})$").expect("hex colour pattern"));

/// Normalizes an operator-typed colour to `#RRGGBB` (or `#RGB`).
fn clean_hex(raw: &str) -> Option<String> {
    let cleaned = INVISIBLE
        .replace_all(raw.trim(), "")
        .replace('＃', "#")
        .to_uppercase();
    if HEX_COLOR.is_match(&cleaned) {
        Some(cleaned)
    } else {
        None
    }
}

impl<A: GameApi> Console<A> {
    pub(crate) async fn start_stage(&mut self, number: u8, elimination: bool) -> ConsoleResult<()> {
        let stage = Stage::playable(number).ok_or(ConsoleError::InvalidStage(number))?;
        self.stop_timer();
        self.state.next_epoch();
        self.state.stage = stage;
        self.state.stage_showed = true;
        self.state.is_time_out = false;
        self.state.wheel_result = None;
        self.state.clear_round();
        self.state.question = None;
        info!("stage {} started{}", number, if elimination { " (elimination)" } else { "" });

        self.post(if elimination {
            WallNotice::ShowEliminateStage {}
        } else {
            WallNotice::ShowStageTransition { stage: number }
        });
        if stage == Stage::Second {
            self.reset_statements().await?;
        }
        Ok(())
    }

    pub(crate) async fn start_elimination_stage(&mut self) -> ConsoleResult<()> {
        let current = self.state.stage;
        if !current.is_active() {
            return Err(ConsoleError::NoActiveStage);
        }
        self.start_stage(current.number(), true).await
    }

    /// Wipes the api side first; local state is only dropped once that succeeded.
    pub(crate) async fn reset_game(&mut self) -> ConsoleResult<()> {
        self.api.reset_game().await?;
        self.stop_timer();
        let epoch = self.state.epoch;
        let engine_ready = self.state.engine_ready;
        self.state = GameState::new();
        self.state.epoch = epoch;
        self.state.next_epoch();
        self.state.engine_ready = engine_ready;
        info!("game reset");
        self.broadcast(PanelResponse::Reload).await;
        Ok(())
    }

    pub(crate) async fn show_scoreboard(&mut self) -> ConsoleResult<()> {
        self.refresh_contestants().await?;
        let stage = self.state.stage;
        let contestants = self.state.contestants
            .iter()
            .filter(|c| stage != Stage::Second || !c.eliminated)
            .cloned()
            .collect();
        self.post(WallNotice::ShowScoreboard { contestants, stage: stage.number() });
        Ok(())
    }

    pub(crate) fn set_background(&mut self, use_background: bool, color: &str) -> ConsoleResult<()> {
        let color_hex = clean_hex(color).ok_or_else(|| ConsoleError::InvalidColor(color.to_string()))?;
        info!("background {} ({})", color_hex, if use_background { "image" } else { "plain" });
        self.post(WallNotice::SetColor { use_background, color_hex });
        Ok(())
    }
}
