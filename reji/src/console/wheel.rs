use log::info;

use protocol::WallNotice;

use crate::api::GameApi;
use crate::consts::*;
use super::{Console, ConsoleError, ConsoleResult};

impl<A: GameApi> Console<A> {
    pub(crate) async fn spin_wheel(&mut self) -> ConsoleResult<()> {
        let stage = self.state.stage;
        if !stage.is_active() {
            return Err(ConsoleError::NoActiveStage);
        }
        let spin = self.api.spin_wheel(stage.number()).await?;
        info!("wheel #{} stopped at {}", spin.spin_id, spin.result);
        self.state.wheel_result = Some(spin.result.clone());
        self.post(WallNotice::SpinUnityWheel {
            result: spin.result.clone(),
            stage: stage.number(),
            target_date: spin.result,
            spin_id: spin.spin_id,
        });
        Ok(())
    }

    /// Right after a stage transition the wheel waits for the transition to finish.
    pub(crate) fn bring_wheel(&mut self) -> ConsoleResult<()> {
        let stage = self.state.stage;
        if !stage.is_active() {
            return Err(ConsoleError::NoActiveStage);
        }
        let delay = if self.state.stage_showed { WHEEL_FRONT_DELAY } else { 0.0 };
        self.post(WallNotice::ShowUnityWheel { wheel_type: stage.number() - 1, delay });
        Ok(())
    }
}
