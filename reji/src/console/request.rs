use crate::types::*;
use protocol::{PanelRequest, WallSignal};

#[derive(/* Clone, Copy, */ Debug)]
pub enum Request {
    PanelReq(String, PanelRequest),
    PanelLogin{
        addr: String,
        ws_stream: WsStream,
    },
    PanelLogout(String),

    WallSignal(u64, WallSignal),
    WallLogin{
        ws_stream: WsStream,
    },
    WallLogout(u64),

    /// Deferred wall reveal of the question loaded under this epoch.
    RevealQuestion(u64),
    CountDown(u64, usize),
    TimesUp(u64),
}
