use crate::consts::*;
use crate::types::*;
use crate::console::ConsoleReq;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use futures::{StreamExt, SinkExt};
use log::debug;

use protocol::{JsonMessage, WallNotice, WallSignal};

/// The spectator display. Only one is attached at a time; `id` tells a
/// stale link's logout apart from the current one.
#[derive(Debug)]
pub struct Wall {
    pub(crate) id: u64,

    pub(crate) ws_from_console_tx: mpsc::Sender<WsMsg>,

    pub(crate) _handles: Vec<JoinHandle<()>>,
}

impl Wall {
    pub(crate) fn new(id: u64, stream: WsStream, console_tx: mpsc::Sender<ConsoleReq>) -> Self {
        let (mut ws_tx, mut ws_rx) = stream.split();
        let (ws_from_console_tx, mut ws_from_console_rx) = mpsc::channel::<WsMsg>(128);

        let tx_ping = ws_from_console_tx.clone();
        let _ping_handle = tokio::spawn(async move {
            while tx_ping.send(WsMsg::Ping(Vec::new())).await.is_ok() {
                time::sleep(HB_DURATION).await;
            }
        });

        let console_transmit_tx = console_tx.clone();
        let _rx_handle = tokio::spawn(
            async move {
                while let Some(Ok(ws_msg)) = ws_rx.next().await {
                    match ws_msg {
                        WsMsg::Text(text) => {
                            match WallSignal::parse(&text) {
                                Some(signal) => {
                                    console_transmit_tx.send(ConsoleReq::WallSignal(id, signal)).await.unwrap_or_default();
                                },
                                None => debug!("wall #{} sent an unknown frame: {}", id, text),
                            }
                        },
                        WsMsg::Close(_) => break,
                        _ => {}
                    }
                }
                console_transmit_tx.send(ConsoleReq::WallLogout(id)).await.unwrap_or_default();
            }
        );

        let logout_reminder = console_tx;
        let _tx_handle = tokio::spawn(
            async move {
                use tokio_tungstenite::tungstenite::error::Error::AlreadyClosed
                as AlreadyClosed;
                while let Some(ws_msg) = ws_from_console_rx.recv().await {
                    if let Err(AlreadyClosed) = ws_tx.send(ws_msg).await {
                        logout_reminder.send(ConsoleReq::WallLogout(id)).await.unwrap_or_default();
                        break;
                    }
                }
            }
        );

        Self {
            id,

            ws_from_console_tx,

            _handles: vec![_tx_handle, _rx_handle, _ping_handle],
        }
    }

    /// A wall backed by a bare channel, without a socket behind it.
    #[cfg(test)]
    pub(crate) fn attach(id: u64, ws_from_console_tx: mpsc::Sender<WsMsg>) -> Self {
        Self {
            id,
            ws_from_console_tx,
            _handles: vec![],
        }
    }

    /// Never waits; a full or closed link drops the notice.
    pub(crate) fn post(&self, notice: &WallNotice) -> bool {
        match notice.to_text() {
            Ok(msg) => self.ws_from_console_tx.try_send(msg).is_ok(),
            Err(_) => false,
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.ws_from_console_tx.is_closed()
    }
}

impl Drop for Wall {
    fn drop(&mut self) {
        for handle in self._handles.iter() {
            handle.abort();
        }
    }
}
