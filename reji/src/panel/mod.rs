use crate::consts::*;
use crate::types::*;
use crate::console::ConsoleReq;
use protocol::PanelResponse;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;
use futures::{StreamExt, SinkExt};
use log::debug;

use protocol::{BinCodeMessage, PanelRequest};

/// An operator panel, keyed by its peer address.
#[derive(Debug)]
pub struct Panel {
    pub(crate) addr: String,

    pub(crate) ws_from_console_tx: mpsc::Sender<WsMsg>,

    pub(crate) _tx_handle: JoinHandle<()>,
    pub(crate) _rx_handle: JoinHandle<()>,
    pub(crate) _ping_handle: JoinHandle<()>,
}

impl Panel {
    pub(crate) fn new(addr: String, stream: WsStream, console_tx: mpsc::Sender<ConsoleReq>) -> Self {
        let (mut ws_tx, mut ws_rx) = stream.split();
        let (ws_from_console_tx, mut ws_from_console_rx) = mpsc::channel::<WsMsg>(128);

        let tx_ping = ws_from_console_tx.clone();
        let _ping_handle = tokio::spawn(async move {
            while tx_ping.send(WsMsg::Ping(Vec::new())).await.is_ok() {
                time::sleep(HB_DURATION).await;
            }
        });

        let console_transmit_tx = console_tx.clone();
        let addr_clone = addr.clone();
        let _rx_handle = tokio::spawn(
            async move {
                while let Some(Ok(ws_msg)) = ws_rx.next().await {
                    match ws_msg {
                        WsMsg::Binary(bin) => {
                            match PanelRequest::deser(&bin) {
                                Ok(req) => {
                                    console_transmit_tx.send(ConsoleReq::PanelReq(addr_clone.clone(), req)).await.unwrap_or_default();
                                },
                                Err(err) => debug!("panel {} sent a broken frame: {}", addr_clone, err),
                            }
                        },
                        WsMsg::Close(_) => break,
                        _ => {}
                    }
                }
                console_transmit_tx.send(ConsoleReq::PanelLogout(addr_clone)).await.unwrap_or_default();
            }
        );

        let logout_reminder = console_tx;
        let addr_clone = addr.clone();
        let _tx_handle = tokio::spawn(
            async move {
                use tokio_tungstenite::tungstenite::error::Error::AlreadyClosed
                as AlreadyClosed;
                while let Some(ws_msg) = ws_from_console_rx.recv().await {
                    if let Err(AlreadyClosed) = ws_tx.send(ws_msg).await {
                        logout_reminder.send(ConsoleReq::PanelLogout(addr_clone)).await.unwrap_or_default();
                        break;
                    }
                }
            }
        );

        Self {
            addr,

            ws_from_console_tx,

            _tx_handle,
            _rx_handle,
            _ping_handle,
        }
    }

    pub(crate) async fn send(&self, resp: PanelResponse) {
        match resp.ser() {
            Ok(msg) => self.ws_from_console_tx.send(msg).await.unwrap_or_default(),
            Err(err) => debug!("panel {}: cannot encode response: {}", self.addr, err),
        }
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self._rx_handle.abort();
        self._tx_handle.abort();
        self._ping_handle.abort();
    }
}
