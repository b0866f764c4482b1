mod logger;
mod types;
mod consts;
mod config;
mod api;
mod console;

mod panel;
mod wall;

/// # Tasks
/// 1. console: owns the game state and runs every operation
/// 2. one accept task per connection: handshake, then hand the stream over
/// 3. per link: read, write and ping tasks
use clap::Parser;
use log::{error, info, warn};
use tokio::net::TcpListener;

use crate::api::HttpApi;
use crate::config::{Args, Config};
use crate::console::{Console, ConsoleReq};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if args.tokio_console {
        console_subscriber::init();
    }
    logger::init();

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(err) => {
            error!("bad panel token: {}", err);
            return;
        }
    };
    if let Err(err) = run(config).await {
        error!("{}", err);
    }
}

async fn run(config: Config) -> std::io::Result<()> {
    let listener = TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("listening on port {}, api at {}", config.port, config.api_base);

    let panel_token = config.panel_token;
    let mut console = Console::new(HttpApi::new(&config.api_base), config);
    let console_tx = console.get_tx();
    let _handle_console = tokio::spawn(async move { console.run().await });

    while let Ok((stream, _)) = listener.accept().await {
        let console_tx_clone = console_tx.clone();
        tokio::spawn(async move {
            let addr = match stream.peer_addr() {
                Ok(addr) => addr,
                Err(err) => {
                    warn!("dropping connection without peer address: {}", err);
                    return;
                }
            };
            let (login_res_tx, login_res_rx) = tokio::sync::oneshot::channel::<LoginType>();
            let ws_stream = match tokio_tungstenite::accept_hdr_async(stream, Callback {
                login_result: login_res_tx,
                panel_token,
            }).await {
                Ok(ws_stream) => ws_stream,
                Err(err) => {
                    warn!("handshake with {} failed: {}", addr, err);
                    return;
                }
            };

            let req = match login_res_rx.await {
                Ok(LoginType::Panel) => ConsoleReq::PanelLogin { addr: addr.to_string(), ws_stream },
                Ok(LoginType::Wall) => ConsoleReq::WallLogin { ws_stream },
                _ => return,
            };
            console_tx_clone.send(req).await.unwrap_or_default();
        });
    }

    Ok(())
}

use tokio_tungstenite::tungstenite::handshake::server::Request as HsReq;
use tokio_tungstenite::tungstenite::handshake::server::Response as HsResp;
use tokio_tungstenite::tungstenite::handshake::server::ErrorResponse as HsError;
use tokio_tungstenite::tungstenite::handshake::server::Callback as HsCallback;

enum LoginType {
    Panel,
    Wall,
    Reject,
}

struct Callback {
    panel_token: Option<u128>,
    login_result: tokio::sync::oneshot::Sender<LoginType>,
}

/// Why a panel handshake is refused, if it is.
fn check_panel_token(expected: Option<u128>, req: &HsReq) -> Option<&'static str> {
    let token = expected?;
    let req_token = match req.headers().get("panel-token") {
        Some(req_token) => req_token,
        None => return Some("NoToken"),
    };
    let req_token = match req_token.to_str() {
        Ok(req_token) => req_token,
        Err(_) => return Some("CanNotDecode"),
    };
    match u128::from_str_radix(req_token, 16) {
        Ok(req_token) if req_token == token => None,
        Ok(_) => Some("WrongToken"),
        Err(_) => Some("NotHex"),
    }
}

impl HsCallback for Callback {
    fn on_request(self, req: &HsReq, resp: HsResp) -> Result<HsResp, HsError> {
        let path = req.uri().path();
        let error_info = if path == "/panel" {
            match check_panel_token(self.panel_token, req) {
                None => {
                    self.login_result.send(LoginType::Panel).unwrap_or_default();
                    return Ok(resp);
                },
                Some(error_info) => error_info,
            }
        } else if path == "/wall" {
            self.login_result.send(LoginType::Wall).unwrap_or_default();
            return Ok(resp);
        } else {
            "PathError"
        };
        warn!("handshake on {} refused: {}", path, error_info);
        self.login_result.send(LoginType::Reject).unwrap_or_default();
        Err(HsError::new(Some(error_info.to_string())))
    }
}
