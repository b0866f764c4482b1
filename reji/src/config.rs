use std::num::ParseIntError;
use std::time::Duration;

use clap::Parser;

use crate::consts::*;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// Port the panel and wall websockets listen on
    #[clap(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,
    /// Base url of the game api
    #[clap(short, long, default_value = DEFAULT_API)]
    pub api: String,
    /// Hex token operator panels must send in the `panel-token` header
    #[clap(short, long)]
    pub token: Option<String>,
    /// Delay before a loaded question is revealed on the wall, in ms
    #[clap(long, default_value_t = 2000)]
    pub reveal_delay: u64,
    /// Serve tokio-console instrumentation
    #[clap(long)]
    pub tokio_console: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub api_base: String,
    pub panel_token: Option<u128>,
    pub reveal_delay: Duration,
    pub classic_countdown: u32,
    pub true_false_countdown: u32,
    pub stage3_award: i32,
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self, ParseIntError> {
        let panel_token = match args.token {
            Some(ref token) => Some(u128::from_str_radix(token, 16)?),
            None => None,
        };
        Ok(Self {
            port: args.port,
            api_base: args.api.trim_end_matches('/').to_string(),
            panel_token,
            reveal_delay: Duration::from_millis(args.reveal_delay),
            ..Self::default()
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            api_base: DEFAULT_API.to_string(),
            panel_token: None,
            reveal_delay: WALL_REVEAL_DELAY,
            classic_countdown: CLASSIC_COUNTDOWN,
            true_false_countdown: TRUE_FALSE_COUNTDOWN,
            stage3_award: STAGE3_AWARD,
        }
    }
}
