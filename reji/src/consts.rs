use std::time::Duration;

/// Answer slots on the board; stage 3 uses all of them.
pub const BOARD_SIZE: usize = 7;
pub const CLASSIC_OPTIONS: usize = 4;
pub const STATEMENT_COUNT: usize = 6;
pub const FINALIST_COUNT: usize = 2;

pub const STAGE3_AWARD: i32 = 10;
pub const CLASSIC_COUNTDOWN: u32 = 25;
pub const TRUE_FALSE_COUNTDOWN: u32 = 10;

pub const WALL_REVEAL_DELAY: Duration = Duration::from_millis(2000);
pub const WHEEL_FRONT_DELAY: f32 = 1.5;
pub const DEFAULT_COLOR: &str = "#FFFFFF";

pub const HB_DURATION: tokio::time::Duration = tokio::time::Duration::from_secs(10);

pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_API: &str = "http://127.0.0.1:5000";
