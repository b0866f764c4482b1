use std::io::Write;

/// `[time][LEVEL]msg`, filtered through `RUST_LOG` (info by default).
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(buf, "[{}][{}]{}", chrono::Local::now().format("%H:%M:%S%.3f"), record.level(), record.args())
        })
        .init();
}
