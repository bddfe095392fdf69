use tracing_subscriber::{fmt, EnvFilter};

// ログの出力先は標準エラー (標準出力はJSONの出力に使用)
// RUST_LOG, LOG_LEVEL の順に参照し, どちらもない場合は default_level
pub fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .or_else(|_| EnvFilter::try_from_env("LOG_LEVEL"))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
