use tracing_subscriber::EnvFilter;

/// ログ初期化（標準エラーに出力）
///
/// 通常は `info`。`--verbose` のときは `debug` にし、`RUST_LOG` があればそちらを使う。
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
