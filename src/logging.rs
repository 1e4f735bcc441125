// ==========================================
// ログシステム初期化
// ==========================================
// tracing と tracing-subscriber を使用
// 環境変数によるログレベル設定に対応
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// ログシステムを初期化する
///
/// # 環境変数
/// - RUST_LOG: ログレベルフィルタ（既定: info）
///   例: RUST_LOG=debug または RUST_LOG=bichiku_advisor=trace
///
/// # 例
/// ```no_run
/// use bichiku_advisor::logging;
/// logging::init();
/// ```
pub fn init() {
    // 環境変数からログレベルを読む（既定は info）
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // ログ形式の設定
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();
}

/// テスト環境用のログシステムを初期化する
///
/// デバッグしやすいよう詳細なログレベルを使う
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
