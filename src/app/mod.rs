// ==========================================
// 防災備蓄推奨システム - アプリケーション層
// ==========================================
// 職責: アプリ全体の状態組み立て
// ==========================================

pub mod state;

// 再エクスポート
pub use state::{get_default_db_path, AppState};
