// ==========================================
// 防災備蓄推奨システム - カタログ層エラー型
// ==========================================
// 職責: 読み取り専用カタログアクセスのエラーを定義する
// ツール: thiserror 派生マクロ
// ==========================================

use thiserror::Error;

/// カタログ層エラー型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== データベースエラー =====
    #[error("データベース接続失敗: {0}")]
    DatabaseConnectionError(String),

    #[error("データベースロック取得失敗: {0}")]
    LockError(String),

    #[error("データベースクエリ失敗: {0}")]
    DatabaseQueryError(String),

    // ===== データ品質エラー =====
    #[error("レコード未検出: {entity} id={id}")]
    NotFound { entity: String, id: String },

    #[error("フィールド値エラー (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(e: rusqlite::Error) -> Self {
        RepositoryError::DatabaseQueryError(e.to_string())
    }
}

/// カタログ層 Result 型エイリアス
pub type RepositoryResult<T> = Result<T, RepositoryError>;
