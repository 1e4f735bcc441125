// ==========================================
// 防災備蓄推奨システム - SQLite 接続初期化
// ==========================================
// 目標:
// - すべての Connection::open の PRAGMA 挙動を統一する
// - busy_timeout を統一し、偶発的な busy エラーを減らす
// ==========================================

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use std::time::Duration;

/// 既定の busy_timeout（ミリ秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 現在のコードが期待する schema_version
///
/// カタログDBは外部で用意される読み取り専用データのため、
/// バージョン不一致は警告のみで自動マイグレーションは行わない。
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// SQLite 接続へ統一 PRAGMA を適用する
///
/// foreign_keys と busy_timeout は接続ごとに設定が必要
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// SQLite 接続を開き統一設定を適用する
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// schema_version を読む（テーブルが無ければ None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    conn.query_row(
        "SELECT version FROM schema_version ORDER BY version DESC LIMIT 1",
        [],
        |row| row.get::<_, i64>(0),
    )
    .optional()
}

/// schema_version の不一致を警告する（自動マイグレーションはしない）
pub fn warn_on_schema_mismatch(conn: &Connection) {
    match read_schema_version(conn) {
        Ok(Some(version)) if version != CURRENT_SCHEMA_VERSION => {
            tracing::warn!(
                "カタログDBの schema_version が想定と異なります: actual={}, expected={}",
                version,
                CURRENT_SCHEMA_VERSION
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!("schema_version の読み取りに失敗しました: {}", e);
        }
    }
}
