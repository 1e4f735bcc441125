// ==========================================
// 防災備蓄推奨システム - 設定管理
// ==========================================
// 職責: 設定の読み込み・照会
// 保存先: config_kv テーブル (key-value + scope)
// 制約: APIキーのような秘密情報は置かない（環境変数で渡す）
// ==========================================

use crate::db::{configure_sqlite_connection, open_sqlite_connection};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ==========================================
// 既定値
// ==========================================

pub const DEFAULT_HAZARD_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_HAZARD_CACHE_CAPACITY: usize = 128;
pub const DEFAULT_ADVISOR_API_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_ADVISOR_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ADVISOR_TIMEOUT_SECONDS: u64 = 60;
pub const DEFAULT_RECOMMEND_HEADCOUNT: i64 = 10;

// ==========================================
// ConfigManager - 設定管理
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// DBパスから作る
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 既存接続から作る
    ///
    /// 接続挙動を揃えるため、渡された接続にも統一 PRAGMA を適用する（冪等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)
                .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        }
        Ok(Self { conn })
    }

    /// config_kv から設定値を読む（scope_id='global'）
    ///
    /// # 戻り値
    /// - Some(String): 設定値
    /// - None: 設定が存在しない（テーブル自体が無い場合も含む）
    fn get_config_value(&self, key: &str) -> Option<String> {
        let conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(e) => {
                tracing::warn!("設定読み取りのロック取得に失敗: {}", e);
                return None;
            }
        };

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Some(value),
            Err(rusqlite::Error::QueryReturnedNoRows) => None,
            Err(e) => {
                // カタログDBに config_kv が無い構成も許容する（既定値で動く）
                tracing::debug!("設定 {} の読み取りに失敗（既定値を使用）: {}", key, e);
                None
            }
        }
    }

    fn get_parsed_or<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.get_config_value(key) {
            Some(raw) => raw.parse::<T>().unwrap_or_else(|_| {
                tracing::warn!("設定 {} の値 '{}' を解釈できません。既定値を使用します", key, raw);
                default
            }),
            None => default,
        }
    }

    // ==========================================
    // 型付きゲッター
    // ==========================================

    /// リスク評価APIのベースURL
    pub fn hazard_api_base_url(&self) -> String {
        self.get_config_value("hazard.api_base_url")
            .unwrap_or_else(|| DEFAULT_HAZARD_API_BASE_URL.to_string())
    }

    /// リスク評価キャッシュの容量
    pub fn hazard_cache_capacity(&self) -> usize {
        self.get_parsed_or("hazard.cache_capacity", DEFAULT_HAZARD_CACHE_CAPACITY)
    }

    /// テキスト生成APIのベースURL
    pub fn advisor_api_base_url(&self) -> String {
        self.get_config_value("advisor.api_base_url")
            .unwrap_or_else(|| DEFAULT_ADVISOR_API_BASE_URL.to_string())
    }

    /// テキスト生成APIのモデル名
    pub fn advisor_model(&self) -> String {
        self.get_config_value("advisor.model")
            .unwrap_or_else(|| DEFAULT_ADVISOR_MODEL.to_string())
    }

    /// テキスト生成APIのタイムアウト
    pub fn advisor_timeout(&self) -> Duration {
        Duration::from_secs(
            self.get_parsed_or("advisor.timeout_seconds", DEFAULT_ADVISOR_TIMEOUT_SECONDS),
        )
    }

    /// 推奨計算の既定人数（人数未入力時）
    pub fn default_headcount(&self) -> i64 {
        self.get_parsed_or("recommend.default_headcount", DEFAULT_RECOMMEND_HEADCOUNT)
    }

    // ==========================================
    // 書き込み（運用ツール・テスト用）
    // ==========================================

    /// global scope の設定値を書く
    pub fn set_global_config_value(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS config_kv (
                scope_id TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (scope_id, key)
            )",
            [],
        )?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT (scope_id, key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
