// ==========================================
// 防災備蓄推奨システム - アプリケーション状態
// ==========================================
// 職責: API実体と共有リソースの組み立て・保持
// 注意: テキスト生成APIキーが未設定でも他機能は動かす
//       （チャット絞り込みのみ無効になる）
// ==========================================

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::advisor::OpenAiAdvisor;
use crate::api::{ReconcileApi, RiskApi, SuppliesApi};
use crate::config::ConfigManager;
use crate::db::{open_sqlite_connection, warn_on_schema_mismatch};
use crate::engine::recommend::RecommendationEngine;
use crate::hazard::HttpRiskClient;
use crate::repository::{CatalogRepository, ConcreteProductRepository};
use crate::session::cart_store::CartStore;
use anyhow::Context;

/// リスク評価APIのタイムアウト
const HAZARD_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ==========================================
// AppState - アプリケーション状態
// ==========================================
pub struct AppState {
    /// カタログDBパス
    pub db_path: String,

    /// 設定管理
    pub config: Arc<ConfigManager>,

    /// セッション状態（カート）
    pub store: Arc<Mutex<CartStore>>,

    /// 備蓄品API
    pub supplies_api: Arc<SuppliesApi>,

    /// チャット絞り込みAPI（APIキー未設定時は None）
    pub reconcile_api: Option<Arc<ReconcileApi>>,

    /// リスク評価API
    pub risk_api: Arc<RiskApi>,
}

impl AppState {
    /// カタログDBパスから全APIを組み立てる
    pub fn new(db_path: String) -> anyhow::Result<Self> {
        // 1つの接続を各リポジトリで共有する（PRAGMA挙動の統一）
        let conn = open_sqlite_connection(&db_path)
            .with_context(|| format!("カタログDBを開けません: {}", db_path))?;
        warn_on_schema_mismatch(&conn);
        let conn = Arc::new(Mutex::new(conn));

        let catalog_repo = Arc::new(CatalogRepository::from_connection(conn.clone()));
        let product_repo = Arc::new(ConcreteProductRepository::from_connection(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn)?);

        let engine = Arc::new(RecommendationEngine::new(catalog_repo));
        let store = Arc::new(Mutex::new(CartStore::new()));
        let default_headcount = config.default_headcount();

        let supplies_api = Arc::new(SuppliesApi::new(
            engine.clone(),
            product_repo,
            store.clone(),
            default_headcount,
        ));

        let reconcile_api = match OpenAiAdvisor::from_env(
            config.advisor_api_base_url(),
            config.advisor_model(),
            config.advisor_timeout(),
        ) {
            Ok(advisor) => Some(Arc::new(ReconcileApi::new(
                Arc::new(advisor),
                engine.clone(),
                store.clone(),
                default_headcount,
            ))),
            Err(e) => {
                tracing::warn!("チャット絞り込みを無効化します: {}", e);
                None
            }
        };

        let risk_provider =
            HttpRiskClient::new(config.hazard_api_base_url(), HAZARD_REQUEST_TIMEOUT)
                .context("リスク評価クライアントの初期化に失敗しました")?;
        let risk_api = Arc::new(RiskApi::new(
            Arc::new(risk_provider),
            config.hazard_cache_capacity(),
        ));

        Ok(Self {
            db_path,
            config,
            store,
            supplies_api,
            reconcile_api,
            risk_api,
        })
    }
}

/// 既定のカタログDBパスを返す
///
/// 環境変数 BICHIKU_CATALOG_DB が設定されていればそちらを優先する
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("BICHIKU_CATALOG_DB") {
        return path;
    }

    let base = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    base.join("bichiku-advisor")
        .join("catalog.db")
        .to_string_lossy()
        .to_string()
}
