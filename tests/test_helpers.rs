// ==========================================
// テスト共通ヘルパー
// ==========================================
// 用途: 一時カタログDBの作成・シード、テスト用実体の構築、
//       外部境界のモック実装
// ==========================================

// 各テストバイナリは必要なヘルパーだけを使う
#![allow(dead_code)]

use bichiku_advisor::advisor::{AdvisorError, AdvisorRequest, AdvisorResponse, SupplyAdvisor};
use bichiku_advisor::domain::risk::RiskAssessment;
use bichiku_advisor::domain::stock_item::{CartLine, StockItem};
use bichiku_advisor::domain::types::Phase;
use bichiku_advisor::hazard::{HazardError, HazardRiskProvider};
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tempfile::TempDir;

// ==========================================
// カタログDB
// ==========================================

/// 一時ディレクトリにカタログDBを作り、スキーマを流す
pub fn create_catalog_db() -> (TempDir, String) {
    let dir = TempDir::new().expect("一時ディレクトリの作成に失敗");
    let db_path = dir
        .path()
        .join("catalog.db")
        .to_string_lossy()
        .to_string();

    let conn = Connection::open(&db_path).expect("カタログDBの作成に失敗");
    create_schema(&conn);

    (dir, db_path)
}

/// カタログスキーマを作成する
pub fn create_schema(conn: &Connection) {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS recommended_stock_items (
            recommended_stock_item_id INTEGER PRIMARY KEY,
            item_name TEXT NOT NULL,
            phase TEXT NOT NULL,
            per_person_qty REAL NOT NULL,
            unit TEXT,
            basis TEXT,
            reference_price INTEGER
        );
        CREATE TABLE IF NOT EXISTS item_organization_types (
            recommended_stock_item_id INTEGER NOT NULL,
            organization_type_id INTEGER NOT NULL,
            PRIMARY KEY (recommended_stock_item_id, organization_type_id)
        );
        CREATE TABLE IF NOT EXISTS item_hazard_types (
            recommended_stock_item_id INTEGER NOT NULL,
            hazard_type_id INTEGER NOT NULL,
            PRIMARY KEY (recommended_stock_item_id, hazard_type_id)
        );
        CREATE TABLE IF NOT EXISTS concrete_products (
            product_id INTEGER PRIMARY KEY,
            product_name TEXT NOT NULL,
            unit_price INTEGER NOT NULL,
            image_url TEXT NOT NULL DEFAULT '',
            product_code TEXT NOT NULL,
            recommended_stock_item_id INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );
        INSERT OR IGNORE INTO schema_version (version) VALUES (1);",
    )
    .expect("スキーマ作成に失敗");
}

/// 備蓄品を1件シードする
pub fn seed_stock_item(
    conn: &Connection,
    id: i64,
    name: &str,
    phase: &str,
    per_person_qty: f64,
    unit: &str,
    reference_price: i64,
) {
    conn.execute(
        "INSERT INTO recommended_stock_items
            (recommended_stock_item_id, item_name, phase, per_person_qty, unit, reference_price)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![id, name, phase, per_person_qty, unit, reference_price],
    )
    .expect("備蓄品のシードに失敗");
}

/// 組織形態の関連を1件シードする
pub fn seed_organization_relation(conn: &Connection, stock_item_id: i64, organization_type_id: i64) {
    conn.execute(
        "INSERT INTO item_organization_types (recommended_stock_item_id, organization_type_id)
         VALUES (?1, ?2)",
        params![stock_item_id, organization_type_id],
    )
    .expect("組織形態関連のシードに失敗");
}

/// 災害種別の関連を1件シードする
pub fn seed_hazard_relation(conn: &Connection, stock_item_id: i64, hazard_type_id: i64) {
    conn.execute(
        "INSERT INTO item_hazard_types (recommended_stock_item_id, hazard_type_id)
         VALUES (?1, ?2)",
        params![stock_item_id, hazard_type_id],
    )
    .expect("災害種別関連のシードに失敗");
}

/// 具体的商品を1件シードする
pub fn seed_product(
    conn: &Connection,
    product_id: i64,
    product_name: &str,
    unit_price: i64,
    stock_item_id: i64,
) {
    conn.execute(
        "INSERT INTO concrete_products
            (product_id, product_name, unit_price, product_code, recommended_stock_item_id)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            product_id,
            product_name,
            unit_price,
            format!("P-{:04}", product_id),
            stock_item_id
        ],
    )
    .expect("商品のシードに失敗");
}

// ==========================================
// テスト用実体
// ==========================================

/// テスト用の StockItem を作る
pub fn sample_stock_item(
    id: i64,
    name: &str,
    phase: Phase,
    per_person_qty: f64,
    organization_type_ids: &[i64],
) -> StockItem {
    StockItem {
        id,
        name: name.to_string(),
        phase,
        per_person_qty,
        unit: Some("個".to_string()),
        basis: None,
        reference_price: Some(1000),
        organization_type_ids: organization_type_ids.to_vec(),
        hazard_type_ids: vec![1],
    }
}

/// テスト用の CartLine を作る
pub fn sample_cart_line(
    id: i64,
    name: &str,
    phase: Phase,
    calculated_qty: f64,
    organization_type_ids: &[i64],
) -> CartLine {
    CartLine::new(
        sample_stock_item(id, name, phase, 1.0, organization_type_ids),
        calculated_qty,
    )
}

// ==========================================
// 外部境界モック
// ==========================================

/// 固定応答を返すテスト用アドバイザ
pub struct MockAdvisor {
    response: Mutex<Option<Result<AdvisorResponse, AdvisorError>>>,
    call_count: AtomicUsize,
}

impl MockAdvisor {
    /// 成功応答を返すモック
    pub fn with_response(response: AdvisorResponse) -> Self {
        Self {
            response: Mutex::new(Some(Ok(response))),
            call_count: AtomicUsize::new(0),
        }
    }

    /// 失敗するモック
    pub fn failing() -> Self {
        Self {
            response: Mutex::new(Some(Err(AdvisorError::Transport(
                "接続できません".to_string(),
            )))),
            call_count: AtomicUsize::new(0),
        }
    }

    /// 呼び出し回数
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SupplyAdvisor for MockAdvisor {
    async fn filter_supplies(
        &self,
        _request: &AdvisorRequest,
    ) -> Result<AdvisorResponse, AdvisorError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.response
            .lock()
            .expect("モック応答のロック取得に失敗")
            .take()
            .unwrap_or_else(|| Ok(AdvisorResponse::default()))
    }
}

/// 固定評価を返すテスト用リスクプロバイダ
pub struct MockRiskProvider {
    result: Mutex<Vec<Result<RiskAssessment, HazardError>>>,
    call_count: AtomicUsize,
}

impl MockRiskProvider {
    /// 呼び出しごとに順番に返す結果列を持つモック
    pub fn with_results(results: Vec<Result<RiskAssessment, HazardError>>) -> Self {
        Self {
            result: Mutex::new(results),
            call_count: AtomicUsize::new(0),
        }
    }

    /// 呼び出し回数
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HazardRiskProvider for MockRiskProvider {
    async fn assess(&self, address: &str) -> Result<RiskAssessment, HazardError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let mut results = self.result.lock().expect("モック結果のロック取得に失敗");
        if results.is_empty() {
            return Err(HazardError::Transport(format!(
                "モック結果が不足しています: {}",
                address
            )));
        }
        results.remove(0)
    }
}

/// テスト用の RiskAssessment を作る
pub fn sample_assessment(address: &str) -> RiskAssessment {
    RiskAssessment {
        address: address.to_string(),
        input_address: address.to_string(),
        earthquake: None,
        flood: None,
        tsunami: None,
        landslide: None,
        heavy_snow: None,
    }
}
