// ==========================================
// 防災備蓄推奨システム - 備蓄品カタログリポジトリ
// ==========================================
// 職責: 推奨備蓄品テーブルと中間テーブルへの読み取り専用アクセス
// 制約: 業務ロジックを含まない。全クエリはパラメータ化する
// ==========================================

use crate::db::open_sqlite_connection;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// 行型 - カタログの生データ
// ==========================================

/// recommended_stock_items の1行（中間テーブル結合前）
#[derive(Debug, Clone)]
pub struct StockItemRow {
    pub id: i64,
    pub name: String,
    pub phase: String, // フェーズ表記そのまま（解釈は engine 層）
    pub per_person_qty: f64,
    pub unit: Option<String>,
    pub basis: Option<String>,
    pub reference_price: Option<i64>,
}

/// item_organization_types の1行
#[derive(Debug, Clone, Copy)]
pub struct OrganizationRelation {
    pub stock_item_id: i64,
    pub organization_type_id: i64,
}

/// item_hazard_types の1行
#[derive(Debug, Clone, Copy)]
pub struct HazardRelation {
    pub stock_item_id: i64,
    pub hazard_type_id: i64,
}

// ==========================================
// CatalogRepository - 備蓄品カタログリポジトリ
// ==========================================
pub struct CatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl CatalogRepository {
    /// カタログDBパスから作る
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 既存接続から作る
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    // ==========================================
    // 読み取りクエリ
    // ==========================================

    /// 推奨備蓄品を全件取得（カタログ登録順）
    pub fn list_stock_items(&self) -> RepositoryResult<Vec<StockItemRow>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT recommended_stock_item_id, item_name, phase, per_person_qty,
                    unit, basis, reference_price
             FROM recommended_stock_items
             ORDER BY rowid",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(StockItemRow {
                id: row.get(0)?,
                name: row.get(1)?,
                phase: row.get(2)?,
                per_person_qty: row.get(3)?,
                unit: row.get(4)?,
                basis: row.get(5)?,
                reference_price: row.get(6)?,
            })
        })?;

        let mut items = Vec::new();
        for row in rows {
            items.push(row?);
        }
        Ok(items)
    }

    /// 組織形態の関連を取得
    ///
    /// # 引数
    /// - organization_type_id: Some の場合はその組織形態の行のみ
    pub fn list_organization_relations(
        &self,
        organization_type_id: Option<i64>,
    ) -> RepositoryResult<Vec<OrganizationRelation>> {
        let conn = self.lock()?;

        let mut out = Vec::new();
        match organization_type_id {
            Some(org_id) => {
                let mut stmt = conn.prepare(
                    "SELECT recommended_stock_item_id, organization_type_id
                     FROM item_organization_types
                     WHERE organization_type_id = ?1",
                )?;
                let rows = stmt.query_map(params![org_id], |row| {
                    Ok(OrganizationRelation {
                        stock_item_id: row.get(0)?,
                        organization_type_id: row.get(1)?,
                    })
                })?;
                for row in rows {
                    out.push(row?);
                }
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT recommended_stock_item_id, organization_type_id
                     FROM item_organization_types",
                )?;
                let rows = stmt.query_map([], |row| {
                    Ok(OrganizationRelation {
                        stock_item_id: row.get(0)?,
                        organization_type_id: row.get(1)?,
                    })
                })?;
                for row in rows {
                    out.push(row?);
                }
            }
        }
        Ok(out)
    }

    /// 災害種別の関連を全件取得
    pub fn list_hazard_relations(&self) -> RepositoryResult<Vec<HazardRelation>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT recommended_stock_item_id, hazard_type_id
             FROM item_hazard_types",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(HazardRelation {
                stock_item_id: row.get(0)?,
                hazard_type_id: row.get(1)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}
