// ==========================================
// 防災備蓄推奨システム - 具体的商品リポジトリ
// ==========================================
// 職責: 具体的商品（購入可能SKU）テーブルへの読み取り専用アクセス
// 制約: 業務ロジックを含まない。全クエリはパラメータ化する
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::product::ConcreteProduct;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::sync::{Arc, Mutex};

// ==========================================
// ConcreteProductRepository - 具体的商品リポジトリ
// ==========================================
pub struct ConcreteProductRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ConcreteProductRepository {
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

    fn map_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConcreteProduct> {
        Ok(ConcreteProduct {
            id: row.get(0)?,
            product_name: row.get(1)?,
            unit_price: row.get(2)?,
            image_url: row.get(3)?,
            product_code: row.get(4)?,
            recommended_stock_item_id: row.get(5)?,
        })
    }

    /// 指定した推奨備蓄品に対応する商品を取得
    pub fn list_products_for_stock_item(
        &self,
        stock_item_id: i64,
    ) -> RepositoryResult<Vec<ConcreteProduct>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT product_id, product_name, unit_price, image_url,
                    product_code, recommended_stock_item_id
             FROM concrete_products
             WHERE recommended_stock_item_id = ?1
             ORDER BY rowid",
        )?;

        let rows = stmt.query_map(params![stock_item_id], Self::map_product)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// 商品を1件取得
    pub fn find_product(&self, product_id: i64) -> RepositoryResult<ConcreteProduct> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT product_id, product_name, unit_price, image_url,
                    product_code, recommended_stock_item_id
             FROM concrete_products
             WHERE product_id = ?1",
        )?;

        let mut rows = stmt.query_map(params![product_id], Self::map_product)?;
        match rows.next() {
            Some(row) => Ok(row?),
            None => Err(RepositoryError::NotFound {
                entity: "concrete_products".to_string(),
                id: product_id.to_string(),
            }),
        }
    }
}
