// ==========================================
// カタログDBシードツール
// ==========================================
// 用途: デモ・動作確認用のカタログDBを作成する
// 使い方: cargo run --bin seed_catalog [DBパス]
//         （省略時は既定のカタログDBパス）
// ==========================================

use anyhow::Context;
use bichiku_advisor::app::get_default_db_path;
use bichiku_advisor::db::open_sqlite_connection;
use bichiku_advisor::engine::recommend::fallback_stock_items;
use rusqlite::params;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let db_path = std::env::args()
        .nth(1)
        .unwrap_or_else(get_default_db_path);

    if let Some(parent) = std::path::Path::new(&db_path).parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("ディレクトリを作成できません: {}", parent.display()))?;
    }

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("カタログDBを開けません: {}", db_path))?;

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
    )?;

    // 内蔵サンプルカタログをそのままシードデータとして使う
    for item in fallback_stock_items() {
        conn.execute(
            "INSERT OR REPLACE INTO recommended_stock_items
                (recommended_stock_item_id, item_name, phase, per_person_qty,
                 unit, basis, reference_price)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                item.id,
                item.name,
                item.phase.label(),
                item.per_person_qty,
                item.unit,
                item.basis,
                item.reference_price
            ],
        )?;
        for org_id in &item.organization_type_ids {
            conn.execute(
                "INSERT OR REPLACE INTO item_organization_types
                    (recommended_stock_item_id, organization_type_id)
                 VALUES (?1, ?2)",
                params![item.id, org_id],
            )?;
        }
        for hazard_id in &item.hazard_type_ids {
            conn.execute(
                "INSERT OR REPLACE INTO item_hazard_types
                    (recommended_stock_item_id, hazard_type_id)
                 VALUES (?1, ?2)",
                params![item.id, hazard_id],
            )?;
        }
    }

    // 代表的な具体的商品
    let products: &[(i64, &str, i64, &str, i64)] = &[
        (101, "アルファ米 白飯 50食", 12000, "R-0101", 1),
        (102, "保存水 2L×6本", 1200, "W-0102", 2),
        (103, "非常用トイレ 50回分", 5800, "T-0103", 3),
        (104, "防災ヘルメット A型", 4200, "H-0104", 4),
        (105, "救急セット 20人用", 9800, "F-0105", 5),
        (106, "カセットコンロ 標準型", 3300, "C-0106", 6),
    ];
    for (id, name, price, code, stock_item_id) in products {
        conn.execute(
            "INSERT OR REPLACE INTO concrete_products
                (product_id, product_name, unit_price, product_code, recommended_stock_item_id)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, name, price, code, stock_item_id],
        )?;
    }

    tracing::info!("カタログDBをシードしました: {}", db_path);
    Ok(())
}
