// ==========================================
// API層 業務フロー統合テスト
// ==========================================
// テスト目標: 推奨実行 → カート編集 → 商品選択 → 価格合計までの
//             一連の流れと不変条件の維持
// ==========================================

mod test_helpers;

use bichiku_advisor::api::supplies_api::SuppliesApi;
use bichiku_advisor::engine::recommend::RecommendationEngine;
use bichiku_advisor::repository::{CatalogRepository, ConcreteProductRepository};
use bichiku_advisor::session::cart_store::CartStore;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use test_helpers::{
    create_catalog_db, seed_hazard_relation, seed_organization_relation, seed_product,
    seed_stock_item,
};

// 内蔵サンプルカタログ(ID 1〜8)と衝突しないIDでシードする
const WATER_ID: i64 = 11;
const HELMET_ID: i64 = 12;

fn build_api() -> (TempDir, SuppliesApi, Arc<Mutex<CartStore>>) {
    let (dir, db_path) = create_catalog_db();
    {
        let conn = Connection::open(&db_path).expect("接続に失敗");

        seed_stock_item(&conn, WATER_ID, "保存水", "発生前", 9.0, "ℓ", 150);
        seed_organization_relation(&conn, WATER_ID, 1);
        seed_hazard_relation(&conn, WATER_ID, 2);

        seed_stock_item(&conn, HELMET_ID, "ヘルメット", "発生時", 1.0, "個", 3600);
        seed_organization_relation(&conn, HELMET_ID, 1);
        seed_hazard_relation(&conn, HELMET_ID, 1);

        seed_product(&conn, 101, "防災ヘルメット A型", 4200, HELMET_ID);
        seed_product(&conn, 102, "防災ヘルメット B型", 3800, HELMET_ID);
    }

    let catalog = Arc::new(CatalogRepository::new(&db_path).expect("リポジトリ作成に失敗"));
    let products =
        Arc::new(ConcreteProductRepository::new(&db_path).expect("リポジトリ作成に失敗"));
    let engine = Arc::new(RecommendationEngine::new(catalog));
    let store = Arc::new(Mutex::new(CartStore::new()));

    let api = SuppliesApi::new(engine, products, store.clone(), 10);
    (dir, api, store)
}

#[test]
fn test_recommendation_populates_cart_and_supplies() {
    let (_dir, api, store) = build_api();

    let lines = api.change_headcount(10).expect("推奨実行に失敗");
    assert_eq!(lines.len(), 2);

    let store = store.lock().unwrap();
    assert_eq!(store.stock_cart().len(), 2);
    // 備蓄品リスト（簡略版）も同時に組み立てられる
    assert_eq!(store.supplies().len(), 2);
    assert_eq!(store.supplies()[0].name, "保存水");
    assert_eq!(store.supplies()[0].quantity, "90ℓ");
    assert_eq!(store.supplies()[0].category.as_deref(), Some("発生前"));
}

#[test]
fn test_headcount_change_cascade() {
    let (_dir, api, _store) = build_api();

    // 保存水 9ℓ/人: 10人 → 90
    let lines = api.change_headcount(10).expect("推奨実行に失敗");
    let water = lines.iter().find(|l| l.name() == "保存水").unwrap();
    assert_eq!(water.calculated_qty, 90.0);

    // 15人 → 135
    let lines = api.change_headcount(15).expect("再計算に失敗");
    let water = lines.iter().find(|l| l.name() == "保存水").unwrap();
    assert_eq!(water.calculated_qty, 135.0);
}

#[test]
fn test_product_selection_and_totals() {
    let (_dir, api, store) = build_api();
    api.change_headcount(10).expect("推奨実行に失敗");

    // ヘルメットの商品候補
    let products = api
        .list_products_for_stock_item(HELMET_ID)
        .expect("商品一覧に失敗");
    assert_eq!(products.len(), 2);

    // A型を選択 → 親カート行の数量（10個）で入る
    api.select_product(101).expect("商品選択に失敗");
    {
        let store = store.lock().unwrap();
        let line = store.lookup_concrete_line_by_stock_item_id(HELMET_ID).unwrap();
        assert_eq!(line.product_id(), 101);
        assert_eq!(line.quantity, 10.0);
    }

    // B型へ選び直し → 置き換え（I2）
    api.select_product(102).expect("商品選択に失敗");
    {
        let store = store.lock().unwrap();
        assert_eq!(store.concrete_cart().len(), 1);
        assert_eq!(
            store
                .lookup_concrete_line_by_stock_item_id(HELMET_ID)
                .unwrap()
                .product_id(),
            102
        );
    }

    // 価格合計: 参考価格 = 保存水 150×90 + ヘルメット 3600×10
    assert_eq!(api.reference_price_total().unwrap(), 150 * 90 + 3600 * 10);
    // 買い物かご = B型 3800 × 10個
    assert_eq!(api.concrete_price_total().unwrap(), 3800 * 10);
}

#[test]
fn test_stock_line_removal_cascades_through_api() {
    let (_dir, api, store) = build_api();
    api.change_headcount(10).expect("推奨実行に失敗");
    api.select_product(101).expect("商品選択に失敗");

    api.remove_stock_line(HELMET_ID).expect("削除に失敗");

    let store = store.lock().unwrap();
    assert!(!store
        .stock_cart()
        .iter()
        .any(|l| l.stock_item_id() == HELMET_ID));
    assert!(store.concrete_cart().is_empty());
}

#[test]
fn test_quantity_update_syncs_concrete_line() {
    let (_dir, api, store) = build_api();
    api.change_headcount(10).expect("推奨実行に失敗");
    api.select_product(101).expect("商品選択に失敗");

    api.update_stock_line_quantity(HELMET_ID, 12.0)
        .expect("数量変更に失敗");

    let store = store.lock().unwrap();
    assert_eq!(
        store
            .lookup_concrete_line_by_stock_item_id(HELMET_ID)
            .unwrap()
            .quantity,
        12.0
    );
}

#[test]
fn test_invalid_inputs_are_rejected() {
    let (_dir, api, _store) = build_api();

    assert!(api.change_headcount(-1).is_err());
    assert!(api.change_organization_type(9).is_err());
    assert!(api.update_stock_line_quantity(WATER_ID, -2.0).is_err());
}

#[test]
fn test_recompute_after_organization_change_drops_unrelated_concrete_lines() {
    let (_dir, api, store) = build_api();
    api.change_headcount(10).expect("推奨実行に失敗");
    api.select_product(101).expect("商品選択に失敗");

    // 組織形態2にはカタログ上の関連が無く、フォールバックに落ちる。
    // 旧カートのヘルメットは新カートに存在しないため買い物かごも空になる
    api.change_organization_type(2).expect("組織変更に失敗");

    let store = store.lock().unwrap();
    assert!(store.concrete_cart().is_empty());
}
