// ==========================================
// 防災備蓄推奨システム - 備蓄品API
// ==========================================
// 職責: 推奨実行・カート編集・価格合計のUI向け窓口
// 制約: カート状態の変更は CartStore の名前付き操作のみ経由する
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::product::ConcreteProduct;
use crate::domain::stock_item::CartLine;
use crate::domain::supply::SupplySummary;
use crate::engine::pricing::{total_concrete_price, total_reference_price};
use crate::engine::recommend::RecommendationEngine;
use crate::repository::product_repo::ConcreteProductRepository;
use crate::session::cart_store::CartStore;
use std::sync::{Arc, Mutex, MutexGuard};

// ==========================================
// SuppliesApi - 備蓄品API
// ==========================================
pub struct SuppliesApi {
    engine: Arc<RecommendationEngine>,
    product_repo: Arc<ConcreteProductRepository>,
    store: Arc<Mutex<CartStore>>,
    default_headcount: i64,
}

impl SuppliesApi {
    /// 依存を注入して作る
    pub fn new(
        engine: Arc<RecommendationEngine>,
        product_repo: Arc<ConcreteProductRepository>,
        store: Arc<Mutex<CartStore>>,
        default_headcount: i64,
    ) -> Self {
        Self {
            engine,
            product_repo,
            store,
            default_headcount,
        }
    }

    fn lock_store(&self) -> ApiResult<MutexGuard<'_, CartStore>> {
        self.store
            .lock()
            .map_err(|e| ApiError::Internal(format!("カート状態のロック取得に失敗: {}", e)))
    }

    // ==========================================
    // 推奨フロー
    // ==========================================

    /// 選択中の組織形態・人数で推奨を実行し、カートを置き換える
    ///
    /// # 戻り値
    /// 置き換え後の備蓄品カート（人数未入力時は既定人数で計算）
    pub fn run_recommendation(&self) -> ApiResult<Vec<CartLine>> {
        let (organization_type_id, headcount) = {
            let store = self.lock_store()?;
            (
                store.organization_type_id(),
                store.headcount().unwrap_or(self.default_headcount),
            )
        };

        let lines = self
            .engine
            .filter_for_organization(organization_type_id, headcount);

        let mut store = self.lock_store()?;
        store.replace_stock_cart(lines.clone());
        let supplies = build_supply_summaries(&lines);
        store.replace_supplies(supplies);

        Ok(lines)
    }

    /// 人数を変更して再計算する
    pub fn change_headcount(&self, headcount: i64) -> ApiResult<Vec<CartLine>> {
        if headcount < 0 {
            return Err(ApiError::InvalidInput(format!(
                "人数に負数は指定できません: {}",
                headcount
            )));
        }
        {
            let mut store = self.lock_store()?;
            store.set_headcount(Some(headcount));
        }
        self.run_recommendation()
    }

    /// 組織形態を変更して再計算する
    pub fn change_organization_type(&self, organization_type_id: i64) -> ApiResult<Vec<CartLine>> {
        if crate::domain::types::OrganizationType::from_id(organization_type_id).is_none() {
            return Err(ApiError::InvalidInput(format!(
                "未知の組織形態IDです: {}",
                organization_type_id
            )));
        }
        {
            let mut store = self.lock_store()?;
            store.set_organization_type_id(organization_type_id);
        }
        self.run_recommendation()
    }

    /// 組織形態で絞らない全件リスト（AI参考データ用）
    pub fn list_all_items(&self) -> ApiResult<Vec<CartLine>> {
        let headcount = {
            let store = self.lock_store()?;
            store.headcount().unwrap_or(self.default_headcount)
        };
        Ok(self.engine.list_all_items(headcount))
    }

    // ==========================================
    // カート編集
    // ==========================================

    /// 備蓄品カートへ手動で行を追加する
    ///
    /// 組織形態が一致しない場合は無言no-op（ストアが警告ログを出す）
    pub fn add_stock_line(&self, line: CartLine) -> ApiResult<()> {
        let mut store = self.lock_store()?;
        store.add_stock_line(line);
        Ok(())
    }

    /// 備蓄品カートから行を削除する（買い物かごへカスケード）
    pub fn remove_stock_line(&self, stock_item_id: i64) -> ApiResult<()> {
        let mut store = self.lock_store()?;
        store.remove_stock_line(stock_item_id);
        Ok(())
    }

    /// 備蓄品カート行の数量を変更する（買い物かご数量も同期）
    pub fn update_stock_line_quantity(&self, stock_item_id: i64, quantity: f64) -> ApiResult<()> {
        if quantity < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "数量に負数は指定できません: {}",
                quantity
            )));
        }
        let mut store = self.lock_store()?;
        store.update_stock_line_quantity(stock_item_id, quantity);
        Ok(())
    }

    /// カートを全て空にする
    pub fn clear_cart(&self) -> ApiResult<()> {
        let mut store = self.lock_store()?;
        store.clear_stock_cart();
        Ok(())
    }

    // ==========================================
    // 買い物かご
    // ==========================================

    /// 指定した備蓄品に対応する商品一覧
    pub fn list_products_for_stock_item(
        &self,
        stock_item_id: i64,
    ) -> ApiResult<Vec<ConcreteProduct>> {
        Ok(self.product_repo.list_products_for_stock_item(stock_item_id)?)
    }

    /// 商品を買い物かごへ入れる（親の備蓄品カート行の数量で入れる）
    pub fn select_product(&self, product_id: i64) -> ApiResult<()> {
        let product = self.product_repo.find_product(product_id)?;

        let mut store = self.lock_store()?;
        let quantity = store
            .stock_cart()
            .iter()
            .find(|line| line.stock_item_id() == product.recommended_stock_item_id)
            .map(|line| line.calculated_qty)
            .unwrap_or(0.0);
        store.add_concrete_line(product, quantity);
        Ok(())
    }

    /// 買い物かごから商品を外す
    pub fn remove_concrete_line(&self, product_id: i64) -> ApiResult<()> {
        let mut store = self.lock_store()?;
        store.remove_concrete_line(product_id);
        Ok(())
    }

    /// 買い物かご行の数量を変更する
    pub fn update_concrete_line_quantity(&self, product_id: i64, quantity: f64) -> ApiResult<()> {
        if quantity < 0.0 {
            return Err(ApiError::InvalidInput(format!(
                "数量に負数は指定できません: {}",
                quantity
            )));
        }
        let mut store = self.lock_store()?;
        store.update_concrete_line_quantity(product_id, quantity);
        Ok(())
    }

    // ==========================================
    // 照会
    // ==========================================

    /// 備蓄品カートのスナップショット
    pub fn stock_cart(&self) -> ApiResult<Vec<CartLine>> {
        Ok(self.lock_store()?.stock_cart().to_vec())
    }

    /// 買い物かごのスナップショット
    pub fn concrete_cart(&self) -> ApiResult<Vec<crate::domain::product::ConcreteCartLine>> {
        Ok(self.lock_store()?.concrete_cart().to_vec())
    }

    /// 備蓄品カートの参考価格合計（円）
    pub fn reference_price_total(&self) -> ApiResult<i64> {
        Ok(total_reference_price(self.lock_store()?.stock_cart()))
    }

    /// 買い物かごの合計金額（円）
    pub fn concrete_price_total(&self) -> ApiResult<i64> {
        Ok(total_concrete_price(self.lock_store()?.concrete_cart()))
    }
}

/// カート行から備蓄品リスト（簡略版）を組み立てる
///
/// 数量は「整数単位 + 単位表記」の文字列、カテゴリはフェーズ名
pub fn build_supply_summaries(lines: &[CartLine]) -> Vec<SupplySummary> {
    lines
        .iter()
        .map(|line| {
            let quantity = match &line.item.unit {
                Some(unit) => format!("{}{}", line.unit_quantity(), unit),
                None => line.unit_quantity().to_string(),
            };
            SupplySummary::with_category(
                line.item.name.clone(),
                quantity,
                line.item.phase.label(),
            )
        })
        .collect()
}
