// ==========================================
// 防災備蓄推奨システム - 商品領域モデル
// ==========================================
// 職責: 具体的な購入可能SKUと買い物かご行の定義
// 制約: ConcreteCartLine は対応する CartLine が存在する間のみ存在できる
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ConcreteProduct - 具体的商品（カタログ実体）
// ==========================================
// 用途: 1つの推奨備蓄品を満たす購入可能SKU
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcreteProduct {
    // ===== 主キー =====
    pub id: i64, // 商品ID

    // ===== 基本情報 =====
    pub product_name: String, // 商品名
    pub unit_price: i64,      // 単価（円）
    pub image_url: String,    // 商品画像URL
    pub product_code: String, // 商品コード（EC連携用）

    // ===== 関連 =====
    pub recommended_stock_item_id: i64, // 対応する推奨備蓄品ID（FK）
}

// ==========================================
// ConcreteCartLine - 具体的商品の買い物かご行
// ==========================================
// 不変条件 I1: recommended_stock_item_id に一致する CartLine が
//             備蓄品カートに存在する間のみ存在できる（孤児禁止）
// 不変条件 I2: 同一 recommended_stock_item_id の行は高々1つ
//             （同じ備蓄品への再選択は置き換え）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcreteCartLine {
    pub product: ConcreteProduct, // 選択された商品
    pub quantity: f64,            // 数量（親カート行の数量と同期）
}

impl ConcreteCartLine {
    /// 商品と数量からかご行を作る
    pub fn new(product: ConcreteProduct, quantity: f64) -> Self {
        Self { product, quantity }
    }

    /// 商品ID
    pub fn product_id(&self) -> i64 {
        self.product.id
    }

    /// 対応する推奨備蓄品ID
    pub fn stock_item_id(&self) -> i64 {
        self.product.recommended_stock_item_id
    }

    /// 小計（円）
    pub fn subtotal(&self) -> i64 {
        self.product.unit_price * crate::engine::quantity::ceil_to_unit(self.quantity)
    }
}
