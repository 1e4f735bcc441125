// ==========================================
// 防災備蓄推奨システム - 備蓄品領域モデル
// ==========================================
// 職責: 推奨備蓄品（抽象的な品目カテゴリ）とカート行の定義
// 制約: StockItem はセッション中不変、CartLine のみ可変
// ==========================================

use crate::domain::types::Phase;
use serde::{Deserialize, Serialize};

// ==========================================
// StockItem - 推奨備蓄品（カタログ実体）
// ==========================================
// 用途: カタログ層が読み込み、推奨エンジンが参照する読み取り専用データ
// 具体的な購入SKUではなく「アルファ米」「保存水」のような品目カテゴリ
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockItem {
    // ===== 主キー =====
    pub id: i64, // 推奨備蓄品ID

    // ===== 基本情報 =====
    pub name: String,              // 品目名
    pub phase: Phase,              // 災害フェーズ
    pub per_person_qty: f64,       // 1人あたり必要数（>= 0）
    pub unit: Option<String>,      // 単位（食・ℓ・個 など）
    pub basis: Option<String>,     // 算定根拠（「3食分/人」など）
    pub reference_price: Option<i64>, // 参考価格（円、未設定は0扱い）

    // ===== 中間テーブル由来の関連ID =====
    pub organization_type_ids: Vec<i64>, // 対象組織形態ID
    pub hazard_type_ids: Vec<i64>,       // 対応災害種別ID（情報タグのみ）
}

impl StockItem {
    /// 参考価格（未設定は0）
    pub fn reference_price_or_zero(&self) -> i64 {
        self.reference_price.unwrap_or(0)
    }

    /// 指定の組織形態に関連する品目か
    pub fn applies_to_organization(&self, organization_type_id: i64) -> bool {
        self.organization_type_ids.contains(&organization_type_id)
    }
}

// ==========================================
// CartLine - 備蓄品カート行
// ==========================================
// 用途: 推奨エンジンの出力であり、備蓄品カートの1行
// ライフサイクル: 推奨実行または手動追加で生成、人数/組織変更で再計算、
//                 明示的削除またはカート全クリアで破棄
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub item: StockItem,     // 元の備蓄品（表示用フィールドを全部保持）
    pub calculated_qty: f64, // 計算済み必要数（0.1単位に切り上げ済み）
}

impl CartLine {
    /// 備蓄品と計算済み数量からカート行を作る
    pub fn new(item: StockItem, calculated_qty: f64) -> Self {
        Self {
            item,
            calculated_qty,
        }
    }

    /// 備蓄品ID
    pub fn stock_item_id(&self) -> i64 {
        self.item.id
    }

    /// 品目名
    pub fn name(&self) -> &str {
        &self.item.name
    }

    /// 購入単位数（表示・価格計算用に整数へ切り上げ）
    pub fn unit_quantity(&self) -> i64 {
        crate::engine::quantity::ceil_to_unit(self.calculated_qty)
    }
}
