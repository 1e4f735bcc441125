// ==========================================
// 防災備蓄推奨システム - 外部テキスト生成の入出力型
// ==========================================
// 職責: 外部AI呼び出しのリクエスト/レスポンス形式
// 制約: レスポンスの省略可能フィールドは明示的な Option / default で表現し、
//       呼び出し箇所ごとに形を信用しない
// ==========================================

use crate::domain::stock_item::CartLine;
use crate::domain::supply::SupplySummary;
use serde::{Deserialize, Serialize};

// ==========================================
// AdvisorRequest - 絞り込み依頼
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorRequest {
    /// ユーザーの指示文（例: 「缶詰はいらない」）
    pub instruction: String,

    /// 現在の備蓄品リスト（簡略版: name/quantity/category）
    pub current_supplies: Vec<SupplySummary>,

    /// 現在選択中の備蓄品詳細データ（参考情報）
    pub detailed_items: Vec<CartLine>,

    /// カタログ内の全備蓄品情報（参考情報・置き換え提案用）
    pub all_items: Vec<CartLine>,
}

// ==========================================
// TokenUsage - トークン使用量
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: i64,
    pub completion_tokens: i64,
    pub total_tokens: i64,
}

// ==========================================
// AdvisorResponse - 絞り込み応答
// ==========================================
// 期待形式: { explanation, supplies: [{name, quantity, category}],
//            removedItems: [string] }
// explanation / removedItems は省略されることがある
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisorResponse {
    /// 変更内容の説明（日本語）
    #[serde(default)]
    pub explanation: Option<String>,

    /// 更新後の備蓄品リスト。空は「操作失敗」として扱う
    #[serde(default)]
    pub supplies: Vec<SupplySummary>,

    /// 削除された品目名。省略時は呼び出し側が差分から導出する
    #[serde(default, rename = "removedItems")]
    pub removed_items: Vec<String>,

    /// トークン使用量（あればログに出す）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}
