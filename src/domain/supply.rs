// ==========================================
// 防災備蓄推奨システム - 備蓄品リスト（簡略版）モデル
// ==========================================
// 職責: チャット絞り込みフローで外部テキスト生成APIと交換する
//       name / quantity / category の簡略備蓄品表現
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// SupplySummary - 備蓄品リストの1行（簡略版）
// ==========================================
// 外部APIとの入出力形式をそのまま保持するため quantity は文字列
// （「90ℓ」「10個」のような単位付き表記が入る）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplySummary {
    pub name: String, // 品目名

    pub quantity: String, // 数量表記（単位込みの文字列）

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>, // カテゴリ（フェーズ名など）

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>, // 補足説明
}

impl SupplySummary {
    /// 名前と数量だけの行を作る
    pub fn new(name: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            category: None,
            description: None,
        }
    }

    /// カテゴリ付きの行を作る
    pub fn with_category(
        name: impl Into<String>,
        quantity: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.into(),
            category: Some(category.into()),
            description: None,
        }
    }
}

/// 2つの備蓄品リストが内容同一か
///
/// 絞り込み結果の適用要否判定に使う（同一なら再通知しない）
pub fn supplies_equal(a: &[SupplySummary], b: &[SupplySummary]) -> bool {
    a == b
}
