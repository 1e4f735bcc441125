// ==========================================
// 防災備蓄推奨システム - リスク評価領域モデル
// ==========================================
// 職責: 住所ベースの災害リスク評価結果の正規化表現
// 制約: 外部APIのランク語彙（大/中/小/なし/不明）以外は不明として扱う
// ==========================================

use crate::domain::types::HazardRank;
use serde::{Deserialize, Serialize};

// ==========================================
// HazardScore - 災害カテゴリ別スコア
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardScore {
    pub rank: HazardRank, // ランク（大/中/小/なし/不明）
    pub risk: f64,        // 数値リスク
}

// ==========================================
// RiskAssessment - 住所1件のリスク評価結果
// ==========================================
// 最大5カテゴリ。カテゴリが評価対象外の地域では None になる
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub address: String,       // 正規化済み住所
    pub input_address: String, // 入力されたままの住所

    pub earthquake: Option<HazardScore>, // 地震
    pub flood: Option<HazardScore>,      // 洪水
    pub tsunami: Option<HazardScore>,    // 津波
    pub landslide: Option<HazardScore>,  // 土砂災害
    pub heavy_snow: Option<HazardScore>, // 大雪
}

impl RiskAssessment {
    /// 評価済みカテゴリの (名称, スコア) 一覧
    pub fn scored_categories(&self) -> Vec<(&'static str, HazardScore)> {
        let mut out = Vec::new();
        if let Some(s) = self.earthquake {
            out.push(("地震", s));
        }
        if let Some(s) = self.flood {
            out.push(("洪水", s));
        }
        if let Some(s) = self.tsunami {
            out.push(("津波", s));
        }
        if let Some(s) = self.landslide {
            out.push(("土砂災害", s));
        }
        if let Some(s) = self.heavy_snow {
            out.push(("大雪", s));
        }
        out
    }

    /// ランクが「大」のカテゴリがあるか
    pub fn has_high_rank(&self) -> bool {
        self.scored_categories()
            .iter()
            .any(|(_, s)| s.rank == HazardRank::High)
    }
}
