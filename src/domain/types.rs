// ==========================================
// 防災備蓄推奨システム - 領域型定義
// ==========================================
// 職責: 災害フェーズ・組織形態・災害種別・リスクランクの列挙型
// 制約: 組織形態IDと災害種別IDはカタログの中間テーブルと一致させる
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 災害フェーズ (Phase)
// ==========================================
// 発生前 → 発生時 → 発生直後 → 数時間後 → 数日後 の固定順序
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    BeforeEvent,      // 発生前
    AtEvent,          // 発生時
    ImmediatelyAfter, // 発生直後
    HoursAfter,       // 数時間後
    DaysAfter,        // 数日後
    Unknown,          // カタログ上の未知表記（エラーにしない）
}

impl Phase {
    /// カタログ上のフェーズ表記から変換
    ///
    /// 未知の表記は Unknown に落とす（読み取り専用カタログを信用しすぎない）
    pub fn parse(label: &str) -> Self {
        match label {
            "発生前" => Phase::BeforeEvent,
            "発生時" => Phase::AtEvent,
            "発生直後" => Phase::ImmediatelyAfter,
            "数時間後" => Phase::HoursAfter,
            "数日後" => Phase::DaysAfter,
            _ => Phase::Unknown,
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            Phase::BeforeEvent => "発生前",
            Phase::AtEvent => "発生時",
            Phase::ImmediatelyAfter => "発生直後",
            Phase::HoursAfter => "数時間後",
            Phase::DaysAfter => "数日後",
            Phase::Unknown => "不明",
        }
    }

    /// 表示順序の全フェーズ（Unknown は末尾扱いで含めない）
    pub fn ordered() -> [Phase; 5] {
        [
            Phase::BeforeEvent,
            Phase::AtEvent,
            Phase::ImmediatelyAfter,
            Phase::HoursAfter,
            Phase::DaysAfter,
        ]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 組織形態 (Organization Type)
// ==========================================
// ID はカタログの item_organization_types.organization_type_id と一致
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganizationType {
    PrivateOffice,           // 1: 民間企業オフィス
    PrivateStore,            // 2: 民間企業店舗
    School,                  // 3: 教育機関
    NeighborhoodAssociation, // 4: 自治会・自主防災組織
}

impl OrganizationType {
    /// カタログIDから変換
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(OrganizationType::PrivateOffice),
            2 => Some(OrganizationType::PrivateStore),
            3 => Some(OrganizationType::School),
            4 => Some(OrganizationType::NeighborhoodAssociation),
            _ => None,
        }
    }

    /// カタログID
    pub fn id(&self) -> i64 {
        match self {
            OrganizationType::PrivateOffice => 1,
            OrganizationType::PrivateStore => 2,
            OrganizationType::School => 3,
            OrganizationType::NeighborhoodAssociation => 4,
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            OrganizationType::PrivateOffice => "民間企業オフィス",
            OrganizationType::PrivateStore => "民間企業店舗",
            OrganizationType::School => "教育機関",
            OrganizationType::NeighborhoodAssociation => "自治会・自主防災組織",
        }
    }

    /// 全組織形態
    pub fn all() -> [OrganizationType; 4] {
        [
            OrganizationType::PrivateOffice,
            OrganizationType::PrivateStore,
            OrganizationType::School,
            OrganizationType::NeighborhoodAssociation,
        ]
    }
}

impl fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 災害種別 (Hazard Type)
// ==========================================
// 情報タグとしてのみ使用（フィルタリングには使わない）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardType {
    Earthquake, // 1: 地震
    Flood,      // 2: 水害（洪水/台風/津波）
    Landslide,  // 3: 土砂災害
    HeavySnow,  // 4: 大雪
}

impl HazardType {
    /// カタログIDから変換
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            1 => Some(HazardType::Earthquake),
            2 => Some(HazardType::Flood),
            3 => Some(HazardType::Landslide),
            4 => Some(HazardType::HeavySnow),
            _ => None,
        }
    }

    /// カタログID
    pub fn id(&self) -> i64 {
        match self {
            HazardType::Earthquake => 1,
            HazardType::Flood => 2,
            HazardType::Landslide => 3,
            HazardType::HeavySnow => 4,
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            HazardType::Earthquake => "地震",
            HazardType::Flood => "水害",
            HazardType::Landslide => "土砂災害",
            HazardType::HeavySnow => "大雪",
        }
    }
}

impl fmt::Display for HazardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// リスクランク (Hazard Rank)
// ==========================================
// 外部リスク評価APIの語彙: 大 / 中 / 小 / なし / 不明
// 未知の文字列はエラーではなく Unknown として扱う
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HazardRank {
    High,    // 大
    Medium,  // 中
    Low,     // 小
    None,    // なし
    Unknown, // 不明
}

impl HazardRank {
    /// APIのランク文字列から変換（未知は Unknown）
    pub fn parse(label: &str) -> Self {
        match label {
            "大" => HazardRank::High,
            "中" => HazardRank::Medium,
            "小" => HazardRank::Low,
            "なし" => HazardRank::None,
            "不明" => HazardRank::Unknown,
            _ => HazardRank::Unknown,
        }
    }

    /// 表示用ラベル
    pub fn label(&self) -> &'static str {
        match self {
            HazardRank::High => "大",
            HazardRank::Medium => "中",
            HazardRank::Low => "小",
            HazardRank::None => "なし",
            HazardRank::Unknown => "不明",
        }
    }
}

impl fmt::Display for HazardRank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
