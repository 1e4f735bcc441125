// ==========================================
// 防災備蓄推奨システム - コアライブラリ
// ==========================================
// 技術スタック: Rust + SQLite
// システム定位: 備蓄品の推奨数量・価格エンジンとカート状態の照合ロジック
// ==========================================

// 国際化システムの初期化
rust_i18n::i18n!("locales", fallback = "ja");

// ==========================================
// モジュール宣言
// ==========================================

// 領域層 - 実体と型
pub mod domain;

// カタログアクセス層 - データアクセス
pub mod repository;

// エンジン層 - 業務ルール
pub mod engine;

// セッション状態層 - カート状態ストア
pub mod session;

// 外部テキスト生成境界
pub mod advisor;

// 災害リスク評価境界
pub mod hazard;

// 設定層 - システム設定
pub mod config;

// データベース基盤（接続初期化/PRAGMA 統一）
pub mod db;

// ログシステム
pub mod logging;

// 国際化
pub mod i18n;

// API 層 - 業務インターフェース
pub mod api;

// アプリケーション層
pub mod app;

// ==========================================
// コア型の再エクスポート
// ==========================================

// 領域型
pub use domain::types::{HazardRank, HazardType, OrganizationType, Phase};

// 領域実体
pub use domain::{
    CartLine, ConcreteCartLine, ConcreteProduct, HazardScore, RiskAssessment, StockItem,
    SupplySummary,
};

// エンジン
pub use engine::{
    ceil_to_tenth, ceil_to_unit, QuantityCalculator, ReconcileOutcome, RecommendationEngine,
    SupplyReconciler,
};

// セッション状態
pub use session::CartStore;

// 外部境界
pub use advisor::{AdvisorError, AdvisorRequest, AdvisorResponse, SupplyAdvisor};
pub use hazard::{HazardError, HazardRiskProvider, RiskCache};

// API
pub use api::{ApiError, ReconcileApi, RiskApi, SuppliesApi};

// ==========================================
// 定数定義
// ==========================================

// システムバージョン
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// システム名称
pub const APP_NAME: &str = "防災備蓄推奨システム";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
