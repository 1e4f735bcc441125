// ==========================================
// 防災備蓄推奨システム - API 層
// ==========================================
// 職責: 業務APIの提供。プレゼンテーション層（対象外）からの窓口
// ==========================================

pub mod error;
pub mod reconcile_api;
pub mod risk_api;
pub mod supplies_api;

// 再エクスポート
pub use error::{ApiError, ApiResult};
pub use reconcile_api::{ReconcileApi, ReconcilePhase};
pub use risk_api::RiskApi;
pub use supplies_api::{build_supply_summaries, SuppliesApi};
