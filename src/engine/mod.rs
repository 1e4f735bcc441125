// ==========================================
// 防災備蓄推奨システム - エンジン層
// ==========================================
// 職責: 業務ルールの実装（数量計算・推奨組み立て・価格・AIマージ照合）
// 制約: エンジンは SQL を書かない。カタログアクセスは repository 経由
// ==========================================

pub mod pricing;
pub mod quantity;
pub mod recommend;
pub mod reconcile;

// 再エクスポート
pub use pricing::{total_concrete_price, total_reference_price};
pub use quantity::{ceil_to_tenth, ceil_to_unit, QuantityCalculator};
pub use recommend::{fallback_stock_items, RecommendationEngine};
pub use reconcile::{derive_removed_names, ReconcileOutcome, SupplyReconciler};
