// ==========================================
// 防災備蓄推奨システム - 価格計算
// ==========================================
// 職責: カートの参考価格合計と買い物かごの合計金額
// 規則: 数量は整数単位へ切り上げてから単価を掛ける
//       参考価格が未設定の品目は 0 円として扱う
// ==========================================

use crate::domain::product::ConcreteCartLine;
use crate::domain::stock_item::CartLine;
use crate::engine::quantity::ceil_to_unit;

/// 備蓄品カートの参考価格合計（円）
pub fn total_reference_price(lines: &[CartLine]) -> i64 {
    lines
        .iter()
        .map(|line| line.item.reference_price_or_zero() * ceil_to_unit(line.calculated_qty))
        .sum()
}

/// 買い物かご（具体的商品）の合計金額（円）
pub fn total_concrete_price(lines: &[ConcreteCartLine]) -> i64 {
    lines.iter().map(|line| line.subtotal()).sum()
}
