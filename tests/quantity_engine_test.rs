// ==========================================
// QuantityCalculator 計算規則テスト
// ==========================================
// テスト目標: 基本則・上書き則・非正人数の性質検証
// ==========================================

mod test_helpers;

use bichiku_advisor::domain::types::Phase;
use bichiku_advisor::engine::quantity::{ceil_to_tenth, QuantityCalculator};
use bichiku_advisor::engine::recommend::fallback_stock_items;
use test_helpers::sample_stock_item;

// ==========================================
// 性質: 人数 0 以下は常に数量 0
// ==========================================

#[test]
fn test_non_positive_headcount_yields_zero_for_all_items() {
    let calc = QuantityCalculator::new();

    for item in fallback_stock_items() {
        for org_id in 1..=4 {
            for headcount in [0, -1, -100] {
                assert_eq!(
                    calc.calculate(&item, org_id, headcount),
                    0.0,
                    "品目 {} org={} 人数={}",
                    item.name,
                    org_id,
                    headcount
                );
            }
        }
    }
}

// ==========================================
// 性質: 上書きが無ければ基本則と一致
// ==========================================

#[test]
fn test_items_without_override_follow_base_rule() {
    let calc = QuantityCalculator::new();

    // どのルールにも一致しない品目名を使う
    let item = sample_stock_item(10, "紙コップ", Phase::HoursAfter, 0.7, &[1, 2, 3, 4]);
    for headcount in [1, 7, 10, 33] {
        assert_eq!(
            calc.calculate(&item, 1, headcount),
            ceil_to_tenth(0.7 * headcount as f64)
        );
    }
}

#[test]
fn test_base_rule_multiplies_then_ceils_to_tenth() {
    let calc = QuantityCalculator::new();
    let item = sample_stock_item(11, "軍手以外の手袋", Phase::DaysAfter, 0.25, &[1]);

    // 0.25 × 3 = 0.75 → 0.8
    assert_eq!(calc.calculate(&item, 1, 3), 0.8);
}

// ==========================================
// 上書き則の境界
// ==========================================

#[test]
fn test_override_applies_only_to_matching_org_and_phase() {
    let calc = QuantityCalculator::new();

    // ヘルメット: 民間企業オフィス × 発生時 → 1個/人
    let item = sample_stock_item(4, "ヘルメット", Phase::AtEvent, 0.5, &[1, 3]);
    assert_eq!(calc.calculate(&item, 1, 10), 10.0);

    // 同じ品目でも教育機関には上書きが無く基本則（0.5個/人）
    assert_eq!(calc.calculate(&item, 3, 10), 5.0);

    // フェーズが違っても基本則
    let wrong_phase = sample_stock_item(4, "ヘルメット", Phase::DaysAfter, 0.5, &[1]);
    assert_eq!(calc.calculate(&wrong_phase, 1, 10), 5.0);
}

#[test]
fn test_first_matching_rule_wins() {
    let calc = QuantityCalculator::new();

    // 「非常用トイレ（少回数）」は複合ルール（0.4パック/人）が先に一致し、
    // 基本則には落ちない
    let item = sample_stock_item(3, "非常用トイレ（少回数）", Phase::HoursAfter, 6.0, &[1]);
    assert_eq!(calc.calculate(&item, 1, 10), 4.0);
}

#[test]
fn test_unknown_organization_id_falls_back_to_base_rule() {
    let calc = QuantityCalculator::new();
    let item = sample_stock_item(4, "ヘルメット", Phase::AtEvent, 0.5, &[1]);

    // 未知の組織形態IDでは上書き表を引けないため基本則
    assert_eq!(calc.calculate(&item, 99, 10), 5.0);
}
