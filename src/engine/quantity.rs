// ==========================================
// 防災備蓄推奨システム - 必要数量計算エンジン
// ==========================================
// 職責: (備蓄品, 組織形態, 人数) → 必要数量 の純粋関数
// 基本則: 1人あたり必要数 × 人数 を 0.1 単位に切り上げ
// 上書き則: (組織形態, フェーズ, 品目名キーワード) の宣言的ルール表が
//           1人あたり必要数を置き換える。先勝ち
// ==========================================

use crate::domain::stock_item::StockItem;
use crate::domain::types::{OrganizationType, Phase};

// ==========================================
// 正規丸め関数
// ==========================================
// 丸め規則はこの2関数に一本化する（呼び出し側で独自丸めを書かない）

/// 0.1 単位への切り上げ（生の必要数量の正規表現）
pub fn ceil_to_tenth(x: f64) -> f64 {
    (x * 10.0).ceil() / 10.0
}

/// 整数単位への切り上げ（表示・購入・価格計算用）
///
/// 数量は非負が前提。負値が来ても 0 に丸める
pub fn ceil_to_unit(x: f64) -> i64 {
    if x <= 0.0 {
        return 0;
    }
    x.ceil() as i64
}

// ==========================================
// OverrideRule - 数量上書きルール
// ==========================================
// 品目名のキーワード一致（小文字化したうえでの部分一致）:
// - any_of: 空でなければ、いずれか1つを含むこと
// - all_of: すべて含むこと
// - none_of: どれも含まないこと
#[derive(Debug, Clone, Copy)]
pub struct OverrideRule {
    pub organization_type: OrganizationType,
    pub phase: Phase,
    pub any_of: &'static [&'static str],
    pub all_of: &'static [&'static str],
    pub none_of: &'static [&'static str],
    pub per_person_qty: f64,
}

impl OverrideRule {
    /// 小文字化済みの品目名に対するキーワード一致判定
    fn matches_name(&self, lowered_name: &str) -> bool {
        if !self.any_of.is_empty() && !self.any_of.iter().any(|kw| lowered_name.contains(kw)) {
            return false;
        }
        if !self.all_of.iter().all(|kw| lowered_name.contains(kw)) {
            return false;
        }
        if self.none_of.iter().any(|kw| lowered_name.contains(kw)) {
            return false;
        }
        true
    }
}

/// 単純な any_of ルールの省略記法
const fn rule(
    organization_type: OrganizationType,
    phase: Phase,
    any_of: &'static [&'static str],
    per_person_qty: f64,
) -> OverrideRule {
    OverrideRule {
        organization_type,
        phase,
        any_of,
        all_of: &[],
        none_of: &[],
        per_person_qty,
    }
}

// ==========================================
// 上書きルール表
// ==========================================
// 組織形態 × フェーズごとの定番品目の上書き係数。
// 同一グループ内の並び順は一致優先順（先勝ち）
use OrganizationType::{NeighborhoodAssociation, PrivateOffice, PrivateStore, School};
use Phase::{AtEvent, BeforeEvent, DaysAfter, HoursAfter, ImmediatelyAfter};

pub const OVERRIDE_RULES: &[OverrideRule] = &[
    // ===== 民間企業オフィス =====
    // 発生前
    rule(PrivateOffice, BeforeEvent, &["棚固定金具", "転倒防止器具"], 0.75), // 0.75個/人
    rule(PrivateOffice, BeforeEvent, &["ガラス飛散防止フィルム"], 1.0),      // 1枚/人
    rule(PrivateOffice, BeforeEvent, &["無停電電源装置", "ups"], 0.1),       // 0.1台/人
    // 発生時
    rule(PrivateOffice, AtEvent, &["ヘルメット"], 1.0),        // 1個/人
    rule(PrivateOffice, AtEvent, &["防災ずきん"], 1.5),        // 1.5枚/人
    rule(PrivateOffice, AtEvent, &["ホイッスル", "笛"], 1.0),  // 1個/人
    // 発生直後
    rule(PrivateOffice, ImmediatelyAfter, &["救急セット"], 0.1), // 0.1セット/人
    rule(PrivateOffice, ImmediatelyAfter, &["aed", "自動体外式除細動器"], 0.1), // 0.1台/人
    rule(PrivateOffice, ImmediatelyAfter, &["防災ラジオ", "ラジオライト"], 0.1), // 0.1台/人
    rule(PrivateOffice, ImmediatelyAfter, &["ランタン"], 0.1),   // 0.1台/人
    rule(PrivateOffice, ImmediatelyAfter, &["非常用持出セット"], 1.0), // 1セット/人
    // 数時間後
    rule(PrivateOffice, HoursAfter, &["アルファ米"], 3.0), // 3食/人
    rule(PrivateOffice, HoursAfter, &["保存水"], 3.0),     // 3本/人
    OverrideRule {
        organization_type: PrivateOffice,
        phase: HoursAfter,
        any_of: &["単品", "少回数"],
        all_of: &["非常用トイレ"],
        none_of: &[],
        per_person_qty: 0.4, // 0.4パック/人
    },
    rule(PrivateOffice, HoursAfter, &["ウェットティッシュ", "清拭関連"], 0.12), // 0.12パック/人
    rule(PrivateOffice, HoursAfter, &["アルミシート", "ブランケット"], 1.0),   // 1枚/人
    OverrideRule {
        organization_type: PrivateOffice,
        phase: HoursAfter,
        any_of: &["ランタン"],
        all_of: &[],
        none_of: &["追加"],
        per_person_qty: 0.1, // 0.1台/人
    },
    rule(PrivateOffice, HoursAfter, &["乾電池"], 0.12),        // 0.12パック/人
    rule(PrivateOffice, HoursAfter, &["トランシーバー"], 0.1), // 0.1台/人
    rule(PrivateOffice, HoursAfter, &["ポータブル電源"], 0.1), // 0.1台/人
    // 数日後
    OverrideRule {
        organization_type: PrivateOffice,
        phase: DaysAfter,
        any_of: &["食+水", "食品"],
        all_of: &["セット商品"],
        none_of: &[],
        per_person_qty: 3.0, // 3セット/人
    },
    OverrideRule {
        organization_type: PrivateOffice,
        phase: DaysAfter,
        any_of: &["大容量"],
        all_of: &["非常用トイレ"],
        none_of: &[],
        per_person_qty: 0.1, // 0.1セット/人
    },
    rule(PrivateOffice, DaysAfter, &["段ボール間仕切り"], 0.1), // 0.1キット/人
    rule(PrivateOffice, DaysAfter, &["ブルーシート"], 0.2),     // 0.2枚/人
    rule(PrivateOffice, DaysAfter, &["簡易寝具"], 1.0),         // 1セット/人
    rule(PrivateOffice, DaysAfter, &["ガスコンロ"], 0.1),       // 0.1台/人
    rule(PrivateOffice, DaysAfter, &["カセットガス"], 0.1),     // 0.1パック/人
    rule(PrivateOffice, DaysAfter, &["ソーラーパネル"], 0.1),   // 0.1枚/人
    // ===== 民間企業店舗 =====
    rule(PrivateStore, BeforeEvent, &["止水板"], 0.5),  // 0.5枚/人
    rule(PrivateStore, BeforeEvent, &["発電機"], 0.05), // 0.05台/人
    rule(PrivateStore, AtEvent, &["拡声器"], 0.05),     // 0.05台/人
    rule(PrivateStore, AtEvent, &["軍手"], 1.0),        // 1双/人
    rule(PrivateStore, ImmediatelyAfter, &["懐中電灯"], 0.5),   // 0.5個/人
    rule(PrivateStore, ImmediatelyAfter, &["作業用手袋"], 0.5), // 0.5双/人
    rule(PrivateStore, HoursAfter, &["粉ミルク"], 0.1),  // 0.1缶/人
    rule(PrivateStore, HoursAfter, &["哺乳瓶"], 0.1),    // 0.1個/人
    rule(PrivateStore, HoursAfter, &["紙おむつ"], 0.2),  // 0.2パック/人
    rule(PrivateStore, DaysAfter, &["簡易ベッド"], 0.2),    // 0.2台/人
    rule(PrivateStore, DaysAfter, &["簡易シャワー"], 0.05), // 0.05個/人
    // ===== 教育機関 =====
    rule(School, BeforeEvent, &["耐震マット"], 0.8), // 0.8枚/人
    rule(School, BeforeEvent, &["防火シート"], 0.2), // 0.2枚/人
    rule(School, AtEvent, &["運動靴"], 1.0),         // 1足/人
    rule(School, AtEvent, &["防煙マスク"], 0.5),     // 0.5個/人
    rule(School, ImmediatelyAfter, &["包帯"], 0.1),   // 0.1個/人
    rule(School, ImmediatelyAfter, &["消毒液"], 0.05), // 0.05本/人
    rule(School, HoursAfter, &["生理用品"], 0.3), // 0.3パック/人
    rule(School, HoursAfter, &["タオル"], 1.0),   // 1枚/人
    rule(School, DaysAfter, &["簡易テント"], 0.1), // 0.1張/人
    rule(School, DaysAfter, &["毛布"], 1.0),       // 1枚/人
    // ===== 自治会・自主防災組織 =====
    rule(NeighborhoodAssociation, BeforeEvent, &["防災マップ"], 0.2),     // 0.2枚/人
    rule(NeighborhoodAssociation, BeforeEvent, &["非常用発電機"], 0.03), // 0.03台/人
    rule(NeighborhoodAssociation, AtEvent, &["拡声器"], 0.03), // 0.03台/人
    rule(NeighborhoodAssociation, AtEvent, &["ロープ"], 0.05), // 0.05本/人
    rule(NeighborhoodAssociation, ImmediatelyAfter, &["救助用工具"], 0.02), // 0.02セット/人
    rule(NeighborhoodAssociation, ImmediatelyAfter, &["担架"], 0.05),      // 0.05台/人
    rule(NeighborhoodAssociation, HoursAfter, &["簡易トイレ"], 0.3), // 0.3個/人
    rule(NeighborhoodAssociation, HoursAfter, &["ポリタンク"], 0.1), // 0.1個/人
    rule(NeighborhoodAssociation, DaysAfter, &["炊き出しセット"], 0.01), // 0.01セット/人
    rule(NeighborhoodAssociation, DaysAfter, &["給水車"], 0.005),        // 0.005台/人
];

// ==========================================
// QuantityCalculator - 必要数量計算エンジン
// ==========================================
pub struct QuantityCalculator {
    rules: &'static [OverrideRule],
}

impl Default for QuantityCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantityCalculator {
    /// 既定の上書きルール表で作る
    pub fn new() -> Self {
        Self {
            rules: OVERRIDE_RULES,
        }
    }

    /// ルール表を差し替えて作る（テスト用）
    pub fn with_rules(rules: &'static [OverrideRule]) -> Self {
        Self { rules }
    }

    // ==========================================
    // 中核メソッド
    // ==========================================

    /// 必要数量を計算する（純粋・全域）
    ///
    /// # 引数
    /// - item: 備蓄品
    /// - organization_type_id: 組織形態ID（1〜4）
    /// - headcount: 人数
    ///
    /// # 戻り値
    /// 0.1 単位に切り上げた必要数量。headcount <= 0 は常に 0
    pub fn calculate(&self, item: &StockItem, organization_type_id: i64, headcount: i64) -> f64 {
        if headcount <= 0 {
            return 0.0;
        }

        let per_person = self
            .find_override(item, organization_type_id)
            .unwrap_or(item.per_person_qty);

        ceil_to_tenth(per_person * headcount as f64)
    }

    /// 上書きルールを適用しない基本計算
    ///
    /// 全件リスト（組織形態で絞らない参考データ）ではこちらを使う
    pub fn calculate_base(&self, item: &StockItem, headcount: i64) -> f64 {
        if headcount <= 0 {
            return 0.0;
        }
        ceil_to_tenth(item.per_person_qty * headcount as f64)
    }

    /// 一致する上書きルールの1人あたり必要数（先勝ち）
    fn find_override(&self, item: &StockItem, organization_type_id: i64) -> Option<f64> {
        let org = OrganizationType::from_id(organization_type_id)?;
        let lowered = item.name.to_lowercase();

        self.rules
            .iter()
            .find(|r| {
                r.organization_type == org && r.phase == item.phase && r.matches_name(&lowered)
            })
            .map(|r| r.per_person_qty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, phase: Phase, per_person_qty: f64) -> StockItem {
        StockItem {
            id: 1,
            name: name.to_string(),
            phase,
            per_person_qty,
            unit: None,
            basis: None,
            reference_price: None,
            organization_type_ids: vec![1, 2, 3, 4],
            hazard_type_ids: vec![1],
        }
    }

    #[test]
    fn test_ceil_to_tenth() {
        assert_eq!(ceil_to_tenth(1.01), 1.1);
        assert_eq!(ceil_to_tenth(1.05), 1.1);
        assert_eq!(ceil_to_tenth(0.0), 0.0);
        assert_eq!(ceil_to_tenth(2.35), 2.4);
        assert_eq!(ceil_to_tenth(90.0), 90.0);
    }

    #[test]
    fn test_ceil_to_unit() {
        assert_eq!(ceil_to_unit(0.0), 0);
        assert_eq!(ceil_to_unit(0.1), 1);
        assert_eq!(ceil_to_unit(5.0), 5);
        assert_eq!(ceil_to_unit(5.2), 6);
        assert_eq!(ceil_to_unit(-1.0), 0);
    }

    #[test]
    fn test_base_rule_without_override() {
        let calc = QuantityCalculator::new();
        // 発生前の保存水には上書きが無いので基本則
        let i = item("保存水", Phase::BeforeEvent, 9.0);
        assert_eq!(calc.calculate(&i, 1, 10), 90.0);
    }

    #[test]
    fn test_override_replaces_per_person_qty() {
        let calc = QuantityCalculator::new();
        // 民間企業オフィス × 数時間後 × 保存水 → 3本/人
        let i = item("保存水", Phase::HoursAfter, 9.0);
        assert_eq!(calc.calculate(&i, 1, 10), 30.0);
    }

    #[test]
    fn test_override_is_phase_scoped() {
        let calc = QuantityCalculator::new();
        // 同じ品目でもフェーズが違えば上書きされない
        let i = item("ヘルメット", Phase::DaysAfter, 2.0);
        assert_eq!(calc.calculate(&i, 1, 10), 20.0);
    }

    #[test]
    fn test_override_is_organization_scoped() {
        let calc = QuantityCalculator::new();
        // 止水板の上書きは民間企業店舗のみ
        let i = item("止水板", Phase::BeforeEvent, 0.3);
        assert_eq!(calc.calculate(&i, 2, 10), 5.0); // 0.5枚/人
        assert_eq!(calc.calculate(&i, 1, 10), 3.0); // 基本則 0.3枚/人
    }

    #[test]
    fn test_all_of_and_any_of_combination() {
        let calc = QuantityCalculator::new();
        let few = item("非常用トイレ（少回数）", Phase::HoursAfter, 6.0);
        assert_eq!(calc.calculate(&few, 1, 10), 4.0); // 0.4パック/人

        // 「非常用トイレ」だけでは一致しない（単品/少回数が必要）
        let plain = item("非常用トイレ", Phase::HoursAfter, 6.0);
        assert_eq!(calc.calculate(&plain, 1, 10), 60.0);
    }

    #[test]
    fn test_none_of_exclusion() {
        let calc = QuantityCalculator::new();
        let lantern = item("ランタン", Phase::HoursAfter, 1.0);
        assert_eq!(calc.calculate(&lantern, 1, 10), 1.0); // 0.1台/人

        // 「追加」を含む品目は除外され基本則になる
        let extra = item("ランタン（追加）", Phase::HoursAfter, 1.0);
        assert_eq!(calc.calculate(&extra, 1, 10), 10.0);
    }

    #[test]
    fn test_case_insensitive_keyword() {
        let calc = QuantityCalculator::new();
        let ups = item("UPS（小型）", Phase::BeforeEvent, 1.0);
        assert_eq!(calc.calculate(&ups, 1, 10), 1.0); // 0.1台/人
    }

    #[test]
    fn test_non_positive_headcount_is_zero() {
        let calc = QuantityCalculator::new();
        let i = item("ヘルメット", Phase::AtEvent, 1.0);
        assert_eq!(calc.calculate(&i, 1, 0), 0.0);
        assert_eq!(calc.calculate(&i, 1, -5), 0.0);
        assert_eq!(calc.calculate_base(&i, 0), 0.0);
    }

    #[test]
    fn test_base_calculation_ignores_overrides() {
        let calc = QuantityCalculator::new();
        let i = item("ヘルメット", Phase::AtEvent, 2.0);
        // calculate は上書き（1個/人）、calculate_base は基本則（2個/人）
        assert_eq!(calc.calculate(&i, 1, 10), 10.0);
        assert_eq!(calc.calculate_base(&i, 10), 20.0);
    }

    #[test]
    fn test_fractional_multiplier_rounds_up_to_tenth() {
        let calc = QuantityCalculator::new();
        // 0.12パック/人 × 7人 = 0.84 → 0.9
        let i = item("乾電池", Phase::HoursAfter, 1.0);
        assert_eq!(calc.calculate(&i, 1, 7), 0.9);
    }
}
