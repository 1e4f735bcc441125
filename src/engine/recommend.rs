// ==========================================
// 防災備蓄推奨システム - 推奨エンジン
// ==========================================
// 職責: 組織形態と人数から推奨備蓄品リスト（カート行）を組み立てる
// 縮退モード契約: カタログが空・到達不能ならば内蔵サンプルカタログへ
//                 フォールバックする。呼び出し側へはエラーを出さない
// ==========================================

use crate::domain::stock_item::{CartLine, StockItem};
use crate::domain::types::Phase;
use crate::engine::quantity::QuantityCalculator;
use crate::repository::catalog_repo::{CatalogRepository, StockItemRow};
use crate::repository::error::RepositoryResult;
use std::collections::HashMap;
use std::sync::Arc;

// ==========================================
// 内蔵サンプルカタログ
// ==========================================
// カタログDBが使えない場合でもUIを空にしないための決定的データ
pub fn fallback_stock_items() -> Vec<StockItem> {
    fn item(
        id: i64,
        name: &str,
        phase: Phase,
        per_person_qty: f64,
        basis: &str,
        unit: &str,
        reference_price: i64,
        organization_type_ids: &[i64],
        hazard_type_ids: &[i64],
    ) -> StockItem {
        StockItem {
            id,
            name: name.to_string(),
            phase,
            per_person_qty,
            unit: Some(unit.to_string()),
            basis: Some(basis.to_string()),
            reference_price: Some(reference_price),
            organization_type_ids: organization_type_ids.to_vec(),
            hazard_type_ids: hazard_type_ids.to_vec(),
        }
    }

    vec![
        item(1, "アルファ米", Phase::HoursAfter, 3.0, "3食分/人", "食", 300, &[1, 2, 3, 4], &[1, 2]),
        item(2, "保存水", Phase::HoursAfter, 9.0, "3リットル/日×3日分", "ℓ", 150, &[1, 2, 3, 4], &[1, 2]),
        item(3, "非常用トイレ（少回数）", Phase::HoursAfter, 6.0, "1日2回×3日分", "回分", 2000, &[1, 2, 3, 4], &[1, 2]),
        item(4, "ヘルメット", Phase::AtEvent, 1.0, "頭部保護", "個", 3600, &[1, 2, 3, 4], &[1]),
        item(5, "救急セット", Phase::ImmediatelyAfter, 0.2, "応急処置用", "セット", 3000, &[1, 2, 3, 4], &[1, 2]),
        item(6, "カセットコンロ", Phase::DaysAfter, 0.1, "調理用", "台", 3000, &[1, 2, 4], &[1, 2]),
        item(7, "棚固定金具セット", Phase::BeforeEvent, 0.3, "転倒防止のため", "個", 2500, &[1, 3], &[1]),
        item(8, "止水板", Phase::BeforeEvent, 0.3, "浸水防止", "枚", 20000, &[1, 2, 3, 4], &[2]),
    ]
}

// ==========================================
// RecommendationEngine - 推奨エンジン
// ==========================================
pub struct RecommendationEngine {
    catalog: Arc<CatalogRepository>,
    calculator: QuantityCalculator,
}

impl RecommendationEngine {
    /// カタログリポジトリを注入して作る
    pub fn new(catalog: Arc<CatalogRepository>) -> Self {
        Self {
            catalog,
            calculator: QuantityCalculator::new(),
        }
    }

    // ==========================================
    // 中核メソッド
    // ==========================================

    /// 組織形態に応じた推奨備蓄品リストを組み立てる
    ///
    /// # 引数
    /// - organization_type_id: 組織形態ID（1〜4）
    /// - headcount: 人数
    ///
    /// # 戻り値
    /// カタログ登録順のカート行。カタログが使えない場合は内蔵サンプル
    /// カタログに同じ規則を適用した結果（縮退モード、エラーにしない）
    pub fn filter_for_organization(
        &self,
        organization_type_id: i64,
        headcount: i64,
    ) -> Vec<CartLine> {
        match self.load_filtered(organization_type_id, headcount) {
            Ok(Some(lines)) => lines,
            Ok(None) => {
                tracing::info!(
                    "カタログに有効なデータがないため内蔵サンプルカタログを使用します: org={}",
                    organization_type_id
                );
                self.fallback_lines(Some(organization_type_id), headcount)
            }
            Err(e) => {
                tracing::warn!(
                    "カタログ読み取りに失敗したため内蔵サンプルカタログを使用します: {}",
                    e
                );
                self.fallback_lines(Some(organization_type_id), headcount)
            }
        }
    }

    /// 組織形態で絞らない全件リスト（外部AIへの参考データ用）
    ///
    /// 数量は基本則のみで計算する（組織別の上書きは適用しない）
    pub fn list_all_items(&self, headcount: i64) -> Vec<CartLine> {
        match self.load_all(headcount) {
            Ok(Some(lines)) => lines,
            Ok(None) => {
                tracing::info!("カタログが空のため内蔵サンプルカタログを使用します");
                self.fallback_all_lines(headcount)
            }
            Err(e) => {
                tracing::warn!(
                    "カタログ読み取りに失敗したため内蔵サンプルカタログを使用します: {}",
                    e
                );
                self.fallback_all_lines(headcount)
            }
        }
    }

    /// フェーズ別の表示用グルーピング（導出ビュー。保存順序は変えない）
    pub fn group_by_phase(lines: &[CartLine]) -> Vec<(Phase, Vec<CartLine>)> {
        let mut grouped: Vec<(Phase, Vec<CartLine>)> = Vec::new();
        for phase in Phase::ordered() {
            let in_phase: Vec<CartLine> = lines
                .iter()
                .filter(|l| l.item.phase == phase)
                .cloned()
                .collect();
            if !in_phase.is_empty() {
                grouped.push((phase, in_phase));
            }
        }
        let unknown: Vec<CartLine> = lines
            .iter()
            .filter(|l| l.item.phase == Phase::Unknown)
            .cloned()
            .collect();
        if !unknown.is_empty() {
            grouped.push((Phase::Unknown, unknown));
        }
        grouped
    }

    // ==========================================
    // 内部処理
    // ==========================================

    /// カタログから絞り込みリストを読む
    ///
    /// # 戻り値
    /// - Ok(Some): 組み立て済みリスト
    /// - Ok(None): データ不足（フォールバックが必要）
    fn load_filtered(
        &self,
        organization_type_id: i64,
        headcount: i64,
    ) -> RepositoryResult<Option<Vec<CartLine>>> {
        let rows = self.catalog.list_stock_items()?;
        if rows.is_empty() {
            return Ok(None);
        }

        let org_relations = self
            .catalog
            .list_organization_relations(Some(organization_type_id))?;
        if org_relations.is_empty() {
            return Ok(None);
        }

        let hazard_relations = self.catalog.list_hazard_relations()?;
        if hazard_relations.is_empty() {
            return Ok(None);
        }

        // 中間テーブルを品目IDで引けるように集約
        let org_item_ids: Vec<i64> = org_relations.iter().map(|r| r.stock_item_id).collect();
        let all_org_relations = self.catalog.list_organization_relations(None)?;
        let mut org_map: HashMap<i64, Vec<i64>> = HashMap::new();
        for rel in &all_org_relations {
            org_map
                .entry(rel.stock_item_id)
                .or_default()
                .push(rel.organization_type_id);
        }
        let mut hazard_map: HashMap<i64, Vec<i64>> = HashMap::new();
        for rel in &hazard_relations {
            hazard_map
                .entry(rel.stock_item_id)
                .or_default()
                .push(rel.hazard_type_id);
        }

        let lines: Vec<CartLine> = rows
            .iter()
            .filter(|row| org_item_ids.contains(&row.id))
            .map(|row| {
                let item = assemble_item(row, &org_map, &hazard_map);
                let qty = self
                    .calculator
                    .calculate(&item, organization_type_id, headcount);
                CartLine::new(item, qty)
            })
            .collect();

        if lines.is_empty() {
            return Ok(None);
        }
        Ok(Some(lines))
    }

    /// カタログから全件リストを読む（基本則のみ）
    fn load_all(&self, headcount: i64) -> RepositoryResult<Option<Vec<CartLine>>> {
        let rows = self.catalog.list_stock_items()?;
        if rows.is_empty() {
            return Ok(None);
        }

        let org_relations = self.catalog.list_organization_relations(None)?;
        let hazard_relations = self.catalog.list_hazard_relations()?;

        let mut org_map: HashMap<i64, Vec<i64>> = HashMap::new();
        for rel in &org_relations {
            org_map
                .entry(rel.stock_item_id)
                .or_default()
                .push(rel.organization_type_id);
        }
        let mut hazard_map: HashMap<i64, Vec<i64>> = HashMap::new();
        for rel in &hazard_relations {
            hazard_map
                .entry(rel.stock_item_id)
                .or_default()
                .push(rel.hazard_type_id);
        }

        let lines: Vec<CartLine> = rows
            .iter()
            .map(|row| {
                let item = assemble_item(row, &org_map, &hazard_map);
                let qty = self.calculator.calculate_base(&item, headcount);
                CartLine::new(item, qty)
            })
            .collect();

        Ok(Some(lines))
    }

    /// 内蔵サンプルカタログから組み立てる（組織形態フィルタあり）
    fn fallback_lines(&self, organization_type_id: Option<i64>, headcount: i64) -> Vec<CartLine> {
        fallback_stock_items()
            .into_iter()
            .filter(|item| match organization_type_id {
                Some(org_id) => item.applies_to_organization(org_id),
                None => true,
            })
            .map(|item| {
                let qty = match organization_type_id {
                    Some(org_id) => self.calculator.calculate(&item, org_id, headcount),
                    None => self.calculator.calculate_base(&item, headcount),
                };
                CartLine::new(item, qty)
            })
            .collect()
    }

    /// 内蔵サンプルカタログから全件組み立てる（基本則のみ）
    fn fallback_all_lines(&self, headcount: i64) -> Vec<CartLine> {
        self.fallback_lines(None, headcount)
    }
}

/// 生データ行と中間テーブル集約から StockItem を組み立てる
fn assemble_item(
    row: &StockItemRow,
    org_map: &HashMap<i64, Vec<i64>>,
    hazard_map: &HashMap<i64, Vec<i64>>,
) -> StockItem {
    StockItem {
        id: row.id,
        name: row.name.clone(),
        phase: Phase::parse(&row.phase),
        per_person_qty: row.per_person_qty,
        unit: row.unit.clone(),
        basis: row.basis.clone(),
        reference_price: row.reference_price,
        organization_type_ids: org_map.get(&row.id).cloned().unwrap_or_default(),
        hazard_type_ids: hazard_map.get(&row.id).cloned().unwrap_or_default(),
    }
}
