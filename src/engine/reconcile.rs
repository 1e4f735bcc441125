// ==========================================
// 防災備蓄推奨システム - AIマージ照合エンジン
// ==========================================
// 職責: 外部AIの絞り込み応答を現在の備蓄品リストへ安全にマージする
// 制約: このエンジンはカート状態を直接変更しない。削除対象名の一覧を
//       返し、実際の削除は呼び出し側が行う
// 保証: 失敗時は元のリストをそのまま返す（リストを空にしない）
// ==========================================

use crate::advisor::{AdvisorError, AdvisorRequest, AdvisorResponse, SupplyAdvisor, TokenUsage};
use crate::domain::stock_item::CartLine;
use crate::domain::supply::{supplies_equal, SupplySummary};
use crate::i18n::t;
use uuid::Uuid;

// ==========================================
// ReconcileOutcome - 照合結果
// ==========================================
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// 更新後の備蓄品リスト（失敗時は元のリストのまま）
    pub updated_list: Vec<SupplySummary>,

    /// ユーザー向け説明文
    pub explanation: String,

    /// 削除された品目名（応答に無ければ差分から導出した値）
    pub removed_item_names: Vec<String>,

    /// リスト内容が実際に変化したか（同一なら再通知不要）
    pub list_changed: bool,

    /// 外部呼び出しが成功し応答を適用できたか
    pub applied: bool,

    /// トークン使用量（外部応答にあれば）
    pub usage: Option<TokenUsage>,
}

impl ReconcileOutcome {
    /// 失敗時の結果: 元のリストを保ち、定型の謝罪文を返す
    fn failed(current_list: &[SupplySummary]) -> Self {
        Self {
            updated_list: current_list.to_vec(),
            explanation: t("reconcile.failed"),
            removed_item_names: Vec::new(),
            list_changed: false,
            applied: false,
            usage: None,
        }
    }
}

// ==========================================
// SupplyReconciler - AIマージ照合エンジン
// ==========================================
pub struct SupplyReconciler {
    // 状態を持たないエンジン
}

impl Default for SupplyReconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl SupplyReconciler {
    /// 照合エンジンを作る
    pub fn new() -> Self {
        Self {}
    }

    // ==========================================
    // 中核メソッド
    // ==========================================

    /// 指示文に基づく絞り込みを外部AIへ依頼し、結果をマージする
    ///
    /// # 引数
    /// - advisor: 外部テキスト生成境界
    /// - instruction: ユーザーの指示文
    /// - current_list: 現在の備蓄品リスト（簡略版）
    /// - detailed_items: 現在選択中の備蓄品詳細（参考データ）
    /// - full_catalog: カタログ全件（参考データ）
    ///
    /// # 戻り値
    /// 照合結果。外部呼び出しが失敗した場合や応答リストが空の場合は
    /// 元のリストを保った失敗結果（部分適用はしない）
    pub async fn reconcile(
        &self,
        advisor: &dyn SupplyAdvisor,
        instruction: &str,
        current_list: &[SupplySummary],
        detailed_items: &[CartLine],
        full_catalog: &[CartLine],
    ) -> ReconcileOutcome {
        let request_id = Uuid::new_v4();
        tracing::info!(
            request_id = %request_id,
            supplies_count = current_list.len(),
            "備蓄品リストの絞り込みを依頼します: {}",
            instruction
        );

        let request = AdvisorRequest {
            instruction: instruction.to_string(),
            current_supplies: current_list.to_vec(),
            detailed_items: detailed_items.to_vec(),
            all_items: full_catalog.to_vec(),
        };

        match advisor.filter_supplies(&request).await {
            Ok(response) => match self.merge_response(current_list, response) {
                Ok(outcome) => {
                    tracing::info!(
                        request_id = %request_id,
                        removed = ?outcome.removed_item_names,
                        list_changed = outcome.list_changed,
                        "絞り込み応答を適用しました"
                    );
                    outcome
                }
                Err(e) => {
                    tracing::warn!(request_id = %request_id, "絞り込み応答を適用できません: {}", e);
                    ReconcileOutcome::failed(current_list)
                }
            },
            Err(e) => {
                tracing::warn!(request_id = %request_id, "絞り込み呼び出しに失敗しました: {}", e);
                ReconcileOutcome::failed(current_list)
            }
        }
    }

    /// 応答を検証し、現在のリストとマージする（純粋処理）
    ///
    /// # 検証
    /// - supplies が空の応答は失敗として扱う（リストを空にしない保証）
    ///
    /// # 導出
    /// - removedItems が省略されていれば
    ///   set(現リストの名前) − set(新リストの名前) を削除品目とする
    pub fn merge_response(
        &self,
        current_list: &[SupplySummary],
        response: AdvisorResponse,
    ) -> Result<ReconcileOutcome, AdvisorError> {
        if response.supplies.is_empty() {
            return Err(AdvisorError::MalformedResponse(
                "応答の備蓄品リストが空です".to_string(),
            ));
        }

        if let Some(usage) = &response.usage {
            tracing::info!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "トークン使用量"
            );
        }

        let removed_item_names = if response.removed_items.is_empty() {
            derive_removed_names(current_list, &response.supplies)
        } else {
            response.removed_items
        };

        let list_changed = !supplies_equal(current_list, &response.supplies);

        Ok(ReconcileOutcome {
            updated_list: response.supplies,
            explanation: response
                .explanation
                .unwrap_or_else(|| t("reconcile.updated")),
            removed_item_names,
            list_changed,
            applied: true,
            usage: response.usage,
        })
    }
}

/// 新旧リストの名前差分から削除品目名を導出する（元リスト順を保つ）
pub fn derive_removed_names(
    current_list: &[SupplySummary],
    updated_list: &[SupplySummary],
) -> Vec<String> {
    current_list
        .iter()
        .filter(|item| !updated_list.iter().any(|u| u.name == item.name))
        .map(|item| item.name.clone())
        .collect()
}
