// ==========================================
// 防災備蓄推奨システム - チャット絞り込みAPI
// ==========================================
// 職責: 自然言語指示による備蓄品リスト絞り込みフローの制御
// 状態機械: Idle → Requesting → {Applying | Failed} → Idle
// 制約: 処理中フラグで二重送信を抑止する。自動リトライはしない
// ==========================================

use crate::advisor::SupplyAdvisor;
use crate::api::error::{ApiError, ApiResult};
use crate::engine::recommend::RecommendationEngine;
use crate::engine::reconcile::{ReconcileOutcome, SupplyReconciler};
use crate::session::cart_store::CartStore;
use std::sync::{Arc, Mutex};

// ==========================================
// 照合リクエストの状態
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePhase {
    Idle,       // 待機中
    Requesting, // 外部呼び出し中
    Applying,   // 応答の適用中
    Failed,     // 直前のリクエストが失敗（次のリクエストで Idle に戻る）
}

// ==========================================
// ReconcileApi - チャット絞り込みAPI
// ==========================================
pub struct ReconcileApi {
    reconciler: SupplyReconciler,
    advisor: Arc<dyn SupplyAdvisor>,
    engine: Arc<RecommendationEngine>,
    store: Arc<Mutex<CartStore>>,
    phase: Mutex<ReconcilePhase>,
    default_headcount: i64,
}

impl ReconcileApi {
    /// 依存を注入して作る
    pub fn new(
        advisor: Arc<dyn SupplyAdvisor>,
        engine: Arc<RecommendationEngine>,
        store: Arc<Mutex<CartStore>>,
        default_headcount: i64,
    ) -> Self {
        Self {
            reconciler: SupplyReconciler::new(),
            advisor,
            engine,
            store,
            phase: Mutex::new(ReconcilePhase::Idle),
            default_headcount,
        }
    }

    /// 現在の状態（UI表示用）
    pub fn phase(&self) -> ReconcilePhase {
        self.phase
            .lock()
            .map(|p| *p)
            .unwrap_or(ReconcilePhase::Idle)
    }

    fn set_phase(&self, next: ReconcilePhase) {
        if let Ok(mut phase) = self.phase.lock() {
            *phase = next;
        }
    }

    // ==========================================
    // 中核メソッド
    // ==========================================

    /// ユーザー指示による絞り込みを実行し、結果をカートへ反映する
    ///
    /// # 引数
    /// - instruction: ユーザーの指示文（例: 「缶詰はいらない」）
    ///
    /// # 戻り値
    /// 照合結果。失敗時もエラーにせず、元のリストを保った結果を返す
    /// （謝罪メッセージは結果の explanation に入る）
    ///
    /// # エラー
    /// - AiProcessingInProgress: 前のリクエストが処理中（二重送信の抑止）
    pub async fn apply_filter_instruction(
        &self,
        instruction: &str,
    ) -> ApiResult<ReconcileOutcome> {
        // 二重送信の抑止
        {
            let mut phase = self.phase.lock().map_err(|e| {
                ApiError::Internal(format!("状態ロックの取得に失敗: {}", e))
            })?;
            if *phase == ReconcilePhase::Requesting || *phase == ReconcilePhase::Applying {
                return Err(ApiError::AiProcessingInProgress);
            }
            *phase = ReconcilePhase::Requesting;
        }

        // スナップショット取得（await をまたいでロックを保持しない）
        let (current_list, detailed_items, headcount) = {
            let store = self.store.lock().map_err(|e| {
                self.set_phase(ReconcilePhase::Idle);
                ApiError::Internal(format!("カート状態のロック取得に失敗: {}", e))
            })?;
            (
                store.supplies().to_vec(),
                store.stock_cart().to_vec(),
                store.headcount().unwrap_or(self.default_headcount),
            )
        };
        let full_catalog = self.engine.list_all_items(headcount);

        let outcome = self
            .reconciler
            .reconcile(
                self.advisor.as_ref(),
                instruction,
                &current_list,
                &detailed_items,
                &full_catalog,
            )
            .await;

        if !outcome.applied {
            // Failed のまま残し、次のリクエスト開始時に上書きされる
            self.set_phase(ReconcilePhase::Failed);
            return Ok(outcome);
        }

        self.set_phase(ReconcilePhase::Applying);
        {
            let mut store = self.store.lock().map_err(|e| {
                self.set_phase(ReconcilePhase::Idle);
                ApiError::Internal(format!("カート状態のロック取得に失敗: {}", e))
            })?;

            // 削除品目ごとに1回だけカスケード削除を呼ぶ（I1の維持）
            for name in &outcome.removed_item_names {
                tracing::info!("カートから削除: {}", name);
                store.remove_stock_line_by_name(name);
            }

            // 内容が変わった場合のみリストを置き換える（再通知の抑制）
            if outcome.list_changed {
                store.replace_supplies(outcome.updated_list.clone());
            }
        }
        self.set_phase(ReconcilePhase::Idle);

        Ok(outcome)
    }
}
