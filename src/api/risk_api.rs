// ==========================================
// 防災備蓄推奨システム - リスク評価API
// ==========================================
// 職責: 住所のリスク評価取得（キャッシュ経由）
// 制約: 成功した評価のみキャッシュする。「住所が存在しません」は
//       型付きエラーとして返し、自動リトライしない
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::risk::RiskAssessment;
use crate::hazard::{HazardRiskProvider, RiskCache};
use std::sync::{Arc, Mutex};

// ==========================================
// RiskApi - リスク評価API
// ==========================================
pub struct RiskApi {
    provider: Arc<dyn HazardRiskProvider>,
    cache: Mutex<RiskCache>,
}

impl RiskApi {
    /// プロバイダとキャッシュ容量を指定して作る
    pub fn new(provider: Arc<dyn HazardRiskProvider>, cache_capacity: usize) -> Self {
        Self {
            provider,
            cache: Mutex::new(RiskCache::new(cache_capacity)),
        }
    }

    // ==========================================
    // 中核メソッド
    // ==========================================

    /// 住所のリスク評価を取得する（キャッシュ優先）
    ///
    /// # 引数
    /// - address: 自由入力の住所文字列
    ///
    /// # エラー
    /// - AddressNotFound: 住所が解決できない（住所の再入力を促す）
    /// - ExternalServiceFailure: 通信・解析エラー
    pub async fn assess_address(&self, address: &str) -> ApiResult<RiskAssessment> {
        if address.is_empty() {
            return Err(ApiError::InvalidInput("住所が入力されていません".to_string()));
        }

        if let Some(cached) = self.cache_get(address)? {
            tracing::info!("キャッシュからリスク情報を取得: {}", address);
            return Ok(cached);
        }

        let assessment = self.provider.assess(address).await?;

        {
            let mut cache = self.lock_cache()?;
            cache.insert(address.to_string(), assessment.clone());
        }
        Ok(assessment)
    }

    /// キャッシュの保存件数（観測用）
    pub fn cached_address_count(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn lock_cache(&self) -> ApiResult<std::sync::MutexGuard<'_, RiskCache>> {
        self.cache
            .lock()
            .map_err(|e| ApiError::Internal(format!("キャッシュロックの取得に失敗: {}", e)))
    }

    fn cache_get(&self, address: &str) -> ApiResult<Option<RiskAssessment>> {
        Ok(self.lock_cache()?.get(address).cloned())
    }
}
