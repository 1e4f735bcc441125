// ==========================================
// 防災備蓄推奨システム - API層エラー型
// ==========================================
// 職責: 下位層のエラーをUI向けの型へ変換する
// 注意: カタログ縮退モード（フォールバック）はエラーではない
// ==========================================

use crate::advisor::AdvisorError;
use crate::hazard::HazardError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API層エラー型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 入力エラー =====
    #[error("無効な入力: {0}")]
    InvalidInput(String),

    #[error("リソース未検出: {0}")]
    NotFound(String),

    // ===== 外部協調者エラー =====
    /// 住所が解決できない（再入力を促す。自動リトライしない）
    #[error("住所が存在しません: {address}")]
    AddressNotFound { address: String },

    /// 外部サービスの通信・応答エラー（汎用失敗）
    #[error("外部サービス呼び出しに失敗しました: {0}")]
    ExternalServiceFailure(String),

    // ===== 同時実行制御 =====
    /// AI処理中の二重送信抑止
    #[error("AI処理の実行中です。完了までお待ちください")]
    AiProcessingInProgress,

    // ===== 内部エラー =====
    #[error("内部エラー: {0}")]
    Internal(String),
}

impl From<RepositoryError> for ApiError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{} id={}", entity, id))
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<HazardError> for ApiError {
    fn from(e: HazardError) -> Self {
        match e {
            HazardError::AddressNotFound { address } => ApiError::AddressNotFound { address },
            other => ApiError::ExternalServiceFailure(other.to_string()),
        }
    }
}

impl From<AdvisorError> for ApiError {
    fn from(e: AdvisorError) -> Self {
        ApiError::ExternalServiceFailure(e.to_string())
    }
}

/// API層 Result 型エイリアス
pub type ApiResult<T> = Result<T, ApiError>;
