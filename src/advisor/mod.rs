// ==========================================
// 防災備蓄推奨システム - 外部テキスト生成境界
// ==========================================
// 職責: 備蓄品リスト絞り込みの外部AI呼び出し境界を定義する
// 制約: ここは外部協調者との契約のみ。マージ規則は engine 層に置く
// ==========================================

pub mod openai;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use openai::OpenAiAdvisor;
pub use types::{AdvisorRequest, AdvisorResponse, TokenUsage};

// ==========================================
// エラー型
// ==========================================

/// 外部テキスト生成呼び出しのエラー型
#[derive(Error, Debug)]
pub enum AdvisorError {
    #[error("APIキーが設定されていません（環境変数 {0}）")]
    MissingApiKey(&'static str),

    #[error("HTTPリクエスト失敗: {0}")]
    Transport(String),

    #[error("APIエラー応答 ({status}): {body}")]
    ApiStatus { status: u16, body: String },

    #[error("応答形式が不正です: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for AdvisorError {
    fn from(e: reqwest::Error) -> Self {
        AdvisorError::Transport(e.to_string())
    }
}

// ==========================================
// SupplyAdvisor Trait
// ==========================================
// 用途: 備蓄品リスト絞り込みの外部呼び出し
// 実装者: OpenAiAdvisor（本番）/ テスト用モック
#[async_trait]
pub trait SupplyAdvisor: Send + Sync {
    /// ユーザー要求に応じた備蓄品リストの絞り込みを依頼する
    ///
    /// # 引数
    /// - request: 指示文・現在のリスト・参考詳細データ・全カタログ
    ///
    /// # 戻り値
    /// - Ok(AdvisorResponse): 更新後リスト・説明・削除品目名
    /// - Err: 通信失敗・応答形式不正など。リトライはしない
    async fn filter_supplies(&self, request: &AdvisorRequest)
        -> Result<AdvisorResponse, AdvisorError>;
}
