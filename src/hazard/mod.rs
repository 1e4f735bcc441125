// ==========================================
// 防災備蓄推奨システム - 災害リスク評価境界
// ==========================================
// 職責: 住所ベースのリスク評価APIの呼び出し境界と結果キャッシュ
// 制約: 「住所が存在しません」は通信失敗と区別された型付きエラー。
//       自動リトライはしない（住所の再入力はUI側の責務）
// ==========================================

pub mod cache;
pub mod client;

use crate::domain::risk::RiskAssessment;
use async_trait::async_trait;
use thiserror::Error;

pub use cache::RiskCache;
pub use client::HttpRiskClient;

/// 外部APIが「住所不明」を表すエラー文字列（ワイヤ定数）
pub const ADDRESS_NOT_FOUND_ERROR: &str = "住所が存在しません";

// ==========================================
// エラー型
// ==========================================

/// リスク評価呼び出しのエラー型
#[derive(Error, Debug)]
pub enum HazardError {
    /// 住所がジオコーディングできなかった（再入力を促す。リトライ対象外）
    #[error("住所が存在しません: {address}")]
    AddressNotFound { address: String },

    /// 通信・HTTP層の失敗
    #[error("リスク評価APIの呼び出しに失敗しました: {0}")]
    Transport(String),

    /// 応答の解析失敗
    #[error("リスク評価APIの応答形式が不正です: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for HazardError {
    fn from(e: reqwest::Error) -> Self {
        HazardError::Transport(e.to_string())
    }
}

// ==========================================
// HazardRiskProvider Trait
// ==========================================
// 用途: 住所1件のリスク評価取得
// 実装者: HttpRiskClient（本番）/ テスト用モック
#[async_trait]
pub trait HazardRiskProvider: Send + Sync {
    /// 住所のリスク評価を取得する
    ///
    /// # 引数
    /// - address: 自由入力の住所文字列
    ///
    /// # 戻り値
    /// - Ok(RiskAssessment): 正規化済みリスク評価
    /// - Err(HazardError::AddressNotFound): 住所が解決できない
    /// - Err: その他の通信・解析エラー
    async fn assess(&self, address: &str) -> Result<RiskAssessment, HazardError>;
}
