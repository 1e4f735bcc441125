// ==========================================
// 防災備蓄推奨システム - リスク評価HTTPクライアント
// ==========================================
// 職責: 外部 calc-risk エンドポイントの呼び出しと応答の正規化
// 契約: 応答はカテゴリごとの { rank, risk }、address / input_address、
//       または error 文字列を含むJSON
// ==========================================

use crate::domain::risk::{HazardScore, RiskAssessment};
use crate::domain::types::HazardRank;
use crate::hazard::{HazardError, HazardRiskProvider, ADDRESS_NOT_FOUND_ERROR};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

// ==========================================
// 外部APIの生応答型
// ==========================================

#[derive(Debug, Deserialize)]
pub struct RawHazardScore {
    pub rank: String,
    pub risk: f64,
}

#[derive(Debug, Deserialize)]
pub struct RawRiskResponse {
    #[serde(default)]
    pub earthquake: Option<RawHazardScore>,
    #[serde(default)]
    pub flood: Option<RawHazardScore>,
    #[serde(default)]
    pub tsunami: Option<RawHazardScore>,
    #[serde(default)]
    pub dirtsand: Option<RawHazardScore>, // 土砂災害（外部APIの命名）
    #[serde(default)]
    pub heavysnow: Option<RawHazardScore>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub input_address: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// 生応答を正規化する
///
/// error フィールドの「住所が存在しません」は型付きエラーへ変換する。
/// 未知のランク表記は HazardRank::Unknown になる（HazardRank::parse）
pub fn normalize_response(
    input_address: &str,
    raw: RawRiskResponse,
) -> Result<RiskAssessment, HazardError> {
    if let Some(error) = raw.error {
        if error == ADDRESS_NOT_FOUND_ERROR {
            return Err(HazardError::AddressNotFound {
                address: input_address.to_string(),
            });
        }
        return Err(HazardError::Transport(error));
    }

    let score = |raw_score: Option<RawHazardScore>| {
        raw_score.map(|s| HazardScore {
            rank: HazardRank::parse(&s.rank),
            risk: s.risk,
        })
    };

    Ok(RiskAssessment {
        address: raw.address.unwrap_or_else(|| input_address.to_string()),
        input_address: raw
            .input_address
            .unwrap_or_else(|| input_address.to_string()),
        earthquake: score(raw.earthquake),
        flood: score(raw.flood),
        tsunami: score(raw.tsunami),
        landslide: score(raw.dirtsand),
        heavy_snow: score(raw.heavysnow),
    })
}

// ==========================================
// HttpRiskClient - 本番プロバイダ実装
// ==========================================
pub struct HttpRiskClient {
    client: reqwest::Client,
    api_base_url: String,
}

impl HttpRiskClient {
    /// APIベースURLから作る
    ///
    /// # 引数
    /// - api_base_url: 例 `http://localhost:8000`
    pub fn new(api_base_url: String, timeout: Duration) -> Result<Self, HazardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(HazardError::from)?;
        Ok(Self {
            client,
            api_base_url,
        })
    }
}

#[async_trait]
impl HazardRiskProvider for HttpRiskClient {
    async fn assess(&self, address: &str) -> Result<RiskAssessment, HazardError> {
        tracing::info!("住所に基づいてリスク情報を取得します: {}", address);

        let response = self
            .client
            .get(format!("{}/api/calc-risk", self.api_base_url))
            .query(&[("address", address)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(HazardError::Transport(format!(
                "HTTPステータス {}",
                status.as_u16()
            )));
        }

        let raw: RawRiskResponse = response
            .json()
            .await
            .map_err(|e| HazardError::MalformedResponse(e.to_string()))?;

        normalize_response(address, raw)
    }
}
