// ==========================================
// 防災備蓄推奨システム - OpenAI 互換アドバイザ実装
// ==========================================
// 職責: chat completions エンドポイントへ絞り込みプロンプトを送り、
//       応答本文を AdvisorResponse として解析する
// 制約: APIキーは環境変数からのみ読む（設定ストアには置かない）
// ==========================================

use crate::advisor::types::{AdvisorRequest, AdvisorResponse, TokenUsage};
use crate::advisor::{AdvisorError, SupplyAdvisor};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// APIキーを読む環境変数名
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

// ==========================================
// chat completions の応答型（必要な部分のみ）
// ==========================================

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

// ==========================================
// OpenAiAdvisor - 本番アドバイザ実装
// ==========================================
pub struct OpenAiAdvisor {
    client: reqwest::Client,
    api_base_url: String,
    model: String,
    api_key: String,
}

impl OpenAiAdvisor {
    /// APIキーを環境変数から読んで作る
    ///
    /// # 引数
    /// - api_base_url: 例 `https://api.openai.com`
    /// - model: 例 `gpt-4o-mini`
    /// - timeout: リクエスト全体のタイムアウト
    pub fn from_env(
        api_base_url: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, AdvisorError> {
        let api_key =
            std::env::var(API_KEY_ENV).map_err(|_| AdvisorError::MissingApiKey(API_KEY_ENV))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AdvisorError::from)?;

        Ok(Self {
            client,
            api_base_url,
            model,
            api_key,
        })
    }

    /// 絞り込みプロンプトを組み立てる
    ///
    /// 出力形式（explanation / supplies / removedItems）は
    /// AdvisorResponse の期待形式と一致させること
    fn build_prompt(request: &AdvisorRequest) -> String {
        let current = serde_json::to_string_pretty(&request.current_supplies)
            .unwrap_or_else(|_| "[]".to_string());
        let detailed = serde_json::to_string_pretty(&request.detailed_items)
            .unwrap_or_else(|_| "[]".to_string());
        let all = serde_json::to_string_pretty(&request.all_items)
            .unwrap_or_else(|_| "[]".to_string());

        format!(
            r#"以下の備蓄品リストから、ユーザーの要求「{instruction}」によって、不要な備蓄品があれば削除してください。ただしリストを空にしてはいけません。

参考情報として、各備蓄品の詳細データも提供します。これには災害フェーズ(phase)、1人あたり必要量(per_person_qty)、単位(unit)、対応災害種(hazard_type_ids)などが含まれます。
災害種の番号は、1=地震、2=水害、3=土砂災害、4=大雪、に対応しています。

また、カタログ内の全ての備蓄品情報も参考として提供します。ユーザーの要求に応じて、別の種類の備蓄品に置き換えたい場合などに活用してください。

JSON形式で3つの部分からなる回答を返してください。
1. "explanation": ユーザーの要求に基づいてどのような変更を行ったかの説明（日本語）
2. "supplies": 更新後の備蓄品リスト（jsonフォーマット）
3. "removedItems": 削除されたアイテムの名前のリスト（配列）

出力は必ず有効な JSON のみで、```（コードブロック）やその他の余分な記号は含めないでください。
"supplies"内の各備蓄品のフィールドは name, quantity, category としてください。また出力は以下の備蓄品リストと全く同じ形式で出力してください。形式が変わると動作しなくなります。

備蓄品リスト（簡略版）:
{current}

現在選択中の備蓄品詳細データ（参考情報）:
{detailed}

カタログ内の全備蓄品情報（参考情報）:
{all}
"#,
            instruction = request.instruction,
            current = current,
            detailed = detailed,
            all = all,
        )
    }
}

#[async_trait]
impl SupplyAdvisor for OpenAiAdvisor {
    async fn filter_supplies(
        &self,
        request: &AdvisorRequest,
    ) -> Result<AdvisorResponse, AdvisorError> {
        let prompt = Self::build_prompt(request);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": "あなたは備蓄品リストを管理する専門家AIです。" },
                { "role": "user", "content": prompt }
            ],
            "temperature": 0.7,
        });

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.api_base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AdvisorError::ApiStatus {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AdvisorError::MalformedResponse(e.to_string()))?;

        let content = completion
            .choices
            .first()
            .map(|c| c.message.content.as_str())
            .ok_or_else(|| {
                AdvisorError::MalformedResponse("choices が空です".to_string())
            })?;

        // 応答本文を絞り込み結果として解析
        let mut parsed: AdvisorResponse = serde_json::from_str(content).map_err(|e| {
            AdvisorError::MalformedResponse(format!("応答本文のJSON解析に失敗: {}", e))
        })?;

        // トークン使用量は外側のペイロードから引き継ぐ
        if parsed.usage.is_none() {
            parsed.usage = completion.usage;
        }

        Ok(parsed)
    }
}
