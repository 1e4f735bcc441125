// ==========================================
// 防災備蓄推奨システム - CLI エントリ
// ==========================================
// 用途: 推奨エンジンの動作確認用の薄い入口
//       （本来のプレゼンテーション層はWebアプリ側にある）
// 使い方: bichiku-advisor <組織形態ID 1-4> <人数> [住所]
// ==========================================

use anyhow::{bail, Context};
use bichiku_advisor::api::ApiError;
use bichiku_advisor::app::{get_default_db_path, AppState};
use bichiku_advisor::domain::types::OrganizationType;
use bichiku_advisor::engine::recommend::RecommendationEngine;
use bichiku_advisor::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    bichiku_advisor::i18n::set_locale("ja");

    tracing::info!("==================================================");
    tracing::info!("{}", bichiku_advisor::APP_NAME);
    tracing::info!("システムバージョン: {}", bichiku_advisor::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        bail!("使い方: bichiku-advisor <組織形態ID 1-4> <人数> [住所]");
    }

    let organization_type_id: i64 = args[1]
        .parse()
        .with_context(|| format!("組織形態IDを解釈できません: {}", args[1]))?;
    let organization_type = OrganizationType::from_id(organization_type_id)
        .with_context(|| format!("未知の組織形態IDです: {}", organization_type_id))?;
    let headcount: i64 = args[2]
        .parse()
        .with_context(|| format!("人数を解釈できません: {}", args[2]))?;

    let db_path = get_default_db_path();
    tracing::info!("カタログDB: {}", db_path);
    let state = AppState::new(db_path)?;

    // 推奨の実行
    state.supplies_api.change_organization_type(organization_type_id)?;
    let lines = state.supplies_api.change_headcount(headcount)?;

    println!("組織形態: {} / 人数: {}人", organization_type, headcount);
    println!();

    for (phase, phase_lines) in RecommendationEngine::group_by_phase(&lines) {
        println!("■ {}", phase);
        for line in &phase_lines {
            let unit = line.item.unit.as_deref().unwrap_or("");
            println!(
                "  {:<24} {}{}（参考価格 {}円）",
                line.item.name,
                line.unit_quantity(),
                unit,
                line.item.reference_price_or_zero() * line.unit_quantity()
            );
        }
    }

    println!();
    println!(
        "参考価格合計: {}円",
        state.supplies_api.reference_price_total()?
    );

    // 住所が与えられた場合はリスク評価も表示する
    if let Some(address) = args.get(3) {
        match state.risk_api.assess_address(address).await {
            Ok(assessment) => {
                println!();
                println!("住所: {}", assessment.address);
                for (category, score) in assessment.scored_categories() {
                    println!("  {:<8} ランク: {} (リスク値 {})", category, score.rank, score.risk);
                }
            }
            Err(ApiError::AddressNotFound { address }) => {
                // 再入力を促す（自動リトライはしない）
                println!();
                println!("住所が見つかりません: {}。住所を確認して入力し直してください。", address);
            }
            Err(e) => {
                tracing::warn!("リスク評価の取得に失敗しました: {}", e);
            }
        }
    }

    Ok(())
}
