//! Role sessions driven over a scripted transport.

use std::sync::Arc;
use std::time::Duration;

use chainlens_agents::{
    select_operations, AnalystRole, ConsumerTurn, OperatingMode, Operation, RoleSession, RouterError,
    ToolCall, Toolkit, TradeDecision, TurnOutcome,
};
use chainlens_market_intel::http::{PacingConfig, ScriptedTransport};
use chainlens_market_intel::report::SECTION_RULE;
use chainlens_market_intel::{AssetSymbol, IntelConfig, IntelHub};
use serde_json::json;

fn toolkit(transport: ScriptedTransport) -> (Toolkit, Arc<ScriptedTransport>) {
    let transport = Arc::new(transport);
    let config = IntelConfig::default().with_pacing(PacingConfig::uniform(Duration::ZERO));
    (Toolkit::new(IntelHub::with_transport(&config, transport.clone())), transport)
}

fn sym(s: &str) -> AssetSymbol {
    AssetSymbol::parse(s).unwrap()
}

#[tokio::test]
async fn market_session_runs_tools_then_records_report() {
    let (toolkit, _) = toolkit(ScriptedTransport::new().json(
        "alternative.me/fng",
        json!({"data": [{"value": "22", "value_classification": "Extreme Fear", "timestamp": "1709251200"}]}),
    ));
    let profile = select_operations(OperatingMode::Crypto, AnalystRole::Market, &sym("BTC"));
    let mut session = RoleSession::new(profile);

    let outcome = session
        .observe(
            &toolkit,
            ConsumerTurn::calls(vec![ToolCall::new("call-1", "get_crypto_fear_greed_index", json!({}))]),
        )
        .await
        .unwrap();

    let TurnOutcome::Continue(outputs) = outcome else {
        panic!("expected tool outputs");
    };
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].call_id, "call-1");
    assert_eq!(outputs[0].operation, Operation::CryptoFearGreedIndex);
    assert!(outputs[0].text.contains("Current Value: 22/100"));
    assert!(outputs[0].text.contains("Classification: Extreme Fear"));
    assert!(!session.is_finished());

    let outcome = session
        .observe(
            &toolkit,
            ConsumerTurn::text("Sentiment is washed out.\nFINAL TRANSACTION PROPOSAL: **BUY**"),
        )
        .await
        .unwrap();

    let TurnOutcome::Final(report) = outcome else {
        panic!("expected final report");
    };
    assert_eq!(report.key, "market_report");
    assert_eq!(report.proposal, Some(TradeDecision::Buy));
    assert_eq!(session.rounds(), 1);

    let err = session
        .observe(&toolkit, ConsumerTurn::text("again"))
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::SessionFinished));
}

#[tokio::test]
async fn calls_outside_the_profile_are_rejected_before_any_request() {
    let (toolkit, transport) = toolkit(ScriptedTransport::new());
    let profile = select_operations(OperatingMode::Crypto, AnalystRole::News, &sym("ETH"));
    let mut session = RoleSession::new(profile);

    let err = session
        .observe(
            &toolkit,
            ConsumerTurn::calls(vec![ToolCall::new("c", "get_ethereum_onchain_metrics", json!({}))]),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "TOOL_NOT_ALLOWED");

    let err = session
        .observe(&toolkit, ConsumerTurn::calls(vec![ToolCall::new("c", "get_weather", json!({}))]))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "TOOL_NOT_FOUND");

    assert_eq!(transport.request_count(), 0);
    assert!(!session.is_finished());
}

#[tokio::test]
async fn network_role_for_unmapped_asset_gets_no_mapping_text() {
    let config = IntelConfig::default()
        .with_cryptocompare_key("cc-key")
        .with_pacing(PacingConfig::uniform(Duration::ZERO));
    let transport = Arc::new(ScriptedTransport::new());
    let toolkit = Toolkit::new(IntelHub::with_transport(&config, transport.clone()));
    let profile = select_operations(OperatingMode::Crypto, AnalystRole::Network, &sym("DOGE"));

    let output = toolkit
        .dispatch(&profile, &ToolCall::new("c", "get_onchain_metrics", json!({"symbol": "doge"})))
        .await
        .unwrap();

    assert!(!output.used);
    assert_eq!(
        output.text,
        "Limited on-chain data available for DOGE (no on-chain data mapping)"
    );
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn standard_operations_are_routed_but_not_executed() {
    let (toolkit, transport) = toolkit(ScriptedTransport::new());
    let profile = select_operations(OperatingMode::Standard { online: false }, AnalystRole::Sentiment, &sym("AAPL"));

    let output = toolkit
        .dispatch(&profile, &ToolCall::new("c", "get_reddit_stock_info", json!({"ticker": "AAPL"})))
        .await
        .unwrap();

    assert!(!output.used);
    assert_eq!(output.text, "get_reddit_stock_info is not handled here");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn full_analysis_degrades_every_section_to_text() {
    let (toolkit, _) = toolkit(ScriptedTransport::new());

    let (text, used) = toolkit
        .run(Operation::CryptoFullAnalysis, &json!({"symbol": "SOL"}))
        .await
        .unwrap();

    assert!(!used);
    assert!(text.starts_with("Could not fetch price data for SOL"));
    assert_eq!(text.matches(SECTION_RULE).count(), 3);
    assert!(text.contains("On-chain data unavailable: CRYPTOCOMPARE_API_KEY is not configured"));
    assert!(text.contains("No recent crypto news found in the last 48 hours"));
    assert!(text.contains("Could not fetch global market data"));
    assert!(text.contains("Fear & Greed Index: 50/100 (Neutral) [default, source unavailable]"));
}

#[tokio::test]
async fn invalid_arguments_are_a_contract_violation() {
    let (toolkit, _) = toolkit(ScriptedTransport::new());
    let profile = select_operations(OperatingMode::Crypto, AnalystRole::Market, &sym("BTC"));

    let err = toolkit
        .dispatch(&profile, &ToolCall::new("c", "get_crypto_price_data", json!({"days": 7})))
        .await
        .unwrap_err();

    assert_eq!(err.code(), "INVALID_ARGUMENTS");
}

#[tokio::test]
async fn price_data_resolves_a_searched_ticker_once() {
    let (toolkit, transport) = toolkit(
        ScriptedTransport::new()
            .json("/search", json!({"coins": [{"id": "pepe", "symbol": "PEPE"}]}))
            .json(
                "/coins/pepe/ohlc",
                json!([[1_709_251_200_000u64, 1.0e-5, 1.2e-5, 0.9e-5, 1.1e-5]]),
            ),
    );

    let (text, used) = toolkit
        .run(Operation::CryptoPriceData, &json!({"symbol": "PEPE", "days": 7}))
        .await
        .unwrap();

    assert!(used);
    assert!(text.contains("Price History (7 days):"));
    assert_eq!(transport.count_matching("/search"), 1);
    assert_eq!(transport.count_matching("/coins/pepe?"), 1);
}
