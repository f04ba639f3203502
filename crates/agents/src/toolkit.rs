//! Consumer-facing tools.
//!
//! A tool call names an operation and carries JSON arguments. The toolkit
//! checks the call against the role's capability profile, decodes the
//! arguments and renders the hub's results as plain text. Upstream failures
//! become text; only contract violations surface as [`RouterError`].

use chainlens_market_intel::{report, AssetSymbol, IntelHub, OnChainSnapshot};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::RouterError;
use crate::router::{CapabilityProfile, Operation};

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PRICE_DAYS: u32 = 90;
pub const DEFAULT_TRENDING_LIMIT: usize = 10;
pub const DEFAULT_NEWS_HOURS: u32 = 24;
pub const DEFAULT_MAX_ARTICLES: usize = 10;
pub const DEFAULT_FULL_ANALYSIS_DAYS: u32 = 30;

/// News window used inside the full analysis.
const FULL_ANALYSIS_NEWS_HOURS: u32 = 48;
const FULL_ANALYSIS_NEWS_ARTICLES: usize = 5;

fn default_price_days() -> u32 {
    DEFAULT_PRICE_DAYS
}

fn default_trending_limit() -> usize {
    DEFAULT_TRENDING_LIMIT
}

fn default_news_hours() -> u32 {
    DEFAULT_NEWS_HOURS
}

fn default_max_articles() -> usize {
    DEFAULT_MAX_ARTICLES
}

fn default_full_analysis_days() -> u32 {
    DEFAULT_FULL_ANALYSIS_DAYS
}

// ============================================================================
// Arguments
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDataArgs {
    pub symbol: String,
    #[serde(default = "default_price_days")]
    pub days: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolArgs {
    pub symbol: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingArgs {
    #[serde(default = "default_trending_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArgs {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default = "default_news_hours")]
    pub hours: u32,
    #[serde(default = "default_max_articles", alias = "max_articles")]
    pub max_articles: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullAnalysisArgs {
    pub symbol: String,
    #[serde(default = "default_full_analysis_days")]
    pub days: u32,
}

// ============================================================================
// Calls and outputs
// ============================================================================

/// A tool invocation requested by the consumer. `id` is the consumer's own
/// correlation id and is echoed back on the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolOutput {
    pub call_id: String,
    pub operation: Operation,
    pub text: String,
    /// False when the text is a placeholder rather than fetched data.
    pub used: bool,
}

/// Rendered text plus whether it carries real data.
struct Rendered {
    text: String,
    used: bool,
}

impl Rendered {
    fn data(text: String) -> Self {
        Self { text, used: true }
    }

    fn placeholder(text: String) -> Self {
        Self { text, used: false }
    }
}

fn decode<T: DeserializeOwned>(op: Operation, arguments: &Value) -> Result<T, RouterError> {
    let value = match arguments {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };
    serde_json::from_value(value).map_err(|e| RouterError::invalid_arguments(op.name(), e))
}

fn symbol(op: Operation, raw: &str) -> Result<AssetSymbol, RouterError> {
    AssetSymbol::parse(raw).map_err(|e| RouterError::invalid_arguments(op.name(), e))
}

// ============================================================================
// Toolkit
// ============================================================================

pub struct Toolkit {
    hub: IntelHub,
}

impl Toolkit {
    pub fn new(hub: IntelHub) -> Self {
        Self { hub }
    }

    pub fn hub(&self) -> &IntelHub {
        &self.hub
    }

    /// Execute one call on behalf of the role described by `profile`.
    pub async fn dispatch(&self, profile: &CapabilityProfile, call: &ToolCall) -> Result<ToolOutput, RouterError> {
        let op = profile.authorize(&call.name)?;
        debug!("Dispatching {} for {} ({})", op, profile.role, profile.asset);
        let rendered = self.execute(op, &call.arguments).await?;
        Ok(ToolOutput {
            call_id: call.id.clone(),
            operation: op,
            text: rendered.text,
            used: rendered.used,
        })
    }

    /// Execute an operation without a profile check.
    pub async fn run(&self, op: Operation, arguments: &Value) -> Result<(String, bool), RouterError> {
        let rendered = self.execute(op, arguments).await?;
        Ok((rendered.text, rendered.used))
    }

    async fn execute(&self, op: Operation, arguments: &Value) -> Result<Rendered, RouterError> {
        let rendered = match op {
            Operation::CryptoPriceData => {
                let args: PriceDataArgs = decode(op, arguments)?;
                self.price_data(&symbol(op, &args.symbol)?, args.days).await
            }
            Operation::GlobalCryptoMarket => self.global_market().await,
            Operation::CryptoFearGreedIndex => {
                Rendered::data(report::fear_greed(&self.hub.market().fear_greed().await))
            }
            Operation::TrendingCryptocurrencies => {
                let args: TrendingArgs = decode(op, arguments)?;
                self.trending(args.limit).await
            }
            Operation::BitcoinOnchainMetrics => {
                let result = self.hub.onchain().bitcoin_snapshot().await;
                onchain_text(result, "Bitcoin on-chain data")
            }
            Operation::EthereumOnchainMetrics => {
                let result = self.hub.onchain().ethereum_snapshot().await;
                onchain_text(result, "Ethereum on-chain data")
            }
            Operation::OnchainMetrics => {
                let args: SymbolArgs = decode(op, arguments)?;
                self.onchain(&symbol(op, &args.symbol)?).await
            }
            Operation::CryptoNews => {
                let args: NewsArgs = decode(op, arguments)?;
                let asset = match args.symbol.as_deref().map(str::trim) {
                    Some(raw) if !raw.is_empty() => Some(symbol(op, raw)?),
                    _ => None,
                };
                self.news(asset.as_ref(), args.hours, args.max_articles).await
            }
            Operation::RegulatoryNews => {
                let articles = self.hub.news().regulatory_news().await;
                let used = !articles.is_empty();
                Rendered {
                    text: report::regulatory_digest(&articles),
                    used,
                }
            }
            Operation::CryptoFullAnalysis => {
                let args: FullAnalysisArgs = decode(op, arguments)?;
                self.full_analysis(&symbol(op, &args.symbol)?, args.days).await
            }
            other => {
                info!("{} routed to the equity data layer", other);
                Rendered::placeholder(format!("{} is not handled here", other))
            }
        };
        Ok(rendered)
    }

    async fn price_data(&self, asset: &AssetSymbol, days: u32) -> Rendered {
        let market = self.hub.market();
        let resolved = market.resolver().coingecko_id(asset).await;
        let summary = match market.snapshot_resolved(asset, &resolved).await {
            Ok(snapshot) => report::market_snapshot(&snapshot),
            Err(e) => format!("Error fetching market data for {}: {}", asset, e),
        };
        match market.history_resolved(asset, &resolved, days).await {
            Ok(series) => Rendered::data(format!("{}\n\n{}", summary, report::price_history(&series, days))),
            Err(e) => {
                debug!("Price history for {} unavailable: {}", asset, e);
                Rendered::placeholder(format!("Could not fetch price data for {}", asset))
            }
        }
    }

    async fn global_market(&self) -> Rendered {
        let snapshot = self.hub.market().global_snapshot().await;
        let used = snapshot.aggregates_available || snapshot.sentiment_available;
        Rendered {
            text: report::global_overview(&snapshot),
            used,
        }
    }

    async fn trending(&self, limit: usize) -> Rendered {
        match self.hub.market().trending(limit).await {
            Ok(coins) if !coins.is_empty() => Rendered::data(report::trending(&coins)),
            Ok(_) => Rendered::placeholder(report::trending(&[])),
            Err(e) => Rendered::placeholder(format!("Error fetching trending coins: {}", e)),
        }
    }

    async fn onchain(&self, asset: &AssetSymbol) -> Rendered {
        let result = self.hub.onchain().snapshot(asset).await;
        onchain_text(result, &format!("on-chain metrics for {}", asset))
    }

    async fn news(&self, asset: Option<&AssetSymbol>, hours: u32, max_articles: usize) -> Rendered {
        let articles = self.hub.news().aggregate(asset, max_articles).await;
        let used = !articles.is_empty() && max_articles > 0;
        Rendered {
            text: report::news_digest(&articles, asset, hours, max_articles),
            used,
        }
    }

    async fn full_analysis(&self, asset: &AssetSymbol, days: u32) -> Rendered {
        let sections = [
            self.price_data(asset, days).await,
            self.onchain(asset).await,
            self.news(Some(asset), FULL_ANALYSIS_NEWS_HOURS, FULL_ANALYSIS_NEWS_ARTICLES)
                .await,
            self.global_market().await,
        ];

        let used = sections.iter().any(|s| s.used);
        let rule = format!("\n{}", report::SECTION_RULE);
        let mut parts: Vec<&str> = Vec::with_capacity(sections.len() * 2);
        for (i, section) in sections.iter().enumerate() {
            if i > 0 {
                parts.push(&rule);
            }
            parts.push(&section.text);
        }
        Rendered {
            text: parts.join("\n"),
            used,
        }
    }
}

fn onchain_text(
    result: Result<OnChainSnapshot, chainlens_market_intel::IntelError>,
    what: &str,
) -> Rendered {
    match result {
        Ok(snapshot) => {
            let used = match &snapshot {
                OnChainSnapshot::Bitcoin(_) | OnChainSnapshot::Ethereum(_) => true,
                OnChainSnapshot::Generic(m) => !m.is_empty(),
                OnChainSnapshot::Unavailable { .. } | OnChainSnapshot::NoMapping { .. } => false,
            };
            Rendered {
                text: report::onchain(&snapshot),
                used,
            }
        }
        Err(e) => Rendered::placeholder(format!("Error fetching {}: {}", what, e)),
    }
}
