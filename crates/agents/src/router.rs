//! Capability routing: which operations a role may call for an asset.
//!
//! Selection is a pure function of (mode, role, asset). Crypto-mode network
//! analysis branches on the chain family; everything else is a fixed list.

use std::fmt;
use std::str::FromStr;

use chainlens_market_intel::{AssetSymbol, ChainFamily};
use serde::{Deserialize, Serialize};

use crate::error::RouterError;

// ============================================================================
// Mode and role
// ============================================================================

/// Asset universe the consumer is analyzing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperatingMode {
    /// Equities. `online` picks live-search operations over cached datasets.
    Standard { online: bool },
    Crypto,
}

impl OperatingMode {
    /// Parse a mode name. Unknown names are a contract violation, never a
    /// silent default.
    pub fn parse(mode: &str, online: bool) -> Result<Self, RouterError> {
        match mode.trim().to_ascii_lowercase().as_str() {
            "crypto" | "cryptocurrency" => Ok(Self::Crypto),
            "standard" | "stock" | "equity" => Ok(Self::Standard { online }),
            _ => Err(RouterError::UnrecognizedMode(mode.to_string())),
        }
    }

    pub fn is_crypto(&self) -> bool {
        matches!(self, Self::Crypto)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnalystRole {
    Market,
    /// Fundamentals in standard mode, on-chain in crypto mode.
    Network,
    News,
    Sentiment,
}

impl AnalystRole {
    pub const ALL: [AnalystRole; 4] = [Self::Market, Self::Network, Self::News, Self::Sentiment];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Market => "market",
            Self::Network => "network",
            Self::News => "news",
            Self::Sentiment => "sentiment",
        }
    }

    /// State key under which the role's final report is stored.
    pub fn report_key(&self, mode: OperatingMode) -> &'static str {
        match (self, mode) {
            (Self::Market, _) => "market_report",
            (Self::Network, OperatingMode::Crypto) => "onchain_report",
            (Self::Network, OperatingMode::Standard { .. }) => "fundamentals_report",
            (Self::News, _) => "news_report",
            (Self::Sentiment, _) => "sentiment_report",
        }
    }
}

impl FromStr for AnalystRole {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "market" => Ok(Self::Market),
            "network" | "onchain" | "on-chain" | "fundamentals" => Ok(Self::Network),
            "news" => Ok(Self::News),
            "sentiment" | "social" => Ok(Self::Sentiment),
            _ => Err(RouterError::UnrecognizedRole(s.to_string())),
        }
    }
}

impl fmt::Display for AnalystRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Operations
// ============================================================================

/// Every operation a consumer can name.
///
/// Standard-mode operations are identifiers of the surrounding equity data
/// layer; they route here but are executed elsewhere.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Operation {
    CryptoPriceData,
    GlobalCryptoMarket,
    CryptoFearGreedIndex,
    TrendingCryptocurrencies,
    BitcoinOnchainMetrics,
    EthereumOnchainMetrics,
    OnchainMetrics,
    CryptoNews,
    RegulatoryNews,
    CryptoFullAnalysis,

    YFinData,
    YFinDataOnline,
    StockstatsIndicatorsReport,
    StockstatsIndicatorsReportOnline,
    FinnhubNews,
    RedditNews,
    GoogleNews,
    GlobalNewsOpenai,
    StockNewsOpenai,
    RedditStockInfo,
    FundamentalsOpenai,
    FinnhubInsiderSentiment,
    FinnhubInsiderTransactions,
    SimfinBalanceSheet,
    SimfinCashflow,
    SimfinIncomeStatement,
}

impl Operation {
    pub const ALL: [Operation; 26] = [
        Self::CryptoPriceData,
        Self::GlobalCryptoMarket,
        Self::CryptoFearGreedIndex,
        Self::TrendingCryptocurrencies,
        Self::BitcoinOnchainMetrics,
        Self::EthereumOnchainMetrics,
        Self::OnchainMetrics,
        Self::CryptoNews,
        Self::RegulatoryNews,
        Self::CryptoFullAnalysis,
        Self::YFinData,
        Self::YFinDataOnline,
        Self::StockstatsIndicatorsReport,
        Self::StockstatsIndicatorsReportOnline,
        Self::FinnhubNews,
        Self::RedditNews,
        Self::GoogleNews,
        Self::GlobalNewsOpenai,
        Self::StockNewsOpenai,
        Self::RedditStockInfo,
        Self::FundamentalsOpenai,
        Self::FinnhubInsiderSentiment,
        Self::FinnhubInsiderTransactions,
        Self::SimfinBalanceSheet,
        Self::SimfinCashflow,
        Self::SimfinIncomeStatement,
    ];

    /// Wire name used by consumers.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CryptoPriceData => "get_crypto_price_data",
            Self::GlobalCryptoMarket => "get_global_crypto_market",
            Self::CryptoFearGreedIndex => "get_crypto_fear_greed_index",
            Self::TrendingCryptocurrencies => "get_trending_cryptocurrencies",
            Self::BitcoinOnchainMetrics => "get_bitcoin_onchain_metrics",
            Self::EthereumOnchainMetrics => "get_ethereum_onchain_metrics",
            Self::OnchainMetrics => "get_onchain_metrics",
            Self::CryptoNews => "get_crypto_news",
            Self::RegulatoryNews => "get_regulatory_news",
            Self::CryptoFullAnalysis => "get_crypto_full_analysis",
            Self::YFinData => "get_YFin_data",
            Self::YFinDataOnline => "get_YFin_data_online",
            Self::StockstatsIndicatorsReport => "get_stockstats_indicators_report",
            Self::StockstatsIndicatorsReportOnline => "get_stockstats_indicators_report_online",
            Self::FinnhubNews => "get_finnhub_news",
            Self::RedditNews => "get_reddit_news",
            Self::GoogleNews => "get_google_news",
            Self::GlobalNewsOpenai => "get_global_news_openai",
            Self::StockNewsOpenai => "get_stock_news_openai",
            Self::RedditStockInfo => "get_reddit_stock_info",
            Self::FundamentalsOpenai => "get_fundamentals_openai",
            Self::FinnhubInsiderSentiment => "get_finnhub_company_insider_sentiment",
            Self::FinnhubInsiderTransactions => "get_finnhub_company_insider_transactions",
            Self::SimfinBalanceSheet => "get_simfin_balance_sheet",
            Self::SimfinCashflow => "get_simfin_cashflow",
            Self::SimfinIncomeStatement => "get_simfin_income_stmt",
        }
    }

    /// Exact, case-sensitive lookup by wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Whether this crate's toolkit executes the operation itself.
    pub fn is_crypto(&self) -> bool {
        matches!(
            self,
            Self::CryptoPriceData
                | Self::GlobalCryptoMarket
                | Self::CryptoFearGreedIndex
                | Self::TrendingCryptocurrencies
                | Self::BitcoinOnchainMetrics
                | Self::EthereumOnchainMetrics
                | Self::OnchainMetrics
                | Self::CryptoNews
                | Self::RegulatoryNews
                | Self::CryptoFullAnalysis
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Capability profile
// ============================================================================

/// Ordered operations one role may call for one asset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapabilityProfile {
    pub mode: OperatingMode,
    pub role: AnalystRole,
    pub asset: AssetSymbol,
    pub operations: Vec<Operation>,
}

impl CapabilityProfile {
    pub fn allows(&self, op: Operation) -> bool {
        self.operations.contains(&op)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.operations.iter().map(Operation::name).collect()
    }

    /// Resolve a requested tool name against this profile.
    pub fn authorize(&self, name: &str) -> Result<Operation, RouterError> {
        let op = Operation::from_name(name).ok_or_else(|| RouterError::ToolNotFound(name.to_string()))?;
        if !self.allows(op) {
            return Err(RouterError::ToolNotAllowed(name.to_string()));
        }
        Ok(op)
    }
}

/// Operations permitted for `role` analyzing `asset` in `mode`.
pub fn select_operations(mode: OperatingMode, role: AnalystRole, asset: &AssetSymbol) -> CapabilityProfile {
    use Operation::*;

    let operations = match (mode, role) {
        (OperatingMode::Crypto, AnalystRole::Market) => {
            vec![CryptoPriceData, GlobalCryptoMarket, CryptoFearGreedIndex]
        }
        (OperatingMode::Crypto, AnalystRole::Network) => {
            let onchain = match asset.chain_family() {
                ChainFamily::Bitcoin => BitcoinOnchainMetrics,
                ChainFamily::Ethereum => EthereumOnchainMetrics,
                ChainFamily::Other => OnchainMetrics,
            };
            vec![onchain, CryptoPriceData, GlobalCryptoMarket]
        }
        (OperatingMode::Crypto, AnalystRole::News) => vec![CryptoNews, RegulatoryNews],
        (OperatingMode::Crypto, AnalystRole::Sentiment) => vec![TrendingCryptocurrencies, CryptoNews],

        (OperatingMode::Standard { online: true }, AnalystRole::Market) => {
            vec![YFinDataOnline, StockstatsIndicatorsReportOnline]
        }
        (OperatingMode::Standard { online: false }, AnalystRole::Market) => {
            vec![YFinData, StockstatsIndicatorsReport]
        }
        (OperatingMode::Standard { online: true }, AnalystRole::Network) => vec![FundamentalsOpenai],
        (OperatingMode::Standard { online: false }, AnalystRole::Network) => vec![
            FinnhubInsiderSentiment,
            FinnhubInsiderTransactions,
            SimfinBalanceSheet,
            SimfinCashflow,
            SimfinIncomeStatement,
        ],
        (OperatingMode::Standard { online: true }, AnalystRole::News) => {
            vec![GlobalNewsOpenai, GoogleNews]
        }
        (OperatingMode::Standard { online: false }, AnalystRole::News) => {
            vec![FinnhubNews, RedditNews, GoogleNews]
        }
        (OperatingMode::Standard { online: true }, AnalystRole::Sentiment) => vec![StockNewsOpenai],
        (OperatingMode::Standard { online: false }, AnalystRole::Sentiment) => vec![RedditStockInfo],
    };

    CapabilityProfile {
        mode,
        role,
        asset: asset.clone(),
        operations,
    }
}
