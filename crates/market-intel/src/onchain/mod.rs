//! On-chain metrics, dispatched by chain family.
//!
//! Bitcoin reads from blockchain.com without credentials. Ethereum needs an
//! Etherscan key and everything else goes through CryptoCompare, which
//! needs its own key plus a numeric coin id from the static table.

use tracing::{debug, warn};

use crate::errors::IntelError;
use crate::models::{
    AssetSymbol, BitcoinMetrics, ChainFamily, CongestionLevel, EthereumMetrics, GenericMetrics,
    OnChainSnapshot,
};
use crate::provider::{cryptocompare, etherscan, BlockchainComApi, CryptoCompareApi, EtherscanApi};
use crate::resolver::SymbolResolver;

/// Pending transfers at or above this many BTC count as whale activity.
pub const DEFAULT_WHALE_THRESHOLD_BTC: f64 = 50.0;

pub struct OnChainClient {
    blockchain: BlockchainComApi,
    etherscan: Option<EtherscanApi>,
    cryptocompare: Option<CryptoCompareApi>,
    whale_threshold_btc: f64,
}

impl OnChainClient {
    pub fn new(
        blockchain: BlockchainComApi,
        etherscan: Option<EtherscanApi>,
        cryptocompare: Option<CryptoCompareApi>,
    ) -> Self {
        Self {
            blockchain,
            etherscan,
            cryptocompare,
            whale_threshold_btc: DEFAULT_WHALE_THRESHOLD_BTC,
        }
    }

    pub fn with_whale_threshold(mut self, threshold_btc: f64) -> Self {
        self.whale_threshold_btc = threshold_btc;
        self
    }

    pub fn whale_threshold(&self) -> f64 {
        self.whale_threshold_btc
    }

    pub async fn snapshot(&self, symbol: &AssetSymbol) -> Result<OnChainSnapshot, IntelError> {
        match symbol.chain_family() {
            ChainFamily::Bitcoin => self.bitcoin_snapshot().await,
            ChainFamily::Ethereum => self.ethereum_snapshot().await,
            ChainFamily::Other => self.generic_snapshot(symbol).await,
        }
    }

    pub async fn bitcoin_snapshot(&self) -> Result<OnChainSnapshot, IntelError> {
        self.bitcoin_snapshot_with_threshold(self.whale_threshold_btc).await
    }

    /// Stats are fetched once and their market price reused for every whale.
    /// A stats failure fails the snapshot; mempool and whale failures only
    /// leave their sections empty.
    pub async fn bitcoin_snapshot_with_threshold(
        &self,
        threshold_btc: f64,
    ) -> Result<OnChainSnapshot, IntelError> {
        let network = self.blockchain.stats().await?;

        let mempool = match self.blockchain.mempool().await {
            Ok(status) => Some(status),
            Err(e) => {
                warn!("Mempool count unavailable: {}", e);
                None
            }
        };

        let price = Some(network.market_price_usd).filter(|p| *p > 0.0);
        let whales = self
            .blockchain
            .whale_transactions(threshold_btc, price)
            .await
            .unwrap_or_else(|e| {
                warn!("Unconfirmed transactions unavailable: {}", e);
                Vec::new()
            });

        debug!("Bitcoin snapshot: {} whale transactions", whales.len());
        Ok(OnChainSnapshot::Bitcoin(BitcoinMetrics {
            network,
            mempool,
            whale_threshold_btc: threshold_btc,
            whales,
        }))
    }

    pub async fn ethereum_snapshot(&self) -> Result<OnChainSnapshot, IntelError> {
        let Some(api) = &self.etherscan else {
            return Ok(unavailable(ChainFamily::Ethereum, etherscan::CREDENTIAL));
        };

        let gas = api.gas_oracle().await?;

        let total_supply_eth = api
            .total_supply()
            .await
            .map_err(|e| warn!("ETH total supply unavailable: {}", e))
            .ok();
        let staking_eth = api
            .staking_total()
            .await
            .map_err(|e| warn!("ETH staking total unavailable: {}", e))
            .ok();

        Ok(OnChainSnapshot::Ethereum(EthereumMetrics {
            congestion: CongestionLevel::from_fast_gas(gas.fast),
            safe_gas_gwei: gas.safe,
            standard_gas_gwei: gas.propose,
            fast_gas_gwei: gas.fast,
            base_fee_gwei: gas.base_fee,
            gas_used_ratio: gas.gas_used_ratio,
            total_supply_eth,
            staking_eth,
        }))
    }

    /// The coin id mapping is checked before the credential: an unmapped
    /// symbol is reported as such even when no key is configured.
    pub async fn generic_snapshot(&self, symbol: &AssetSymbol) -> Result<OnChainSnapshot, IntelError> {
        let Some(coin_id) = SymbolResolver::cryptocompare_id(symbol) else {
            debug!("No CryptoCompare id for {}", symbol);
            return Ok(OnChainSnapshot::NoMapping {
                symbol: symbol.clone(),
            });
        };

        let Some(api) = &self.cryptocompare else {
            return Ok(unavailable(ChainFamily::Other, cryptocompare::CREDENTIAL));
        };

        let social = api
            .social_stats(coin_id)
            .await
            .map_err(|e| warn!("Social stats unavailable for {}: {}", symbol, e))
            .ok();
        let blockchain = api
            .blockchain_latest(symbol.as_str())
            .await
            .map_err(|e| warn!("Blockchain data unavailable for {}: {}", symbol, e))
            .unwrap_or_default();

        Ok(OnChainSnapshot::Generic(GenericMetrics {
            symbol: symbol.clone(),
            coin_id,
            social,
            blockchain,
        }))
    }
}

/// Snapshot for a chain whose provider key is not configured.
fn unavailable(chain: ChainFamily, credential: &'static str) -> OnChainSnapshot {
    let reason = IntelError::MissingCredential(credential);
    debug!("{} on-chain skipped ({})", chain.display_name(), reason.diagnostic());
    OnChainSnapshot::Unavailable {
        chain,
        credential: credential.to_string(),
    }
}
