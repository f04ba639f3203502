use std::fmt::Write;

use crate::models::{BitcoinMetrics, ChainFamily, EthereumMetrics, GenericMetrics, OnChainSnapshot};

use super::format::{grouped, grouped_int, usd};

/// Whale lines shown in the Bitcoin block.
const WHALES_SHOWN: usize = 5;

/// Blockchain record fields that are bookkeeping, not metrics.
const SKIPPED_FIELDS: [&str; 2] = ["id", "time"];

pub fn onchain(snapshot: &OnChainSnapshot) -> String {
    match snapshot {
        OnChainSnapshot::Bitcoin(m) => bitcoin(m),
        OnChainSnapshot::Ethereum(m) => ethereum(m),
        OnChainSnapshot::Generic(m) => generic(m),
        OnChainSnapshot::Unavailable { chain, credential } => match chain {
            ChainFamily::Ethereum => "Etherscan API key required for Ethereum on-chain data".to_string(),
            _ => format!("On-chain data unavailable: {} is not configured", credential),
        },
        OnChainSnapshot::NoMapping { symbol } => {
            format!("Limited on-chain data available for {} (no on-chain data mapping)", symbol)
        }
    }
}

pub fn bitcoin(m: &BitcoinMetrics) -> String {
    let n = &m.network;
    let (unconfirmed, congestion) = match &m.mempool {
        Some(pool) => (grouped_int(pool.unconfirmed_count), pool.congestion.label()),
        None => ("N/A".to_string(), "Unknown"),
    };

    let mut out = format!(
        "=== Bitcoin On-Chain Metrics ===

Network Health:
  Hash Rate: {:.2} EH/s
  Difficulty: {}
  Avg Block Time: {:.1} minutes
  Total BTC Mined: {} BTC

Transaction Activity (24h):
  Total Transactions: {}
  Volume: {}
  Miner Revenue: {}

Mempool Status:
  Unconfirmed Transactions: {}
  Network Congestion: {}

Whale Activity (Recent Large Transactions, >= {} BTC):
",
        n.hash_rate_ehs(),
        grouped(n.difficulty, 0),
        n.minutes_between_blocks,
        grouped(n.total_mined_btc, 2),
        grouped_int(n.tx_count_24h),
        usd(n.estimated_volume_usd, 0),
        usd(n.miners_revenue_usd, 0),
        unconfirmed,
        congestion,
        m.whale_threshold_btc,
    );

    if m.whales.is_empty() {
        out.push_str("  No large transactions detected recently");
    }
    for (i, tx) in m.whales.iter().take(WHALES_SHOWN).enumerate() {
        let _ = write!(out, "\n  {}. {:.2} BTC", i + 1, tx.value_native);
        if let Some(value_usd) = tx.value_usd {
            let _ = write!(out, " ({})", usd(value_usd, 0));
        }
    }
    out.trim_end().to_string()
}

pub fn ethereum(m: &EthereumMetrics) -> String {
    let total_supply = m
        .total_supply_eth
        .map(|s| format!("{} ETH", grouped(s, 0)))
        .unwrap_or_else(|| "N/A".to_string());

    let mut out = format!(
        "=== Ethereum On-Chain Metrics ===

Network Activity:
  Gas Prices (Gwei):
    Safe: {}
    Standard: {}
    Fast: {}
  Base Fee: {:.2} Gwei
  Network Congestion: {}

Supply Metrics:
  Total Supply: {}",
        m.safe_gas_gwei,
        m.standard_gas_gwei,
        m.fast_gas_gwei,
        m.base_fee_gwei,
        m.congestion.label(),
        total_supply,
    );
    if let Some(staked) = m.staking_eth {
        let _ = write!(out, "\n  Staked: {} ETH", grouped(staked, 0));
    }
    out
}

pub fn generic(m: &GenericMetrics) -> String {
    if m.is_empty() {
        return format!("Limited on-chain data available for {}", m.symbol);
    }

    let mut out = format!("=== {} On-Chain & Social Metrics ===\n", m.symbol);

    if let Some(social) = &m.social {
        let _ = write!(
            out,
            "
Social Activity:
  Reddit Subscribers: {}
  Reddit Active Users: {}
  Twitter Followers: {}
",
            grouped_int(social.reddit_subscribers),
            grouped_int(social.reddit_active_users),
            grouped_int(social.twitter_followers),
        );
    }

    let metrics: Vec<_> = m
        .blockchain
        .iter()
        .filter(|(key, _)| !SKIPPED_FIELDS.contains(&key.as_str()))
        .collect();
    if !metrics.is_empty() {
        out.push_str("\nBlockchain Activity:\n");
        for (key, value) in metrics {
            let _ = writeln!(out, "  {}: {}", key, grouped(*value, 2));
        }
    }

    out.trim_end().to_string()
}
