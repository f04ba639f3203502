//! Plain-text report blocks for analyst consumers.
//!
//! Each block opens with a `=== Title ===` header. Rendering is pure: the
//! functions take fetched models and never touch the network.

mod format;
mod market;
mod news;
mod onchain;

pub use format::{
    display_date, grouped, grouped_int, signed_pct, strip_html, truncate_chars, usd, SECTION_RULE,
};
pub use market::{fear_greed, global_overview, market_snapshot, price_history, trending};
pub use news::{news_digest, regulatory_digest, REGULATORY_SHOWN, SUMMARY_CHARS};
pub use onchain::{bitcoin, ethereum, generic, onchain};
