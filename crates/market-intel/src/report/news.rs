use std::fmt::Write;

use crate::models::{AssetSymbol, NewsArticle};

use super::format::{display_date, strip_html, truncate_chars};

/// Characters of cleaned summary shown per article.
pub const SUMMARY_CHARS: usize = 200;
/// Articles listed in the regulatory digest.
pub const REGULATORY_SHOWN: usize = 10;

/// Numbered digest of the first `max_articles` articles. `hours` only labels
/// the header.
pub fn news_digest(
    articles: &[NewsArticle],
    symbol: Option<&AssetSymbol>,
    hours: u32,
    max_articles: usize,
) -> String {
    let shown = &articles[..articles.len().min(max_articles)];
    if shown.is_empty() {
        return format!("No recent crypto news found in the last {} hours", hours);
    }

    let mut out = format!("=== Crypto News (Last {} Hours)", hours);
    if let Some(symbol) = symbol {
        let _ = write!(out, " - {}", symbol);
    }
    out.push_str(" ===\n");

    for (i, article) in shown.iter().enumerate() {
        let _ = write!(out, "\n{}. {}\n   Source: {}", i + 1, article.title, article.source);
        if let Some(date) = display_date(article) {
            let _ = write!(out, " | {}", date);
        }
        if let Some(votes) = &article.votes {
            if votes.important > 0 {
                let _ = write!(out, " | Important ({})", votes.important);
            }
            if votes.is_bullish() {
                out.push_str(" | Bullish");
            } else if votes.is_bearish() {
                out.push_str(" | Bearish");
            }
        }
        let _ = writeln!(out, "\n   {}", article.url);

        if let Some(summary) = &article.summary {
            let clean = strip_html(summary);
            let clean = truncate_chars(&clean, SUMMARY_CHARS);
            if !clean.is_empty() {
                let _ = writeln!(out, "   {}...", clean);
            }
        }
    }

    let _ = write!(out, "\nTotal Articles: {}", shown.len());
    out
}

pub fn regulatory_digest(articles: &[NewsArticle]) -> String {
    if articles.is_empty() {
        return "No significant regulatory news in the past week".to_string();
    }

    let mut out = String::from("=== Recent Regulatory News (Last 7 Days) ===\n");
    for (i, article) in articles.iter().take(REGULATORY_SHOWN).enumerate() {
        let _ = write!(out, "\n{}. {}\n   Source: {}", i + 1, article.title, article.source);
        if let Some(date) = display_date(article) {
            let _ = write!(out, " | {}", date);
        }
        let _ = writeln!(out, "\n   {}", article.url);
    }
    out.trim_end().to_string()
}
