//! Number and text helpers shared by the report blocks.

use scraper::Html;

use crate::models::NewsArticle;

/// Rule placed between sections of a combined report.
pub const SECTION_RULE: &str =
    "================================================================================";

/// `value` with `decimals` fraction digits and `,` thousands separators.
pub fn grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

pub fn grouped_int(value: u64) -> String {
    grouped(value as f64, 0)
}

pub fn usd(value: f64, decimals: usize) -> String {
    format!("${}", grouped(value, decimals))
}

pub fn signed_pct(value: f64) -> String {
    format!("{:+.2}%", value)
}

/// Visible text of an HTML fragment with whitespace runs collapsed.
pub fn strip_html(fragment: &str) -> String {
    let document = Html::parse_fragment(fragment);
    let text: String = document.root_element().text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters (not bytes) of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// `YYYY-MM-DD HH:MM` when the timestamp parsed, otherwise the first 16
/// characters of whatever the source sent.
pub fn display_date(article: &NewsArticle) -> Option<String> {
    if let Some(ts) = article.published_at {
        return Some(ts.format("%Y-%m-%d %H:%M").to_string());
    }
    article
        .published_raw
        .as_deref()
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .map(|raw| truncate_chars(raw, 16).to_string())
}
