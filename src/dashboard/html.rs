//! Dashboard HTML fragments
//!
//! Each builder returns one section of a page. Sections degrade on their
//! own: a missing or malformed payload turns into an inline notice and the
//! rest of the page still renders.

use serde_json::Value;

use crate::charts::{self, CandlestickChart};
use crate::coingecko::{CoinMetadata, LiveQuote};
use crate::error::Result;
use crate::registry::AssetRegistry;

use super::PageContext;

#[derive(Debug, Clone, Copy)]
pub enum Notice {
    Info,
    Warning,
    Error,
}

impl Notice {
    fn class(self) -> &'static str {
        match self {
            Notice::Info => "alert-info",
            Notice::Warning => "alert-warning",
            Notice::Error => "alert-error",
        }
    }
}

/// Escape text for element content and quoted attributes
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Only absolute http(s) URLs are linked
pub fn safe_url(url: &str) -> Option<&str> {
    let url = url.trim();
    let lower = url.to_ascii_lowercase();
    (lower.starts_with("https://") || lower.starts_with("http://")).then_some(url)
}

/// Fixed decimals with comma thousands separators
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return "N/A".to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + int_part.len() / 3 + 1);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Amount in the quote currency
pub fn format_money(value: f64, vs_currency: &str, decimals: usize) -> String {
    if vs_currency.eq_ignore_ascii_case("usd") {
        format!("${}", format_grouped(value, decimals))
    } else {
        format!("{} {}", format_grouped(value, decimals), vs_currency.to_uppercase())
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{}%", format_grouped(value, 2))
}

pub fn notice(kind: Notice, message: &str) -> String {
    format!(
        r#"<div class="alert {class}">{message}</div>"#,
        class = kind.class(),
        message = html_escape(message)
    )
}

pub const DIVIDER: &str = r#"<div class="divider"></div>"#;

/// "A, B, C, and D"
fn human_list(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [one] => (*one).to_string(),
        [a, b] => format!("{a} and {b}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}

/// External primer linked from the landing page
pub const LEARN_MORE_URL: &str = "https://coinmarketcap.com/alexandria/";

pub fn hero(registry: &AssetRegistry) -> String {
    let symbols: Vec<&str> = registry.pages().iter().map(|p| p.profile.symbol).collect();
    format!(
        r#"
    <div class="hero">
        <h1>AI-Powered Crypto Forecasting Dashboard</h1>
        <p>Machine Learning-Driven Forecasts for {symbols}</p>
        <div class="hero-desc">
            Explore next-day high price predictions from per-asset forecasting
            services, alongside live market data, historical performance charts
            and project fundamentals.
        </div>
        <a class="learn-btn" href="{learn}" target="_blank" rel="noopener noreferrer">Learn More</a>
        <small>Choose a token to begin</small>
    </div>"#,
        symbols = html_escape(&human_list(&symbols)),
        learn = LEARN_MORE_URL,
    )
}

/// Owner and role per registered asset
pub fn team_section(registry: &AssetRegistry) -> String {
    let members: String = registry
        .pages()
        .iter()
        .map(|page| {
            format!(
                r#"
            <div class="member">
                <p><b>{owner}</b></p>
                <p>{role}</p>
            </div>"#,
                owner = html_escape(page.profile.owner),
                role = html_escape(page.profile.role),
            )
        })
        .collect();

    format!(
        r#"
    <div class="team">
        <h3>Our Team</h3>
        <div class="member-container">{members}
        </div>
    </div>"#
    )
}

pub fn token_bar(registry: &AssetRegistry) -> String {
    let tokens: String = registry
        .pages()
        .iter()
        .map(|page| {
            let profile = page.profile;
            format!(
                r#"
        <a class="token" href="?asset={id}">
            <h3>{name} ({symbol})</h3>
            <p>{blurb}</p>
        </a>"#,
                id = html_escape(profile.id),
                name = html_escape(profile.name),
                symbol = html_escape(profile.symbol),
                blurb = html_escape(profile.blurb),
            )
        })
        .collect();

    format!(r#"<nav class="token-bar">{tokens}</nav>"#)
}

pub fn page_header(ctx: &PageContext<'_>) -> String {
    format!(
        r#"
        <a class="back-link" href="?">&larr; All tokens</a>
        <h1 class="heading-yellow">{name} Next-Day High Price Prediction</h1>
        <p class="caption">Market data from CoinGecko, quoted in {vs}. Forecast for {date}.</p>"#,
        name = html_escape(ctx.profile.name),
        vs = html_escape(&ctx.vs_currency.to_uppercase()),
        date = ctx.today.format("%Y-%m-%d"),
    )
}

pub fn snapshot_banner(ctx: &PageContext<'_>) -> String {
    if ctx.data.is_degraded() {
        notice(
            Notice::Warning,
            "Live market data is unavailable right now. Some sections show earlier or bundled snapshot data.",
        )
    } else {
        String::new()
    }
}

/// Embedded forecast widget
pub fn prediction_section(ctx: &PageContext<'_>) -> String {
    let Some(base) = ctx.prediction_url.and_then(safe_url) else {
        return notice(
            Notice::Info,
            &format!("No prediction service is configured for {} yet.", ctx.profile.name),
        );
    };

    let src = super::prediction_iframe_url(base, ctx.profile.coin_id, ctx.today);
    format!(
        r#"<iframe class="prediction-frame" src="{src}" title="{name} forecast" loading="lazy" scrolling="yes"></iframe>"#,
        src = html_escape(&src),
        name = html_escape(ctx.profile.name),
    )
}

fn kpi_tile(label: &str, value: &str, class: &str) -> String {
    format!(
        r#"<div class="kpi"><h3>{label}</h3><p class="{class}">{value}</p></div>"#,
        label = html_escape(label),
        value = html_escape(value),
    )
}

pub fn kpi_section(ctx: &PageContext<'_>) -> String {
    let mut out = String::from("<h3>Live Market Snapshot</h3>");

    let quote = ctx
        .data
        .live
        .data()
        .map(|value| LiveQuote::from_simple_price(value, ctx.profile.coin_id, ctx.vs_currency));

    match quote {
        Some(Ok(quote)) => {
            let trend = if quote.change_24h_percent < 0.0 { "down" } else { "up" };
            out.push_str(r#"<div class="kpi-grid">"#);
            out.push_str(&kpi_tile("Price", &format_money(quote.price, ctx.vs_currency, 2), ""));
            out.push_str(&kpi_tile("24h Change", &format_percent(quote.change_24h_percent), trend));
            out.push_str(&kpi_tile(
                "Market Cap",
                &format_money(quote.market_cap, ctx.vs_currency, 0),
                "",
            ));
            out.push_str(&kpi_tile(
                "24h Volume",
                &format_money(quote.volume_24h, ctx.vs_currency, 0),
                "",
            ));
            out.push_str("</div>");
        }
        Some(Err(e)) => {
            log::warn!("{}: live quote unreadable: {e}", ctx.profile.id);
            out.push_str(&notice(Notice::Warning, "Data temporarily unavailable. Please retry later."));
        }
        None => {
            out.push_str(&notice(Notice::Warning, "Data temporarily unavailable. Please retry later."));
        }
    }

    out
}

/// Plotly figure as an inert JSON block plus its mount point
fn chart_block(target: &str, figure: &Value) -> Result<String> {
    let json = serde_json::to_string(figure)?.replace("</", "<\\/");
    Ok(format!(
        r#"<div class="chart" id="{target}"></div>
<script type="application/json" class="chart-spec" data-target="{target}">{json}</script>"#
    ))
}

fn ohlc_chart(ctx: &PageContext<'_>) -> Option<CandlestickChart> {
    let value = ctx.data.ohlc.data()?;
    match charts::parse_ohlc(value) {
        Ok(rows) => charts::candlestick(&rows, ctx.profile.symbol),
        Err(e) => {
            log::warn!("{}: OHLC payload unreadable: {e}", ctx.profile.id);
            None
        }
    }
}

pub fn charts_section(ctx: &PageContext<'_>) -> Result<String> {
    let mut out = String::from("<h3>Historical Market Performance</h3>");
    let vs = ctx.vs_currency.to_uppercase();

    match ohlc_chart(ctx) {
        Some(chart) => out.push_str(&chart_block("chart-ohlc", &chart.to_plotly())?),
        None => out.push_str(&notice(Notice::Info, "Price history is unavailable right now.")),
    }

    let Some(history) = ctx.data.market_chart.data() else {
        out.push_str(&notice(Notice::Info, "Market history is unavailable right now."));
        return Ok(out);
    };

    let series = [
        ("market_caps", "chart-market-cap", format!("Market Cap ({vs})")),
        ("total_volumes", "chart-volume", format!("Volume ({vs})")),
    ];
    for (key, target, label) in series {
        let chart = history
            .get(key)
            .map(charts::parse_series)
            .transpose()
            .map(|points| points.and_then(|points| charts::line(&points, &label)));

        match chart {
            Ok(Some(chart)) => out.push_str(&chart_block(target, &chart.to_plotly())?),
            Ok(None) => {
                out.push_str(&notice(Notice::Info, &format!("{label} history is unavailable right now.")));
            }
            Err(e) => {
                log::warn!("{}: {key} series unreadable: {e}", ctx.profile.id);
                out.push_str(&notice(Notice::Info, &format!("{label} history is unavailable right now.")));
            }
        }
    }

    Ok(out)
}

pub fn fundamentals_section(ctx: &PageContext<'_>) -> String {
    let mut out = format!(
        r#"<div class="fundamentals"><h3>{} Fundamentals</h3>"#,
        html_escape(ctx.profile.name)
    );

    let meta = ctx.data.metadata.data().map(CoinMetadata::from_value);
    match meta {
        Some(Ok(meta)) => {
            if let Some(logo) = meta.image.large.as_deref().and_then(safe_url) {
                out.push_str(&format!(
                    r#"<img src="{src}" width="80" alt="{name} logo">"#,
                    src = html_escape(logo),
                    name = html_escape(&meta.name),
                ));
            }

            let categories = meta.category_names();
            out.push_str(&format!(
                "<p><b>Name:</b> {name} | <b>Symbol:</b> {symbol}</p>\
                 <p><b>Algorithm:</b> {algorithm}</p>\
                 <p><b>Category:</b> {categories}</p>",
                name = html_escape(&meta.name),
                symbol = html_escape(&meta.symbol.to_uppercase()),
                algorithm = html_escape(meta.hashing_algorithm.as_deref().unwrap_or("N/A")),
                categories = if categories.is_empty() {
                    "N/A".to_string()
                } else {
                    html_escape(&categories.join(", "))
                },
            ));

            let links: Vec<String> = [("Website", meta.homepage()), ("Explorer", meta.explorer())]
                .into_iter()
                .filter_map(|(label, url)| {
                    let url = safe_url(url?)?;
                    Some(format!(
                        r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{label}</a>"#,
                        href = html_escape(url)
                    ))
                })
                .collect();
            if !links.is_empty() {
                out.push_str(&format!("<p>{}</p>", links.join(" | ")));
            }
        }
        Some(Err(e)) => {
            log::warn!("{}: metadata unreadable: {e}", ctx.profile.id);
            out.push_str(&notice(Notice::Warning, "Project fundamentals are unavailable. Please refresh later."));
        }
        None => {
            out.push_str(&notice(Notice::Warning, "Project fundamentals are unavailable. Please refresh later."));
        }
    }

    out.push_str("</div>");
    out
}

pub fn summary_section(ctx: &PageContext<'_>) -> String {
    format!(
        r#"
        <div class="summary">
            <h3>Project Summary</h3>
            <p>This page combines a next-day high price forecast for {name} with live market data.</p>
            <ul>
                <li>Forecasts come from a dedicated prediction service trained on historical {symbol} prices.</li>
                <li>Live price, market cap and volume are refreshed from CoinGecko every few minutes.</li>
                <li>Candlestick and market history charts cover the last {days} days.</li>
            </ul>
            <p>Forecasts are experimental and are not financial advice.</p>
        </div>"#,
        name = html_escape(ctx.profile.name),
        symbol = html_escape(ctx.profile.symbol),
        days = ctx.history_days,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_safe_url() {
        assert_eq!(safe_url(" https://ethereum.org/ "), Some("https://ethereum.org/"));
        assert_eq!(safe_url("HTTP://example.com"), Some("HTTP://example.com"));
        assert!(safe_url("javascript:alert(1)").is_none());
        assert!(safe_url("").is_none());
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(3521.449, 2), "3,521.45");
        assert_eq!(format_grouped(424_000_000_000.0, 0), "424,000,000,000");
        assert_eq!(format_grouped(999.999, 2), "1,000.00");
        assert_eq!(format_grouped(-1.25, 2), "-1.25");
        assert_eq!(format_grouped(-0.001, 2), "0.00");
        assert_eq!(format_grouped(12.0, 0), "12");
        assert_eq!(format_grouped(f64::NAN, 2), "N/A");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(97_000.5, "usd", 2), "$97,000.50");
        assert_eq!(format_money(1234.0, "eur", 0), "1,234 EUR");
        assert_eq!(format_percent(-3.456), "-3.46%");
    }

    #[test]
    fn test_human_list() {
        assert_eq!(human_list(&[]), "");
        assert_eq!(human_list(&["ETH"]), "ETH");
        assert_eq!(human_list(&["ETH", "SOL"]), "ETH and SOL");
        assert_eq!(human_list(&["ETH", "SOL", "XRP", "BTC"]), "ETH, SOL, XRP, and BTC");
    }

    #[test]
    fn test_chart_block_escapes_closing_tags() {
        let figure = serde_json::json!({"data": [], "layout": {"title": "</script><b>"}});
        let block = chart_block("chart-x", &figure).unwrap();
        assert!(block.contains(r#"<\/script><b>"#));
        assert_eq!(block.matches("</script>").count(), 1);
    }
}
