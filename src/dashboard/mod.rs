//! Dashboard module - forecast portal pages
//!
//! Server-rendered landing page and one page per tracked asset. Charts are
//! embedded as Plotly figures and drawn client-side.
//!
//! # Architecture
//! - `html.rs`: Section builders and formatting helpers
//! - `css.rs`: Styling with CSS custom properties
//! - `js.rs`: Chart bootstrap script
//!
//! # Asset page
//! - Embedded prediction widget for the current UTC date
//! - Live price, 24h change, market cap and volume tiles
//! - Candlestick, market cap and volume history
//! - Project fundamentals and summary

mod css;
mod html;
mod js;

use chrono::NaiveDate;

use crate::endpoints::AssetMarketData;
use crate::error::Result;
use crate::registry::{AssetProfile, AssetRegistry};

use html::html_escape;

/// Renders one asset page body into a full HTML document
pub type RenderFn = fn(&PageContext<'_>) -> Result<String>;

/// Everything an asset page needs, already fetched
#[derive(Debug, Clone, Copy)]
pub struct PageContext<'a> {
    pub profile: &'a AssetProfile,
    pub data: &'a AssetMarketData,
    /// Base URL of the forecast service, if one is configured
    pub prediction_url: Option<&'a str>,
    /// Current UTC date, passed to the forecast widget
    pub today: NaiveDate,
    pub vs_currency: &'a str,
    pub history_days: u32,
}

/// `{base}/predict/{coin_id}?date=YYYY-MM-DD`
pub fn prediction_iframe_url(base: &str, coin_id: &str, date: NaiveDate) -> String {
    format!(
        "{}/predict/{coin_id}?date={}",
        base.trim_end_matches('/'),
        date.format("%Y-%m-%d")
    )
}

/// Wrap a body in the shared document shell
fn page_shell(title: &str, body: &str, with_charts: bool) -> String {
    let (head_script, body_script) = if with_charts {
        (
            format!(r#"<script src="{}" charset="utf-8"></script>"#, js::PLOTLY_CDN),
            format!("<script>\n{}\n    </script>", js::SCRIPT),
        )
    } else {
        (String::new(), String::new())
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
    {head_script}
</head>
<body>
{body}
    {body_script}
</body>
</html>"#,
        title = html_escape(title),
        css = css::STYLES,
    )
}

/// Hero banner, one link per registered asset, and the team behind them
pub fn landing_page(registry: &AssetRegistry) -> String {
    let body = format!(
        "{}\n{}\n{}",
        html::hero(registry),
        html::token_bar(registry),
        html::team_section(registry)
    );
    page_shell("AI Crypto Forecast Dashboard", &body, false)
}

/// Inline error with navigation back to the registered assets
pub fn error_page(registry: &AssetRegistry, message: &str) -> String {
    let body = format!(
        r#"<div class="container">{notice}</div>
{tokens}"#,
        notice = html::notice(html::Notice::Error, message),
        tokens = html::token_bar(registry),
    );
    page_shell("AI Crypto Forecast Dashboard", &body, false)
}

/// Standard asset dashboard
pub fn render_asset_page(ctx: &PageContext<'_>) -> Result<String> {
    let sections = [
        html::page_header(ctx),
        html::snapshot_banner(ctx),
        html::prediction_section(ctx),
        html::DIVIDER.to_string(),
        html::kpi_section(ctx),
        html::DIVIDER.to_string(),
        html::charts_section(ctx)?,
        html::DIVIDER.to_string(),
        html::fundamentals_section(ctx),
        html::DIVIDER.to_string(),
        html::summary_section(ctx),
    ];

    let body = format!(r#"<div class="container">{}</div>"#, sections.concat());
    let title = format!("{} Forecast Dashboard", ctx.profile.name);
    Ok(page_shell(&title, &body, true))
}
